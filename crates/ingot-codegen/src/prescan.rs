//! The pre-scanner.
//!
//! Before a class body is transformed, five ordered passes populate the
//! symbol tables every later node transformation reads: field types, method
//! return types (two passes, so forward references resolve), method
//! parameter types from call sites (two passes, wider type wins), declared
//! parameter types, and field/method collisions. Two further passes — the
//! empty-array look-ahead and the hoisted-ternary pre-pass — are block-local
//! and run from the statement dispatcher.

use ingot_go::GoType;
use ingot_il::{IlKind, IlLiteral, IlNode, IlParam, MethodKind};

use crate::engine::{merge_wider, name_heuristic};
use crate::{pascal, stubs, Transformer};

/// Calls `f` on `node` and every descendant, in source order.
pub(crate) fn walk<'a>(node: &'a IlNode, f: &mut dyn FnMut(&'a IlNode)) {
    f(node);
    match &node.kind {
        IlKind::Program { body }
        | IlKind::StaticBlock { body }
        | IlKind::BlockStatement { body }
        | IlKind::ClassDeclaration { body, .. } => {
            for child in body {
                walk(child, f);
            }
        }
        IlKind::MethodDefinition { body, .. } | IlKind::FunctionDeclaration { body, .. } => {
            for child in body {
                walk(child, f);
            }
        }
        IlKind::FunctionExpression {
            body, expression, ..
        } => {
            for child in body {
                walk(child, f);
            }
            if let Some(expression) = expression {
                walk(expression, f);
            }
        }
        IlKind::PropertyDefinition { value, .. } => {
            if let Some(value) = value {
                walk(value, f);
            }
        }
        IlKind::VariableDeclaration { declarations, .. } => {
            for declarator in declarations {
                if let Some(init) = &declarator.init {
                    walk(init, f);
                }
            }
        }
        IlKind::ExpressionStatement { expression } => walk(expression, f),
        IlKind::ReturnStatement { argument } => {
            if let Some(argument) = argument {
                walk(argument, f);
            }
        }
        IlKind::IfStatement {
            test,
            consequent,
            alternate,
        } => {
            walk(test, f);
            walk(consequent, f);
            if let Some(alternate) = alternate {
                walk(alternate, f);
            }
        }
        IlKind::ForStatement {
            init,
            test,
            update,
            body,
        } => {
            if let Some(init) = init {
                walk(init, f);
            }
            if let Some(test) = test {
                walk(test, f);
            }
            if let Some(update) = update {
                walk(update, f);
            }
            walk(body, f);
        }
        IlKind::ForOfStatement { right, body, .. }
        | IlKind::ForInStatement { right, body, .. } => {
            walk(right, f);
            walk(body, f);
        }
        IlKind::WhileStatement { test, body } => {
            walk(test, f);
            walk(body, f);
        }
        IlKind::DoWhileStatement { body, test } => {
            walk(body, f);
            walk(test, f);
        }
        IlKind::ThrowStatement { argument } => walk(argument, f),
        IlKind::TryStatement {
            block,
            handler,
            finalizer,
        } => {
            for child in block {
                walk(child, f);
            }
            for child in handler.iter().flatten() {
                walk(child, f);
            }
            for child in finalizer.iter().flatten() {
                walk(child, f);
            }
        }
        IlKind::AssignmentExpression { left, right, .. } => {
            walk(left, f);
            walk(right, f);
        }
        IlKind::BinaryExpression { left, right, .. }
        | IlKind::LogicalExpression { left, right, .. } => {
            walk(left, f);
            walk(right, f);
        }
        IlKind::UnaryExpression { argument, .. } | IlKind::UpdateExpression { argument, .. } => {
            walk(argument, f)
        }
        IlKind::ConditionalExpression {
            test,
            consequent,
            alternate,
        } => {
            walk(test, f);
            walk(consequent, f);
            walk(alternate, f);
        }
        IlKind::CallExpression { callee, arguments } => {
            walk(callee, f);
            for argument in arguments {
                walk(argument, f);
            }
        }
        IlKind::NewExpression { arguments, .. } => {
            for argument in arguments {
                walk(argument, f);
            }
        }
        IlKind::MemberExpression {
            object, property, ..
        } => {
            walk(object, f);
            walk(property, f);
        }
        IlKind::TemplateLiteral { expressions, .. } => {
            for expression in expressions {
                walk(expression, f);
            }
        }
        IlKind::ArrayExpression { elements, .. } => {
            for element in elements {
                walk(element, f);
            }
        }
        IlKind::ObjectExpression { properties } => {
            for property in properties {
                walk(&property.value, f);
            }
        }
        IlKind::SpreadElement { argument } => walk(argument, f),
        IlKind::TypeConversion { value, .. }
        | IlKind::UnpackBytes { value, .. }
        | IlKind::HexDecode { value } => walk(value, f),
        IlKind::PackBytes { args, .. } => {
            for argument in args {
                walk(argument, f);
            }
        }
        IlKind::RotateLeft { value, count, .. } | IlKind::RotateRight { value, count, .. } => {
            walk(value, f);
            walk(count, f);
        }
        IlKind::ArrayAppend { target, value } => {
            walk(target, f);
            walk(value, f);
        }
        IlKind::ErrorCreation { message } => walk(message, f),
        _ => {}
    }
}

/// The first `return` with an argument, searching nested blocks in source
/// order.
fn first_return(body: &[IlNode]) -> Option<&IlNode> {
    for stmt in body {
        match &stmt.kind {
            IlKind::ReturnStatement {
                argument: Some(argument),
            } => return Some(argument),
            IlKind::IfStatement {
                consequent,
                alternate,
                ..
            } => {
                let nested = std::slice::from_ref(consequent.as_ref());
                if let Some(found) = first_return(nested) {
                    return Some(found);
                }
                if let Some(alternate) = alternate {
                    if let Some(found) = first_return(std::slice::from_ref(alternate.as_ref())) {
                        return Some(found);
                    }
                }
            }
            IlKind::BlockStatement { body }
            | IlKind::StaticBlock { body } => {
                if let Some(found) = first_return(body) {
                    return Some(found);
                }
            }
            IlKind::ForStatement { body, .. }
            | IlKind::ForOfStatement { body, .. }
            | IlKind::ForInStatement { body, .. }
            | IlKind::WhileStatement { body, .. }
            | IlKind::DoWhileStatement { body, .. } => {
                if let Some(found) = first_return(std::slice::from_ref(body.as_ref())) {
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    None
}

impl Transformer {
    /// Runs passes 1–5 over a class body. After this, every node
    /// transformation in the class sees a stable symbol table.
    pub(crate) fn prescan_class(
        &mut self,
        body: &[IlNode],
        struct_name: &str,
        framework_base: Option<&str>,
    ) {
        self.prescan_fields(body, framework_base);
        self.prescan_method_returns(body);
        self.prescan_param_types(body);
        self.prescan_declared_params(body);
        self.prescan_collisions(body, struct_name);
    }

    /// Pass 1: field types from receiver-property assignments in the
    /// constructor, plus property definitions.
    fn prescan_fields(&mut self, body: &[IlNode], framework_base: Option<&str>) {
        for member in body {
            match &member.kind {
                IlKind::PropertyDefinition { name, value, .. } => {
                    let ty = match value {
                        Some(value) => self.field_value_type(name, value, framework_base),
                        None => Some(self.field_name_type(name, framework_base)),
                    };
                    if let Some(ty) = ty {
                        self.register_field(name, ty);
                    }
                }
                IlKind::MethodDefinition {
                    kind: MethodKind::Constructor,
                    body,
                    ..
                } => {
                    let mut assignments: Vec<(String, &IlNode)> = Vec::new();
                    for stmt in body {
                        walk(stmt, &mut |node| {
                            if let IlKind::AssignmentExpression {
                                operator,
                                left,
                                right,
                            } = &node.kind
                            {
                                if operator == "=" {
                                    if let Some(field) = receiver_field(left) {
                                        assignments.push((field, right));
                                    }
                                }
                            }
                        });
                    }
                    for (field, value) in assignments {
                        if self.ctx.struct_field_types.contains_key(&field) {
                            continue;
                        }
                        if let Some(ty) = self.field_value_type(&field, value, framework_base) {
                            self.register_field(&field, ty);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Value-based field inference. `None` means "skip this assignment"
    /// (null initializations carry no usable type).
    fn field_value_type(
        &self,
        field: &str,
        value: &IlNode,
        framework_base: Option<&str>,
    ) -> Option<GoType> {
        match &value.kind {
            IlKind::Literal { value: literal, .. } => match literal {
                IlLiteral::Null => None,
                // Literal kinds that override the name heuristics outright.
                IlLiteral::Bool(_) => Some(GoType::Bool),
                IlLiteral::Float(_) => Some(GoType::Float64),
                IlLiteral::BigInt(_) => Some(GoType::Uint64),
                IlLiteral::Str(_) => Some(
                    framework_base
                        .and_then(|_| stubs::base_field_type(field))
                        .unwrap_or(GoType::String),
                ),
                IlLiteral::Int(_) => Some(self.field_name_type(field, framework_base)),
            },
            IlKind::ObjectExpression { .. } => Some(
                framework_base
                    .and_then(|_| stubs::base_field_type(field))
                    .unwrap_or_else(GoType::string_map),
            ),
            _ => {
                if let Some(base_ty) = framework_base.and_then(|_| stubs::base_field_type(field)) {
                    return Some(base_ty);
                }
                Some(self.infer_type(value, Some(field), None))
            }
        }
    }

    /// The name-heuristic ladder for fields, ending in the crypto-friendly
    /// `uint32` fallback.
    fn field_name_type(&self, field: &str, framework_base: Option<&str>) -> GoType {
        if let Some(base_ty) = framework_base.and_then(|_| stubs::base_field_type(field)) {
            return base_ty;
        }
        name_heuristic(field).unwrap_or(GoType::Uint32)
    }

    fn register_field(&mut self, field: &str, ty: GoType) {
        self.ctx
            .struct_field_types
            .insert(field.to_string(), ty.clone());
        self.ctx.struct_field_types.insert(pascal(field), ty);
    }

    /// Pass 2: method return types. The second sweep resolves methods that
    /// stayed `interface{}` because their first return called a method
    /// defined further down the class body.
    fn prescan_method_returns(&mut self, body: &[IlNode]) {
        for _ in 0..2 {
            for member in body {
                let IlKind::MethodDefinition {
                    name,
                    kind: MethodKind::Method,
                    body: method_body,
                    ..
                } = &member.kind
                else {
                    continue;
                };
                let known = self.ctx.method_return_types.get(name);
                if known.is_some_and(|ty| !ty.is_interface()) {
                    continue;
                }
                let Some(argument) = first_return(method_body) else {
                    continue;
                };
                let ty = match &argument.kind {
                    // A returned local resolves through its declaration so
                    // the bare-name fallback cannot mistype it.
                    IlKind::Identifier { name: local } => self
                        .local_decl_type(local, method_body)
                        .unwrap_or_else(|| self.infer_type(argument, None, None)),
                    _ => self.infer_type(argument, None, None),
                };
                self.ctx.method_return_types.insert(name.clone(), ty);
            }
        }
    }

    /// The declared type of a method-local variable: its initializer, with
    /// the push look-ahead covering `let x = []` declarations.
    fn local_decl_type(&self, name: &str, body: &[IlNode]) -> Option<GoType> {
        if let Some(ty) = self.ctx.variable_types.get(name) {
            return Some(ty.clone());
        }
        let mut init: Option<IlNode> = None;
        for stmt in body {
            walk(stmt, &mut |node| {
                if init.is_some() {
                    return;
                }
                if let IlKind::VariableDeclaration { declarations, .. } = &node.kind {
                    for declarator in declarations {
                        if declarator.name == name {
                            init = declarator.init.clone();
                        }
                    }
                }
            });
            if init.is_some() {
                break;
            }
        }
        let init = init?;
        if matches!(&init.kind, IlKind::ArrayExpression { elements, .. } if elements.is_empty()) {
            return self.lookahead_push_type(name, body).map(GoType::slice);
        }
        Some(self.infer_type(&init, Some(name), None))
    }

    /// Pass 3: parameter types from call sites, widest type winning. The
    /// second sweep sees the first sweep's results bound as variable types,
    /// so chained calls propagate.
    fn prescan_param_types(&mut self, body: &[IlNode]) {
        for sweep in 0..2 {
            for member in body {
                let IlKind::MethodDefinition {
                    params,
                    body: method_body,
                    name: method_name,
                    ..
                } = &member.kind
                else {
                    continue;
                };

                if sweep == 1 {
                    self.ctx.reset_function_scope();
                    let key_of =
                        |index: usize| format!("{}:{index}", method_key(method_name, &member.kind));
                    for (index, param) in params.iter().enumerate() {
                        if let Some(ty) = self.ctx.method_param_types.get(&key_of(index)).cloned()
                        {
                            self.ctx.variable_types.insert(param.name.clone(), ty);
                        }
                    }
                }

                let mut recorded: Vec<(String, GoType)> = Vec::new();
                for stmt in method_body {
                    walk(stmt, &mut |node| {
                        let IlKind::CallExpression { callee, arguments } = &node.kind else {
                            return;
                        };
                        let Some(method) = receiver_method(callee) else {
                            return;
                        };
                        for (index, argument) in arguments.iter().enumerate() {
                            let ty = self.infer_type(argument, None, None);
                            recorded.push((format!("{method}:{index}"), ty));
                        }
                    });
                }
                for (key, ty) in recorded {
                    let merged = match self.ctx.method_param_types.get(&key) {
                        Some(existing) => merge_wider(existing, &ty),
                        None => ty,
                    };
                    self.ctx.method_param_types.insert(key, merged);
                }

                if sweep == 1 {
                    self.ctx.reset_function_scope();
                }
            }
        }
    }

    /// Pass 4: declared parameter types, recorded so constructor call sites
    /// can assert `interface{}` arguments to the right concrete type.
    fn prescan_declared_params(&mut self, body: &[IlNode]) {
        for member in body {
            let IlKind::MethodDefinition {
                name,
                params,
                body: method_body,
                ..
            } = &member.kind
            else {
                continue;
            };
            let key = method_key(name, &member.kind);
            for (index, param) in params.iter().enumerate() {
                let ty = self.infer_parameter_type(param, method_body);
                let slot = format!("{key}:{index}");
                if ty.is_interface() && param_uses_typeof(param, method_body) {
                    self.ctx.polymorphic_params.insert(slot.clone());
                }
                self.ctx.method_declared_params.insert(slot, ty);
            }
        }
    }

    /// Usage-based declared-parameter inference. A parameter probed with
    /// `typeof` is polymorphic and stays wide no matter what else it does.
    pub(crate) fn infer_parameter_type(&self, param: &IlParam, body: &[IlNode]) -> GoType {
        let name = &param.name;
        let mut saw_typeof = false;
        let mut saw_index = false;
        let mut saw_arith = false;
        for stmt in body {
            walk(stmt, &mut |node| match &node.kind {
                IlKind::UnaryExpression { operator, argument } if operator == "typeof" => {
                    if is_ident(argument, name) {
                        saw_typeof = true;
                    }
                }
                IlKind::MemberExpression {
                    object, computed, ..
                } if *computed => {
                    if is_ident(object, name) {
                        saw_index = true;
                    }
                }
                IlKind::BinaryExpression {
                    operator,
                    left,
                    right,
                } => {
                    if matches!(
                        operator.as_str(),
                        "+" | "-" | "*" | "/" | "%" | "&" | "|" | "^" | "<<" | ">>" | ">>>"
                    ) && (is_ident(left, name) || is_ident(right, name))
                    {
                        saw_arith = true;
                    }
                }
                _ => {}
            });
        }

        if saw_typeof {
            return self.widen();
        }
        if let Some(annotated) = &param.result_type {
            let ty = self.parse_result_type(annotated);
            if matches!(
                ty,
                GoType::Slice(_) | GoType::Map(_, _) | GoType::String | GoType::Bool
            ) {
                return ty;
            }
        }
        if let Some(ty) = name_heuristic(name) {
            return ty;
        }
        if saw_index {
            return GoType::bytes();
        }
        if saw_arith {
            return GoType::Uint32;
        }
        self.widen()
    }

    /// Pass 5: a Pascal-cased field name that equals a method name renames
    /// the field with a `_` suffix.
    fn prescan_collisions(&mut self, body: &[IlNode], struct_name: &str) {
        let mut method_names: Vec<String> = Vec::new();
        for member in body {
            if let IlKind::MethodDefinition {
                name,
                kind: MethodKind::Method,
                ..
            } = &member.kind
            {
                method_names.push(pascal(name));
            }
        }
        let field_keys: Vec<String> = self.ctx.struct_field_types.keys().cloned().collect();
        for field in field_keys {
            let pascal_field = pascal(&field);
            if method_names.contains(&pascal_field) {
                self.ctx.renamed_fields.insert(
                    format!("{struct_name}.{pascal_field}"),
                    format!("{pascal_field}_"),
                );
            }
        }
    }
}

/// Whether the method body ever probes this parameter with `typeof`.
fn param_uses_typeof(param: &IlParam, body: &[IlNode]) -> bool {
    let mut found = false;
    for stmt in body {
        walk(stmt, &mut |node| {
            if let IlKind::UnaryExpression { operator, argument } = &node.kind {
                if operator == "typeof" && is_ident(argument, &param.name) {
                    found = true;
                }
            }
        });
    }
    found
}

/// `methodName` for keying, with the constructor spelled out.
fn method_key<'a>(name: &'a str, kind: &IlKind) -> &'a str {
    if let IlKind::MethodDefinition {
        kind: MethodKind::Constructor,
        ..
    } = kind
    {
        "constructor"
    } else {
        name
    }
}

fn is_ident(node: &IlNode, name: &str) -> bool {
    matches!(&node.kind, IlKind::Identifier { name: n } if n == name)
}

/// The field name of a `this.x` assignment target.
fn receiver_field(node: &IlNode) -> Option<String> {
    let IlKind::MemberExpression {
        object,
        property,
        computed: false,
    } = &node.kind
    else {
        return None;
    };
    if !matches!(object.kind, IlKind::ThisExpression) {
        return None;
    }
    match &property.kind {
        IlKind::Identifier { name } => Some(name.clone()),
        _ => None,
    }
}

/// The method name of a `this.m(...)` call.
fn receiver_method(callee: &IlNode) -> Option<String> {
    let IlKind::MemberExpression {
        object,
        property,
        computed: false,
    } = &callee.kind
    else {
        return None;
    };
    if !matches!(object.kind, IlKind::ThisExpression) {
        return None;
    }
    match &property.kind {
        IlKind::Identifier { name } => Some(name.clone()),
        _ => None,
    }
}
