//! Declaration lowering: classes to structs with receiver-bound methods,
//! constructors to `New<Struct>` factories, properties to fields, static
//! blocks to `init()` statements.

use indexmap::IndexSet;
use ingot_go::{escape_builtin, GoDecl, GoExpr, GoField, GoParam, GoStmt, GoType, UnaryOp};
use ingot_il::{IlKind, IlNode, IlParam, MethodKind};

use crate::{pascal, stubs, Transformer};

/// The receiver name for a struct: the first lowercase letter, or the first
/// two when the first letter is a common loop variable.
pub(crate) fn receiver_for(struct_name: &str) -> String {
    let lower = struct_name.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) if matches!(first, 'i' | 'j' | 'k' | 'n' | 'x' | 'y' | 'v') => {
            let mut receiver = String::new();
            receiver.push(first);
            if let Some(second) = chars.next() {
                receiver.push(second);
            }
            receiver
        }
        Some(first) => first.to_string(),
        None => "r".to_string(),
    }
}

/// A method promoted out of a `this.x = function() { … }` constructor
/// assignment.
struct PromotedMethod<'a> {
    name: String,
    params: &'a [IlParam],
    body: &'a [IlNode],
}

impl Transformer {
    pub(crate) fn lower_class(
        &mut self,
        name: &str,
        super_class: Option<&str>,
        body: &[IlNode],
    ) -> (Vec<GoDecl>, Vec<GoStmt>) {
        self.ctx.reset_class_state();
        let struct_name = pascal(name);
        self.ctx.current_struct = Some(name.to_string());

        let mapped_base: Option<String> = super_class.map(|superclass| {
            match stubs::map_base_class(superclass) {
                Some(framework) => {
                    self.touch_framework(framework);
                    framework.to_string()
                }
                None => pascal(superclass),
            }
        });
        let framework_base = mapped_base
            .as_deref()
            .filter(|base| stubs::map_base_class(base).is_some());
        let framework_base_owned = framework_base.map(str::to_string);
        self.ctx.current_base = mapped_base.clone();

        // Track the concrete algorithm struct for `this.algorithm.X`
        // assertions inside instance classes.
        if framework_base
            .map(stubs::is_instance_base)
            .unwrap_or(false)
        {
            if let Some(algorithm) = struct_name.strip_suffix("Instance") {
                self.ctx.algorithm_struct_name = Some(algorithm.to_string());
            }
        } else {
            self.ctx.algorithm_struct_name = Some(struct_name.clone());
        }

        self.prescan_class(body, &struct_name, framework_base_owned.as_deref());

        // Partition the class body.
        let mut constructor: Option<(&[IlParam], &[IlNode])> = None;
        let mut methods: Vec<(&str, &[IlParam], &[IlNode])> = Vec::new();
        let mut static_methods: Vec<(&str, &[IlParam], &[IlNode])> = Vec::new();
        let mut static_blocks: Vec<&[IlNode]> = Vec::new();
        let mut property_inits: Vec<(&str, &IlNode)> = Vec::new();
        for member in body {
            match &member.kind {
                IlKind::PropertyDefinition {
                    name,
                    value: Some(value),
                    is_static: false,
                } => property_inits.push((name.as_str(), value.as_ref())),
                IlKind::MethodDefinition {
                    name,
                    kind,
                    is_static,
                    params,
                    body,
                } => match kind {
                    MethodKind::Constructor => {
                        constructor = Some((params.as_slice(), body.as_slice()))
                    }
                    MethodKind::Method if *is_static => {
                        static_methods.push((name.as_str(), params.as_slice(), body.as_slice()))
                    }
                    MethodKind::Method => {
                        methods.push((name.as_str(), params.as_slice(), body.as_slice()))
                    }
                },
                IlKind::StaticBlock { body } => static_blocks.push(body.as_slice()),
                _ => {}
            }
        }

        // Promote method-valued constructor assignments to receiver methods.
        let mut promoted: Vec<PromotedMethod<'_>> = Vec::new();
        let mut constructor_stmts: Vec<&IlNode> = Vec::new();
        if let Some((_, ctor_body)) = &constructor {
            for stmt in *ctor_body {
                if let Some(method) = promoted_method(stmt) {
                    promoted.push(method);
                } else {
                    constructor_stmts.push(stmt);
                }
            }
        }

        let mut decls = Vec::new();
        decls.push(self.struct_decl(&struct_name, name, mapped_base.as_deref()));

        let (ctor_params, _) = constructor.unwrap_or((&[], &[]));
        decls.push(self.lower_constructor(
            &struct_name,
            ctor_params,
            &property_inits,
            &constructor_stmts,
        ));

        for (method_name, params, method_body) in methods {
            decls.push(self.lower_method(&struct_name, method_name, params, method_body));
        }
        for method in promoted {
            decls.push(self.lower_method(&struct_name, &method.name, method.params, method.body));
        }
        for (method_name, params, method_body) in static_methods {
            // Static methods have no receiver state; they become
            // struct-prefixed free functions.
            let free_name = format!("{struct_name}{}", pascal(method_name));
            decls.push(self.lower_named_function(&free_name, method_name, params, method_body));
        }

        let mut init_stmts = Vec::new();
        for block in static_blocks {
            for stmt in block {
                let lowered = self.lower_stmt(stmt);
                init_stmts.extend(self.drain_pending());
                init_stmts.extend(lowered);
            }
        }

        self.ctx.current_struct = None;
        self.ctx.current_base = None;
        self.ctx.algorithm_struct_name = None;
        (decls, init_stmts)
    }

    /// The struct declaration: embedded base first, then every field the
    /// pre-scan discovered that the base does not already provide.
    fn struct_decl(
        &mut self,
        struct_name: &str,
        source_name: &str,
        mapped_base: Option<&str>,
    ) -> GoDecl {
        let mut fields = Vec::new();
        if let Some(base) = mapped_base {
            fields.push(GoField::embedded(base));
        }

        let mut seen: IndexSet<String> = IndexSet::new();
        let entries: Vec<(String, GoType)> = self
            .ctx
            .struct_field_types
            .iter()
            .map(|(field, ty)| (field.clone(), ty.clone()))
            .collect();
        for (field, ty) in entries {
            let pascal_field = pascal(&field);
            if !seen.insert(pascal_field.clone()) {
                continue;
            }
            if let Some(base) = mapped_base {
                if stubs::map_base_class(base).is_some()
                    && stubs::base_has_field(base, &pascal_field)
                {
                    continue;
                }
            }
            let emitted = self
                .ctx
                .renamed_fields
                .get(&format!("{struct_name}.{pascal_field}"))
                .cloned()
                .unwrap_or(pascal_field);
            fields.push(GoField::new(emitted, ty));
        }

        GoDecl::Struct {
            name: struct_name.to_string(),
            doc: self
                .options
                .add_comments
                .then(|| format!("{struct_name} implements the {source_name} algorithm.")),
            fields,
        }
    }

    /// Lowers the constructor into a `New<Struct>` factory. The receiver is
    /// bound to a local named `result`, so receiver-property assignments
    /// lower to plain field stores on the fresh instance.
    fn lower_constructor(
        &mut self,
        struct_name: &str,
        params: &[IlParam],
        property_inits: &[(&str, &IlNode)],
        body: &[&IlNode],
    ) -> GoDecl {
        self.ctx.reset_function_scope();
        self.ctx.receiver_name = Some("result".to_string());
        self.ctx.current_func = Some("constructor".to_string());
        self.ctx.current_function_return_type = None;

        let go_params = self.bind_params("constructor", params);

        let mut stmts = vec![GoStmt::decl_short(
            "result",
            GoExpr::unary(
                UnaryOp::Addr,
                GoExpr::Composite {
                    ty: GoType::named(struct_name),
                    elems: vec![],
                },
            ),
        )];
        // Class properties with initializers run before the constructor
        // body, matching source evaluation order.
        for (field, value) in property_inits {
            let pascal_field = stubs::canonical_base_field(&pascal(field)).to_string();
            let target_ty = self
                .ctx
                .struct_field_types
                .get(*field)
                .cloned()
                .unwrap_or_else(|| self.widen());
            let emitted = self
                .ctx
                .renamed_fields
                .get(&format!("{struct_name}.{pascal_field}"))
                .cloned()
                .unwrap_or(pascal_field);
            let lowered = self.coerce_value(&target_ty, value);
            stmts.push(GoStmt::assign(
                GoExpr::select(GoExpr::ident("result"), emitted),
                lowered,
            ));
        }
        let body_nodes: Vec<IlNode> = body.iter().map(|stmt| (*stmt).clone()).collect();
        stmts.extend(self.lower_block(&body_nodes));

        let mut results = vec![GoType::pointer(GoType::named(struct_name))];
        if self.options.error_handling {
            results.push(GoType::Error);
            stmts.push(GoStmt::ReturnMulti(vec![
                GoExpr::ident("result"),
                GoExpr::Nil,
            ]));
        } else {
            stmts.push(GoStmt::Return(Some(GoExpr::ident("result"))));
        }

        self.ctx.current_func = None;
        self.ctx.receiver_name = None;

        GoDecl::Func {
            name: format!("New{struct_name}"),
            doc: self
                .options
                .add_comments
                .then(|| format!("New{struct_name} constructs a new {struct_name} instance.")),
            params: go_params,
            results,
            body: stmts,
        }
    }

    fn lower_method(
        &mut self,
        struct_name: &str,
        method_name: &str,
        params: &[IlParam],
        body: &[IlNode],
    ) -> GoDecl {
        self.ctx.reset_function_scope();
        let receiver = receiver_for(struct_name);
        self.ctx.receiver_name = Some(receiver.clone());
        self.ctx.current_func = Some(method_name.to_string());
        // Promoted constructor methods were invisible to the pre-scan, so
        // fall back to first-return inference here.
        let mut return_type = self.ctx.method_return_types.get(method_name).cloned();
        if return_type.is_none() {
            let mut found = None;
            for stmt in body {
                crate::prescan::walk(stmt, &mut |node| {
                    if found.is_none() {
                        if let IlKind::ReturnStatement {
                            argument: Some(argument),
                        } = &node.kind
                        {
                            found = Some(self.infer_type(argument, None, None));
                        }
                    }
                });
            }
            if let Some(ty) = &found {
                self.ctx
                    .method_return_types
                    .insert(method_name.to_string(), ty.clone());
            }
            return_type = found;
        }
        self.ctx.current_function_return_type = return_type;

        let go_params = self.bind_params(method_name, params);
        let stmts = self.lower_block(body);

        let results = match &self.ctx.current_function_return_type {
            Some(ty) if *ty != GoType::Nothing => vec![ty.clone()],
            _ => vec![],
        };

        // Duplicate method names take a numeric suffix.
        let mut emitted = pascal(method_name);
        let mut duplicate = 2;
        while !self.ctx.declared_method_names.insert(emitted.clone()) {
            emitted = format!("{}{duplicate}", pascal(method_name));
            duplicate += 1;
        }

        self.ctx.current_func = None;
        self.ctx.current_function_return_type = None;
        self.ctx.receiver_name = None;

        GoDecl::Method {
            recv_name: receiver,
            recv_type: struct_name.to_string(),
            name: emitted,
            doc: None,
            params: go_params,
            results,
            body: stmts,
        }
    }

    pub(crate) fn lower_free_function(
        &mut self,
        name: &str,
        params: &[IlParam],
        body: &[IlNode],
    ) -> GoDecl {
        self.lower_named_function(&pascal(name), name, params, body)
    }

    fn lower_named_function(
        &mut self,
        go_name: &str,
        source_name: &str,
        params: &[IlParam],
        body: &[IlNode],
    ) -> GoDecl {
        self.ctx.reset_function_scope();
        self.ctx.receiver_name = None;
        self.ctx.current_func = Some(source_name.to_string());

        // Register the return type up front so recursive calls resolve.
        let return_type = {
            let mut found = None;
            for stmt in body {
                crate::prescan::walk(stmt, &mut |node| {
                    if found.is_none() {
                        if let IlKind::ReturnStatement {
                            argument: Some(argument),
                        } = &node.kind
                        {
                            found = Some(self.infer_type(argument, None, None));
                        }
                    }
                });
            }
            found
        };
        if let Some(ty) = &return_type {
            self.ctx
                .method_return_types
                .insert(source_name.to_string(), ty.clone());
        }
        self.ctx.current_function_return_type = return_type.clone();

        let mut go_params = Vec::new();
        if self.options.use_context {
            self.ctx.import("context");
            go_params.push(GoParam::new("ctx", GoType::named("context.Context")));
        }
        for (index, param) in params.iter().enumerate() {
            let ty = self.infer_parameter_type(param, body);
            self.ctx
                .method_declared_params
                .insert(format!("{source_name}:{index}"), ty.clone());
            self.ctx
                .variable_types
                .insert(param.name.clone(), ty.clone());
            go_params.push(GoParam::new(escape_builtin(&param.name), ty));
        }

        let stmts = self.lower_block(body);
        let results = match return_type {
            Some(ty) if ty != GoType::Nothing => vec![ty],
            _ => vec![],
        };

        self.ctx.current_func = None;
        self.ctx.current_function_return_type = None;

        GoDecl::Func {
            name: go_name.to_string(),
            doc: None,
            params: go_params,
            results,
            body: stmts,
        }
    }

    /// Registers method parameters in the variable scope and produces the Go
    /// parameter list. Declared types win; call-site types fill the gaps
    /// unless the parameter is `typeof`-polymorphic.
    fn bind_params(&mut self, method_key: &str, params: &[IlParam]) -> Vec<GoParam> {
        let mut go_params = Vec::with_capacity(params.len());
        for (index, param) in params.iter().enumerate() {
            let slot = format!("{method_key}:{index}");
            let declared = self.ctx.method_declared_params.get(&slot).cloned();
            let ty = match declared {
                Some(ty) if !ty.is_interface() => ty,
                other => {
                    if self.ctx.polymorphic_params.contains(&slot) {
                        other.unwrap_or_else(|| self.widen())
                    } else {
                        self.ctx
                            .method_param_types
                            .get(&slot)
                            .cloned()
                            .or(other)
                            .unwrap_or_else(|| self.widen())
                    }
                }
            };
            self.ctx
                .variable_types
                .insert(param.name.clone(), ty.clone());
            go_params.push(GoParam::new(escape_builtin(&param.name), ty));
        }
        go_params
    }

    /// Lowers one module-level declarator.
    pub(crate) fn lower_module_var(&mut self, declarator: &ingot_il::IlDeclarator) -> GoDecl {
        let name = escape_builtin(&declarator.name).to_string();
        match &declarator.init {
            Some(init) => {
                if let IlKind::ObjectExpression { properties } = &init.kind {
                    if self.object_references_this(properties) {
                        let value = self.lower_map_self_ref(properties);
                        self.ctx
                            .register_module_var(&declarator.name, GoType::string_map());
                        return GoDecl::Var {
                            name,
                            doc: None,
                            ty: None,
                            value: Some(value),
                        };
                    }
                }
                let ty = self.infer_type(init, Some(&declarator.name), None);
                let value = self.lower_expr(init, Some(&ty));
                self.ctx.register_module_var(&declarator.name, ty.clone());
                let explicit = value.is_literal();
                GoDecl::Var {
                    name,
                    doc: None,
                    ty: explicit.then_some(ty),
                    value: Some(value),
                }
            }
            None => {
                let ty = self.widen();
                self.ctx.register_module_var(&declarator.name, ty.clone());
                GoDecl::Var {
                    name,
                    doc: None,
                    ty: Some(ty),
                    value: None,
                }
            }
        }
    }
}

/// Recognizes `this.x = function() { … }` statements in a constructor body.
fn promoted_method(stmt: &IlNode) -> Option<PromotedMethod<'_>> {
    let IlKind::ExpressionStatement { expression } = &stmt.kind else {
        return None;
    };
    let IlKind::AssignmentExpression {
        operator,
        left,
        right,
    } = &expression.kind
    else {
        return None;
    };
    if operator != "=" {
        return None;
    }
    let IlKind::MemberExpression {
        object,
        property,
        computed: false,
    } = &left.kind
    else {
        return None;
    };
    if !matches!(object.kind, IlKind::ThisExpression) {
        return None;
    }
    let IlKind::Identifier { name } = &property.kind else {
        return None;
    };
    let IlKind::FunctionExpression {
        params,
        body,
        expression: None,
    } = &right.kind
    else {
        return None;
    };
    Some(PromotedMethod {
        name: name.clone(),
        params,
        body,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::receiver_for;

    #[test]
    fn test_receiver_naming() {
        assert_eq!(receiver_for("Blowfish"), "b");
        assert_eq!(receiver_for("Xtea"), "xt");
        assert_eq!(receiver_for("Idea"), "id");
        assert_eq!(receiver_for("Nonce"), "no");
        assert_eq!(receiver_for("Serpent"), "s");
    }
}
