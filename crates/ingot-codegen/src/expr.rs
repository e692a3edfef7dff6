//! Expression lowering: literals, members, operators, truthiness rewrites,
//! the map-self-ref IIFE and the IL crypto operation nodes.

use ingot_go::{
    escape_builtin, BinaryOp, CompositeElem, GoExpr, GoParam, GoStmt, GoType, UnaryOp,
};
use ingot_il::{IlKind, IlLiteral, IlNode, IlParam, IlProperty};

use crate::engine::{binary_op_of, uint_of_width};
use crate::prescan::walk;
use crate::{enums, pascal, stubs, Transformer};

impl Transformer {
    pub(crate) fn lower_expr(&mut self, node: &IlNode, hint: Option<&GoType>) -> GoExpr {
        match &node.kind {
            IlKind::Identifier { name } => {
                if name == "undefined" {
                    return GoExpr::Nil;
                }
                GoExpr::ident(escape_builtin(name))
            }
            IlKind::ThisExpression => self.receiver_expr(),
            IlKind::SuperExpression => self.super_expr(),
            IlKind::Literal { value, raw } => self.lower_literal(value, raw.as_deref()),
            IlKind::TemplateLiteral {
                quasis,
                expressions,
            } => self.lower_template(quasis, expressions),
            IlKind::ArrayExpression {
                elements,
                element_type,
            } => self.lower_array(elements, element_type.as_deref(), hint),
            IlKind::ObjectExpression { properties } => self.lower_object(properties, hint),
            IlKind::FunctionExpression {
                params,
                body,
                expression,
            } => self.lower_function_expression(params, body, expression.as_deref(), hint),
            IlKind::MemberExpression {
                object,
                property,
                computed,
            } => self.lower_member(object, property, *computed),
            IlKind::CallExpression { callee, arguments } => {
                self.lower_call(callee, arguments, hint)
            }
            IlKind::NewExpression { callee, arguments } => self.lower_new(callee, arguments),
            IlKind::BinaryExpression {
                operator,
                left,
                right,
            } => self.lower_binary(operator, left, right),
            IlKind::LogicalExpression {
                operator,
                left,
                right,
            } => self.lower_logical(operator, left, right, hint),
            IlKind::UnaryExpression { operator, argument } => {
                self.lower_unary(operator, argument)
            }
            IlKind::UpdateExpression {
                operator,
                prefix,
                argument,
            } => self.lower_update_expr(operator, *prefix, argument),
            IlKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                let cond = self.lower_condition(test);
                let then_value = self.lower_expr(consequent, hint);
                let else_value = self.lower_expr(alternate, hint);
                let call = GoExpr::call_named(
                    self.touch_helper("ifTruthy"),
                    vec![cond, then_value, else_value],
                );
                match hint {
                    Some(target) if !target.is_interface() && self.options.use_strict_types => {
                        GoExpr::assert(call, target.clone())
                    }
                    _ => call,
                }
            }
            IlKind::AssignmentExpression { left, .. } => {
                // An assignment in expression position hoists to a statement
                // and leaves a reference to its target behind.
                let stmts = self.lower_assignment(node);
                self.ctx.pending_stmts.extend(stmts);
                self.lower_lvalue(left)
            }
            IlKind::SpreadElement { argument } => self.lower_expr(argument, hint),
            IlKind::TypeConversion { target, value } => self.lower_conversion(target, value),
            IlKind::PackBytes {
                bits,
                big_endian,
                args,
            } => self.lower_pack(*bits, *big_endian, args),
            IlKind::UnpackBytes {
                bits,
                big_endian,
                value,
            } => {
                let name = format!("unpack{bits}{}", endian_suffix(*big_endian));
                let value = self.coerce_value(&uint_of_width(*bits), value);
                self.touch_helper(&name);
                GoExpr::call_named(name, vec![value])
            }
            IlKind::RotateLeft { bits, value, count } => {
                self.lower_rotate(*bits, value, count, false)
            }
            IlKind::RotateRight { bits, value, count } => {
                self.lower_rotate(*bits, value, count, true)
            }
            IlKind::ArrayAppend { target, value } => {
                let target_ty = self.infer_type(target, None, None);
                let element = target_ty
                    .element_type()
                    .cloned()
                    .unwrap_or_else(|| self.widen());
                let lowered_target = self.lower_expr(target, None);
                let lowered_value = self.coerce_value(&element, value);
                GoExpr::call(
                    GoExpr::ident("append"),
                    vec![lowered_target, lowered_value],
                )
            }
            IlKind::HexDecode { value } => {
                let value = self.lower_expr(value, Some(&GoType::String));
                GoExpr::call_named(self.touch_helper("mustHexDecode"), vec![value])
            }
            IlKind::ErrorCreation { message } => {
                self.ctx.import("errors");
                let message = self.lower_expr(message, Some(&GoType::String));
                GoExpr::call(
                    GoExpr::select(GoExpr::ident("errors"), "New"),
                    vec![message],
                )
            }
            _ => self.warn_unhandled(node),
        }
    }

    /// The current receiver: `result` inside constructors, the receiver
    /// letter inside methods, `s` inside a map-self-ref lambda.
    pub(crate) fn receiver_expr(&self) -> GoExpr {
        if self.ctx.in_map_self_ref_context {
            return GoExpr::ident("s");
        }
        match &self.ctx.receiver_name {
            Some(receiver) => GoExpr::ident(receiver.clone()),
            None => GoExpr::ident("result"),
        }
    }

    fn super_expr(&self) -> GoExpr {
        let base = self
            .ctx
            .current_base
            .clone()
            .unwrap_or_else(|| "BaseAlgorithm".to_string());
        GoExpr::select(self.receiver_expr(), base)
    }

    fn lower_literal(&mut self, value: &IlLiteral, raw: Option<&str>) -> GoExpr {
        match value {
            IlLiteral::Null => GoExpr::Nil,
            IlLiteral::Bool(b) => GoExpr::Bool(*b),
            IlLiteral::Int(n) => match raw {
                Some(raw) if raw.starts_with("0x") || raw.starts_with("0X") => {
                    GoExpr::Lit(raw.to_string())
                }
                _ => GoExpr::Int(*n),
            },
            IlLiteral::Float(f) => match raw {
                Some(raw) => GoExpr::Lit(raw.to_string()),
                None => GoExpr::Lit(format!("{f:?}")),
            },
            IlLiteral::Str(s) => GoExpr::str(s.clone()),
            IlLiteral::BigInt(digits) => {
                GoExpr::convert(GoType::Uint64, GoExpr::Lit(digits.clone()))
            }
        }
    }

    fn lower_template(&mut self, quasis: &[String], expressions: &[IlNode]) -> GoExpr {
        self.ctx.import("fmt");
        let mut format = String::new();
        for (index, quasi) in quasis.iter().enumerate() {
            format.push_str(&quasi.replace('%', "%%"));
            if index < expressions.len() {
                format.push_str("%v");
            }
        }
        let mut args = vec![GoExpr::str(format)];
        for expression in expressions {
            args.push(self.lower_expr(expression, None));
        }
        GoExpr::call(GoExpr::select(GoExpr::ident("fmt"), "Sprintf"), args)
    }

    fn lower_array(
        &mut self,
        elements: &[IlNode],
        element_type: Option<&str>,
        hint: Option<&GoType>,
    ) -> GoExpr {
        let ty = self.array_literal_type(elements, element_type, hint);
        let element = ty.element_type().cloned().unwrap_or_else(|| self.widen());

        let has_spread = elements
            .iter()
            .any(|el| matches!(el.kind, IlKind::SpreadElement { .. }));
        if !has_spread {
            let elems = elements
                .iter()
                .map(|el| CompositeElem::Value(self.coerce_value(&element, el)))
                .collect();
            return GoExpr::Composite { ty, elems };
        }

        // A spread lowers the literal to an append chain.
        let mut current: Option<GoExpr> = None;
        let mut pending: Vec<GoExpr> = Vec::new();
        for el in elements {
            match &el.kind {
                IlKind::SpreadElement { argument } => {
                    let base = match current.take() {
                        Some(expr) => {
                            if pending.is_empty() {
                                expr
                            } else {
                                let mut args = vec![expr];
                                args.append(&mut pending);
                                GoExpr::call(GoExpr::ident("append"), args)
                            }
                        }
                        None => GoExpr::Composite {
                            ty: ty.clone(),
                            elems: pending.drain(..).map(CompositeElem::Value).collect(),
                        },
                    };
                    let spread = self.lower_expr(argument, Some(&ty));
                    current = Some(GoExpr::call_variadic(
                        GoExpr::ident("append"),
                        vec![base, spread],
                    ));
                }
                _ => pending.push(self.coerce_value(&element, el)),
            }
        }
        let mut result = current.unwrap_or_else(|| GoExpr::Composite {
            ty: ty.clone(),
            elems: vec![],
        });
        if !pending.is_empty() {
            let mut args = vec![result];
            args.append(&mut pending);
            result = GoExpr::call(GoExpr::ident("append"), args);
        }
        result
    }

    fn lower_object(&mut self, properties: &[IlProperty], hint: Option<&GoType>) -> GoExpr {
        if self.object_references_this(properties) {
            return self.lower_map_self_ref(properties);
        }

        // A known framework value type gets a struct literal with
        // normalized field names.
        if let Some(GoType::Named(record)) = hint {
            if stubs::is_helper_record(record) {
                self.touch_helper_record(record);
                let elems = properties
                    .iter()
                    .map(|property| {
                        let field = pascal(&property.key);
                        let field_ty = stubs::record_field_type(record, &field);
                        let value = self.coerce_value(&field_ty, &property.value);
                        CompositeElem::Field(field, value)
                    })
                    .collect();
                return GoExpr::Composite {
                    ty: GoType::named(record.clone()),
                    elems,
                };
            }
        }

        let elems = properties
            .iter()
            .map(|property| {
                let value = self.lower_expr(&property.value, None);
                CompositeElem::Keyed(GoExpr::str(property.key.clone()), value)
            })
            .collect();
        GoExpr::Composite {
            ty: GoType::string_map(),
            elems,
        }
    }

    /// True when any function-valued property references the enclosing
    /// `this`, which forces the map-self-ref lowering.
    pub(crate) fn object_references_this(&self, properties: &[IlProperty]) -> bool {
        for property in properties {
            if let IlKind::FunctionExpression { .. } = &property.value.kind {
                let mut found = false;
                walk(&property.value, &mut |node| {
                    if matches!(node.kind, IlKind::ThisExpression) {
                        found = true;
                    }
                });
                if found {
                    return true;
                }
            }
        }
        false
    }

    /// Lowers an object literal with self-referencing closures to an
    /// immediately-invoked lambda that builds the map in a local `s`.
    pub(crate) fn lower_map_self_ref(&mut self, properties: &[IlProperty]) -> GoExpr {
        let was_in_context = self.ctx.in_map_self_ref_context;
        self.ctx.in_map_self_ref_context = true;

        let mut body = vec![GoStmt::decl_short(
            "s",
            GoExpr::call_named(
                "make",
                vec![GoExpr::Lit(GoType::string_map().to_string())],
            ),
        )];
        for property in properties {
            let value = self.lower_expr(&property.value, None);
            body.push(GoStmt::assign(
                GoExpr::index(GoExpr::ident("s"), GoExpr::str(property.key.clone())),
                value,
            ));
        }
        body.push(GoStmt::Return(Some(GoExpr::ident("s"))));

        self.ctx.in_map_self_ref_context = was_in_context;

        GoExpr::call(
            GoExpr::FuncLit {
                params: vec![],
                result: Some(GoType::string_map()),
                body,
            },
            vec![],
        )
    }

    fn lower_function_expression(
        &mut self,
        params: &[IlParam],
        body: &[IlNode],
        expression: Option<&IlNode>,
        hint: Option<&GoType>,
    ) -> GoExpr {
        let (param_types, result) = match hint {
            Some(GoType::Func(param_types, result)) => (
                param_types.clone(),
                result.as_ref().map(|ty| (**ty).clone()),
            ),
            _ => (
                params.iter().map(|_| self.widen()).collect(),
                Some(self.widen()),
            ),
        };

        let saved = self.ctx.variable_types.clone();
        let mut go_params = Vec::with_capacity(params.len());
        for (index, param) in params.iter().enumerate() {
            let ty = param_types
                .get(index)
                .cloned()
                .unwrap_or_else(|| self.widen());
            self.ctx
                .variable_types
                .insert(param.name.clone(), ty.clone());
            go_params.push(GoParam::new(escape_builtin(&param.name), ty));
        }

        let stmts = match expression {
            Some(expression) => {
                let value = self.lower_expr(expression, result.as_ref());
                vec![GoStmt::Return(Some(value))]
            }
            None => self.lower_block(body),
        };
        self.ctx.variable_types = saved;

        GoExpr::FuncLit {
            params: go_params,
            result: result.filter(|ty| *ty != GoType::Nothing),
            body: stmts,
        }
    }

    pub(crate) fn lower_member(
        &mut self,
        object: &IlNode,
        property: &IlNode,
        computed: bool,
    ) -> GoExpr {
        if computed {
            let container = self.lower_expr(object, None);
            // A negative literal index counts from the end.
            if let Some(offset) = negative_literal(property) {
                return GoExpr::index(
                    container.clone(),
                    GoExpr::binary(
                        GoExpr::len_of(container),
                        BinaryOp::Sub,
                        GoExpr::Int(offset),
                    ),
                );
            }
            let index = self.lower_expr(property, Some(&GoType::Int));
            return GoExpr::index(container, index);
        }

        let IlKind::Identifier { name: field } = &property.kind else {
            let container = self.lower_expr(object, None);
            let index = self.lower_expr(property, None);
            return GoExpr::index(container, index);
        };

        // Enum references resolve to generated constants.
        if let Some(constant) = self.enum_constant(object, field) {
            return constant;
        }

        match &object.kind {
            IlKind::ThisExpression => {
                if self.ctx.in_map_self_ref_context {
                    return GoExpr::index(GoExpr::ident("s"), GoExpr::str(field.clone()));
                }
                let pascal_field = stubs::canonical_base_field(&pascal(field)).to_string();
                let emitted = self
                    .ctx
                    .current_struct
                    .as_ref()
                    .and_then(|current| {
                        self.ctx
                            .renamed_fields
                            .get(&format!("{}.{pascal_field}", pascal(current)))
                    })
                    .cloned()
                    .unwrap_or(pascal_field);
                GoExpr::select(self.receiver_expr(), emitted)
            }
            IlKind::SuperExpression => GoExpr::select(self.super_expr(), pascal(field)),
            IlKind::Identifier { name } if name == "global" || name == "globalThis" => {
                if field == "AlgorithmFramework" {
                    self.ctx
                        .framework_functions
                        .insert("AlgorithmFramework".to_string());
                    return GoExpr::ident("algorithmFramework");
                }
                GoExpr::ident(escape_builtin(field))
            }
            IlKind::Identifier { name } if name == "Math" => {
                self.ctx.import("math");
                let constant = match field.as_str() {
                    "PI" => "Pi",
                    "E" => "E",
                    other => return GoExpr::select(GoExpr::ident("math"), pascal(other)),
                };
                GoExpr::select(GoExpr::ident("math"), constant)
            }
            // `this.algorithm.X` narrows the stored interface to the
            // concrete algorithm struct before selecting.
            IlKind::MemberExpression {
                object: inner_object,
                property: inner_property,
                computed: false,
            } if matches!(inner_object.kind, IlKind::ThisExpression)
                && matches!(&inner_property.kind, IlKind::Identifier { name } if name == "algorithm") =>
            {
                let algorithm = GoExpr::select(self.receiver_expr(), "Algorithm");
                match self.ctx.algorithm_struct_name.clone() {
                    Some(concrete) => GoExpr::select(
                        GoExpr::assert(
                            algorithm,
                            GoType::pointer(GoType::named(concrete)),
                        ),
                        pascal(field),
                    ),
                    None => GoExpr::select(algorithm, pascal(field)),
                }
            }
            _ => {
                if field == "length" {
                    let container = self.lower_expr(object, None);
                    return GoExpr::len_of(container);
                }
                let object_ty = self.infer_type(object, None, None);
                let container = self.lower_expr(object, None);
                if object_ty.is_map() {
                    return GoExpr::index(container, GoExpr::str(field.clone()));
                }
                GoExpr::select(container, pascal(field))
            }
        }
    }

    /// Resolves `CategoryType.BLOCK`, `AlgorithmFramework.SecurityStatus.X`
    /// and friends to their generated constants.
    fn enum_constant(&mut self, object: &IlNode, member: &str) -> Option<GoExpr> {
        let enum_name = match &object.kind {
            IlKind::Identifier { name } if enums::is_enum_name(name) => name.clone(),
            IlKind::MemberExpression { property, .. } => match &property.kind {
                IlKind::Identifier { name } if enums::is_enum_name(name) => name.clone(),
                _ => return None,
            },
            _ => return None,
        };
        let constant = enums::normalize_member(&enum_name, member)?;
        self.touch_enum(&enum_name);
        Some(GoExpr::ident(constant))
    }

    fn lower_binary(&mut self, operator: &str, left: &IlNode, right: &IlNode) -> GoExpr {
        // typeof probes become type-check helper calls.
        if matches!(operator, "==" | "===" | "!=" | "!==") {
            if let Some(check) = self.lower_typeof_check(operator, left, right) {
                return check;
            }
        }

        if operator == ">>>" {
            let left_ty = self.infer_type(left, None, None);
            let mut value = self.lower_expr(left, None);
            if left_ty != GoType::Uint32 && !value.is_numeric_literal() {
                value = GoExpr::convert(GoType::Uint32, value);
            }
            let count = self.lower_expr(right, Some(&GoType::Int));
            return GoExpr::binary(value, BinaryOp::Shr, count);
        }

        // `key in obj` becomes an immediately-invoked existence probe.
        if operator == "in" {
            let key = self.lower_expr(left, Some(&GoType::String));
            let container = self.lower_expr(right, None);
            return GoExpr::call(
                GoExpr::FuncLit {
                    params: vec![],
                    result: Some(GoType::Bool),
                    body: vec![
                        GoStmt::DeclShortMulti {
                            names: vec!["_".to_string(), "ok".to_string()],
                            value: GoExpr::index(container, key),
                        },
                        GoStmt::Return(Some(GoExpr::ident("ok"))),
                    ],
                },
                vec![],
            );
        }

        let Some(op) = binary_op_of(operator) else {
            self.diags
                .warn(format!("unhandled binary operator: {operator}"));
            return GoExpr::Nil;
        };

        let left_ty = self.infer_type(left, None, None);
        let right_ty = self.infer_type(right, None, None);

        // Comparisons against null/undefined compare with the left side's
        // zero value.
        if op.is_comparison() && is_missing_value(right) {
            let lowered = self.lower_expr(left, None);
            return GoExpr::binary(lowered, op, self.zero_value(&left_ty));
        }
        if op.is_comparison() && is_missing_value(left) {
            let lowered = self.lower_expr(right, None);
            return GoExpr::binary(lowered, op, self.zero_value(&right_ty));
        }

        // String concatenation formats non-string sides.
        if op == BinaryOp::Add && (left_ty == GoType::String || right_ty == GoType::String) {
            let format = |t: &mut Transformer, node: &IlNode, ty: &GoType| {
                let lowered = t.lower_expr(node, None);
                if *ty == GoType::String {
                    lowered
                } else {
                    t.ctx.import("fmt");
                    GoExpr::call(
                        GoExpr::select(GoExpr::ident("fmt"), "Sprintf"),
                        vec![GoExpr::str("%v"), lowered],
                    )
                }
            };
            let lowered_left = format(self, left, &left_ty);
            let lowered_right = format(self, right, &right_ty);
            return GoExpr::binary(lowered_left, BinaryOp::Add, lowered_right);
        }

        // For comparisons the operands still need a common numeric type.
        let coercion = if op.is_comparison() {
            self.coerce_binary(BinaryOp::Add, &left_ty, &right_ty)
        } else {
            self.coerce_binary(op, &left_ty, &right_ty)
        };

        let mut lowered_left = self.lower_expr(left, None);
        let mut lowered_right = self.lower_expr(right, None);

        // An interface operand resolves by assertion against the concrete
        // side.
        if left_ty.is_interface()
            && !coercion.result.is_interface()
            && lowered_left.supports_assertion()
        {
            lowered_left = GoExpr::assert(lowered_left, coercion.result.clone());
        } else if let Some(target) = &coercion.convert_left {
            if !lowered_left.is_numeric_literal() {
                lowered_left = GoExpr::convert(target.clone(), lowered_left);
            }
        }
        if right_ty.is_interface()
            && !coercion.result.is_interface()
            && lowered_right.supports_assertion()
        {
            lowered_right = GoExpr::assert(lowered_right, coercion.result.clone());
        } else if let Some(target) = &coercion.convert_right {
            if !lowered_right.is_numeric_literal() {
                lowered_right = GoExpr::convert(target.clone(), lowered_right);
            }
        }

        GoExpr::binary(lowered_left, op, lowered_right)
    }

    /// `typeof x === "string"` and friends.
    fn lower_typeof_check(
        &mut self,
        operator: &str,
        left: &IlNode,
        right: &IlNode,
    ) -> Option<GoExpr> {
        let (probe, expected) = match (&left.kind, &right.kind) {
            (
                IlKind::UnaryExpression {
                    operator: unary,
                    argument,
                },
                IlKind::Literal {
                    value: IlLiteral::Str(expected),
                    ..
                },
            ) if unary == "typeof" => (argument, expected),
            _ => return None,
        };
        let helper = match expected.as_str() {
            "string" => "isTypeString",
            "number" => "isTypeNumber",
            "boolean" => "isTypeBoolean",
            "function" => "isTypeFunction",
            "object" => "isTypeObject",
            "undefined" => "isTypeUndefined",
            _ => return None,
        };
        self.touch_helper(helper);
        let argument = self.lower_expr(probe, None);
        let call = GoExpr::call_named(helper, vec![argument]);
        if matches!(operator, "!=" | "!==") {
            return Some(GoExpr::unary(UnaryOp::Not, call));
        }
        Some(call)
    }

    fn lower_logical(
        &mut self,
        operator: &str,
        left: &IlNode,
        right: &IlNode,
        hint: Option<&GoType>,
    ) -> GoExpr {
        let left_ty = self.infer_type(left, None, None);
        let right_ty = self.infer_type(right, None, None);

        match operator {
            "&&" => {
                let lowered_left = {
                    let lowered = self.lower_expr(left, None);
                    self.truthy(lowered, &left_ty)
                };
                let lowered_right = {
                    let lowered = self.lower_expr(right, None);
                    self.truthy(lowered, &right_ty)
                };
                GoExpr::binary(lowered_left, BinaryOp::LAnd, lowered_right)
            }
            "||" if left_ty == GoType::Bool && right_ty == GoType::Bool => {
                let lowered_left = self.lower_expr(left, None);
                let lowered_right = self.lower_expr(right, None);
                GoExpr::binary(lowered_left, BinaryOp::LOr, lowered_right)
            }
            // `??` and non-boolean `||` both select the first usable value.
            _ => {
                let lowered_left = self.lower_expr(left, None);
                let lowered_right = self.lower_expr(right, None);
                let call = GoExpr::call_named(
                    self.touch_helper("firstNonNil"),
                    vec![lowered_left, lowered_right],
                );
                match hint {
                    Some(target) if !target.is_interface() && self.options.use_strict_types => {
                        GoExpr::assert(call, target.clone())
                    }
                    _ => call,
                }
            }
        }
    }

    fn lower_unary(&mut self, operator: &str, argument: &IlNode) -> GoExpr {
        match operator {
            "!" => {
                // Double negation cancels into a plain truthiness check.
                if let IlKind::UnaryExpression {
                    operator: inner_op,
                    argument: inner,
                } = &argument.kind
                {
                    if inner_op == "!" {
                        return self.lower_condition(inner);
                    }
                }
                let ty = self.infer_type(argument, None, None);
                let lowered = self.lower_expr(argument, None);
                match lowered {
                    // Comparisons flip in place.
                    GoExpr::Binary { op, left, right } if op.negated().is_some() => {
                        GoExpr::Binary {
                            op: op.negated().expect("checked above"),
                            left,
                            right,
                        }
                    }
                    lowered if ty == GoType::Bool => GoExpr::unary(UnaryOp::Not, lowered),
                    lowered => GoExpr::binary(lowered, BinaryOp::Eq, self.zero_value(&ty)),
                }
            }
            "-" => {
                let lowered = self.lower_expr(argument, None);
                match lowered {
                    GoExpr::Int(n) => GoExpr::Int(-n),
                    other => GoExpr::unary(UnaryOp::Neg, other),
                }
            }
            "+" => self.lower_expr(argument, None),
            "~" => {
                let lowered = self.lower_expr(argument, None);
                GoExpr::unary(UnaryOp::BitNot, lowered)
            }
            "void" => GoExpr::Nil,
            "delete" => {
                if let IlKind::MemberExpression {
                    object, property, ..
                } = &argument.kind
                {
                    let container = self.lower_expr(object, None);
                    let key = match &property.kind {
                        IlKind::Identifier { name } => GoExpr::str(name.clone()),
                        _ => self.lower_expr(property, None),
                    };
                    return GoExpr::call_named("delete", vec![container, key]);
                }
                self.warn_unhandled(argument)
            }
            other => {
                self.diags
                    .warn(format!("unhandled unary operator: {other}"));
                GoExpr::Nil
            }
        }
    }

    /// `++`/`--` in expression position routes through the typed helper that
    /// takes the operand's address.
    fn lower_update_expr(&mut self, operator: &str, prefix: bool, argument: &IlNode) -> GoExpr {
        let ty = self.infer_type(argument, None, None);
        let suffix = match ty {
            GoType::Uint8 => "Uint8",
            GoType::Uint16 => "Uint16",
            GoType::Uint32 => "Uint32",
            GoType::Uint64 => "Uint64",
            _ => "Int",
        };
        let stem = match (prefix, operator) {
            (true, "++") => "preIncr",
            (false, "++") => "postIncr",
            (true, _) => "preDecr",
            (false, _) => "postDecr",
        };
        let helper = format!("{stem}{suffix}");
        self.touch_helper(&helper);
        let target = self.lower_lvalue(argument);
        GoExpr::call_named(helper, vec![GoExpr::unary(UnaryOp::Addr, target)])
    }

    fn lower_conversion(&mut self, target: &str, value: &IlNode) -> GoExpr {
        let mut ty = self.parse_result_type(target);

        // A literal too large for int32 upgrades the target to uint32; the
        // same applies element-wise to int32 array targets.
        if ty == GoType::Int32 {
            if let IlKind::Literal {
                value: IlLiteral::Int(n),
                ..
            } = &value.kind
            {
                if *n > i64::from(i32::MAX) {
                    ty = GoType::Uint32;
                }
            }
        }
        if ty == GoType::slice(GoType::Int32) {
            if let IlKind::ArrayExpression { elements, .. } = &value.kind {
                let overflows = elements.iter().any(|element| {
                    matches!(
                        &element.kind,
                        IlKind::Literal { value: IlLiteral::Int(n), .. } if *n > i64::from(i32::MAX)
                    )
                });
                if overflows {
                    ty = GoType::slice(GoType::Uint32);
                }
            }
        }

        self.coerce_value(&ty, value)
    }

    fn lower_pack(&mut self, bits: u8, big_endian: bool, args: &[IlNode]) -> GoExpr {
        let suffix = endian_suffix(big_endian);
        // A spread argument packs from a slice instead of scalars.
        if let [IlNode {
            kind: IlKind::SpreadElement { argument },
            ..
        }] = args
        {
            let name = format!("pack{bits}{suffix}Slice");
            self.touch_helper(&name);
            let value = self.lower_expr(argument, Some(&GoType::bytes()));
            return GoExpr::call_named(name, vec![value]);
        }
        let name = format!("pack{bits}{suffix}");
        self.touch_helper(&name);
        let lowered = args
            .iter()
            .map(|argument| self.coerce_value(&GoType::Uint8, argument))
            .collect();
        GoExpr::call_named(name, lowered)
    }

    fn lower_rotate(&mut self, bits: u8, value: &IlNode, count: &IlNode, right: bool) -> GoExpr {
        self.ctx.import("math/bits");
        let value = self.coerce_value(&uint_of_width(bits), value);
        let mut count = self.lower_expr(count, Some(&GoType::Int));
        if right {
            count = match count {
                GoExpr::Int(n) => GoExpr::Int(-n),
                other => GoExpr::unary(UnaryOp::Neg, GoExpr::paren(other)),
            };
        }
        GoExpr::call(
            GoExpr::select(GoExpr::ident("bits"), format!("RotateLeft{bits}")),
            vec![value, count],
        )
    }

    /// Lowers an assignment target without inserting type assertions.
    pub(crate) fn lower_lvalue(&mut self, node: &IlNode) -> GoExpr {
        match &node.kind {
            IlKind::Identifier { name } => GoExpr::ident(escape_builtin(name)),
            IlKind::MemberExpression {
                object,
                property,
                computed,
            } => self.lower_member(object, property, *computed),
            IlKind::ThisExpression => self.receiver_expr(),
            _ => self.lower_expr(node, None),
        }
    }

    /// Lowers a value into a typed position: assignments, returns, call
    /// arguments and field initializers. Handles nil-to-zero-value
    /// replacement, the negative-into-unsigned complement rewrite, numeric
    /// conversions, interface assertions and the `[]uint32`-to-`[]uint8`
    /// bridge.
    pub(crate) fn coerce_value(&mut self, target: &GoType, node: &IlNode) -> GoExpr {
        // `null` into a non-nilable target becomes the zero value.
        if matches!(
            &node.kind,
            IlKind::Literal {
                value: IlLiteral::Null,
                ..
            }
        ) {
            if !target.is_nilable() {
                return self.zero_value(target);
            }
            return GoExpr::Nil;
        }

        // A negative literal into an unsigned target keeps its
        // two's-complement bit pattern via the complement form.
        if target.is_unsigned() {
            if let Some(magnitude) = negative_literal(node) {
                return GoExpr::unary(
                    UnaryOp::BitNot,
                    GoExpr::convert(target.clone(), GoExpr::Int(magnitude - 1)),
                );
            }
        }

        let source_ty = self.infer_type(node, None, None);
        let mut lowered = self.lower_expr(node, Some(target));

        if target.is_interface() {
            return lowered;
        }

        // Slices of words flowing into byte positions go through the
        // conversion helper, but only for call-expression sources.
        if target.is_byte_slice()
            && source_ty == GoType::slice(GoType::Uint32)
            && matches!(node.kind, IlKind::CallExpression { .. })
        {
            return GoExpr::call_named(
                self.touch_helper("uint32SliceToBytes"),
                vec![lowered],
            );
        }

        if source_ty.is_interface() {
            if self.options.use_strict_types && lowered.supports_assertion() {
                return GoExpr::assert(lowered, target.clone());
            }
            return lowered;
        }

        if target.is_numeric()
            && source_ty.is_numeric()
            && source_ty != *target
            && !lowered.is_numeric_literal()
            && !matches!(&lowered, GoExpr::Conversion { ty, .. } if ty == target)
        {
            lowered = GoExpr::convert(target.clone(), lowered);
        }

        lowered
    }

    /// The zero value of a Go type.
    pub(crate) fn zero_value(&self, ty: &GoType) -> GoExpr {
        match ty {
            GoType::String => GoExpr::str(""),
            GoType::Bool => GoExpr::Bool(false),
            numeric if numeric.is_numeric() => GoExpr::Int(0),
            GoType::Named(name) => GoExpr::Composite {
                ty: GoType::named(name.clone()),
                elems: vec![],
            },
            _ => GoExpr::Nil,
        }
    }
}

fn endian_suffix(big_endian: bool) -> &'static str {
    if big_endian {
        "BE"
    } else {
        "LE"
    }
}

/// True for `null` literals and the `undefined` identifier.
fn is_missing_value(node: &IlNode) -> bool {
    match &node.kind {
        IlKind::Literal {
            value: IlLiteral::Null,
            ..
        } => true,
        IlKind::Identifier { name } => name == "undefined",
        _ => false,
    }
}

/// The magnitude of a negative integer literal (`-N` spelled either as a
/// literal or as unary minus on a literal).
fn negative_literal(node: &IlNode) -> Option<i64> {
    match &node.kind {
        IlKind::Literal {
            value: IlLiteral::Int(n),
            ..
        } if *n < 0 => Some(-n),
        IlKind::UnaryExpression { operator, argument } if operator == "-" => {
            match &argument.kind {
                IlKind::Literal {
                    value: IlLiteral::Int(n),
                    ..
                } if *n > 0 => Some(*n),
                _ => None,
            }
        }
        _ => None,
    }
}
