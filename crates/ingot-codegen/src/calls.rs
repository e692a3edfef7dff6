//! Call and constructor lowering: receiver methods, `Math.*`, `OpCodes.*`,
//! typed-array constructors, array/string builtins, helper records and
//! `new` expressions.

use ingot_go::{escape_builtin, BinaryOp, CompositeElem, GoExpr, GoStmt, GoType, UnaryOp};
use ingot_il::{IlKind, IlLiteral, IlNode};

use crate::engine::typed_array_element;
use crate::{pascal, stubs, Transformer};

impl Transformer {
    pub(crate) fn lower_call(
        &mut self,
        callee: &IlNode,
        arguments: &[IlNode],
        hint: Option<&GoType>,
    ) -> GoExpr {
        match &callee.kind {
            IlKind::SuperExpression => GoExpr::Nil,
            IlKind::MemberExpression {
                object,
                property,
                computed: false,
            } => {
                let IlKind::Identifier { name: method } = &property.kind else {
                    let func = self.lower_member(object, property, true);
                    let args = self.lower_plain_args(arguments);
                    return GoExpr::call(func, args);
                };
                self.lower_member_call(object, method, arguments, hint)
            }
            IlKind::Identifier { name } => self.lower_named_call(name, arguments, hint),
            _ => {
                let func = self.lower_expr(callee, None);
                let args = self.lower_plain_args(arguments);
                GoExpr::call(func, args)
            }
        }
    }

    fn lower_member_call(
        &mut self,
        object: &IlNode,
        method: &str,
        arguments: &[IlNode],
        hint: Option<&GoType>,
    ) -> GoExpr {
        if matches!(object.kind, IlKind::ThisExpression) {
            if self.ctx.in_map_self_ref_context {
                // Inside the map-self-ref lambda a method call is a map
                // lookup asserted to the right function shape.
                let signature = GoType::Func(
                    arguments.iter().map(|_| self.widen()).collect(),
                    Some(Box::new(self.widen())),
                );
                let func = GoExpr::assert(
                    GoExpr::index(GoExpr::ident("s"), GoExpr::str(method)),
                    signature,
                );
                let args = self.lower_plain_args(arguments);
                return GoExpr::call(func, args);
            }
            let args = self.lower_declared_args(method, arguments);
            return GoExpr::call(
                GoExpr::select(self.receiver_expr(), pascal(method)),
                args,
            );
        }

        if matches!(object.kind, IlKind::SuperExpression) {
            let base = self.lower_expr(object, None);
            let args = self.lower_plain_args(arguments);
            return GoExpr::call(GoExpr::select(base, pascal(method)), args);
        }

        if let IlKind::Identifier { name } = &object.kind {
            match name.as_str() {
                "Math" => return self.lower_math_call(method, arguments),
                "OpCodes" => return self.lower_opcodes_call(method, arguments),
                "Array" if method == "isArray" => {
                    let Some(argument) = arguments.first() else {
                        return GoExpr::Bool(false);
                    };
                    if self.infer_type(argument, None, None).is_slice() {
                        return GoExpr::Bool(true);
                    }
                    let lowered = self.lower_expr(argument, None);
                    return GoExpr::binary(lowered, BinaryOp::Ne, GoExpr::Nil);
                }
                "Array" if method == "from" => {
                    return self.lower_array_from(arguments, hint);
                }
                "String" if method == "fromCharCode" => {
                    let argument = arguments
                        .first()
                        .map(|argument| self.lower_expr(argument, None))
                        .unwrap_or(GoExpr::Int(0));
                    return GoExpr::convert(
                        GoType::String,
                        GoExpr::convert(GoType::named("rune"), argument),
                    );
                }
                "JSON" if method == "stringify" => {
                    self.ctx.import("fmt");
                    let argument = arguments
                        .first()
                        .map(|argument| self.lower_expr(argument, None))
                        .unwrap_or(GoExpr::Nil);
                    return GoExpr::call(
                        GoExpr::select(GoExpr::ident("fmt"), "Sprintf"),
                        vec![GoExpr::str("%v"), argument],
                    );
                }
                "global" | "globalThis" => {
                    let args = self.lower_plain_args(arguments);
                    return GoExpr::call(GoExpr::ident(escape_builtin(method)), args);
                }
                _ => {}
            }
        }

        let object_ty = self.infer_type(object, None, None);
        if object_ty.is_slice() {
            if let Some(lowered) =
                self.lower_slice_method(object, &object_ty, method, arguments, hint)
            {
                return lowered;
            }
        }
        if object_ty == GoType::String {
            if let Some(lowered) = self.lower_string_method(object, method, arguments) {
                return lowered;
            }
        }
        if object_ty.is_map() && method == "hasOwnProperty" && !arguments.is_empty() {
            let container = self.lower_expr(object, None);
            let key = self.lower_expr(&arguments[0], Some(&GoType::String));
            return map_has(container, key);
        }
        if object_ty.is_numeric() && method == "toString" {
            return self.lower_number_to_string(object, arguments);
        }

        let receiver = self.lower_expr(object, None);
        let func = GoExpr::select(receiver, pascal(method));
        let args = self.lower_plain_args(arguments);
        GoExpr::call(func, args)
    }

    fn lower_named_call(
        &mut self,
        name: &str,
        arguments: &[IlNode],
        hint: Option<&GoType>,
    ) -> GoExpr {
        // Typed-array constructors invoked without `new`.
        if typed_array_element(name).is_some() {
            return self.lower_typed_array(name, arguments);
        }

        match name {
            "RegisterAlgorithm" => {
                self.ctx
                    .framework_functions
                    .insert("RegisterAlgorithm".to_string());
                let args = self.lower_plain_args(arguments);
                return GoExpr::call_named("RegisterAlgorithm", args);
            }
            "parseInt" => {
                let value = arguments
                    .first()
                    .map(|argument| self.lower_expr(argument, Some(&GoType::String)))
                    .unwrap_or(GoExpr::str(""));
                let base = arguments
                    .get(1)
                    .map(|argument| self.lower_expr(argument, Some(&GoType::Int)))
                    .unwrap_or(GoExpr::Int(10));
                return GoExpr::call_named(self.touch_helper("ParseInt"), vec![value, base]);
            }
            "BigInt" => {
                return arguments
                    .first()
                    .map(|argument| self.coerce_value(&GoType::Uint64, argument))
                    .unwrap_or(GoExpr::Int(0));
            }
            "Number" => {
                return arguments
                    .first()
                    .map(|argument| self.coerce_value(&GoType::Float64, argument))
                    .unwrap_or(GoExpr::Int(0));
            }
            "Boolean" => {
                let argument = arguments.first();
                return match argument {
                    Some(argument) => self.lower_condition(argument),
                    None => GoExpr::Bool(false),
                };
            }
            "String" => {
                self.ctx.import("fmt");
                let argument = arguments
                    .first()
                    .map(|argument| self.lower_expr(argument, None))
                    .unwrap_or(GoExpr::str(""));
                return GoExpr::call(
                    GoExpr::select(GoExpr::ident("fmt"), "Sprintf"),
                    vec![GoExpr::str("%v"), argument],
                );
            }
            _ => {}
        }

        // A local function-typed variable is called as-is; anything else is
        // a module-level function, which lowers Pascal-cased.
        if matches!(
            self.ctx.variable_types.get(name),
            Some(GoType::Func(_, _)) | Some(GoType::Interface) | Some(GoType::Any)
        ) {
            let args = self.lower_plain_args(arguments);
            return GoExpr::call(GoExpr::ident(escape_builtin(name)), args);
        }
        let args = self.lower_declared_args(name, arguments);
        let mut call = GoExpr::call(GoExpr::ident(pascal(name)), args);
        if let Some(target) = hint {
            if let Some(registered) = self.ctx.method_return_types.get(name) {
                if registered.is_interface()
                    && !target.is_interface()
                    && self.options.use_strict_types
                {
                    call = GoExpr::assert(call, target.clone());
                }
            }
        }
        call
    }

    /// Arguments checked against the callee's declared parameter types:
    /// interface-typed values are asserted, numeric widths converted.
    fn lower_declared_args(&mut self, method: &str, arguments: &[IlNode]) -> Vec<GoExpr> {
        let mut out = Vec::with_capacity(arguments.len());
        for (index, argument) in arguments.iter().enumerate() {
            if let Some(hoisted) = self.hoist_assignment_arg(argument) {
                out.push(hoisted);
                continue;
            }
            let declared = self
                .ctx
                .param_type(method, index)
                .cloned()
                .filter(|ty| !ty.is_interface());
            match declared {
                Some(ty) => out.push(self.coerce_value(&ty, argument)),
                None => out.push(self.lower_expr(argument, None)),
            }
        }
        out
    }

    fn lower_plain_args(&mut self, arguments: &[IlNode]) -> Vec<GoExpr> {
        arguments
            .iter()
            .map(|argument| {
                self.hoist_assignment_arg(argument)
                    .unwrap_or_else(|| self.lower_expr(argument, None))
            })
            .collect()
    }

    /// A compound assignment used as an argument is emitted as a statement
    /// above the call; the argument becomes a fresh reference to its target.
    fn hoist_assignment_arg(&mut self, argument: &IlNode) -> Option<GoExpr> {
        let IlKind::AssignmentExpression { left, .. } = &argument.kind else {
            return None;
        };
        let stmts = self.lower_assignment(argument);
        self.ctx.pending_stmts.extend(stmts);
        Some(self.lower_lvalue(left))
    }

    fn lower_math_call(&mut self, method: &str, arguments: &[IlNode]) -> GoExpr {
        let first_ty = arguments
            .first()
            .map(|argument| self.infer_type(argument, None, None))
            .unwrap_or(GoType::Float64);

        match method {
            "imul" if arguments.len() >= 2 => {
                let a = self.coerce_value(&GoType::Int64, &arguments[0]);
                let b = self.coerce_value(&GoType::Int64, &arguments[1]);
                return GoExpr::convert(GoType::Int32, GoExpr::binary(a, BinaryOp::Mul, b));
            }
            "fround" if !arguments.is_empty() => {
                let argument = self.lower_expr(&arguments[0], None);
                return GoExpr::convert(GoType::Float32, argument);
            }
            "floor" | "ceil" | "round" | "trunc"
                if first_ty.is_integer() && !arguments.is_empty() =>
            {
                // Integer-typed arguments are already whole.
                return self.lower_expr(&arguments[0], None);
            }
            "min" | "max" if first_ty.is_integer() => {
                // Every integer width has its own helper pair; the operands
                // are coerced to that width so the call typechecks.
                let helper = match (method, &first_ty) {
                    ("min", GoType::Int8) => "minInt8",
                    ("max", GoType::Int8) => "maxInt8",
                    ("min", GoType::Int16) => "minInt16",
                    ("max", GoType::Int16) => "maxInt16",
                    ("min", GoType::Int32) => "minInt32",
                    ("max", GoType::Int32) => "maxInt32",
                    ("min", GoType::Int64) => "minInt64",
                    ("max", GoType::Int64) => "maxInt64",
                    ("min", GoType::Uint) => "minUint",
                    ("max", GoType::Uint) => "maxUint",
                    ("min", GoType::Uint8) => "minUint8",
                    ("max", GoType::Uint8) => "maxUint8",
                    ("min", GoType::Uint16) => "minUint16",
                    ("max", GoType::Uint16) => "maxUint16",
                    ("min", GoType::Uint32) => "minUint32",
                    ("max", GoType::Uint32) => "maxUint32",
                    ("min", GoType::Uint64) => "minUint64",
                    ("max", GoType::Uint64) => "maxUint64",
                    ("min", _) => "minInt",
                    _ => "maxInt",
                };
                self.touch_helper(helper);
                let ty = first_ty.clone();
                let args = arguments
                    .iter()
                    .map(|argument| self.coerce_value(&ty, argument))
                    .collect();
                return GoExpr::call_named(helper, args);
            }
            "pow" if first_ty.is_integer() && arguments.len() >= 2 => {
                let helper = if first_ty.is_unsigned() {
                    "powUint32"
                } else {
                    "powInt"
                };
                self.touch_helper(helper);
                let base_ty = if first_ty.is_unsigned() {
                    GoType::Uint32
                } else {
                    GoType::Int
                };
                let base = self.coerce_value(&base_ty, &arguments[0]);
                let exponent = self.coerce_value(&GoType::Int, &arguments[1]);
                return GoExpr::call_named(helper, vec![base, exponent]);
            }
            "abs" if first_ty.is_integer() && !arguments.is_empty() => {
                self.ctx.import("math");
                let argument = self.coerce_value(&GoType::Float64, &arguments[0]);
                return GoExpr::convert(
                    first_ty,
                    GoExpr::call(
                        GoExpr::select(GoExpr::ident("math"), "Abs"),
                        vec![argument],
                    ),
                );
            }
            "random" => {
                self.ctx.import("math/rand");
                return GoExpr::call(
                    GoExpr::select(GoExpr::ident("rand"), "Float64"),
                    vec![],
                );
            }
            _ => {}
        }

        self.ctx.import("math");
        let args = arguments
            .iter()
            .map(|argument| self.coerce_value(&GoType::Float64, argument))
            .collect();
        GoExpr::call(GoExpr::select(GoExpr::ident("math"), pascal(method)), args)
    }

    fn lower_opcodes_call(&mut self, method: &str, arguments: &[IlNode]) -> GoExpr {
        // Pack/unpack route through the same lowering as the dedicated IL
        // nodes, including the slice variant for spread arguments.
        if let Some(rest) = method.strip_prefix("Pack") {
            if let Some((bits, big_endian)) = parse_width_endian(rest) {
                let node = IlNode::new(IlKind::PackBytes {
                    bits,
                    big_endian,
                    args: arguments.to_vec(),
                });
                return self.lower_expr(&node, None);
            }
        }
        if let Some(rest) = method.strip_prefix("Unpack") {
            if let Some((bits, big_endian)) = parse_width_endian(rest) {
                if let Some(argument) = arguments.first() {
                    let node = IlNode::new(IlKind::UnpackBytes {
                        bits,
                        big_endian,
                        value: Box::new(argument.clone()),
                    });
                    return self.lower_expr(&node, None);
                }
            }
        }

        let helper: Option<(&str, GoType)> = match method {
            "RotL8" => Some(("rotl8", GoType::Uint8)),
            "RotR8" => Some(("rotr8", GoType::Uint8)),
            "RotL16" => Some(("rotl16", GoType::Uint16)),
            "RotR16" => Some(("rotr16", GoType::Uint16)),
            "RotL32" => Some(("rotl32", GoType::Uint32)),
            "RotR32" => Some(("rotr32", GoType::Uint32)),
            "RotL64" => Some(("rotl64", GoType::Uint64)),
            "RotR64" => Some(("rotr64", GoType::Uint64)),
            _ => None,
        };
        if let Some((helper, width)) = helper {
            self.touch_helper(helper);
            let value = arguments
                .first()
                .map(|argument| self.coerce_value(&width, argument))
                .unwrap_or(GoExpr::Int(0));
            let count = arguments
                .get(1)
                .map(|argument| self.coerce_value(&GoType::Int, argument))
                .unwrap_or(GoExpr::Int(0));
            return GoExpr::call_named(helper, vec![value, count]);
        }

        match method {
            "XorArrays" => {
                self.touch_helper("xorArrays");
                let args = arguments
                    .iter()
                    .map(|argument| self.coerce_value(&GoType::bytes(), argument))
                    .collect();
                GoExpr::call_named("xorArrays", args)
            }
            "CloneArray" | "CopyArray" => {
                let element = arguments
                    .first()
                    .map(|argument| self.infer_type(argument, None, None))
                    .and_then(|ty| ty.element_type().cloned());
                let clone = method == "CloneArray";
                let helper = match element {
                    Some(GoType::Uint32) => {
                        if clone {
                            "cloneUint32s"
                        } else {
                            "copyUint32s"
                        }
                    }
                    Some(GoType::Interface) | Some(GoType::Any) if clone => "cloneSlice",
                    _ => {
                        if clone {
                            "cloneBytes"
                        } else {
                            "copyBytes"
                        }
                    }
                };
                self.touch_helper(helper);
                let args = self.lower_plain_args(arguments);
                GoExpr::call_named(helper, args)
            }
            "Hex8ToBytes" | "HexToBytes" => {
                self.touch_helper("mustHexDecode");
                let args = self.lower_plain_args(arguments);
                GoExpr::call_named("mustHexDecode", args)
            }
            "PopCount" => {
                self.touch_helper("popcount");
                let argument = arguments
                    .first()
                    .map(|argument| self.coerce_value(&GoType::Uint32, argument))
                    .unwrap_or(GoExpr::Int(0));
                GoExpr::call_named("popcount", vec![argument])
            }
            "ConstantTimeCompare" => {
                self.touch_helper("constantTimeCompare");
                let args = arguments
                    .iter()
                    .map(|argument| self.coerce_value(&GoType::bytes(), argument))
                    .collect();
                GoExpr::call_named("constantTimeCompare", args)
            }
            "Hl64" | "HL64" => {
                self.touch_helper("hl64");
                let args = arguments
                    .iter()
                    .map(|argument| self.coerce_value(&GoType::Uint32, argument))
                    .collect();
                GoExpr::call_named("hl64", args)
            }
            "Add64" | "Sub64" | "Xor64" | "And64" | "Or64" | "Not64" | "Shl64" | "Shr64"
            | "RotL64HL" | "RotR64HL" => {
                let helper = match method {
                    "Add64" => "add64_HL",
                    "Sub64" => "sub64_HL",
                    "Xor64" => "xor64_HL",
                    "And64" => "and64_HL",
                    "Or64" => "or64_HL",
                    "Not64" => "not64_HL",
                    "Shl64" => "shl64_HL",
                    "Shr64" => "shr64_HL",
                    "RotL64HL" => "rotL64_HL",
                    _ => "rotR64_HL",
                };
                self.touch_helper(helper);
                let args = self.lower_plain_args(arguments);
                GoExpr::call_named(helper, args)
            }
            other => {
                // Fall back to a direct helper-style call; the return type
                // may still be known through typeKnowledge.
                self.diags
                    .warn(format!("unknown OpCodes helper: {other}"));
                let args = self.lower_plain_args(arguments);
                GoExpr::call(GoExpr::ident(crate::camel(other)), args)
            }
        }
    }

    /// Mutating array methods in statement position write their result (or
    /// their effect) back into the receiver.
    pub(crate) fn lower_mutating_stmt(
        &mut self,
        callee: &IlNode,
        arguments: &[IlNode],
    ) -> Option<Vec<GoStmt>> {
        let IlKind::MemberExpression {
            object,
            property,
            computed: false,
        } = &callee.kind
        else {
            return None;
        };
        let IlKind::Identifier { name: method } = &property.kind else {
            return None;
        };
        let object_ty = self.infer_type(object, None, None);
        if !object_ty.is_slice() {
            return None;
        }
        let element = object_ty
            .element_type()
            .cloned()
            .unwrap_or_else(|| self.widen());

        match method.as_str() {
            "reverse" | "sort" => {
                let value =
                    self.lower_slice_method(object, &object_ty, method, arguments, None)?;
                let target = self.lower_lvalue(object);
                Some(vec![GoStmt::assign(target, value)])
            }
            "fill" => {
                let value = arguments
                    .first()
                    .map(|argument| self.coerce_value(&element, argument))
                    .unwrap_or(GoExpr::Int(0));
                let target = self.lower_lvalue(object);
                Some(vec![GoStmt::Range {
                    key: "i".to_string(),
                    value: None,
                    expr: target.clone(),
                    body: vec![GoStmt::assign(
                        GoExpr::index(target, GoExpr::ident("i")),
                        value,
                    )],
                }])
            }
            "set" => {
                let source = arguments
                    .first()
                    .map(|argument| self.lower_expr(argument, Some(&object_ty)))?;
                let target = self.lower_lvalue(object);
                let dst = match arguments.get(1) {
                    Some(offset) => {
                        let low = self.lower_expr(offset, Some(&GoType::Int));
                        GoExpr::SliceOf {
                            recv: Box::new(target),
                            low: Some(Box::new(low)),
                            high: None,
                        }
                    }
                    None => target,
                };
                Some(vec![GoStmt::Expr(GoExpr::call_named(
                    "copy",
                    vec![dst, source],
                ))])
            }
            "splice" if element.is_interface() => {
                self.touch_helper("spliceSlice");
                let target = self.lower_lvalue(object);
                let mut args = vec![target.clone()];
                args.extend(self.lower_plain_args(arguments));
                Some(vec![GoStmt::assign(
                    target,
                    GoExpr::call_named("spliceSlice", args),
                )])
            }
            _ => None,
        }
    }

    /// Array builtins on slice-typed receivers.
    fn lower_slice_method(
        &mut self,
        object: &IlNode,
        object_ty: &GoType,
        method: &str,
        arguments: &[IlNode],
        hint: Option<&GoType>,
    ) -> Option<GoExpr> {
        let element = object_ty
            .element_type()
            .cloned()
            .unwrap_or_else(|| self.widen());
        let is_bytes = element == GoType::Uint8;
        let is_words = element == GoType::Uint32;

        // Methods below index their first argument; malformed IL falls
        // through to the generic call path instead of panicking.
        if arguments.is_empty() && matches!(method, "indexOf" | "includes") {
            return None;
        }

        let lowered = match method {
            "slice" | "subarray" => {
                let container = self.lower_expr(object, None);
                if arguments.is_empty() {
                    return Some(GoExpr::call_variadic(
                        GoExpr::ident("append"),
                        vec![
                            GoExpr::Composite {
                                ty: object_ty.clone(),
                                elems: vec![],
                            },
                            container,
                        ],
                    ));
                }
                let low = self.slice_bound(&container, &arguments[0]);
                let high = arguments
                    .get(1)
                    .map(|argument| self.slice_bound(&container, argument));
                GoExpr::SliceOf {
                    recv: Box::new(container),
                    low: Some(Box::new(low)),
                    high: high.map(Box::new),
                }
            }
            "concat" => {
                let mut result = self.lower_expr(object, None);
                for argument in arguments {
                    let lowered = self.lower_expr(argument, Some(object_ty));
                    let spreads = self.infer_type(argument, None, None).is_slice();
                    result = if spreads {
                        GoExpr::call_variadic(GoExpr::ident("append"), vec![result, lowered])
                    } else {
                        GoExpr::call(GoExpr::ident("append"), vec![result, lowered])
                    };
                }
                result
            }
            "indexOf" => {
                let helper = if is_bytes {
                    "indexOfBytes"
                } else if is_words {
                    "indexOfUint32"
                } else if element == GoType::String {
                    "indexOfString"
                } else {
                    "indexOfSlice"
                };
                self.touch_helper(helper);
                let container = self.lower_expr(object, None);
                let needle = if helper == "indexOfSlice" {
                    self.lower_expr(&arguments[0], None)
                } else {
                    self.coerce_value(&element, &arguments[0])
                };
                GoExpr::call_named(helper, vec![container, needle])
            }
            "includes" => {
                self.touch_helper("containsSlice");
                let container = self.lower_expr(object, None);
                let needle = self.lower_expr(&arguments[0], None);
                GoExpr::call_named("containsSlice", vec![container, needle])
            }
            "join" => {
                let container = self.lower_expr(object, None);
                let separator = arguments
                    .first()
                    .map(|argument| self.lower_expr(argument, Some(&GoType::String)))
                    .unwrap_or(GoExpr::str(","));
                if element == GoType::String {
                    self.ctx.import("strings");
                    GoExpr::call(
                        GoExpr::select(GoExpr::ident("strings"), "Join"),
                        vec![container, separator],
                    )
                } else {
                    self.touch_helper("joinSlice");
                    GoExpr::call_named("joinSlice", vec![container, separator])
                }
            }
            "reverse" => {
                let helper = if is_bytes {
                    "reverseBytes"
                } else if is_words {
                    "reverseUint32s"
                } else {
                    "reverseSlice"
                };
                self.touch_helper(helper);
                let container = self.lower_expr(object, None);
                GoExpr::call_named(helper, vec![container])
            }
            "sort" => {
                let helper = if element == GoType::String {
                    "sortStrings"
                } else {
                    "sortBytes"
                };
                self.touch_helper(helper);
                let container = self.lower_expr(object, None);
                GoExpr::call_named(helper, vec![container])
            }
            "map" | "filter" | "reduce" | "find" | "findIndex" | "every" | "some"
            | "forEach" => {
                return Some(self.lower_slice_combinator(
                    object, &element, method, arguments, hint,
                ))
            }
            _ => return None,
        };
        Some(lowered)
    }

    /// `map`/`filter`/`reduce` and friends, choosing the typed helper
    /// variant when the element type is statically byte or word sized.
    fn lower_slice_combinator(
        &mut self,
        object: &IlNode,
        element: &GoType,
        method: &str,
        arguments: &[IlNode],
        hint: Option<&GoType>,
    ) -> GoExpr {
        let is_bytes = *element == GoType::Uint8;
        let is_words = *element == GoType::Uint32;
        let variant = if is_bytes {
            "Bytes"
        } else if is_words {
            "Uint32"
        } else {
            ""
        };
        let callback_element = if variant.is_empty() {
            self.widen()
        } else {
            element.clone()
        };

        let (helper, callback_hint): (String, GoType) = match method {
            "map" => (
                format!("mapSlice{variant}"),
                GoType::Func(
                    vec![callback_element.clone(), GoType::Int],
                    Some(Box::new(callback_element.clone())),
                ),
            ),
            "filter" => (
                format!("filterSlice{variant}"),
                GoType::Func(
                    vec![callback_element.clone(), GoType::Int],
                    Some(Box::new(GoType::Bool)),
                ),
            ),
            "reduce" => (
                format!("reduceSlice{variant}"),
                GoType::Func(
                    vec![self.widen(), callback_element.clone(), GoType::Int],
                    Some(Box::new(self.widen())),
                ),
            ),
            "find" => (
                if is_bytes {
                    "findSliceBytes".to_string()
                } else {
                    "findSlice".to_string()
                },
                GoType::Func(
                    vec![callback_element.clone(), GoType::Int],
                    Some(Box::new(GoType::Bool)),
                ),
            ),
            "findIndex" => (
                if is_bytes {
                    "findIndexSliceBytes".to_string()
                } else {
                    "findIndexSlice".to_string()
                },
                GoType::Func(
                    vec![callback_element.clone(), GoType::Int],
                    Some(Box::new(GoType::Bool)),
                ),
            ),
            "every" => (
                format!("everySlice{}", if is_bytes { "Bytes" } else { "" }),
                GoType::Func(
                    vec![callback_element.clone(), GoType::Int],
                    Some(Box::new(GoType::Bool)),
                ),
            ),
            "some" => (
                format!("someSlice{}", if is_bytes { "Bytes" } else { "" }),
                GoType::Func(
                    vec![callback_element.clone(), GoType::Int],
                    Some(Box::new(GoType::Bool)),
                ),
            ),
            _ => (
                format!("forEachSlice{}", if is_bytes { "Bytes" } else { "" }),
                GoType::Func(vec![callback_element.clone(), GoType::Int], None),
            ),
        };

        self.touch_helper(&helper);
        let mut args = vec![self.lower_expr(object, None)];
        if let Some(callback) = arguments.first() {
            args.push(self.lower_expr(callback, Some(&callback_hint)));
        }
        if method == "reduce" {
            let init = arguments
                .get(1)
                .map(|argument| self.lower_expr(argument, None))
                .unwrap_or(GoExpr::Int(0));
            args.push(init);
        }

        let call = GoExpr::call_named(helper, args);
        // reduce/find return interface{}; assert when the context wants a
        // concrete type.
        if matches!(method, "reduce" | "find") {
            if let Some(target) = hint {
                if !target.is_interface() && self.options.use_strict_types {
                    return GoExpr::assert(call, target.clone());
                }
            }
        }
        call
    }

    fn lower_string_method(
        &mut self,
        object: &IlNode,
        method: &str,
        arguments: &[IlNode],
    ) -> Option<GoExpr> {
        let strings_call = |t: &mut Transformer, func: &str, args: Vec<GoExpr>| {
            t.ctx.import("strings");
            GoExpr::call(GoExpr::select(GoExpr::ident("strings"), func), args)
        };

        let needs_one = matches!(
            method,
            "split"
                | "repeat"
                | "indexOf"
                | "includes"
                | "startsWith"
                | "endsWith"
                | "substring"
                | "substr"
                | "slice"
        );
        if (needs_one && arguments.is_empty()) || (method == "replace" && arguments.len() < 2) {
            return None;
        }

        let lowered = match method {
            "charCodeAt" | "codePointAt" => {
                let container = self.lower_expr(object, None);
                let index = arguments
                    .first()
                    .map(|argument| self.lower_expr(argument, Some(&GoType::Int)))
                    .unwrap_or(GoExpr::Int(0));
                GoExpr::convert(GoType::Int, GoExpr::index(container, index))
            }
            "charAt" => {
                let container = self.lower_expr(object, None);
                let index = arguments
                    .first()
                    .map(|argument| self.lower_expr(argument, Some(&GoType::Int)))
                    .unwrap_or(GoExpr::Int(0));
                GoExpr::convert(GoType::String, GoExpr::index(container, index))
            }
            "split" => {
                let container = self.lower_expr(object, None);
                let separator = self.lower_expr(&arguments[0], Some(&GoType::String));
                strings_call(self, "Split", vec![container, separator])
            }
            "toUpperCase" => {
                let container = self.lower_expr(object, None);
                strings_call(self, "ToUpper", vec![container])
            }
            "toLowerCase" => {
                let container = self.lower_expr(object, None);
                strings_call(self, "ToLower", vec![container])
            }
            "trim" => {
                let container = self.lower_expr(object, None);
                strings_call(self, "TrimSpace", vec![container])
            }
            "repeat" => {
                let container = self.lower_expr(object, None);
                let count = self.lower_expr(&arguments[0], Some(&GoType::Int));
                strings_call(self, "Repeat", vec![container, count])
            }
            "indexOf" => {
                let container = self.lower_expr(object, None);
                let needle = self.lower_expr(&arguments[0], Some(&GoType::String));
                strings_call(self, "Index", vec![container, needle])
            }
            "includes" => {
                let container = self.lower_expr(object, None);
                let needle = self.lower_expr(&arguments[0], Some(&GoType::String));
                strings_call(self, "Contains", vec![container, needle])
            }
            "startsWith" => {
                let container = self.lower_expr(object, None);
                let needle = self.lower_expr(&arguments[0], Some(&GoType::String));
                strings_call(self, "HasPrefix", vec![container, needle])
            }
            "endsWith" => {
                let container = self.lower_expr(object, None);
                let needle = self.lower_expr(&arguments[0], Some(&GoType::String));
                strings_call(self, "HasSuffix", vec![container, needle])
            }
            "replace" => {
                let container = self.lower_expr(object, None);
                let from = self.lower_expr(&arguments[0], Some(&GoType::String));
                let to = self.lower_expr(&arguments[1], Some(&GoType::String));
                strings_call(self, "ReplaceAll", vec![container, from, to])
            }
            "substring" | "substr" | "slice" => {
                let container = self.lower_expr(object, None);
                let low = self.slice_bound(&container, &arguments[0]);
                let high = arguments
                    .get(1)
                    .map(|argument| self.slice_bound(&container, argument));
                GoExpr::SliceOf {
                    recv: Box::new(container),
                    low: Some(Box::new(low)),
                    high: high.map(Box::new),
                }
            }
            _ => return None,
        };
        Some(lowered)
    }

    fn lower_number_to_string(&mut self, object: &IlNode, arguments: &[IlNode]) -> GoExpr {
        self.ctx.import("fmt");
        let format = match arguments.first().map(|argument| &argument.kind) {
            Some(IlKind::Literal {
                value: IlLiteral::Int(16),
                ..
            }) => "%x",
            Some(IlKind::Literal {
                value: IlLiteral::Int(2),
                ..
            }) => "%b",
            _ => "%v",
        };
        let value = self.lower_expr(object, None);
        GoExpr::call(
            GoExpr::select(GoExpr::ident("fmt"), "Sprintf"),
            vec![GoExpr::str(format), value],
        )
    }

    /// A slice bound, with `-n` rewritten to `len(container) - n`.
    fn slice_bound(&mut self, container: &GoExpr, bound: &IlNode) -> GoExpr {
        let negative = match &bound.kind {
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
        };
        match negative {
            Some(magnitude) => GoExpr::binary(
                GoExpr::len_of(container.clone()),
                BinaryOp::Sub,
                GoExpr::Int(magnitude),
            ),
            None => self.lower_expr(bound, Some(&GoType::Int)),
        }
    }

    /// `new Uint8Array(n)` and friends, with the array-argument form
    /// cloning instead of sizing.
    fn lower_typed_array(&mut self, name: &str, arguments: &[IlNode]) -> GoExpr {
        let element = typed_array_element(name).unwrap_or(GoType::Uint8);
        let ty = GoType::slice(element);
        let Some(argument) = arguments.first() else {
            return GoExpr::Composite {
                ty,
                elems: vec![],
            };
        };
        let argument_ty = self.infer_type(argument, None, None);
        if argument_ty.is_numeric() {
            let size = self.lower_expr(argument, Some(&GoType::Int));
            return GoExpr::call_named(
                "make",
                vec![GoExpr::Lit(ty.to_string()), size],
            );
        }
        // An existing array copies element-wise.
        let source = self.lower_expr(argument, Some(&ty));
        GoExpr::call_variadic(
            GoExpr::ident("append"),
            vec![
                GoExpr::Composite {
                    ty,
                    elems: vec![],
                },
                source,
            ],
        )
    }

    /// `Array.from({length: N}, (_, i) => expr)` builds a sized slice with
    /// per-index assignment.
    fn lower_array_from(&mut self, arguments: &[IlNode], hint: Option<&GoType>) -> GoExpr {
        let element = hint
            .and_then(|ty| ty.element_type().cloned())
            .unwrap_or_else(|| self.widen());
        let ty = GoType::slice(element.clone());

        let Some(descriptor) = arguments.first() else {
            return GoExpr::Composite { ty, elems: vec![] };
        };

        // The array-like form clones.
        let length = match &descriptor.kind {
            IlKind::ObjectExpression { properties } => properties
                .iter()
                .find(|property| property.key == "length")
                .map(|property| property.value.clone()),
            _ => None,
        };
        let Some(length) = length else {
            let source = self.lower_expr(descriptor, Some(&ty));
            return GoExpr::call_variadic(
                GoExpr::ident("append"),
                vec![GoExpr::Composite { ty, elems: vec![] }, source],
            );
        };

        let size = self.lower_expr(&length, Some(&GoType::Int));
        let mut body = vec![GoStmt::decl_short(
            "r",
            GoExpr::call_named("make", vec![GoExpr::Lit(ty.to_string()), size]),
        )];

        let index_name = match arguments.get(1).map(|callback| &callback.kind) {
            Some(IlKind::FunctionExpression { params, .. }) if params.len() > 1 => {
                params[1].name.clone()
            }
            _ => "i".to_string(),
        };

        let fill = match arguments.get(1) {
            Some(callback) => {
                let saved = self.ctx.variable_types.clone();
                self.ctx
                    .variable_types
                    .insert(index_name.clone(), GoType::Int);
                let value = match &callback.kind {
                    IlKind::FunctionExpression {
                        expression: Some(expression),
                        ..
                    } => self.coerce_value(&element, expression),
                    _ => {
                        let lowered = self.lower_expr(callback, None);
                        GoExpr::call(lowered, vec![GoExpr::Nil, GoExpr::ident(&index_name)])
                    }
                };
                self.ctx.variable_types = saved;
                value
            }
            None => self.zero_value(&element),
        };

        body.push(GoStmt::Range {
            key: index_name.clone(),
            value: None,
            expr: GoExpr::ident("r"),
            body: vec![GoStmt::assign(
                GoExpr::index(GoExpr::ident("r"), GoExpr::ident(index_name)),
                fill,
            )],
        });
        body.push(GoStmt::Return(Some(GoExpr::ident("r"))));

        GoExpr::call(
            GoExpr::FuncLit {
                params: vec![],
                result: Some(ty),
                body,
            },
            vec![],
        )
    }

    /// `new T(...)`: typed arrays size or clone, helper records build
    /// named-field literals from the positional map, anything else calls
    /// its factory.
    pub(crate) fn lower_new(&mut self, callee: &str, arguments: &[IlNode]) -> GoExpr {
        if typed_array_element(callee).is_some() {
            return self.lower_typed_array(callee, arguments);
        }

        if let Some(fields) = stubs::record_fields(callee) {
            self.touch_helper_record(callee);
            let elems = fields
                .iter()
                .zip(arguments.iter())
                .map(|(field, argument)| {
                    let field_ty = stubs::record_field_type(callee, field);
                    let value = self.coerce_value(&field_ty, argument);
                    CompositeElem::Field((*field).to_string(), value)
                })
                .collect();
            return GoExpr::Composite {
                ty: GoType::named(callee),
                elems,
            };
        }

        let struct_name = pascal(callee);
        if arguments.is_empty() {
            return GoExpr::unary(
                UnaryOp::Addr,
                GoExpr::Composite {
                    ty: GoType::named(struct_name),
                    elems: vec![],
                },
            );
        }
        let args = self.lower_declared_args("constructor", arguments);
        GoExpr::call(GoExpr::ident(format!("New{struct_name}")), args)
    }
}

/// Maps `"32BE"`-style suffixes of OpCodes pack/unpack names.
fn parse_width_endian(rest: &str) -> Option<(u8, bool)> {
    let (width, endian) = rest.split_at(rest.len().checked_sub(2)?);
    let bits: u8 = width.parse().ok()?;
    if !matches!(bits, 8 | 16 | 32 | 64) {
        return None;
    }
    match endian {
        "BE" => Some((bits, true)),
        "LE" => Some((bits, false)),
        _ => None,
    }
}

/// The existence probe shared by `key in obj` and `hasOwnProperty`.
fn map_has(container: GoExpr, key: GoExpr) -> GoExpr {
    GoExpr::call(
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
    )
}
