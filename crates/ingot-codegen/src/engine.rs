//! The type engine.
//!
//! Given any IL expression node (plus optionally a variable name for
//! name-based heuristics and a target-type hint), the engine resolves a
//! single Go type. It never fails: unknown cases widen to `interface{}`
//! (or `any` when generics are enabled).
//!
//! Signal precedence, strongest first: explicit annotation on the node,
//! registered declared types, the target-type hint, node-kind rules, name
//! heuristics, the `resultType` annotation for non-scalar kinds, and the
//! generic fallback. Numeric `resultType`s are not trusted for scalars
//! because the IL carries signed widths where crypto code wants unsigned.

use ingot_go::{BinaryOp, GoExpr, GoType};
use ingot_il::{IlKind, IlLiteral, IlNode};

use crate::{pascal, Transformer};

/// How a mixed-type binary operation settles its operand types.
#[derive(Debug, Clone, PartialEq)]
pub struct Coercion {
    pub result: GoType,
    /// Conversion to apply to the left operand, if any.
    pub convert_left: Option<GoType>,
    /// Conversion to apply to the right operand, if any.
    pub convert_right: Option<GoType>,
}

impl Coercion {
    fn keep(result: GoType) -> Self {
        Self {
            result,
            convert_left: None,
            convert_right: None,
        }
    }
}

/// Picks the wider of two types, used when call sites disagree on a
/// parameter type. An interface loses to any concrete type; slices compare
/// element-wise.
pub fn merge_wider(a: &GoType, b: &GoType) -> GoType {
    if a == b {
        return a.clone();
    }
    if a.is_interface() {
        return b.clone();
    }
    if b.is_interface() {
        return a.clone();
    }
    if let (GoType::Slice(left), GoType::Slice(right)) = (a, b) {
        return GoType::slice(merge_wider(left, right));
    }
    if a.widening_rank() >= b.widening_rank() {
        a.clone()
    } else {
        b.clone()
    }
}

const BYTE_SLICE_NAMES: &[&str] = &[
    "key",
    "data",
    "input",
    "output",
    "block",
    "buffer",
    "plaintext",
    "ciphertext",
    "message",
    "digest",
    "tag",
    "aad",
    "iv",
    "nonce",
];

const INT_SUFFIXES: &[&str] = &[
    "size", "count", "length", "len", "offset", "index", "bits", "rounds", "steps", "shift",
    "width", "height", "depth", "idx", "pos", "num",
];

const BOOL_PREFIXES: &[&str] = &["is", "has", "should", "can", "supports", "needs"];

fn is_all_caps(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        && name.chars().any(|c| c.is_ascii_uppercase())
}

/// Matches `name` against a word, either exactly or as a camel/snake-case
/// suffix.
fn has_word_suffix(name: &str, word: &str) -> bool {
    let lower = name.to_lowercase();
    if lower == word {
        return true;
    }
    let mut capitalized = String::with_capacity(word.len());
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        capitalized.push(first.to_ascii_uppercase());
        capitalized.extend(chars);
    }
    name.ends_with(&capitalized) || lower.ends_with(&format!("_{word}"))
}

fn has_bool_shape(name: &str) -> bool {
    if name == "inverse" {
        return true;
    }
    for prefix in BOOL_PREFIXES {
        if let Some(rest) = name.strip_prefix(prefix) {
            if rest.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
                return true;
            }
        }
    }
    // A boolean-ish word in the middle of a longer name: `keyIsSet`.
    for marker in ["Is", "Has", "Should", "Can", "Supports", "Needs"] {
        if let Some(position) = name.find(marker) {
            if position > 0
                && name[position + marker.len()..]
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_uppercase())
            {
                return true;
            }
        }
    }
    false
}

/// Name-based type heuristics, used only when no stronger signal exists.
/// Returns `None` when no specific pattern matches; the caller applies the
/// bare-name `uint32` fallback after the `resultType` tier.
pub fn name_heuristic(name: &str) -> Option<GoType> {
    if name.is_empty() {
        return None;
    }

    for word in BYTE_SLICE_NAMES {
        if has_word_suffix(name, word) {
            return Some(GoType::bytes());
        }
    }

    if has_word_suffix(name, "mask") {
        return Some(GoType::Uint32);
    }
    for suffix in INT_SUFFIXES {
        if has_word_suffix(name, suffix) {
            return Some(GoType::Int);
        }
    }

    if is_all_caps(name) {
        return Some(GoType::Uint32);
    }

    if has_bool_shape(name) {
        return Some(GoType::Bool);
    }

    let lower = name.to_lowercase();
    if lower.contains("sbox")
        || lower.contains("permutation")
        || lower.contains("lfsr")
        || lower.contains("keystream")
        || has_word_suffix(name, "state")
        || has_word_suffix(name, "cell")
        || has_word_suffix(name, "register")
    {
        return Some(GoType::bytes());
    }

    if lower == "config"
        || has_word_suffix(name, "config")
        || has_word_suffix(name, "options")
        || has_word_suffix(name, "settings")
    {
        return Some(GoType::string_map());
    }

    None
}

/// Whether a hint may be taken at face value for this node. Literal nodes
/// only accept hints of their own kind class; everything else defers to the
/// hint.
fn hint_applies(hint: &GoType, node: &IlNode) -> bool {
    match &node.kind {
        IlKind::Literal { value, .. } => match value {
            IlLiteral::Int(_) => hint.is_numeric(),
            IlLiteral::Float(_) => hint.is_float(),
            IlLiteral::BigInt(_) => hint.is_integer(),
            IlLiteral::Str(_) => matches!(hint, GoType::String | GoType::Named(_)),
            IlLiteral::Bool(_) => *hint == GoType::Bool,
            IlLiteral::Null => true,
        },
        IlKind::ArrayExpression { .. } => hint.is_slice(),
        IlKind::ObjectExpression { .. } => hint.is_map() || matches!(hint, GoType::Named(_)),
        IlKind::TemplateLiteral { .. } => *hint == GoType::String,
        _ => true,
    }
}

impl Transformer {
    /// The type everything unknown widens to.
    pub(crate) fn widen(&self) -> GoType {
        if self.options.use_generics {
            GoType::Any
        } else {
            GoType::Interface
        }
    }

    /// Maps an IL `resultType` spelling to a Go type.
    pub(crate) fn parse_result_type(&self, spelling: &str) -> GoType {
        if let Some(element) = spelling.strip_suffix("[]") {
            return GoType::slice(self.parse_result_type(element));
        }
        match spelling {
            "uint8" | "byte" => GoType::Uint8,
            "uint16" | "word" => GoType::Uint16,
            "uint32" | "dword" => GoType::Uint32,
            "uint64" | "qword" => GoType::Uint64,
            "int8" => GoType::Int8,
            "int16" => GoType::Int16,
            "int32" => GoType::Int32,
            "int64" => GoType::Int64,
            "int" => GoType::Int,
            "float32" => GoType::Float32,
            "float64" | "double" | "number" => GoType::Float64,
            "boolean" | "bool" => GoType::Bool,
            "string" => GoType::String,
            "bigint" => GoType::Uint64,
            "object" => GoType::string_map(),
            "void" => GoType::Nothing,
            _ => self.widen(),
        }
    }

    /// Resolves the Go type of an IL expression.
    pub(crate) fn infer_type(
        &self,
        node: &IlNode,
        name: Option<&str>,
        hint: Option<&GoType>,
    ) -> GoType {
        // Explicit annotation: a conversion names its target outright.
        if let IlKind::TypeConversion { target, .. } = &node.kind {
            return self.parse_result_type(target);
        }

        // Registered declared types.
        match &node.kind {
            IlKind::Identifier { name } => {
                if name == "undefined" {
                    return self.widen();
                }
                if let Some(ty) = self.ctx.variable_types.get(name) {
                    return ty.clone();
                }
            }
            IlKind::ThisExpression => {
                if let Some(current) = &self.ctx.current_struct {
                    return GoType::pointer(GoType::named(pascal(current)));
                }
            }
            IlKind::MemberExpression {
                object,
                property,
                computed,
            } => {
                if let Some(ty) = self.registered_member_type(object, property, *computed) {
                    return ty;
                }
            }
            IlKind::CallExpression { callee, .. } => {
                if let Some(ty) = self.registered_call_type(callee) {
                    return ty;
                }
            }
            _ => {}
        }

        // Target-type hint.
        if let Some(hint) = hint {
            if hint_applies(hint, node) {
                return hint.clone();
            }
        }

        // Node-kind-specific rules.
        if let Some(ty) = self.kind_type(node, hint) {
            return ty;
        }

        // Name heuristics.
        if let Some(ty) = name.and_then(name_heuristic) {
            return ty;
        }
        if let IlKind::Identifier { name } = &node.kind {
            if let Some(ty) = name_heuristic(name) {
                return ty;
            }
        }

        // resultType, trusted only for non-scalar kinds.
        if let Some(result_type) = &node.result_type {
            let ty = self.parse_result_type(result_type);
            if matches!(
                ty,
                GoType::Slice(_) | GoType::Map(_, _) | GoType::String | GoType::Bool
            ) {
                return ty;
            }
        }

        // A named expression with nothing better defaults to uint32.
        if name.is_some() || matches!(node.kind, IlKind::Identifier { .. }) {
            return GoType::Uint32;
        }

        self.widen()
    }

    /// `this.field` and `this.algorithm`-style lookups against the symbol
    /// tables built by pre-scan.
    fn registered_member_type(
        &self,
        object: &IlNode,
        property: &IlNode,
        computed: bool,
    ) -> Option<GoType> {
        if computed {
            return None;
        }
        let IlKind::Identifier { name: field } = &property.kind else {
            return None;
        };
        if matches!(object.kind, IlKind::ThisExpression) {
            return self
                .ctx
                .struct_field_types
                .get(field)
                .or_else(|| self.ctx.struct_field_types.get(&pascal(field)))
                .cloned();
        }
        // A module-level singleton registered by the stub generator.
        if let IlKind::Identifier { name } = &object.kind {
            if let Some(GoType::Map(_, value)) = self.ctx.variable_types.get(name) {
                return Some((**value).clone());
            }
        }
        None
    }

    fn registered_call_type(&self, callee: &IlNode) -> Option<GoType> {
        match &callee.kind {
            IlKind::Identifier { name } => self.ctx.method_return_types.get(name).cloned(),
            IlKind::MemberExpression {
                object, property, ..
            } => {
                let IlKind::Identifier { name: method } = &property.kind else {
                    return None;
                };
                if matches!(object.kind, IlKind::ThisExpression) {
                    return self.ctx.method_return_types.get(method).cloned();
                }
                if let IlKind::Identifier { name } = &object.kind {
                    if name == "OpCodes" {
                        if let Some(info) = self.knowledge.op_codes_types.get(method) {
                            return Some(self.parse_result_type(&info.returns));
                        }
                        return op_codes_default_type(method);
                    }
                }
                None
            }
            _ => None,
        }
    }

    /// The per-kind typing rules.
    fn kind_type(&self, node: &IlNode, hint: Option<&GoType>) -> Option<GoType> {
        match &node.kind {
            IlKind::Literal { value, .. } => Some(match value {
                IlLiteral::Null => self.widen(),
                IlLiteral::Bool(_) => GoType::Bool,
                IlLiteral::Int(_) => GoType::Int,
                IlLiteral::Float(_) => GoType::Float64,
                IlLiteral::Str(_) => GoType::String,
                IlLiteral::BigInt(_) => GoType::Uint64,
            }),
            IlKind::TemplateLiteral { .. } => Some(GoType::String),
            IlKind::ArrayExpression {
                elements,
                element_type,
            } => Some(self.array_literal_type(elements, element_type.as_deref(), hint)),
            IlKind::ObjectExpression { .. } => Some(GoType::string_map()),
            IlKind::BinaryExpression {
                operator,
                left,
                right,
            } => {
                if matches!(
                    operator.as_str(),
                    "==" | "!=" | "===" | "!==" | "<" | "<=" | ">" | ">=" | "in" | "instanceof"
                ) {
                    return Some(GoType::Bool);
                }
                if operator == ">>>" {
                    return Some(GoType::Uint32);
                }
                let lt = self.infer_type(left, None, None);
                let rt = self.infer_type(right, None, None);
                let op = binary_op_of(operator)?;
                Some(self.coerce_binary(op, &lt, &rt).result)
            }
            IlKind::LogicalExpression { left, right, .. } => {
                let lt = self.infer_type(left, None, None);
                let rt = self.infer_type(right, None, None);
                if lt == GoType::Bool && rt == GoType::Bool {
                    Some(GoType::Bool)
                } else if lt == rt {
                    Some(lt)
                } else {
                    Some(self.widen())
                }
            }
            IlKind::UnaryExpression { operator, argument } => match operator.as_str() {
                "!" => Some(GoType::Bool),
                "typeof" => Some(GoType::String),
                "-" | "+" => {
                    let ty = self.infer_type(argument, None, None);
                    Some(if ty.is_numeric() { ty } else { GoType::Int })
                }
                "~" => {
                    let ty = self.infer_type(argument, None, None);
                    Some(if ty.is_integer() { ty } else { GoType::Uint32 })
                }
                _ => None,
            },
            IlKind::UpdateExpression { argument, .. } => {
                Some(self.infer_type(argument, None, None))
            }
            IlKind::ConditionalExpression { consequent, .. } => {
                Some(self.infer_type(consequent, None, hint))
            }
            IlKind::AssignmentExpression { right, .. } => Some(self.infer_type(right, None, hint)),
            IlKind::CallExpression { callee, arguments } => self.call_kind_type(callee, arguments),
            IlKind::NewExpression { callee, .. } => Some(self.new_expression_type(callee)),
            IlKind::MemberExpression {
                object,
                property,
                computed,
            } => self.member_kind_type(object, property, *computed),
            IlKind::FunctionExpression { params, .. } => Some(GoType::Func(
                params.iter().map(|_| self.widen()).collect(),
                Some(Box::new(self.widen())),
            )),
            IlKind::SpreadElement { argument } => Some(self.infer_type(argument, None, hint)),
            IlKind::PackBytes { bits, .. } => Some(uint_of_width(*bits)),
            IlKind::UnpackBytes { .. } => Some(GoType::bytes()),
            IlKind::RotateLeft { bits, .. } | IlKind::RotateRight { bits, .. } => {
                Some(uint_of_width(*bits))
            }
            IlKind::ArrayAppend { target, .. } => Some(self.infer_type(target, None, None)),
            IlKind::HexDecode { .. } => Some(GoType::bytes()),
            IlKind::ErrorCreation { .. } => Some(GoType::Error),
            _ => None,
        }
    }

    /// Element typing for array literals: annotated element type, then the
    /// hint's element type, then the first element (with the byte-range rule
    /// for integer literals).
    pub(crate) fn array_literal_type(
        &self,
        elements: &[IlNode],
        element_type: Option<&str>,
        hint: Option<&GoType>,
    ) -> GoType {
        if let Some(annotated) = element_type {
            return GoType::slice(self.parse_result_type(annotated));
        }
        if let Some(GoType::Slice(element)) = hint {
            return GoType::slice((**element).clone());
        }
        if elements.is_empty() {
            return GoType::slice(self.widen());
        }

        // All-integer literals pick a width from their range.
        let mut max_value: Option<i64> = Some(0);
        for element in elements {
            match &element.kind {
                IlKind::Literal {
                    value: IlLiteral::Int(n),
                    ..
                } => {
                    max_value = max_value.map(|m| m.max(*n));
                }
                _ => {
                    max_value = None;
                    break;
                }
            }
        }
        if let Some(max) = max_value {
            return if max <= 0xff {
                GoType::bytes()
            } else if max <= 0xffff {
                GoType::slice(GoType::Uint16)
            } else {
                GoType::slice(GoType::Uint32)
            };
        }

        GoType::slice(self.infer_type(&elements[0], None, None))
    }

    fn call_kind_type(&self, callee: &IlNode, arguments: &[IlNode]) -> Option<GoType> {
        match &callee.kind {
            IlKind::MemberExpression {
                object, property, ..
            } => {
                let IlKind::Identifier { name: method } = &property.kind else {
                    return None;
                };
                if let IlKind::Identifier { name } = &object.kind {
                    match name.as_str() {
                        "Math" => return Some(self.math_return_type(method, arguments)),
                        "Array" if method == "isArray" => return Some(GoType::Bool),
                        "Array" if method == "from" => return Some(GoType::slice(self.widen())),
                        "String" if method == "fromCharCode" => return Some(GoType::String),
                        "JSON" => return Some(GoType::String),
                        _ => {}
                    }
                }
                let recv = self.infer_type(object, None, None);
                match method.as_str() {
                    "slice" | "subarray" | "concat" | "reverse" | "sort" | "fill" => {
                        Some(if recv.is_slice() { recv } else { GoType::bytes() })
                    }
                    "map" | "filter" => Some(if recv.is_slice() {
                        recv
                    } else {
                        GoType::slice(self.widen())
                    }),
                    "push" => Some(GoType::Int),
                    "reduce" | "find" | "pop" | "shift" => Some(self.widen()),
                    "findIndex" | "indexOf" | "charCodeAt" | "codePointAt" => Some(GoType::Int),
                    "includes" | "every" | "some" | "startsWith" | "endsWith" => {
                        Some(GoType::Bool)
                    }
                    "join" | "toString" | "toUpperCase" | "toLowerCase" | "trim" | "repeat"
                    | "padStart" | "padEnd" | "charAt" | "substring" | "substr" | "replace" => {
                        Some(GoType::String)
                    }
                    "split" => Some(GoType::slice(GoType::String)),
                    _ => None,
                }
            }
            IlKind::Identifier { name } => match name.as_str() {
                "parseInt" => Some(GoType::Int64),
                "parseFloat" => Some(GoType::Float64),
                "BigInt" => Some(GoType::Uint64),
                "Number" => Some(GoType::Float64),
                "Boolean" => Some(GoType::Bool),
                _ => typed_array_element(name).map(GoType::slice),
            },
            _ => None,
        }
    }

    fn math_return_type(&self, method: &str, arguments: &[IlNode]) -> GoType {
        match method {
            "imul" => GoType::Int32,
            "fround" => GoType::Float32,
            "floor" | "ceil" | "round" | "trunc" | "sign" => GoType::Int,
            "min" | "max" | "abs" | "pow" => arguments
                .first()
                .map(|argument| self.infer_type(argument, None, None))
                .filter(|ty| ty.is_numeric())
                .unwrap_or(GoType::Float64),
            _ => GoType::Float64,
        }
    }

    fn member_kind_type(
        &self,
        object: &IlNode,
        property: &IlNode,
        computed: bool,
    ) -> Option<GoType> {
        if computed {
            // Indexed access yields the container's element type.
            let container = self.infer_type(object, None, None);
            return match container {
                GoType::Slice(element) => Some(*element),
                GoType::Map(_, value) => Some(*value),
                GoType::String => Some(GoType::Uint8),
                _ => Some(self.widen()),
            };
        }
        let IlKind::Identifier { name: field } = &property.kind else {
            return None;
        };
        if field == "length" {
            return Some(GoType::Int);
        }
        if let IlKind::Identifier { name } = &object.kind {
            if crate::enums::is_enum_name(name) {
                return Some(GoType::named(name));
            }
        }
        None
    }

    fn new_expression_type(&self, callee: &str) -> GoType {
        if let Some(element) = typed_array_element(callee) {
            return GoType::slice(element);
        }
        if crate::stubs::is_helper_record(callee) {
            return GoType::named(callee);
        }
        GoType::pointer(GoType::named(pascal(callee)))
    }

    /// Settles operand and result types for a numeric binary operation.
    ///
    /// Arithmetic follows the wider operand; bitwise operations on mixed
    /// signedness follow the unsigned operand. Interface operands are left
    /// for the dispatcher to assert.
    pub(crate) fn coerce_binary(&self, op: BinaryOp, left: &GoType, right: &GoType) -> Coercion {
        if op.is_comparison() {
            return Coercion::keep(GoType::Bool);
        }
        if left == right {
            return Coercion::keep(left.clone());
        }
        if left.is_interface() {
            return Coercion::keep(right.clone());
        }
        if right.is_interface() {
            return Coercion::keep(left.clone());
        }
        if left.is_float() || right.is_float() {
            let result = if *left == GoType::Float64 || *right == GoType::Float64 {
                GoType::Float64
            } else {
                GoType::Float32
            };
            return Coercion {
                convert_left: (*left != result).then(|| result.clone()),
                convert_right: (*right != result).then(|| result.clone()),
                result,
            };
        }
        if !left.is_integer() || !right.is_integer() {
            return Coercion::keep(left.clone());
        }

        let result = if op.is_bitwise() {
            match (left.is_unsigned(), right.is_unsigned()) {
                (true, false) => left.clone(),
                (false, true) => right.clone(),
                _ => wider_integer(left, right),
            }
        } else {
            wider_integer(left, right)
        };

        Coercion {
            convert_left: (*left != result).then(|| result.clone()),
            convert_right: (*right != result).then(|| result.clone()),
            result,
        }
    }

    /// Wraps an expression so it can stand where Go requires a boolean.
    pub(crate) fn truthy(&self, expr: GoExpr, ty: &GoType) -> GoExpr {
        match ty {
            GoType::Bool => expr,
            numeric if numeric.is_numeric() => {
                GoExpr::binary(expr, BinaryOp::Ne, GoExpr::Int(0))
            }
            GoType::String => GoExpr::binary(expr, BinaryOp::Ne, GoExpr::str("")),
            GoType::Slice(_) | GoType::Map(_, _) => {
                GoExpr::binary(GoExpr::len_of(expr), BinaryOp::Gt, GoExpr::Int(0))
            }
            ty if ty.is_nilable() => GoExpr::binary(expr, BinaryOp::Ne, GoExpr::Nil),
            GoType::Named(_) | GoType::Nothing => GoExpr::binary(expr, BinaryOp::Ne, GoExpr::Nil),
            _ => GoExpr::binary(expr, BinaryOp::Ne, GoExpr::Int(0)),
        }
    }
}

/// Picks the wider of two integer types; a tie on width prefers unsigned.
fn wider_integer(a: &GoType, b: &GoType) -> GoType {
    let (wa, wb) = (a.bit_width().unwrap_or(0), b.bit_width().unwrap_or(0));
    if wa > wb {
        return a.clone();
    }
    if wb > wa {
        return b.clone();
    }
    // `int` beats fixed 64-bit widths for arithmetic ergonomics, and an
    // unsigned operand beats a signed one of equal width.
    if *a == GoType::Int && !b.is_unsigned() {
        return a.clone();
    }
    if *b == GoType::Int && !a.is_unsigned() {
        return b.clone();
    }
    if a.is_unsigned() {
        a.clone()
    } else {
        b.clone()
    }
}

pub(crate) fn uint_of_width(bits: u8) -> GoType {
    match bits {
        8 => GoType::Uint8,
        16 => GoType::Uint16,
        64 => GoType::Uint64,
        _ => GoType::Uint32,
    }
}

/// The element type of a typed-array constructor name.
pub(crate) fn typed_array_element(name: &str) -> Option<GoType> {
    match name {
        "Uint8Array" | "Uint8ClampedArray" => Some(GoType::Uint8),
        "Uint16Array" => Some(GoType::Uint16),
        "Uint32Array" => Some(GoType::Uint32),
        "Int8Array" => Some(GoType::Int8),
        "Int16Array" => Some(GoType::Int16),
        "Int32Array" => Some(GoType::Int32),
        "Float32Array" => Some(GoType::Float32),
        "Float64Array" => Some(GoType::Float64),
        "BigUint64Array" | "BigInt64Array" => Some(GoType::Uint64),
        "Array" => Some(GoType::Interface),
        _ => None,
    }
}

/// Built-in return types for the OpCodes helpers, used when no
/// `typeKnowledge` document overrides them.
fn op_codes_default_type(method: &str) -> Option<GoType> {
    let ty = match method {
        "RotL8" | "RotR8" => GoType::Uint8,
        "RotL16" | "RotR16" => GoType::Uint16,
        "RotL32" | "RotR32" => GoType::Uint32,
        "RotL64" | "RotR64" => GoType::Uint64,
        "Pack16BE" | "Pack16LE" => GoType::Uint16,
        "Pack32BE" | "Pack32LE" => GoType::Uint32,
        "Pack64BE" | "Pack64LE" => GoType::Uint64,
        "Unpack16BE" | "Unpack16LE" | "Unpack32BE" | "Unpack32LE" | "Unpack64BE"
        | "Unpack64LE" => GoType::bytes(),
        "XorArrays" | "CloneArray" | "CopyArray" | "Hex8ToBytes" => GoType::bytes(),
        "PopCount" => GoType::Int,
        _ => return None,
    };
    Some(ty)
}

pub(crate) fn binary_op_of(operator: &str) -> Option<BinaryOp> {
    Some(match operator {
        "+" => BinaryOp::Add,
        "-" => BinaryOp::Sub,
        "*" => BinaryOp::Mul,
        "/" => BinaryOp::Div,
        "%" => BinaryOp::Rem,
        "<<" => BinaryOp::Shl,
        ">>" | ">>>" => BinaryOp::Shr,
        "&" => BinaryOp::And,
        "|" => BinaryOp::Or,
        "^" => BinaryOp::Xor,
        "&^" => BinaryOp::AndNot,
        "==" | "===" => BinaryOp::Eq,
        "!=" | "!==" => BinaryOp::Ne,
        "<" => BinaryOp::Lt,
        "<=" => BinaryOp::Le,
        ">" => BinaryOp::Gt,
        ">=" => BinaryOp::Ge,
        "&&" => BinaryOp::LAnd,
        "||" => BinaryOp::LOr,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use ingot_go::{BinaryOp, GoType};
    use pretty_assertions::assert_eq;

    use super::{merge_wider, name_heuristic};
    use crate::Transformer;

    #[test]
    fn test_name_heuristics() {
        assert_eq!(name_heuristic("roundKey"), Some(GoType::bytes()));
        assert_eq!(name_heuristic("plaintext"), Some(GoType::bytes()));
        assert_eq!(name_heuristic("blockSize"), Some(GoType::Int));
        assert_eq!(name_heuristic("mask"), Some(GoType::Uint32));
        assert_eq!(name_heuristic("MAX_ROUNDS"), Some(GoType::Int));
        assert_eq!(name_heuristic("DELTA"), Some(GoType::Uint32));
        assert_eq!(name_heuristic("isFinalized"), Some(GoType::Bool));
        assert_eq!(name_heuristic("inverse"), Some(GoType::Bool));
        assert_eq!(name_heuristic("sBoxTable"), Some(GoType::bytes()));
        assert_eq!(name_heuristic("config"), Some(GoType::string_map()));
        assert_eq!(name_heuristic("somethingElse"), None);
    }

    #[test]
    fn test_arithmetic_coercion_prefers_wider() {
        let transformer = Transformer::default();
        let coerced = transformer.coerce_binary(BinaryOp::Add, &GoType::Int, &GoType::Uint32);
        assert_eq!(coerced.result, GoType::Int);
        assert_eq!(coerced.convert_left, None);
        assert_eq!(coerced.convert_right, Some(GoType::Int));
    }

    #[test]
    fn test_bitwise_coercion_prefers_unsigned() {
        let transformer = Transformer::default();
        let coerced = transformer.coerce_binary(BinaryOp::Xor, &GoType::Int, &GoType::Uint32);
        assert_eq!(coerced.result, GoType::Uint32);
        assert_eq!(coerced.convert_left, Some(GoType::Uint32));
        assert_eq!(coerced.convert_right, None);
    }

    #[test]
    fn test_equal_types_need_no_conversion() {
        let transformer = Transformer::default();
        let coerced =
            transformer.coerce_binary(BinaryOp::Add, &GoType::Uint32, &GoType::Uint32);
        assert_eq!(coerced.result, GoType::Uint32);
        assert_eq!(coerced.convert_left, None);
        assert_eq!(coerced.convert_right, None);
    }

    #[test]
    fn test_merge_wider() {
        assert_eq!(
            merge_wider(&GoType::Uint8, &GoType::Uint32),
            GoType::Uint32
        );
        assert_eq!(
            merge_wider(&GoType::Interface, &GoType::bytes()),
            GoType::bytes()
        );
        assert_eq!(
            merge_wider(
                &GoType::slice(GoType::Uint8),
                &GoType::slice(GoType::Uint32)
            ),
            GoType::slice(GoType::Uint32)
        );
    }

    #[test]
    fn test_truthiness_wrapping() {
        let transformer = Transformer::default();
        let wrapped = transformer.truthy(ingot_go::GoExpr::ident("n"), &GoType::Uint32);
        assert_eq!(ingot_go::render_expr(&wrapped), "n != 0");
        let wrapped = transformer.truthy(ingot_go::GoExpr::ident("s"), &GoType::String);
        assert_eq!(ingot_go::render_expr(&wrapped), "s != \"\"");
        let wrapped = transformer.truthy(ingot_go::GoExpr::ident("xs"), &GoType::bytes());
        assert_eq!(ingot_go::render_expr(&wrapped), "len(xs) > 0");
        let wrapped = transformer.truthy(ingot_go::GoExpr::ident("p"), &GoType::Interface);
        assert_eq!(ingot_go::render_expr(&wrapped), "p != nil");
    }
}
