use genco::{
    prelude::*,
    tokens::{quoted, static_literal, ItemStr},
};

use crate::{GoParam, GoStmt, GoType};

/// Binary operators in Go, with the precedence table from the language spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    And,
    Or,
    Xor,
    AndNot,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    LAnd,
    LOr,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::AndNot => "&^",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::LAnd => "&&",
            BinaryOp::LOr => "||",
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Rem
            | BinaryOp::Shl
            | BinaryOp::Shr
            | BinaryOp::And
            | BinaryOp::AndNot => 5,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Or | BinaryOp::Xor => 4,
            BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge => 3,
            BinaryOp::LAnd => 2,
            BinaryOp::LOr => 1,
        }
    }

    /// True for `+ - * / %`.
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem
        )
    }

    /// True for `& | ^ << >> &^`.
    pub fn is_bitwise(&self) -> bool {
        matches!(
            self,
            BinaryOp::And
                | BinaryOp::Or
                | BinaryOp::Xor
                | BinaryOp::AndNot
                | BinaryOp::Shl
                | BinaryOp::Shr
        )
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    /// The comparison with the opposite truth value, if this is a comparison.
    pub fn negated(&self) -> Option<BinaryOp> {
        match self {
            BinaryOp::Eq => Some(BinaryOp::Ne),
            BinaryOp::Ne => Some(BinaryOp::Eq),
            BinaryOp::Lt => Some(BinaryOp::Ge),
            BinaryOp::Le => Some(BinaryOp::Gt),
            BinaryOp::Gt => Some(BinaryOp::Le),
            BinaryOp::Ge => Some(BinaryOp::Lt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical negation `!`
    Not,
    /// Arithmetic negation `-`
    Neg,
    /// Bitwise complement `^`
    BitNot,
    /// Address-of `&`
    Addr,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::BitNot => "^",
            UnaryOp::Addr => "&",
        }
    }
}

/// One element of a composite literal.
#[derive(Debug, Clone, PartialEq)]
pub enum CompositeElem {
    Value(GoExpr),
    /// `Key: value` with an identifier key (struct literals)
    Field(String, GoExpr),
    /// `key: value` with an expression key (map literals)
    Keyed(GoExpr, GoExpr),
}

/// A Go expression.
#[derive(Debug, Clone, PartialEq)]
pub enum GoExpr {
    Ident(String),
    Selector {
        recv: Box<GoExpr>,
        field: String,
    },
    Index {
        recv: Box<GoExpr>,
        index: Box<GoExpr>,
    },
    SliceOf {
        recv: Box<GoExpr>,
        low: Option<Box<GoExpr>>,
        high: Option<Box<GoExpr>>,
    },
    Call {
        func: Box<GoExpr>,
        args: Vec<GoExpr>,
        /// Spreads the final argument with `...`
        variadic: bool,
    },
    TypeAssert {
        recv: Box<GoExpr>,
        ty: GoType,
    },
    Conversion {
        ty: GoType,
        expr: Box<GoExpr>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<GoExpr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<GoExpr>,
        right: Box<GoExpr>,
    },
    Paren(Box<GoExpr>),
    Int(i64),
    /// A raw literal kept in its source spelling (hex, floats, 64-bit words).
    Lit(String),
    Str(String),
    Bool(bool),
    Nil,
    Composite {
        ty: GoType,
        elems: Vec<CompositeElem>,
    },
    FuncLit {
        params: Vec<GoParam>,
        result: Option<GoType>,
        body: Vec<GoStmt>,
    },
}

impl GoExpr {
    pub fn ident<T: Into<String>>(name: T) -> Self {
        GoExpr::Ident(name.into())
    }

    pub fn str<T: Into<String>>(value: T) -> Self {
        GoExpr::Str(value.into())
    }

    pub fn select<T: Into<String>>(recv: GoExpr, field: T) -> Self {
        GoExpr::Selector {
            recv: Box::new(recv),
            field: field.into(),
        }
    }

    pub fn index(recv: GoExpr, index: GoExpr) -> Self {
        GoExpr::Index {
            recv: Box::new(recv),
            index: Box::new(index),
        }
    }

    pub fn call(func: GoExpr, args: Vec<GoExpr>) -> Self {
        GoExpr::Call {
            func: Box::new(func),
            args,
            variadic: false,
        }
    }

    pub fn call_named<T: Into<String>>(name: T, args: Vec<GoExpr>) -> Self {
        Self::call(GoExpr::ident(name), args)
    }

    pub fn call_variadic(func: GoExpr, args: Vec<GoExpr>) -> Self {
        GoExpr::Call {
            func: Box::new(func),
            args,
            variadic: true,
        }
    }

    pub fn binary(left: GoExpr, op: BinaryOp, right: GoExpr) -> Self {
        GoExpr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, expr: GoExpr) -> Self {
        GoExpr::Unary {
            op,
            expr: Box::new(expr),
        }
    }

    pub fn convert(ty: GoType, expr: GoExpr) -> Self {
        GoExpr::Conversion {
            ty,
            expr: Box::new(expr),
        }
    }

    pub fn assert(recv: GoExpr, ty: GoType) -> Self {
        GoExpr::TypeAssert {
            recv: Box::new(recv),
            ty,
        }
    }

    pub fn paren(expr: GoExpr) -> Self {
        GoExpr::Paren(Box::new(expr))
    }

    /// `len(x)`
    pub fn len_of(expr: GoExpr) -> Self {
        Self::call_named("len", vec![expr])
    }

    /// Whether a type assertion may be applied directly to this expression.
    ///
    /// Assertions are valid on identifiers, selectors, index expressions and
    /// ordinary calls. They are never stacked on another assertion and never
    /// applied to literals, composite literals, conversions, `make`/`new`,
    /// unary/binary results or slice expressions.
    pub fn supports_assertion(&self) -> bool {
        match self {
            GoExpr::Ident(_) | GoExpr::Selector { .. } | GoExpr::Index { .. } => true,
            GoExpr::Call { func, .. } => {
                !matches!(func.as_ref(), GoExpr::Ident(name) if name == "make" || name == "new")
            }
            GoExpr::Paren(inner) => inner.supports_assertion(),
            _ => false,
        }
    }

    /// True when this expression is a literal of any form.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            GoExpr::Int(_) | GoExpr::Lit(_) | GoExpr::Str(_) | GoExpr::Bool(_) | GoExpr::Nil
        )
    }

    /// True for bare numeric literals, which are untyped constants in Go and
    /// must never be wrapped in a conversion.
    pub fn is_numeric_literal(&self) -> bool {
        match self {
            GoExpr::Int(_) => true,
            GoExpr::Lit(raw) => raw
                .chars()
                .next()
                .map(|c| c.is_ascii_digit())
                .unwrap_or(false),
            GoExpr::Unary {
                op: UnaryOp::Neg,
                expr,
            } => expr.is_numeric_literal(),
            _ => false,
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            GoExpr::Binary { op, .. } => op.precedence(),
            GoExpr::Unary { .. } => 6,
            _ => 7,
        }
    }
}

fn format_operand(expr: &GoExpr, parent: u8, tokens: &mut Tokens<Go>) {
    if expr.precedence() < parent {
        tokens.append(static_literal("("));
        expr.format_into(tokens);
        tokens.append(static_literal(")"));
    } else {
        expr.format_into(tokens);
    }
}

/// Wraps a type in parentheses where Go requires it in conversion position.
fn conversion_type(ty: &GoType) -> String {
    match ty {
        GoType::Pointer(_) | GoType::Func(_, _) => format!("({ty})"),
        _ => ty.to_string(),
    }
}

impl FormatInto<Go> for &GoExpr {
    fn format_into(self, tokens: &mut Tokens<Go>) {
        match self {
            GoExpr::Ident(name) => tokens.append(ItemStr::from(name)),
            GoExpr::Selector { recv, field } => {
                format_operand(recv, 7, tokens);
                tokens.append(static_literal("."));
                tokens.append(ItemStr::from(field));
            }
            GoExpr::Index { recv, index } => {
                format_operand(recv, 7, tokens);
                tokens.append(static_literal("["));
                index.as_ref().format_into(tokens);
                tokens.append(static_literal("]"));
            }
            GoExpr::SliceOf { recv, low, high } => {
                format_operand(recv, 7, tokens);
                tokens.append(static_literal("["));
                if let Some(low) = low {
                    low.as_ref().format_into(tokens);
                }
                tokens.append(static_literal(":"));
                if let Some(high) = high {
                    high.as_ref().format_into(tokens);
                }
                tokens.append(static_literal("]"));
            }
            GoExpr::Call {
                func,
                args,
                variadic,
            } => {
                format_operand(func, 7, tokens);
                tokens.append(static_literal("("));
                let last = args.len().saturating_sub(1);
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        tokens.append(static_literal(","));
                        tokens.space();
                    }
                    arg.format_into(tokens);
                    if *variadic && i == last {
                        tokens.append(static_literal("..."));
                    }
                }
                tokens.append(static_literal(")"));
            }
            GoExpr::TypeAssert { recv, ty } => {
                format_operand(recv, 7, tokens);
                tokens.append(static_literal(".("));
                tokens.append(ItemStr::from(ty.to_string()));
                tokens.append(static_literal(")"));
            }
            GoExpr::Conversion { ty, expr } => {
                tokens.append(ItemStr::from(conversion_type(ty)));
                tokens.append(static_literal("("));
                expr.as_ref().format_into(tokens);
                tokens.append(static_literal(")"));
            }
            GoExpr::Unary { op, expr } => {
                tokens.append(static_literal(op.as_str()));
                format_operand(expr, 6, tokens);
            }
            GoExpr::Binary { op, left, right } => {
                format_operand(left, op.precedence(), tokens);
                tokens.space();
                tokens.append(static_literal(op.as_str()));
                tokens.space();
                // A right operand of equal precedence keeps its grouping.
                if right.precedence() <= op.precedence() {
                    tokens.append(static_literal("("));
                    right.as_ref().format_into(tokens);
                    tokens.append(static_literal(")"));
                } else {
                    right.as_ref().format_into(tokens);
                }
            }
            GoExpr::Paren(inner) => {
                tokens.append(static_literal("("));
                inner.as_ref().format_into(tokens);
                tokens.append(static_literal(")"));
            }
            GoExpr::Int(value) => tokens.append(ItemStr::from(value.to_string())),
            GoExpr::Lit(raw) => tokens.append(ItemStr::from(raw)),
            GoExpr::Str(value) => quoted(ItemStr::from(value)).format_into(tokens),
            GoExpr::Bool(value) => tokens.append(ItemStr::from(value.to_string())),
            GoExpr::Nil => tokens.append(static_literal("nil")),
            GoExpr::Composite { ty, elems } => {
                tokens.append(ItemStr::from(ty.to_string()));
                tokens.append(static_literal("{"));
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        tokens.append(static_literal(","));
                        tokens.space();
                    }
                    match elem {
                        CompositeElem::Value(value) => value.format_into(tokens),
                        CompositeElem::Field(name, value) => {
                            tokens.append(ItemStr::from(name));
                            tokens.append(static_literal(":"));
                            tokens.space();
                            value.format_into(tokens);
                        }
                        CompositeElem::Keyed(key, value) => {
                            key.format_into(tokens);
                            tokens.append(static_literal(":"));
                            tokens.space();
                            value.format_into(tokens);
                        }
                    }
                }
                tokens.append(static_literal("}"));
            }
            GoExpr::FuncLit {
                params,
                result,
                body,
            } => {
                tokens.append(static_literal("func("));
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        tokens.append(static_literal(","));
                        tokens.space();
                    }
                    tokens.append(ItemStr::from(&param.name));
                    tokens.space();
                    tokens.append(ItemStr::from(param.ty.to_string()));
                }
                tokens.append(static_literal(")"));
                if let Some(result) = result {
                    tokens.space();
                    tokens.append(ItemStr::from(result.to_string()));
                }
                tokens.space();
                tokens.append(static_literal("{"));
                tokens.indent();
                for stmt in body {
                    stmt.format_into(tokens);
                }
                tokens.unindent();
                tokens.push();
                tokens.append(static_literal("}"));
            }
        }
    }
}

impl FormatInto<Go> for GoExpr {
    fn format_into(self, tokens: &mut Tokens<Go>) {
        (&self).format_into(tokens)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{BinaryOp, GoExpr, UnaryOp};
    use crate::{render_expr, GoType};

    #[test]
    fn test_selector_and_index() {
        let expr = GoExpr::index(
            GoExpr::select(GoExpr::ident("b"), "State"),
            GoExpr::ident("i"),
        );
        assert_eq!(render_expr(&expr), "b.State[i]");
    }

    #[test]
    fn test_binary_precedence() {
        let expr = GoExpr::binary(
            GoExpr::binary(GoExpr::ident("a"), BinaryOp::Or, GoExpr::ident("b")),
            BinaryOp::And,
            GoExpr::ident("c"),
        );
        assert_eq!(render_expr(&expr), "(a | b) & c");
    }

    #[test]
    fn test_variadic_call() {
        let expr = GoExpr::call_variadic(
            GoExpr::ident("append"),
            vec![GoExpr::ident("dst"), GoExpr::ident("src")],
        );
        assert_eq!(render_expr(&expr), "append(dst, src...)");
    }

    #[test]
    fn test_type_assertion() {
        let expr = GoExpr::assert(GoExpr::ident("v"), GoType::bytes());
        assert_eq!(render_expr(&expr), "v.([]uint8)");
    }

    #[test]
    fn test_pointer_conversion_is_parenthesized() {
        let expr = GoExpr::convert(
            GoType::pointer(GoType::named("Foo")),
            GoExpr::ident("v"),
        );
        assert_eq!(render_expr(&expr), "(*Foo)(v)");
    }

    #[test]
    fn test_assertion_support() {
        assert!(GoExpr::ident("x").supports_assertion());
        assert!(GoExpr::call_named("firstNonNil", vec![]).supports_assertion());
        assert!(!GoExpr::Int(3).supports_assertion());
        assert!(!GoExpr::call_named("make", vec![]).supports_assertion());
        assert!(!GoExpr::unary(UnaryOp::Neg, GoExpr::ident("x")).supports_assertion());
        let asserted = GoExpr::assert(GoExpr::ident("x"), GoType::Interface);
        assert!(!asserted.supports_assertion());
    }

    #[test]
    fn test_numeric_literal_detection() {
        assert!(GoExpr::Int(255).is_numeric_literal());
        assert!(GoExpr::Lit("0x9e3779b9".into()).is_numeric_literal());
        assert!(!GoExpr::ident("x").is_numeric_literal());
    }
}
