use genco::{
    prelude::*,
    tokens::{static_literal, ItemStr},
};

use crate::{BinaryOp, GoExpr, GoType};

/// A Go statement. Every statement formats itself onto a fresh line, so a
/// block is rendered by formatting its statements one after another inside an
/// indented region.
#[derive(Debug, Clone, PartialEq)]
pub enum GoStmt {
    /// `name := value`
    DeclShort { name: String, value: GoExpr },
    /// `names[0], names[1] := value` (multi-assign short declaration)
    DeclShortMulti { names: Vec<String>, value: GoExpr },
    /// `var name T = value`
    DeclVar {
        name: String,
        ty: Option<GoType>,
        value: Option<GoExpr>,
    },
    /// `target = value`
    Assign { target: GoExpr, value: GoExpr },
    /// `target op= value`
    OpAssign {
        target: GoExpr,
        op: BinaryOp,
        value: GoExpr,
    },
    Expr(GoExpr),
    Return(Option<GoExpr>),
    /// `return a, b`
    ReturnMulti(Vec<GoExpr>),
    If {
        cond: GoExpr,
        then: Vec<GoStmt>,
        els: Option<Vec<GoStmt>>,
    },
    /// Three-part `for` loop; any part may be absent.
    For {
        init: Option<Box<GoStmt>>,
        cond: Option<GoExpr>,
        post: Option<Box<GoStmt>>,
        body: Vec<GoStmt>,
    },
    /// `for key, value := range expr`
    Range {
        key: String,
        value: Option<String>,
        expr: GoExpr,
        body: Vec<GoStmt>,
    },
    Break,
    Continue,
    Block(Vec<GoStmt>),
    /// A `// …` line comment
    Comment(String),
}

impl GoStmt {
    /// `x := v`
    pub fn decl_short<T: Into<String>>(name: T, value: GoExpr) -> Self {
        GoStmt::DeclShort {
            name: name.into(),
            value,
        }
    }

    pub fn assign(target: GoExpr, value: GoExpr) -> Self {
        GoStmt::Assign { target, value }
    }

    /// `x = append(x, v)`
    pub fn push_append(target: GoExpr, values: Vec<GoExpr>, variadic: bool) -> Self {
        let mut args = vec![target.clone()];
        args.extend(values);
        let call = if variadic {
            GoExpr::call_variadic(GoExpr::ident("append"), args)
        } else {
            GoExpr::call(GoExpr::ident("append"), args)
        };
        GoStmt::Assign {
            target,
            value: call,
        }
    }

    /// An infinite `for { … }` loop.
    pub fn loop_forever(body: Vec<GoStmt>) -> Self {
        GoStmt::For {
            init: None,
            cond: None,
            post: None,
            body,
        }
    }
}

/// Formats a statement without the leading line push, for use in `for`
/// init/post positions where the statement shares the header line.
fn format_inline(stmt: &GoStmt, tokens: &mut Tokens<Go>) {
    match stmt {
        GoStmt::DeclShort { name, value } => {
            tokens.append(ItemStr::from(name));
            tokens.space();
            tokens.append(static_literal(":="));
            tokens.space();
            value.format_into(tokens);
        }
        GoStmt::Assign { target, value } => {
            target.format_into(tokens);
            tokens.space();
            tokens.append(static_literal("="));
            tokens.space();
            value.format_into(tokens);
        }
        GoStmt::OpAssign { target, op, value } => {
            target.format_into(tokens);
            tokens.space();
            tokens.append(ItemStr::from(format!("{}=", op.as_str())));
            tokens.space();
            value.format_into(tokens);
        }
        GoStmt::Expr(expr) => expr.format_into(tokens),
        other => {
            // Only simple statements appear in loop headers.
            debug_assert!(false, "not an inline statement: {other:?}");
        }
    }
}

fn format_body(body: &[GoStmt], tokens: &mut Tokens<Go>) {
    tokens.append(static_literal("{"));
    tokens.indent();
    for stmt in body {
        stmt.format_into(tokens);
    }
    tokens.unindent();
    tokens.push();
    tokens.append(static_literal("}"));
}

/// Formats an `if` starting at the current position so `else if` chains can
/// share the `else` line.
fn format_if(cond: &GoExpr, then: &[GoStmt], els: Option<&Vec<GoStmt>>, tokens: &mut Tokens<Go>) {
    tokens.append(static_literal("if"));
    tokens.space();
    cond.format_into(tokens);
    tokens.space();
    format_body(then, tokens);
    if let Some(els) = els {
        tokens.space();
        tokens.append(static_literal("else"));
        tokens.space();
        if let [GoStmt::If { cond, then, els }] = els.as_slice() {
            format_if(cond, then, els.as_ref(), tokens);
        } else {
            format_body(els, tokens);
        }
    }
}

impl FormatInto<Go> for &GoStmt {
    fn format_into(self, tokens: &mut Tokens<Go>) {
        tokens.push();
        match self {
            GoStmt::DeclShort { .. } | GoStmt::Assign { .. } | GoStmt::OpAssign { .. } => {
                format_inline(self, tokens)
            }
            GoStmt::DeclShortMulti { names, value } => {
                for (i, name) in names.iter().enumerate() {
                    if i > 0 {
                        tokens.append(static_literal(","));
                        tokens.space();
                    }
                    tokens.append(ItemStr::from(name));
                }
                tokens.space();
                tokens.append(static_literal(":="));
                tokens.space();
                value.format_into(tokens);
            }
            GoStmt::DeclVar { name, ty, value } => {
                tokens.append(static_literal("var"));
                tokens.space();
                tokens.append(ItemStr::from(name));
                if let Some(ty) = ty {
                    tokens.space();
                    tokens.append(ItemStr::from(ty.to_string()));
                }
                if let Some(value) = value {
                    tokens.space();
                    tokens.append(static_literal("="));
                    tokens.space();
                    value.format_into(tokens);
                }
            }
            GoStmt::Expr(expr) => expr.format_into(tokens),
            GoStmt::Return(value) => {
                tokens.append(static_literal("return"));
                if let Some(value) = value {
                    tokens.space();
                    value.format_into(tokens);
                }
            }
            GoStmt::ReturnMulti(values) => {
                tokens.append(static_literal("return"));
                tokens.space();
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        tokens.append(static_literal(","));
                        tokens.space();
                    }
                    value.format_into(tokens);
                }
            }
            GoStmt::If { cond, then, els } => format_if(cond, then, els.as_ref(), tokens),
            GoStmt::For {
                init,
                cond,
                post,
                body,
            } => {
                tokens.append(static_literal("for"));
                match (init, cond, post) {
                    (None, None, None) => {}
                    (None, Some(cond), None) => {
                        tokens.space();
                        cond.format_into(tokens);
                    }
                    (init, cond, post) => {
                        tokens.space();
                        if let Some(init) = init {
                            format_inline(init, tokens);
                        }
                        tokens.append(static_literal(";"));
                        tokens.space();
                        if let Some(cond) = cond {
                            cond.format_into(tokens);
                        }
                        tokens.append(static_literal(";"));
                        if let Some(post) = post {
                            tokens.space();
                            format_inline(post, tokens);
                        }
                    }
                }
                tokens.space();
                format_body(body, tokens);
            }
            GoStmt::Range {
                key,
                value,
                expr,
                body,
            } => {
                tokens.append(static_literal("for"));
                tokens.space();
                tokens.append(ItemStr::from(key));
                if let Some(value) = value {
                    tokens.append(static_literal(","));
                    tokens.space();
                    tokens.append(ItemStr::from(value));
                }
                tokens.space();
                tokens.append(static_literal(":="));
                tokens.space();
                tokens.append(static_literal("range"));
                tokens.space();
                expr.format_into(tokens);
                tokens.space();
                format_body(body, tokens);
            }
            GoStmt::Break => tokens.append(static_literal("break")),
            GoStmt::Continue => tokens.append(static_literal("continue")),
            GoStmt::Block(body) => format_body(body, tokens),
            GoStmt::Comment(text) => {
                tokens.append(static_literal("//"));
                tokens.space();
                tokens.append(ItemStr::from(text));
            }
        }
    }
}

impl FormatInto<Go> for GoStmt {
    fn format_into(self, tokens: &mut Tokens<Go>) {
        (&self).format_into(tokens)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::GoStmt;
    use crate::{render_stmts, BinaryOp, GoExpr, GoType};

    #[test]
    fn test_short_decl() {
        let stmt = GoStmt::decl_short("result", GoExpr::call_named("NewFoo", vec![]));
        assert_eq!(render_stmts(&[stmt]), "result := NewFoo()");
    }

    #[test]
    fn test_three_part_for() {
        let stmt = GoStmt::For {
            init: Some(Box::new(GoStmt::decl_short("i", GoExpr::Int(0)))),
            cond: Some(GoExpr::binary(
                GoExpr::ident("i"),
                BinaryOp::Lt,
                GoExpr::Int(16),
            )),
            post: Some(Box::new(GoStmt::OpAssign {
                target: GoExpr::ident("i"),
                op: BinaryOp::Add,
                value: GoExpr::Int(1),
            })),
            body: vec![GoStmt::Expr(GoExpr::call_named(
                "process",
                vec![GoExpr::ident("i")],
            ))],
        };
        assert_eq!(
            render_stmts(&[stmt]),
            "for i := 0; i < 16; i += 1 {\n    process(i)\n}"
        );
    }

    #[test]
    fn test_infinite_for_with_break() {
        let stmt = GoStmt::loop_forever(vec![GoStmt::If {
            cond: GoExpr::unary(crate::UnaryOp::Not, GoExpr::ident("c")),
            then: vec![GoStmt::Break],
            els: None,
        }]);
        assert_eq!(render_stmts(&[stmt]), "for {\n    if !c {\n        break\n    }\n}");
    }

    #[test]
    fn test_range_loop() {
        let stmt = GoStmt::Range {
            key: "_".into(),
            value: Some("v".into()),
            expr: GoExpr::ident("xs"),
            body: vec![GoStmt::Expr(GoExpr::call_named(
                "use",
                vec![GoExpr::ident("v")],
            ))],
        };
        assert_eq!(render_stmts(&[stmt]), "for _, v := range xs {\n    use(v)\n}");
    }

    #[test]
    fn test_var_decl_with_type() {
        let stmt = GoStmt::DeclVar {
            name: "out".into(),
            ty: Some(GoType::bytes()),
            value: None,
        };
        assert_eq!(render_stmts(&[stmt]), "var out []uint8");
    }
}
