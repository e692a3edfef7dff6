//! Representations of Go types, expressions, statements and declarations,
//! and implementations for formatting them.

pub mod decl;
pub mod expr;
pub mod file;
pub mod identifier;
pub mod stmt;
pub mod types;

pub use decl::{GoDecl, GoField, GoParam};
pub use expr::{BinaryOp, CompositeElem, GoExpr, UnaryOp};
pub use file::GoFile;
pub use identifier::{escape_builtin, GoIdentifier};
pub use stmt::GoStmt;
pub use types::GoType;

// Re-export genco types that are commonly used
pub use genco::{lang::Go, quote, Tokens};

use genco::prelude::FormatInto;

/// Renders a single expression to a string, for tests and diagnostics.
pub fn render_expr(expr: &GoExpr) -> String {
    let mut tokens = Tokens::<Go>::new();
    expr.format_into(&mut tokens);
    tokens.to_string().expect("expression should format")
}

/// Renders a statement list to a string, for tests and diagnostics.
pub fn render_stmts(stmts: &[GoStmt]) -> String {
    let mut tokens = Tokens::<Go>::new();
    for stmt in stmts {
        stmt.format_into(&mut tokens);
    }
    tokens.to_string().expect("statements should format")
}

/// Renders a single declaration to a string, for tests and diagnostics.
pub fn render_decl(decl: &GoDecl) -> String {
    let mut tokens = Tokens::<Go>::new();
    decl.format_into(&mut tokens);
    tokens.to_string().expect("declaration should format")
}
