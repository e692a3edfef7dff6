//! The IL-to-Go transformer.
//!
//! A [`Transformer`] consumes one IL program tree and produces a
//! [`GoFile`] ready for rendering. It is single-threaded and carries
//! mutable symbol tables, so use one instance per input; independent
//! instances may run in parallel.
//!
//! The work is split across four cooperating subsystems:
//!
//! - the type engine ([`engine`]) resolves a Go type for any IL expression;
//! - the pre-scanner ([`prescan`]) walks each class before transformation
//!   to build stable field/method symbol tables;
//! - the node dispatcher ([`decl`], [`stmt`], [`expr`], [`calls`]) lowers
//!   IL nodes to Go AST nodes, applying the idiom rewrites;
//! - the stub generator ([`stubs`], [`helpers`], [`enums`]) emits the
//!   framework scaffolding the lowered code references.

pub mod calls;
pub mod context;
pub mod decl;
pub mod diag;
pub mod engine;
pub mod enums;
pub mod helpers;
pub mod options;
pub mod prescan;
pub mod stmt;
pub mod stubs;

mod expr;

use heck::{AsLowerCamelCase, AsUpperCamelCase};
use ingot_go::{GoDecl, GoExpr, GoFile, GoStmt};
use ingot_il::{IlKind, IlNode};

use crate::context::TransformContext;
use crate::diag::Diagnostics;
pub use crate::options::{OpCodeInfo, TransformOptions, TransformerConfig, TypeKnowledge};

/// Pascal-cases an IL identifier for use as an exported Go name.
pub fn pascal(name: &str) -> String {
    AsUpperCamelCase(name).to_string()
}

/// Camel-cases an IL identifier for use as an unexported Go name.
pub fn camel(name: &str) -> String {
    AsLowerCamelCase(name).to_string()
}

/// The IL-to-Go tree rewriter.
pub struct Transformer {
    pub(crate) options: TransformOptions,
    pub(crate) knowledge: TypeKnowledge,
    pub(crate) ctx: TransformContext,
    pub(crate) diags: Diagnostics,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(TransformerConfig::default())
    }
}

impl Transformer {
    pub fn new(config: TransformerConfig) -> Self {
        Self {
            options: config.options,
            knowledge: config.type_knowledge,
            ctx: TransformContext::new(),
            diags: Diagnostics::new(),
        }
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Warnings produced so far, in emission order.
    pub fn warnings(&self) -> &[String] {
        self.diags.warnings()
    }

    /// Lowers an IL program to a Go file.
    ///
    /// The root node must be a `Program`; anything else produces a warning
    /// and an empty file. The transformer never fails: unknown nodes warn
    /// and lower to placeholders, unknown types widen.
    pub fn transform(&mut self, program: &IlNode) -> GoFile {
        let mut user_decls: Vec<GoDecl> = Vec::new();
        let mut init_stmts: Vec<GoStmt> = Vec::new();

        match &program.kind {
            IlKind::Program { body } => {
                for node in body {
                    self.lower_top_level(node, &mut user_decls, &mut init_stmts);
                }
            }
            other => {
                self.diags
                    .warn(format!("expected Program at the root, got {}", other.name()));
            }
        }

        if !init_stmts.is_empty() {
            user_decls.push(GoDecl::Func {
                name: "init".to_string(),
                doc: None,
                params: vec![],
                results: vec![],
                body: init_stmts,
            });
        }

        let mut file = GoFile::new(self.options.package_name.clone());
        let mut decls = self.stub_decls();
        decls.extend(user_decls);
        file.decls = decls;

        let mut imports: Vec<String> = self.ctx.imports.iter().cloned().collect();
        imports.sort();
        file.imports = imports;

        // The positional context never outlives a transform call.
        self.ctx.current_struct = None;
        self.ctx.current_func = None;
        self.ctx.current_function_return_type = None;
        self.ctx.receiver_name = None;

        file
    }

    fn lower_top_level(
        &mut self,
        node: &IlNode,
        decls: &mut Vec<GoDecl>,
        init_stmts: &mut Vec<GoStmt>,
    ) {
        match &node.kind {
            IlKind::ClassDeclaration {
                name,
                super_class,
                body,
            } => {
                let (class_decls, class_init) =
                    self.lower_class(name, super_class.as_deref(), body);
                decls.extend(class_decls);
                init_stmts.extend(class_init);
            }
            IlKind::FunctionDeclaration { name, params, body } => {
                decls.push(self.lower_free_function(name, params, body));
            }
            IlKind::VariableDeclaration { declarations, .. } => {
                for declarator in declarations {
                    decls.push(self.lower_module_var(declarator));
                }
            }
            IlKind::StaticBlock { body } => {
                for stmt in body {
                    let lowered = self.lower_stmt(stmt);
                    init_stmts.extend(self.drain_pending());
                    init_stmts.extend(lowered);
                }
            }
            IlKind::ExpressionStatement { .. } => {
                let lowered = self.lower_stmt(node);
                init_stmts.extend(self.drain_pending());
                init_stmts.extend(lowered);
            }
            other => {
                self.diags.warn(format!(
                    "unhandled top-level IL node kind: {}",
                    other.name()
                ));
            }
        }
    }

    /// Reports an unhandled node and returns the `nil` placeholder that
    /// stands in for its value.
    pub(crate) fn warn_unhandled(&mut self, node: &IlNode) -> GoExpr {
        self.diags
            .warn(format!("unhandled IL node kind: {}", node.kind.name()));
        GoExpr::Nil
    }

    /// Drains statements hoisted out of expression positions (compound
    /// assignments in call arguments, expression-position assignments).
    pub(crate) fn drain_pending(&mut self) -> Vec<GoStmt> {
        std::mem::take(&mut self.ctx.pending_stmts)
    }
}

#[cfg(test)]
mod tests {
    use ingot_il::{IlKind, IlNode};
    use pretty_assertions::assert_eq;

    use super::{pascal, Transformer};

    #[test]
    fn test_pascal_casing() {
        assert_eq!(pascal("myField"), "MyField");
        assert_eq!(pascal("block_size"), "BlockSize");
        assert_eq!(pascal("sBox"), "SBox");
    }

    #[test]
    fn test_non_program_root_warns() {
        let mut transformer = Transformer::default();
        let file = transformer.transform(&IlNode::new(IlKind::BreakStatement));
        assert!(file.decls.is_empty());
        assert_eq!(transformer.warnings().len(), 1);
    }

    #[test]
    fn test_positional_context_is_cleared() {
        let mut transformer = Transformer::default();
        let program = IlNode::new(IlKind::Program { body: vec![] });
        transformer.transform(&program);
        assert!(transformer.ctx.current_struct.is_none());
        assert!(transformer.ctx.current_func.is_none());
        assert!(transformer.ctx.current_function_return_type.is_none());
    }

    #[test]
    fn test_default_package_name() {
        let mut transformer = Transformer::default();
        let program = IlNode::new(IlKind::Program { body: vec![] });
        let file = transformer.transform(&program);
        assert_eq!(file.package, "cipher");
    }
}
