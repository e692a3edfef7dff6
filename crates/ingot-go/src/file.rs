use anyhow::Context;
use genco::{
    lang::go,
    prelude::*,
    tokens::{quoted, static_literal, ItemStr},
};

use crate::GoDecl;

/// A complete Go source file: package clause, import block and declarations.
///
/// The transformer owns the import list (packages are recorded while nodes
/// are lowered), so imports are rendered explicitly rather than through
/// genco's import resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct GoFile {
    pub package: String,
    pub imports: Vec<String>,
    pub decls: Vec<GoDecl>,
}

impl GoFile {
    pub fn new<T: Into<String>>(package: T) -> Self {
        Self {
            package: package.into(),
            imports: Vec::new(),
            decls: Vec::new(),
        }
    }

    /// Renders the file to Go source with tab indentation.
    pub fn render(&self) -> anyhow::Result<String> {
        let mut tokens = Tokens::<Go>::new();

        if !self.imports.is_empty() {
            tokens.push();
            tokens.append(static_literal("import"));
            tokens.space();
            tokens.append(static_literal("("));
            tokens.indent();
            for import in &self.imports {
                tokens.push();
                quoted(ItemStr::from(import)).format_into(&mut tokens);
            }
            tokens.unindent();
            tokens.push();
            tokens.append(static_literal(")"));
        }

        for decl in &self.decls {
            tokens.line();
            decl.format_into(&mut tokens);
        }

        let mut writer = genco::fmt::FmtWriter::new(String::new());
        let fmt =
            genco::fmt::Config::from_lang::<Go>().with_indentation(genco::fmt::Indentation::Tab);
        let config = go::Config::default().with_package(self.package.clone());
        tokens
            .format_file(&mut writer.as_formatter(&fmt), &config)
            .context("failed to format Go file")?;
        Ok(writer.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::GoFile;
    use crate::{GoDecl, GoExpr, GoType};

    #[test]
    fn test_render_package_and_imports() {
        let mut file = GoFile::new("cipher");
        file.imports.push("fmt".to_string());
        file.imports.push("math/bits".to_string());
        file.decls.push(GoDecl::Var {
            name: "answer".into(),
            doc: None,
            ty: Some(GoType::Uint32),
            value: Some(GoExpr::Int(42)),
        });

        let out = file.render().unwrap();
        assert!(out.starts_with("package cipher"));
        assert!(out.contains("import ("));
        assert!(out.contains("\"fmt\""));
        assert!(out.contains("\"math/bits\""));
        assert!(out.contains("var answer uint32 = 42"));
    }

    #[test]
    fn test_render_empty_file() {
        let file = GoFile::new("cipher");
        let out = file.render().unwrap();
        assert_eq!(out.trim_end(), "package cipher");
    }
}
