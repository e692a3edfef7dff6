use genco::{
    prelude::*,
    tokens::{static_literal, ItemStr},
};

use crate::{GoExpr, GoStmt, GoType};

/// A struct field. Embedded fields carry only their type name.
#[derive(Debug, Clone, PartialEq)]
pub struct GoField {
    pub name: String,
    pub ty: GoType,
    pub embedded: bool,
}

impl GoField {
    pub fn new<T: Into<String>>(name: T, ty: GoType) -> Self {
        Self {
            name: name.into(),
            ty,
            embedded: false,
        }
    }

    pub fn embedded<T: Into<String>>(name: T) -> Self {
        Self {
            name: name.into(),
            ty: GoType::Nothing,
            embedded: true,
        }
    }
}

/// A function or method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct GoParam {
    pub name: String,
    pub ty: GoType,
}

impl GoParam {
    pub fn new<T: Into<String>>(name: T, ty: GoType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A top-level Go declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum GoDecl {
    Struct {
        name: String,
        doc: Option<String>,
        fields: Vec<GoField>,
    },
    Func {
        name: String,
        doc: Option<String>,
        params: Vec<GoParam>,
        results: Vec<GoType>,
        body: Vec<GoStmt>,
    },
    Method {
        recv_name: String,
        recv_type: String,
        name: String,
        doc: Option<String>,
        params: Vec<GoParam>,
        results: Vec<GoType>,
        body: Vec<GoStmt>,
    },
    /// `type Name Underlying`
    TypeDef {
        name: String,
        doc: Option<String>,
        underlying: GoType,
    },
    /// A `const ( … )` block
    ConstGroup {
        doc: Option<String>,
        entries: Vec<(String, Option<GoType>, GoExpr)>,
    },
    Var {
        name: String,
        doc: Option<String>,
        ty: Option<GoType>,
        value: Option<GoExpr>,
    },
    /// Pre-formatted Go source emitted as-is (helper function bodies).
    Verbatim(String),
}

impl GoDecl {
    /// The declared name, used for dedup when assembling a file.
    pub fn name(&self) -> Option<&str> {
        match self {
            GoDecl::Struct { name, .. }
            | GoDecl::Func { name, .. }
            | GoDecl::TypeDef { name, .. }
            | GoDecl::Var { name, .. } => Some(name),
            GoDecl::Method { name, .. } => Some(name),
            GoDecl::ConstGroup { .. } | GoDecl::Verbatim(_) => None,
        }
    }
}

/// Renders a declaration's doc comment, one `// ` line per source line.
fn format_doc(doc: &Option<String>, tokens: &mut Tokens<Go>) {
    if let Some(doc) = doc {
        for line in doc.lines() {
            tokens.push();
            tokens.append(static_literal("//"));
            if !line.is_empty() {
                tokens.space();
                tokens.append(ItemStr::from(line.to_string()));
            }
        }
    }
}

fn format_signature(params: &[GoParam], results: &[GoType], tokens: &mut Tokens<Go>) {
    tokens.append(static_literal("("));
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
    match results {
        [] => {}
        [single] => {
            tokens.space();
            tokens.append(ItemStr::from(single.to_string()));
        }
        many => {
            tokens.space();
            tokens.append(static_literal("("));
            for (i, result) in many.iter().enumerate() {
                if i > 0 {
                    tokens.append(static_literal(","));
                    tokens.space();
                }
                tokens.append(ItemStr::from(result.to_string()));
            }
            tokens.append(static_literal(")"));
        }
    }
}

fn format_func_body(body: &[GoStmt], tokens: &mut Tokens<Go>) {
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

impl FormatInto<Go> for &GoDecl {
    fn format_into(self, tokens: &mut Tokens<Go>) {
        match self {
            GoDecl::Struct { name, doc, fields } => {
                format_doc(doc, tokens);
                tokens.push();
                tokens.append(static_literal("type"));
                tokens.space();
                tokens.append(ItemStr::from(name));
                tokens.space();
                tokens.append(static_literal("struct"));
                tokens.space();
                tokens.append(static_literal("{"));
                tokens.indent();
                for field in fields {
                    tokens.push();
                    if field.embedded {
                        tokens.append(ItemStr::from(&field.name));
                    } else {
                        tokens.append(ItemStr::from(&field.name));
                        tokens.space();
                        tokens.append(ItemStr::from(field.ty.to_string()));
                    }
                }
                tokens.unindent();
                tokens.push();
                tokens.append(static_literal("}"));
            }
            GoDecl::Func {
                name,
                doc,
                params,
                results,
                body,
            } => {
                format_doc(doc, tokens);
                tokens.push();
                tokens.append(static_literal("func"));
                tokens.space();
                tokens.append(ItemStr::from(name));
                format_signature(params, results, tokens);
                format_func_body(body, tokens);
            }
            GoDecl::Method {
                recv_name,
                recv_type,
                name,
                doc,
                params,
                results,
                body,
            } => {
                format_doc(doc, tokens);
                tokens.push();
                tokens.append(static_literal("func"));
                tokens.space();
                tokens.append(static_literal("("));
                tokens.append(ItemStr::from(recv_name));
                tokens.space();
                tokens.append(ItemStr::from(format!("*{recv_type}")));
                tokens.append(static_literal(")"));
                tokens.space();
                tokens.append(ItemStr::from(name));
                format_signature(params, results, tokens);
                format_func_body(body, tokens);
            }
            GoDecl::TypeDef {
                name,
                doc,
                underlying,
            } => {
                format_doc(doc, tokens);
                tokens.push();
                tokens.append(static_literal("type"));
                tokens.space();
                tokens.append(ItemStr::from(name));
                tokens.space();
                tokens.append(ItemStr::from(underlying.to_string()));
            }
            GoDecl::ConstGroup { doc, entries } => {
                format_doc(doc, tokens);
                tokens.push();
                tokens.append(static_literal("const"));
                tokens.space();
                tokens.append(static_literal("("));
                tokens.indent();
                for (name, ty, value) in entries {
                    tokens.push();
                    tokens.append(ItemStr::from(name));
                    if let Some(ty) = ty {
                        tokens.space();
                        tokens.append(ItemStr::from(ty.to_string()));
                    }
                    tokens.space();
                    tokens.append(static_literal("="));
                    tokens.space();
                    value.format_into(tokens);
                }
                tokens.unindent();
                tokens.push();
                tokens.append(static_literal(")"));
            }
            GoDecl::Var {
                name,
                doc,
                ty,
                value,
            } => {
                format_doc(doc, tokens);
                tokens.push();
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
            GoDecl::Verbatim(source) => {
                for line in source.lines() {
                    tokens.push();
                    if !line.is_empty() {
                        tokens.append(ItemStr::from(line.to_string()));
                    }
                }
            }
        }
    }
}

impl FormatInto<Go> for GoDecl {
    fn format_into(self, tokens: &mut Tokens<Go>) {
        (&self).format_into(tokens)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{GoDecl, GoField, GoParam};
    use crate::{render_decl, GoExpr, GoStmt, GoType};

    #[test]
    fn test_struct_with_embedded_base() {
        let decl = GoDecl::Struct {
            name: "Foo".into(),
            doc: None,
            fields: vec![
                GoField::embedded("BlockCipherAlgorithm"),
                GoField::new("MyField", GoType::Uint32),
            ],
        };
        assert_eq!(
            render_decl(&decl),
            "type Foo struct {\n    BlockCipherAlgorithm\n    MyField uint32\n}"
        );
    }

    #[test]
    fn test_method_signature() {
        let decl = GoDecl::Method {
            recv_name: "f".into(),
            recv_type: "Foo".into(),
            name: "Result".into(),
            doc: None,
            params: vec![],
            results: vec![GoType::bytes()],
            body: vec![GoStmt::Return(Some(GoExpr::select(
                GoExpr::ident("f"),
                "Digest",
            )))],
        };
        assert_eq!(
            render_decl(&decl),
            "func (f *Foo) Result() []uint8 {\n    return f.Digest\n}"
        );
    }

    #[test]
    fn test_factory_with_error_result() {
        let decl = GoDecl::Func {
            name: "NewFoo".into(),
            doc: Some("NewFoo constructs a Foo instance.".into()),
            params: vec![GoParam::new("size", GoType::Int)],
            results: vec![GoType::pointer(GoType::named("Foo")), GoType::Error],
            body: vec![GoStmt::ReturnMulti(vec![
                GoExpr::ident("result"),
                GoExpr::Nil,
            ])],
        };
        assert_eq!(
            render_decl(&decl),
            "// NewFoo constructs a Foo instance.\nfunc NewFoo(size int) (*Foo, error) {\n    return result, nil\n}"
        );
    }

    #[test]
    fn test_const_group() {
        let decl = GoDecl::ConstGroup {
            doc: None,
            entries: vec![
                (
                    "CategoryBlock".into(),
                    Some(GoType::named("CategoryType")),
                    GoExpr::str("block"),
                ),
                ("CategoryStream".into(), None, GoExpr::str("stream")),
            ],
        };
        assert_eq!(
            render_decl(&decl),
            "const (\n    CategoryBlock CategoryType = \"block\"\n    CategoryStream = \"stream\"\n)"
        );
    }
}
