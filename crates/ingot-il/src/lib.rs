//! The language-agnostic IL that the transformer consumes, plus the JSON
//! loader for trees serialized by the upstream front end.

pub mod node;
pub mod parse;

pub use node::{
    DeclKeyword, Destructure, IlDeclarator, IlKind, IlLiteral, IlNode, IlParam, IlProperty,
    MethodKind,
};
pub use parse::{parse_file, parse_value};
