//! Loads a serialized IL tree from JSON.
//!
//! The loader is tolerant by design: optional fields default, and a node
//! whose kind is not recognized becomes [`IlKind::Unknown`] so the
//! transformer can warn and continue instead of failing the whole file.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::node::{
    DeclKeyword, Destructure, IlDeclarator, IlKind, IlLiteral, IlNode, IlParam, IlProperty,
    MethodKind,
};

/// Parses an IL program from a JSON file on disk.
pub fn parse_file(path: &Path) -> Result<IlNode> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("unable to read IL file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("invalid JSON in IL file: {}", path.display()))?;
    parse_value(&value)
}

/// Parses a single IL node from its JSON value.
pub fn parse_value(value: &Value) -> Result<IlNode> {
    let Some(object) = value.as_object() else {
        bail!("IL node must be a JSON object, got: {value}");
    };

    let kind_name = object
        .get("type")
        .or_else(|| object.get("ilNodeType"))
        .and_then(Value::as_str)
        .context("IL node is missing its `type`/`ilNodeType` tag")?;

    let result_type = str_field(value, "resultType");
    let kind = parse_kind(kind_name, value)?;
    Ok(IlNode::with_result_type(kind, result_type))
}

fn parse_kind(kind: &str, v: &Value) -> Result<IlKind> {
    Ok(match kind {
        "Program" => IlKind::Program {
            body: node_list(v, "body")?,
        },
        "ClassDeclaration" | "ClassExpression" => IlKind::ClassDeclaration {
            name: name_of(v.get("id")).unwrap_or_else(|| "Anonymous".to_string()),
            super_class: name_of(v.get("superClass")),
            body: node_list(v, "body")?,
        },
        "MethodDefinition" => {
            let method_kind = match str_field(v, "kind").as_deref() {
                Some("constructor") => MethodKind::Constructor,
                _ => MethodKind::Method,
            };
            let value = v.get("value");
            IlKind::MethodDefinition {
                name: name_of(v.get("key")).context("method definition is missing its key")?,
                kind: method_kind,
                is_static: bool_field(v, "static"),
                params: params_of(value)?,
                body: body_of(value)?,
            }
        }
        "PropertyDefinition" | "ClassProperty" => IlKind::PropertyDefinition {
            name: name_of(v.get("key")).context("property definition is missing its key")?,
            value: opt_node(v, "value")?,
            is_static: bool_field(v, "static"),
        },
        "StaticBlock" => IlKind::StaticBlock {
            body: node_list(v, "body")?,
        },
        "FunctionDeclaration" => IlKind::FunctionDeclaration {
            name: name_of(v.get("id")).context("function declaration is missing its name")?,
            params: params_of(Some(v))?,
            body: body_of(Some(v))?,
        },
        "VariableDeclaration" => {
            let keyword = match str_field(v, "kind").as_deref() {
                Some("const") => DeclKeyword::Const,
                Some("var") => DeclKeyword::Var,
                _ => DeclKeyword::Let,
            };
            let mut declarations = Vec::new();
            if let Some(list) = v.get("declarations").and_then(Value::as_array) {
                for declarator in list {
                    declarations.push(parse_declarator(declarator)?);
                }
            }
            IlKind::VariableDeclaration {
                keyword,
                declarations,
            }
        }
        "ExpressionStatement" => IlKind::ExpressionStatement {
            expression: boxed_node(v, "expression")?,
        },
        "ReturnStatement" => IlKind::ReturnStatement {
            argument: opt_node(v, "argument")?,
        },
        "IfStatement" => IlKind::IfStatement {
            test: boxed_node(v, "test")?,
            consequent: boxed_node(v, "consequent")?,
            alternate: opt_node(v, "alternate")?,
        },
        "ForStatement" => IlKind::ForStatement {
            init: opt_node(v, "init")?,
            test: opt_node(v, "test")?,
            update: opt_node(v, "update")?,
            body: boxed_node(v, "body")?,
        },
        "ForOfStatement" => IlKind::ForOfStatement {
            left: binding_name(v.get("left")).context("for-of is missing its binding")?,
            right: boxed_node(v, "right")?,
            body: boxed_node(v, "body")?,
        },
        "ForInStatement" => IlKind::ForInStatement {
            left: binding_name(v.get("left")).context("for-in is missing its binding")?,
            right: boxed_node(v, "right")?,
            body: boxed_node(v, "body")?,
        },
        "WhileStatement" => IlKind::WhileStatement {
            test: boxed_node(v, "test")?,
            body: boxed_node(v, "body")?,
        },
        "DoWhileStatement" => IlKind::DoWhileStatement {
            body: boxed_node(v, "body")?,
            test: boxed_node(v, "test")?,
        },
        "BreakStatement" => IlKind::BreakStatement,
        "ContinueStatement" => IlKind::ContinueStatement,
        "ThrowStatement" => IlKind::ThrowStatement {
            argument: boxed_node(v, "argument")?,
        },
        "TryStatement" => {
            let handler = match v.get("handler") {
                Some(handler) if !handler.is_null() => Some(node_list(handler, "body")?),
                _ => None,
            };
            let finalizer = match v.get("finalizer") {
                Some(finalizer) if !finalizer.is_null() => Some(node_list(finalizer, "body")?),
                _ => None,
            };
            IlKind::TryStatement {
                block: v
                    .get("block")
                    .map(|block| node_list(block, "body"))
                    .transpose()?
                    .unwrap_or_default(),
                handler,
                finalizer,
            }
        }
        "BlockStatement" => IlKind::BlockStatement {
            body: node_list(v, "body")?,
        },
        "AssignmentExpression" => IlKind::AssignmentExpression {
            operator: str_field(v, "operator").unwrap_or_else(|| "=".to_string()),
            left: boxed_node(v, "left")?,
            right: boxed_node(v, "right")?,
        },
        "BinaryExpression" => IlKind::BinaryExpression {
            operator: str_field(v, "operator").context("binary expression needs an operator")?,
            left: boxed_node(v, "left")?,
            right: boxed_node(v, "right")?,
        },
        "LogicalExpression" => IlKind::LogicalExpression {
            operator: str_field(v, "operator").context("logical expression needs an operator")?,
            left: boxed_node(v, "left")?,
            right: boxed_node(v, "right")?,
        },
        "UnaryExpression" => IlKind::UnaryExpression {
            operator: str_field(v, "operator").context("unary expression needs an operator")?,
            argument: boxed_node(v, "argument")?,
        },
        "UpdateExpression" => IlKind::UpdateExpression {
            operator: str_field(v, "operator").context("update expression needs an operator")?,
            prefix: bool_field(v, "prefix"),
            argument: boxed_node(v, "argument")?,
        },
        "ConditionalExpression" => IlKind::ConditionalExpression {
            test: boxed_node(v, "test")?,
            consequent: boxed_node(v, "consequent")?,
            alternate: boxed_node(v, "alternate")?,
        },
        "CallExpression" => IlKind::CallExpression {
            callee: boxed_node(v, "callee")?,
            arguments: node_list(v, "arguments")?,
        },
        "NewExpression" => IlKind::NewExpression {
            callee: name_of(v.get("callee")).context("new expression needs a callee name")?,
            arguments: node_list(v, "arguments")?,
        },
        "MemberExpression" => IlKind::MemberExpression {
            object: boxed_node(v, "object")?,
            property: boxed_node(v, "property")?,
            computed: bool_field(v, "computed"),
        },
        "Identifier" => IlKind::Identifier {
            name: str_field(v, "name").context("identifier needs a name")?,
        },
        "Literal" => parse_literal(v),
        "TemplateLiteral" => {
            let mut quasis = Vec::new();
            if let Some(list) = v.get("quasis").and_then(Value::as_array) {
                for quasi in list {
                    // Accept both raw strings and ESTree-style quasi objects.
                    if let Some(text) = quasi.as_str() {
                        quasis.push(text.to_string());
                    } else if let Some(cooked) = quasi.pointer("/value/cooked") {
                        quasis.push(cooked.as_str().unwrap_or_default().to_string());
                    }
                }
            }
            IlKind::TemplateLiteral {
                quasis,
                expressions: node_list(v, "expressions")?,
            }
        }
        "ArrayExpression" => IlKind::ArrayExpression {
            elements: node_list(v, "elements")?,
            element_type: str_field(v, "elementType"),
        },
        "ObjectExpression" => {
            let mut properties = Vec::new();
            if let Some(list) = v.get("properties").and_then(Value::as_array) {
                for property in list {
                    let key = name_of(property.get("key"))
                        .context("object property is missing its key")?;
                    let value = parse_value(
                        property
                            .get("value")
                            .context("object property is missing its value")?,
                    )?;
                    properties.push(IlProperty { key, value });
                }
            }
            IlKind::ObjectExpression { properties }
        }
        "SpreadElement" => IlKind::SpreadElement {
            argument: boxed_node(v, "argument")?,
        },
        "FunctionExpression" | "ArrowFunctionExpression" => {
            // Arrow functions may carry a bare expression body.
            let body_value = v.get("body");
            let is_expression_body = body_value
                .and_then(|body| body.get("type").or_else(|| body.get("ilNodeType")))
                .and_then(Value::as_str)
                .map(|tag| tag != "BlockStatement")
                .unwrap_or(false);
            if is_expression_body {
                IlKind::FunctionExpression {
                    params: params_of(Some(v))?,
                    body: Vec::new(),
                    expression: Some(Box::new(parse_value(body_value.unwrap())?)),
                }
            } else {
                IlKind::FunctionExpression {
                    params: params_of(Some(v))?,
                    body: body_of(Some(v))?,
                    expression: None,
                }
            }
        }
        "ThisExpression" => IlKind::ThisExpression,
        "Super" | "SuperExpression" => IlKind::SuperExpression,
        "TypeConversion" => IlKind::TypeConversion {
            target: str_field(v, "target")
                .or_else(|| str_field(v, "targetType"))
                .context("type conversion needs a target type")?,
            value: boxed_node(v, "value")?,
        },
        "PackBytes" => IlKind::PackBytes {
            bits: bits_of(v),
            big_endian: endian_of(v),
            args: node_list(v, "args")?,
        },
        "UnpackBytes" => IlKind::UnpackBytes {
            bits: bits_of(v),
            big_endian: endian_of(v),
            value: boxed_node(v, "value")?,
        },
        "RotateLeft" => IlKind::RotateLeft {
            bits: bits_of(v),
            value: boxed_node(v, "value")?,
            count: boxed_node(v, "count")?,
        },
        "RotateRight" => IlKind::RotateRight {
            bits: bits_of(v),
            value: boxed_node(v, "value")?,
            count: boxed_node(v, "count")?,
        },
        "ArrayAppend" => IlKind::ArrayAppend {
            target: boxed_node(v, "target")?,
            value: boxed_node(v, "value")?,
        },
        "HexDecode" => IlKind::HexDecode {
            value: boxed_node(v, "value")?,
        },
        "ErrorCreation" => IlKind::ErrorCreation {
            message: boxed_node(v, "message")?,
        },
        other => IlKind::Unknown(other.to_string()),
    })
}

fn parse_literal(v: &Value) -> IlKind {
    let raw = str_field(v, "raw");
    let value = match v.get("value") {
        None | Some(Value::Null) => {
            // `0n` and friends arrive with a null value and a raw spelling.
            if let Some(raw) = raw.as_deref() {
                if let Some(digits) = raw.strip_suffix('n') {
                    return IlKind::Literal {
                        value: IlLiteral::BigInt(digits.to_string()),
                        raw: Some(raw.to_string()),
                    };
                }
            }
            IlLiteral::Null
        }
        Some(Value::Bool(b)) => IlLiteral::Bool(*b),
        Some(Value::Number(n)) => {
            if let Some(int) = n.as_i64() {
                IlLiteral::Int(int)
            } else {
                IlLiteral::Float(n.as_f64().unwrap_or_default())
            }
        }
        Some(Value::String(s)) => IlLiteral::Str(s.clone()),
        Some(other) => IlLiteral::Str(other.to_string()),
    };
    IlKind::Literal { value, raw }
}

fn parse_declarator(v: &Value) -> Result<IlDeclarator> {
    let name = name_of(v.get("id"))
        .or_else(|| str_field(v, "name"))
        .context("variable declarator is missing its name")?;
    let destructure = if bool_field(v, "destructureTemp") {
        Some(Destructure::Temp)
    } else if let Some(element) = v.get("destructuredElement") {
        Some(Destructure::Element {
            source: str_field(element, "source").unwrap_or_default(),
            index: element
                .get("index")
                .and_then(Value::as_u64)
                .unwrap_or_default() as usize,
        })
    } else {
        v.get("destructuredProperty").map(|property| {
            Destructure::Property {
                source: str_field(property, "source").unwrap_or_default(),
                key: str_field(property, "key").unwrap_or_default(),
            }
        })
    };
    Ok(IlDeclarator {
        name,
        init: opt_node(v, "init")?.map(|node| *node),
        destructure,
    })
}

// Small field accessors. They all treat JSON null the same as absent.

fn str_field(v: &Value, key: &str) -> Option<String> {
    v.get(key).and_then(Value::as_str).map(str::to_string)
}

fn bool_field(v: &Value, key: &str) -> bool {
    v.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn bits_of(v: &Value) -> u8 {
    v.get("bits").and_then(Value::as_u64).unwrap_or(32) as u8
}

fn endian_of(v: &Value) -> bool {
    if let Some(big) = v.get("bigEndian").and_then(Value::as_bool) {
        return big;
    }
    matches!(v.get("endian").and_then(Value::as_str), Some("big"))
}

/// Extracts an identifier name from either a bare string or an object with a
/// `name` field.
fn name_of(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) => Some(s.clone()),
        object @ Value::Object(_) => str_field(object, "name"),
        _ => None,
    }
}

/// Extracts the bound name of a for-of/for-in left side, which is either a
/// plain identifier or a single-declarator variable declaration.
fn binding_name(v: Option<&Value>) -> Option<String> {
    let v = v?;
    if let Some(name) = name_of(Some(v)) {
        return Some(name);
    }
    let declarator = v.get("declarations")?.as_array()?.first()?;
    name_of(declarator.get("id"))
}

fn node_list(v: &Value, key: &str) -> Result<Vec<IlNode>> {
    let Some(field) = v.get(key) else {
        return Ok(Vec::new());
    };
    // A block statement in body position flattens to its statements.
    if let Some(body) = field.get("body").filter(|body| body.is_array()) {
        return node_list_from(body.as_array().unwrap());
    }
    match field.as_array() {
        Some(list) => node_list_from(list),
        None => Ok(Vec::new()),
    }
}

fn node_list_from(list: &[Value]) -> Result<Vec<IlNode>> {
    let mut nodes = Vec::with_capacity(list.len());
    for item in list {
        if item.is_null() {
            continue;
        }
        nodes.push(parse_value(item)?);
    }
    Ok(nodes)
}

fn boxed_node(v: &Value, key: &str) -> Result<Box<IlNode>> {
    let field = v
        .get(key)
        .with_context(|| format!("IL node is missing its `{key}` child"))?;
    Ok(Box::new(parse_value(field)?))
}

fn opt_node(v: &Value, key: &str) -> Result<Option<Box<IlNode>>> {
    match v.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(field) => Ok(Some(Box::new(parse_value(field)?))),
    }
}

/// Returns the params and body of a function-shaped JSON node.
fn params_of(v: Option<&Value>) -> Result<Vec<IlParam>> {
    let Some(list) = v.and_then(|v| v.get("params")).and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    let mut params = Vec::with_capacity(list.len());
    for param in list {
        let name = name_of(Some(param)).context("function parameter is missing its name")?;
        params.push(IlParam {
            name,
            result_type: str_field(param, "resultType"),
        });
    }
    Ok(params)
}

fn body_of(v: Option<&Value>) -> Result<Vec<IlNode>> {
    match v {
        Some(v) => node_list(v, "body"),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::parse_value;
    use crate::node::{DeclKeyword, IlKind, IlLiteral, MethodKind};

    #[test]
    fn test_parse_program_with_class() {
        let value = json!({
            "type": "Program",
            "body": [{
                "type": "ClassDeclaration",
                "id": {"type": "Identifier", "name": "Foo"},
                "superClass": {"type": "Identifier", "name": "BlockCipherAlgorithm"},
                "body": [{
                    "type": "MethodDefinition",
                    "kind": "constructor",
                    "key": {"type": "Identifier", "name": "constructor"},
                    "value": {"type": "FunctionExpression", "params": [], "body": {"type": "BlockStatement", "body": []}}
                }]
            }]
        });

        let node = parse_value(&value).unwrap();
        let IlKind::Program { body } = &node.kind else {
            panic!("expected program, got {:?}", node.kind)
        };
        let IlKind::ClassDeclaration {
            name,
            super_class,
            body: class_body,
        } = &body[0].kind
        else {
            panic!("expected class declaration")
        };
        assert_eq!(name, "Foo");
        assert_eq!(super_class.as_deref(), Some("BlockCipherAlgorithm"));
        let IlKind::MethodDefinition { kind, .. } = &class_body[0].kind else {
            panic!("expected method definition")
        };
        assert_eq!(*kind, MethodKind::Constructor);
    }

    #[test]
    fn test_parse_accepts_il_node_type_tag() {
        let value = json!({"ilNodeType": "Identifier", "name": "state", "resultType": "uint8[]"});
        let node = parse_value(&value).unwrap();
        assert_eq!(node.result_type.as_deref(), Some("uint8[]"));
        assert_eq!(node.kind, IlKind::Identifier { name: "state".into() });
    }

    #[test]
    fn test_parse_bigint_literal() {
        let value = json!({"type": "Literal", "value": null, "raw": "123n"});
        let node = parse_value(&value).unwrap();
        let IlKind::Literal { value, .. } = node.kind else {
            panic!("expected literal")
        };
        assert_eq!(value, IlLiteral::BigInt("123".into()));
    }

    #[test]
    fn test_parse_variable_declaration_keyword() {
        let value = json!({
            "type": "VariableDeclaration",
            "kind": "const",
            "declarations": [
                {"type": "VariableDeclarator", "id": {"name": "k"}, "init": {"type": "Literal", "value": 7}}
            ]
        });
        let node = parse_value(&value).unwrap();
        let IlKind::VariableDeclaration {
            keyword,
            declarations,
        } = node.kind
        else {
            panic!("expected variable declaration")
        };
        assert_eq!(keyword, DeclKeyword::Const);
        assert_eq!(declarations.len(), 1);
        assert_eq!(declarations[0].name, "k");
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let value = json!({"type": "YieldExpression", "argument": null});
        let node = parse_value(&value).unwrap();
        assert_eq!(node.kind, IlKind::Unknown("YieldExpression".into()));
    }

    #[test]
    fn test_parse_pack_bytes() {
        let value = json!({
            "type": "PackBytes",
            "bits": 32,
            "endian": "big",
            "args": [
                {"type": "Identifier", "name": "b0"},
                {"type": "Identifier", "name": "b1"},
                {"type": "Identifier", "name": "b2"},
                {"type": "Identifier", "name": "b3"}
            ]
        });
        let node = parse_value(&value).unwrap();
        let IlKind::PackBytes {
            bits,
            big_endian,
            args,
        } = node.kind
        else {
            panic!("expected pack bytes")
        };
        assert_eq!(bits, 32);
        assert!(big_endian);
        assert_eq!(args.len(), 4);
    }
}
