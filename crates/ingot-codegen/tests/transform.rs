//! End-to-end tests: IL JSON in, rendered Go source out.

use ingot_codegen::Transformer;
use ingot_il::parse_value;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn lower(program: &Value) -> String {
    let node = parse_value(program).expect("IL should parse");
    let mut transformer = Transformer::default();
    let file = transformer.transform(&node);
    file.render().expect("rendering should succeed")
}

fn ident(name: &str) -> Value {
    json!({"type": "Identifier", "name": name})
}

fn literal(value: Value) -> Value {
    json!({"type": "Literal", "value": value})
}

fn this_member(field: &str) -> Value {
    json!({
        "type": "MemberExpression",
        "object": {"type": "ThisExpression"},
        "property": ident(field),
        "computed": false
    })
}

fn assign_this(field: &str, value: Value) -> Value {
    json!({
        "type": "ExpressionStatement",
        "expression": {
            "type": "AssignmentExpression",
            "operator": "=",
            "left": this_member(field),
            "right": value
        }
    })
}

fn constructor(body: Vec<Value>) -> Value {
    json!({
        "type": "MethodDefinition",
        "kind": "constructor",
        "key": ident("constructor"),
        "value": {
            "type": "FunctionExpression",
            "params": [],
            "body": {"type": "BlockStatement", "body": body}
        }
    })
}

fn method(name: &str, params: Vec<Value>, body: Vec<Value>) -> Value {
    json!({
        "type": "MethodDefinition",
        "kind": "method",
        "key": ident(name),
        "value": {
            "type": "FunctionExpression",
            "params": params,
            "body": {"type": "BlockStatement", "body": body}
        }
    })
}

fn class(name: &str, super_class: Option<&str>, body: Vec<Value>) -> Value {
    let super_value = match super_class {
        Some(super_class) => ident(super_class),
        None => Value::Null,
    };
    json!({
        "type": "ClassDeclaration",
        "id": ident(name),
        "superClass": super_value,
        "body": body
    })
}

fn program(body: Vec<Value>) -> Value {
    json!({"type": "Program", "body": body})
}

#[test]
fn inheritance_with_field_override() {
    let input = program(vec![class(
        "Foo",
        Some("BlockCipherAlgorithm"),
        vec![constructor(vec![
            assign_this("name", literal(json!("Foo"))),
            assign_this("tests", json!({"type": "ArrayExpression", "elements": []})),
            assign_this("myField", literal(json!(42))),
        ])],
    )]);

    let out = lower(&input);

    assert!(out.contains("type Foo struct"), "{out}");
    assert!(out.contains("BlockCipherAlgorithm\n"), "{out}");
    assert!(out.contains("MyField uint32"), "{out}");
    assert!(out.contains("func NewFoo() *Foo"), "{out}");
    assert!(out.contains("result := &Foo{}"), "{out}");
    assert!(out.contains("result.Name = \"Foo\""), "{out}");
    assert!(out.contains("result.Tests = []TestCase{}"), "{out}");
    assert!(out.contains("result.MyField = 42"), "{out}");
    // Name and Tests live on the embedded base, not on Foo.
    let foo_struct = out
        .split("type Foo struct")
        .nth(1)
        .and_then(|rest| rest.split('}').next())
        .expect("Foo struct body");
    assert!(!foo_struct.contains("Name"), "{foo_struct}");
    assert!(!foo_struct.contains("Tests"), "{foo_struct}");

    // Selecting a block base forces the whole framework suite.
    assert!(out.contains("type BaseAlgorithm struct"), "{out}");
    assert!(out.contains("type BlockCipherAlgorithm struct"), "{out}");
    assert!(out.contains("type CategoryType string"), "{out}");
    assert!(out.contains("type SecurityStatus string"), "{out}");
    assert!(out.contains("type ComplexityType string"), "{out}");
    assert!(out.contains("type CountryCode string"), "{out}");
    assert!(out.contains("type KeySize struct"), "{out}");
    assert!(out.contains("type TestCase struct"), "{out}");
}

#[test]
fn forward_method_reference_types_first_emission() {
    let input = program(vec![class(
        "Cipher",
        None,
        vec![
            constructor(vec![assign_this(
                "buffer",
                json!({
                    "type": "ArrayExpression",
                    "elements": [literal(json!(1)), literal(json!(2)), literal(json!(3))]
                }),
            )]),
            method(
                "result",
                vec![],
                vec![json!({
                    "type": "ReturnStatement",
                    "argument": {
                        "type": "CallExpression",
                        "callee": this_member("_encrypt"),
                        "arguments": []
                    }
                })],
            ),
            method(
                "_encrypt",
                vec![],
                vec![json!({
                    "type": "ReturnStatement",
                    "argument": this_member("buffer")
                })],
            ),
        ],
    )]);

    let out = lower(&input);
    assert!(out.contains("func (c *Cipher) Result() []uint8"), "{out}");
    assert!(out.contains("return c.Encrypt()"), "{out}");
    assert!(out.contains("func (c *Cipher) Encrypt() []uint8"), "{out}");
}

#[test]
fn loop_counter_stays_int_and_condition_converts() {
    let input = program(vec![class(
        "Tea",
        None,
        vec![
            constructor(vec![assign_this("delta", literal(json!(2654435769i64)))]),
            method(
                "rounds",
                vec![],
                vec![json!({
                    "type": "ForStatement",
                    "init": {
                        "type": "VariableDeclaration",
                        "kind": "let",
                        "declarations": [{
                            "type": "VariableDeclarator",
                            "id": ident("i"),
                            "init": literal(json!(0))
                        }]
                    },
                    "test": {
                        "type": "BinaryExpression",
                        "operator": "<",
                        "left": ident("i"),
                        "right": this_member("delta")
                    },
                    "update": {
                        "type": "UpdateExpression",
                        "operator": "++",
                        "prefix": false,
                        "argument": ident("i")
                    },
                    "body": {"type": "BlockStatement", "body": []}
                })],
            ),
        ],
    )]);

    let out = lower(&input);
    assert!(out.contains("for i := 0; i < int(t.Delta); i += 1 {"), "{out}");
}

#[test]
fn typeof_probe_keeps_parameter_polymorphic() {
    let input = program(vec![class(
        "Loader",
        None,
        vec![method(
            "feed",
            vec![ident("value")],
            vec![json!({
                "type": "IfStatement",
                "test": {
                    "type": "BinaryExpression",
                    "operator": "===",
                    "left": {
                        "type": "UnaryExpression",
                        "operator": "typeof",
                        "argument": ident("value")
                    },
                    "right": literal(json!("string"))
                },
                "consequent": {"type": "BlockStatement", "body": [
                    {"type": "ReturnStatement", "argument": null}
                ]},
                "alternate": null
            })],
        )],
    )]);

    let out = lower(&input);
    assert!(out.contains("func (l *Loader) Feed(value any)"), "{out}");
    assert!(out.contains("if isTypeString(value) {"), "{out}");
    assert!(out.contains("func isTypeString(v interface{}) bool"), "{out}");
}

#[test]
fn self_referencing_object_literal_builds_map_iife() {
    let input = program(vec![json!({
        "type": "VariableDeclaration",
        "kind": "const",
        "declarations": [{
            "type": "VariableDeclarator",
            "id": ident("m"),
            "init": {
                "type": "ObjectExpression",
                "properties": [{
                    "key": ident("gen"),
                    "value": {
                        "type": "FunctionExpression",
                        "params": [],
                        "body": {"type": "BlockStatement", "body": [
                            assign_this_state_increment(),
                            {"type": "ReturnStatement", "argument": this_member("state")}
                        ]}
                    }
                }]
            }
        }]
    })]);

    let out = lower(&input);
    assert!(out.contains("var m = func() map[string]interface{} {"), "{out}");
    assert!(out.contains("s := make(map[string]interface{})"), "{out}");
    assert!(out.contains("s[\"gen\"] = func() any {"), "{out}");
    assert!(out.contains("s[\"state\"]"), "{out}");
    assert!(out.contains("return s"), "{out}");
    assert!(out.contains("}()"), "{out}");
}

fn assign_this_state_increment() -> Value {
    json!({
        "type": "ExpressionStatement",
        "expression": {
            "type": "AssignmentExpression",
            "operator": "=",
            "left": this_member("state"),
            "right": {
                "type": "BinaryExpression",
                "operator": "+",
                "left": this_member("state"),
                "right": literal(json!(1))
            }
        }
    })
}

#[test]
fn array_from_with_length_builds_sized_slice() {
    let input = program(vec![json!({
        "type": "VariableDeclaration",
        "kind": "const",
        "declarations": [{
            "type": "VariableDeclarator",
            "id": ident("xs"),
            "init": {
                "type": "CallExpression",
                "callee": {
                    "type": "MemberExpression",
                    "object": ident("Array"),
                    "property": ident("from"),
                    "computed": false
                },
                "arguments": [
                    {
                        "type": "ObjectExpression",
                        "properties": [{"key": ident("length"), "value": literal(json!(4))}]
                    },
                    {
                        "type": "ArrowFunctionExpression",
                        "params": [ident("_"), ident("i")],
                        "body": {
                            "type": "BinaryExpression",
                            "operator": "*",
                            "left": ident("i"),
                            "right": literal(json!(2))
                        }
                    }
                ]
            }
        }]
    })]);

    let out = lower(&input);
    assert!(out.contains("make([]any, 4)"), "{out}");
    assert!(out.contains("r[i] = i * 2"), "{out}");
    assert!(out.contains("return r"), "{out}");
}

#[test]
fn empty_class_still_gets_factory() {
    let input = program(vec![class("Empty", None, vec![])]);
    let out = lower(&input);
    assert!(out.contains("type Empty struct"), "{out}");
    assert!(out.contains("func NewEmpty() *Empty"), "{out}");
    assert!(out.contains("result := &Empty{}"), "{out}");
    assert!(out.contains("return result"), "{out}");
}

#[test]
fn empty_array_infers_element_type_from_push() {
    let input = program(vec![class(
        "Keyed",
        None,
        vec![method(
            "schedule",
            vec![],
            vec![
                json!({
                    "type": "VariableDeclaration",
                    "kind": "const",
                    "declarations": [{
                        "type": "VariableDeclarator",
                        "id": ident("acc"),
                        "init": {"type": "ArrayExpression", "elements": []}
                    }]
                }),
                json!({
                    "type": "ExpressionStatement",
                    "expression": {
                        "type": "CallExpression",
                        "callee": {
                            "type": "MemberExpression",
                            "object": ident("acc"),
                            "property": ident("push"),
                            "computed": false
                        },
                        "arguments": [literal(json!(5))]
                    }
                }),
                json!({"type": "ReturnStatement", "argument": ident("acc")}),
            ],
        )],
    )]);

    let out = lower(&input);
    assert!(out.contains("acc := []uint8{}"), "{out}");
    assert!(out.contains("acc = append(acc, 5)"), "{out}");
    assert!(out.contains("func (k *Keyed) Schedule() []uint8"), "{out}");
}

#[test]
fn assignment_in_loop_condition_hoists_with_break() {
    let input = program(vec![class(
        "Pump",
        None,
        vec![
            method(
                "next",
                vec![],
                vec![json!({"type": "ReturnStatement", "argument": literal(json!(0))})],
            ),
            method(
                "drain",
                vec![],
                vec![
                    json!({
                        "type": "VariableDeclaration",
                        "kind": "let",
                        "declarations": [{
                            "type": "VariableDeclarator",
                            "id": ident("b"),
                            "init": literal(json!(0))
                        }]
                    }),
                    json!({
                        "type": "WhileStatement",
                        "test": {
                            "type": "AssignmentExpression",
                            "operator": "=",
                            "left": ident("b"),
                            "right": {
                                "type": "CallExpression",
                                "callee": this_member("next"),
                                "arguments": []
                            }
                        },
                        "body": {"type": "BlockStatement", "body": []}
                    }),
                ],
            ),
        ],
    )]);

    let out = lower(&input);
    assert!(out.contains("for {"), "{out}");
    assert!(out.contains("b = p.Next()"), "{out}");
    assert!(out.contains("if b == 0 {"), "{out}");
    assert!(out.contains("break"), "{out}");
}

#[test]
fn typed_array_from_existing_slice_clones() {
    let input = program(vec![class(
        "Copier",
        None,
        vec![method(
            "run",
            vec![ident("data")],
            vec![json!({
                "type": "ReturnStatement",
                "argument": {
                    "type": "NewExpression",
                    "callee": ident("Uint8Array"),
                    "arguments": [ident("data")]
                }
            })],
        )],
    )]);

    let out = lower(&input);
    assert!(out.contains("append([]uint8{}, data...)"), "{out}");
    assert!(!out.contains("make([]uint8, len(data))"), "{out}");
}

#[test]
fn negative_slice_bound_counts_from_end() {
    let input = program(vec![class(
        "Trim",
        None,
        vec![method(
            "cut",
            vec![ident("data")],
            vec![json!({
                "type": "ReturnStatement",
                "argument": {
                    "type": "CallExpression",
                    "callee": {
                        "type": "MemberExpression",
                        "object": ident("data"),
                        "property": ident("slice"),
                        "computed": false
                    },
                    "arguments": [
                        literal(json!(0)),
                        {"type": "UnaryExpression", "operator": "-", "argument": literal(json!(4))}
                    ]
                }
            })],
        )],
    )]);

    let out = lower(&input);
    assert!(out.contains("data[0:len(data) - 4]"), "{out}");
}

#[test]
fn throw_panics_and_try_keeps_block() {
    let input = program(vec![class(
        "Strict",
        None,
        vec![method(
            "check",
            vec![],
            vec![json!({
                "type": "TryStatement",
                "block": {"type": "BlockStatement", "body": [{
                    "type": "ThrowStatement",
                    "argument": {
                        "type": "ErrorCreation",
                        "message": literal(json!("bad state"))
                    }
                }]},
                "handler": {"type": "CatchClause", "body": {"type": "BlockStatement", "body": []}},
                "finalizer": null
            })],
        )],
    )]);

    let out = lower(&input);
    assert!(out.contains("panic(errors.New(\"bad state\"))"), "{out}");
    assert!(out.contains("\"errors\""), "{out}");
    assert!(out.contains("// translated try/catch"), "{out}");
}

#[test]
fn register_algorithm_call_lands_in_init() {
    let input = program(vec![
        class("Noop", Some("StreamCipherAlgorithm"), vec![constructor(vec![])]),
        json!({
            "type": "ExpressionStatement",
            "expression": {
                "type": "CallExpression",
                "callee": ident("RegisterAlgorithm"),
                "arguments": [{
                    "type": "NewExpression",
                    "callee": ident("Noop"),
                    "arguments": []
                }]
            }
        }),
    ]);

    let out = lower(&input);
    assert!(out.contains("func init() {"), "{out}");
    assert!(out.contains("RegisterAlgorithm(&Noop{})"), "{out}");
    assert!(out.contains("func RegisterAlgorithm(algorithm interface{})"), "{out}");
}

#[test]
fn math_min_picks_the_operand_width_helper() {
    let input = program(vec![class(
        "Limiter",
        None,
        vec![method(
            "clamp",
            vec![ident("w")],
            vec![json!({
                "type": "ReturnStatement",
                "argument": {
                    "type": "CallExpression",
                    "callee": {
                        "type": "MemberExpression",
                        "object": ident("Math"),
                        "property": ident("min"),
                        "computed": false
                    },
                    "arguments": [
                        {"type": "TypeConversion", "target": "int16", "value": ident("w")},
                        literal(json!(5))
                    ]
                }
            })],
        )],
    )]);

    let out = lower(&input);
    assert!(out.contains("minInt16("), "{out}");
    assert!(out.contains("func minInt16(a, b int16) int16"), "{out}");
    assert!(out.contains("func (l *Limiter) Clamp(w any) int16"), "{out}");
}

#[test]
fn transforming_twice_is_deterministic() {
    let input = program(vec![class(
        "Foo",
        Some("BlockCipherAlgorithm"),
        vec![constructor(vec![
            assign_this("name", literal(json!("Foo"))),
            assign_this("delta", literal(json!(2654435769i64))),
        ])],
    )]);

    let first = lower(&input);
    let second = lower(&input);
    assert_eq!(first, second);
}

#[test]
fn unknown_node_warns_and_keeps_going() {
    let node = parse_value(&program(vec![class(
        "Odd",
        None,
        vec![method(
            "spin",
            vec![],
            vec![json!({
                "type": "ExpressionStatement",
                "expression": {"type": "YieldExpression", "argument": null}
            })],
        )],
    )]))
    .unwrap();

    let mut transformer = Transformer::default();
    let file = transformer.transform(&node);
    assert!(!transformer.warnings().is_empty());
    assert!(transformer.warnings()[0].contains("YieldExpression"));
    // The rest of the class still lowers.
    assert!(file.render().unwrap().contains("func NewOdd() *Odd"));
}

#[test]
fn enum_references_normalize() {
    let input = program(vec![class(
        "Meta",
        Some("HashFunctionAlgorithm"),
        vec![constructor(vec![
            assign_this(
                "securityStatus",
                json!({
                    "type": "MemberExpression",
                    "object": ident("SecurityStatus"),
                    "property": ident("INSECURE"),
                    "computed": false
                }),
            ),
            assign_this(
                "country",
                json!({
                    "type": "MemberExpression",
                    "object": ident("CountryCode"),
                    "property": ident("SINGAPORE"),
                    "computed": false
                }),
            ),
        ])],
    )]);

    let out = lower(&input);
    assert!(out.contains("result.SecurityStatus = SecurityBroken"), "{out}");
    assert!(out.contains("result.Country = CountrySG"), "{out}");
    assert!(out.contains("SecurityBroken SecurityStatus = \"broken\""), "{out}");
}

#[test]
fn unsigned_shift_converts_to_uint32() {
    let input = program(vec![class(
        "Shifter",
        None,
        vec![method(
            "mix",
            vec![],
            vec![
                json!({
                    "type": "VariableDeclaration",
                    "kind": "let",
                    "declarations": [{
                        "type": "VariableDeclarator",
                        "id": ident("n"),
                        "init": literal(json!(0))
                    }]
                }),
                json!({
                    "type": "ReturnStatement",
                    "argument": {
                        "type": "BinaryExpression",
                        "operator": ">>>",
                        "left": ident("n"),
                        "right": literal(json!(3))
                    }
                }),
            ],
        )],
    )]);

    let out = lower(&input);
    assert!(out.contains("uint32(n) >> 3"), "{out}");
}
