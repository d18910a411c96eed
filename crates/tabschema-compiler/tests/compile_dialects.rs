//! End-to-end compilation of each dialect, from a serialized parse tree to
//! row validation.

use serde_json::{json, Value};
use tabschema_compiler::{
    compile, CompileError, Compiler, CompilerConfig, Dialect, RowMode, SchemaError, Visibility,
};
use tabschema_core::{ParseNode, RegistryError, RegistryNamespace, Row, StructuralError};
use tabschema_validators::ValidatorKind;

fn tree(value: Value) -> ParseNode {
    serde_json::from_value(value).unwrap()
}

fn row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn node(kind: &str, children: Value) -> Value {
    json!({ "kind": kind, "children": children })
}

fn leaf_node(kind: &str, token: &str) -> Value {
    node(kind, json!([token]))
}

// ---------------------------------------------------------------------------
// Direct columns
// ---------------------------------------------------------------------------

fn variable(name: &str, ty: &str) -> Value {
    node(
        "attribute",
        json!([node("variable", json!([leaf_node("var", name), leaf_node("type", ty)]))]),
    )
}

fn direct_tree() -> ParseNode {
    tree(node(
        "start",
        json!([
            node(
                "class",
                json!([
                    leaf_node("class_name", "users"),
                    variable("id", "uuid"),
                    variable("age", "tinyint"),
                ])
            ),
            node("class", json!([leaf_node("class_name", "events"), variable("at", "created_at")])),
        ]),
    ))
}

#[test]
fn test_direct_columns_chain_is_type_only() {
    let compiled = compile(&direct_tree(), Dialect::DirectColumns).unwrap();
    assert!(compiled.types.is_none());
    assert!(compiled.entity_attributes.is_none());

    let names: Vec<_> = compiled.schema.entities().iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["users", "events"]);

    let users = compiled.schema.entity("users").unwrap();
    assert_eq!(users.column_names().collect::<Vec<_>>(), vec!["id", "age"]);
    assert_eq!(users.column("id").unwrap().validator_kinds(), vec![ValidatorKind::Uuid]);
    assert_eq!(users.column("age").unwrap().validator_kinds(), vec![ValidatorKind::TinyInt]);
    assert_eq!(users.column("age").unwrap().visibility(), None);
}

#[test]
fn test_direct_columns_validate_rows() {
    let mut compiled = compile(&direct_tree(), Dialect::DirectColumns).unwrap();
    let good = row(&[("id", "123e4567-e89b-12d3-a456-426614174000"), ("age", "42")]);
    assert!(compiled
        .schema
        .validate_row("users", &good, RowMode::CollectAll)
        .unwrap()
        .is_empty());

    let bad = row(&[("id", "nope"), ("age", "300")]);
    let failures = compiled
        .schema
        .validate_row("users", &bad, RowMode::CollectAll)
        .unwrap();
    let columns: Vec<_> = failures.iter().map(|f| f.column.as_str()).collect();
    assert_eq!(columns, vec!["id", "age"]);

    let age = compiled.schema.entity("users").unwrap().column("age").unwrap();
    assert!(age.validators()[0].bad().contains("300"));
    assert_eq!(age.validators()[0].fail_count(), 1);
}

#[test]
fn test_direct_columns_missing_type_is_fatal() {
    let t = tree(node(
        "start",
        json!([node(
            "class",
            json!([
                leaf_node("class_name", "users"),
                node("attribute", json!([node("variable", json!([leaf_node("var", "email")]))])),
            ])
        )]),
    ));
    let err = compile(&t, Dialect::DirectColumns).unwrap_err();
    match err {
        CompileError::MissingColumnField { entity, field, name, .. } => {
            assert_eq!(entity, "users");
            assert_eq!(field, "type");
            assert_eq!(name.as_deref(), Some("email"));
        }
        other => panic!("expected missing type, got {other:?}"),
    }
}

#[test]
fn test_missing_class_name_is_fatal() {
    let t = tree(node("start", json!([node("class", json!([variable("id", "uuid")]))])));
    let err = compile(&t, Dialect::DirectColumns).unwrap_err();
    assert!(matches!(
        err,
        CompileError::MissingClassName { ref kind, block: 0 } if kind == "class"
    ));
}

#[test]
fn test_unknown_type_token_is_registry_error() {
    let t = tree(node(
        "start",
        json!([node(
            "class",
            json!([leaf_node("class_name", "users"), variable("id", "varchar")])
        )]),
    ));
    let err = compile(&t, Dialect::DirectColumns).unwrap_err();
    match err {
        CompileError::Registry { entity, column, source } => {
            assert_eq!((entity.as_str(), column.as_str()), ("users", "id"));
            assert_eq!(
                source,
                RegistryError::UnknownToken {
                    namespace: RegistryNamespace::Primary,
                    token: "varchar".into(),
                }
            );
        }
        other => panic!("expected registry error, got {other:?}"),
    }
}

#[test]
fn test_duplicate_entity_is_fatal() {
    let t = tree(node(
        "start",
        json!([
            node("class", json!([leaf_node("class_name", "users")])),
            node("class", json!([leaf_node("class_name", "users")])),
        ]),
    ));
    assert!(matches!(
        compile(&t, Dialect::DirectColumns),
        Err(CompileError::DuplicateEntity { .. })
    ));
}

#[test]
fn test_root_must_be_start() {
    let t = tree(node("class", json!([leaf_node("class_name", "users")])));
    assert!(matches!(
        compile(&t, Dialect::DirectColumns),
        Err(CompileError::Structural(StructuralError::UnexpectedRoot { .. }))
    ));
}

// ---------------------------------------------------------------------------
// Entity-attribute composition
// ---------------------------------------------------------------------------

fn validator(name: &str, options: &[&str]) -> Value {
    let mut children = vec![leaf_node("name", name)];
    if !options.is_empty() {
        children.push(node("option", json!(options)));
    }
    node("validator", Value::Array(children))
}

fn composed_column(name: &str, ty: &str, validators: Vec<Value>, visibility: &str) -> Value {
    let mut children = vec![
        leaf_node("name", name),
        node("type", json!([node(ty, json!([]))])),
    ];
    children.extend(validators);
    children.push(node("visibility", json!([node(visibility, json!([]))])));
    node("column", Value::Array(children))
}

fn composed_tree() -> ParseNode {
    tree(node(
        "start",
        json!([
            node(
                "ent_attr",
                json!([
                    leaf_node("class_name", "orders"),
                    validator("unique", &["sku", "region"]),
                    validator("nodwh", &[]),
                ])
            ),
            node(
                "class",
                json!([
                    leaf_node("class_name", "orders"),
                    composed_column(
                        "sku",
                        "str",
                        vec![validator("len", &["8"]), validator("unique", &["region"])],
                        "public"
                    ),
                    composed_column(
                        "region",
                        "str",
                        vec![validator("set", &["eu", "us"])],
                        "private"
                    ),
                ])
            ),
        ]),
    ))
}

#[test]
fn test_composed_builds_attribute_table_and_types() {
    let compiled = compile(&composed_tree(), Dialect::EntityAttributeComposed).unwrap();

    let attrs = compiled.entity_attributes.as_ref().unwrap();
    assert_eq!(attrs["orders"]["unique"], vec!["sku", "region"]);
    assert!(attrs["orders"]["nodwh"].is_empty());

    let types = compiled.types.as_ref().unwrap();
    assert_eq!(types["orders"]["sku"], "str");
    assert_eq!(types["orders"]["region"], "str");

    let orders = compiled.schema.entity("orders").unwrap();
    let sku = orders.column("sku").unwrap();
    assert_eq!(
        sku.validator_kinds(),
        vec![ValidatorKind::Str, ValidatorKind::Len, ValidatorKind::Unique]
    );
    assert_eq!(sku.visibility(), Some(Visibility::Public));
    // Visibility is recorded, never filtered on.
    assert_eq!(orders.column("region").unwrap().visibility(), Some(Visibility::Private));
}

#[test]
fn test_composed_rows_flow_through_chains() {
    let mut compiled = compile(&composed_tree(), Dialect::EntityAttributeComposed).unwrap();
    let schema = &mut compiled.schema;

    let first = row(&[("sku", "A1"), ("region", "eu")]);
    assert!(schema.validate_row("orders", &first, RowMode::CollectAll).unwrap().is_empty());

    // Same sku in another region is fine; same pair is not.
    let other_region = row(&[("sku", "A1"), ("region", "us")]);
    assert!(schema.validate_row("orders", &other_region, RowMode::CollectAll).unwrap().is_empty());
    let failures = schema.validate_row("orders", &first, RowMode::CollectAll).unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].validator, Some(ValidatorKind::Unique));

    let bad = row(&[("sku", "TOO-LONG-SKU"), ("region", "apac")]);
    let failures = schema.validate_row("orders", &bad, RowMode::FailFast).unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].column, "sku");
    assert_eq!(failures[0].validator, Some(ValidatorKind::Len));
}

#[test]
fn test_composed_unique_without_companion_column_is_schema_error() {
    let mut compiled = compile(&composed_tree(), Dialect::EntityAttributeComposed).unwrap();
    let err = compiled
        .schema
        .validate_row("orders", &row(&[("sku", "A1")]), RowMode::CollectAll)
        .unwrap_err();
    assert!(matches!(err, SchemaError::BadValidator { ref column, .. } if column == "sku"));
}

#[test]
fn test_composed_duplicate_entity_attribute_is_fatal() {
    let t = tree(node(
        "start",
        json!([node(
            "ent_attr",
            json!([
                leaf_node("class_name", "orders"),
                validator("unique", &["a"]),
                validator("unique", &["b"]),
            ])
        )]),
    ));
    assert!(matches!(
        compile(&t, Dialect::EntityAttributeComposed),
        Err(CompileError::DuplicateAttribute { ref attribute, .. }) if attribute == "unique"
    ));
}

#[test]
fn test_composed_unknown_attribute_is_registry_error() {
    let t = tree(node(
        "start",
        json!([node(
            "class",
            json!([
                leaf_node("class_name", "orders"),
                composed_column("sku", "str", vec![validator("maxlength", &["3"])], "public"),
            ])
        )]),
    ));
    assert!(matches!(
        compile(&t, Dialect::EntityAttributeComposed),
        Err(CompileError::Registry { source: RegistryError::UnknownToken { .. }, .. })
    ));
}

// ---------------------------------------------------------------------------
// Typed, visibility gated
// ---------------------------------------------------------------------------

fn typed_column(
    name: &str,
    ty: &str,
    options: &[&str],
    validator: Option<&str>,
    public: bool,
) -> Value {
    let mut children = vec![leaf_node("name", name), leaf_node("type", ty)];
    children.extend(options.iter().map(|o| leaf_node("option", o)));
    if let Some(v) = validator {
        children.push(leaf_node("validator", v));
    }
    if public {
        children.push(node("public", json!([])));
    }
    node("column", Value::Array(children))
}

fn typed_tree() -> ParseNode {
    tree(node(
        "start",
        json!([node(
            "class",
            json!([
                leaf_node("class_name", "metrics"),
                typed_column("level", "int", &["1", "2", "1", "3"], Some("set"), true),
                typed_column("secret", "string", &[], None, false),
                typed_column("ratio", "double", &["0", "1"], Some("range"), true),
                typed_column("label", "string", &[], None, true),
            ])
        )]),
    ))
}

#[test]
fn test_typed_drops_private_columns() {
    let compiled = compile(&typed_tree(), Dialect::TypedVisibilityGated).unwrap();
    let metrics = compiled.schema.entity("metrics").unwrap();
    assert_eq!(metrics.column_names().collect::<Vec<_>>(), vec!["level", "ratio", "label"]);
    assert!(metrics.column("secret").is_none());
    assert!(metrics
        .columns()
        .iter()
        .all(|c| c.visibility() == Some(Visibility::Public)));

    let types = compiled.types.as_ref().unwrap();
    assert_eq!(types["metrics"]["ratio"], "double");
    assert!(!types["metrics"].contains_key("secret"));
    assert!(compiled.entity_attributes.is_none());
}

#[test]
fn test_typed_chains_and_options() {
    let mut compiled = compile(&typed_tree(), Dialect::TypedVisibilityGated).unwrap();
    let metrics = compiled.schema.entity("metrics").unwrap();
    assert_eq!(
        metrics.column("level").unwrap().validator_kinds(),
        vec![ValidatorKind::Int, ValidatorKind::Set]
    );
    assert_eq!(
        metrics.column("ratio").unwrap().validator_kinds(),
        vec![ValidatorKind::Float, ValidatorKind::Range]
    );
    assert_eq!(metrics.column("label").unwrap().validator_kinds(), vec![ValidatorKind::Str]);

    let ok = row(&[("level", "3"), ("ratio", "0.5"), ("label", "x")]);
    assert!(compiled
        .schema
        .validate_row("metrics", &ok, RowMode::CollectAll)
        .unwrap()
        .is_empty());

    let bad = row(&[("level", "x"), ("ratio", "1.5"), ("label", "x")]);
    let failures = compiled
        .schema
        .validate_row("metrics", &bad, RowMode::CollectAll)
        .unwrap();
    let kinds: Vec<_> = failures.iter().map(|f| (f.column.as_str(), f.validator)).collect();
    assert_eq!(
        kinds,
        vec![
            ("level", Some(ValidatorKind::Int)),
            ("level", Some(ValidatorKind::Set)),
            ("ratio", Some(ValidatorKind::Range)),
        ]
    );
}

#[test]
fn test_typed_bare_public_token() {
    let t = tree(node(
        "start",
        json!([node(
            "class",
            json!([
                leaf_node("class_name", "t"),
                node(
                    "column",
                    json!([leaf_node("name", "c"), leaf_node("type", "bigint"), "public"])
                ),
            ])
        )]),
    ));
    let compiled = compile(&t, Dialect::TypedVisibilityGated).unwrap();
    assert_eq!(
        compiled.schema.entity("t").unwrap().column("c").unwrap().validator_kinds(),
        vec![ValidatorKind::BigInt]
    );
}

#[test]
fn test_typed_private_column_still_needs_a_type() {
    let t = tree(node(
        "start",
        json!([node(
            "class",
            json!([leaf_node("class_name", "t"), node("column", json!([leaf_node("name", "c")]))])
        )]),
    ));
    assert!(matches!(
        compile(&t, Dialect::TypedVisibilityGated),
        Err(CompileError::MissingColumnField { field: "type", .. })
    ));
}

#[test]
fn test_typed_types_resolve_in_secondary_namespace() {
    // `str` is a primary token, not a Spark type.
    let t = tree(node(
        "start",
        json!([node(
            "class",
            json!([leaf_node("class_name", "t"), typed_column("c", "str", &[], None, true)])
        )]),
    ));
    match compile(&t, Dialect::TypedVisibilityGated) {
        Err(CompileError::Registry {
            source: RegistryError::UnknownToken { namespace, .. },
            ..
        }) => assert_eq!(namespace, RegistryNamespace::Secondary),
        other => panic!("expected secondary lookup failure, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Cross-dialect properties
// ---------------------------------------------------------------------------

#[test]
fn test_compilation_is_deterministic() {
    let cases = [
        (direct_tree(), Dialect::DirectColumns),
        (composed_tree(), Dialect::EntityAttributeComposed),
        (typed_tree(), Dialect::TypedVisibilityGated),
    ];
    for (t, dialect) in cases {
        let first = compile(&t, dialect).unwrap();
        let second = compile(&t, dialect).unwrap();
        assert_eq!(first.schema.shape(), second.schema.shape());
        assert_eq!(first.types, second.types);
        assert_eq!(first.entity_attributes, second.entity_attributes);
    }
}

#[test]
fn test_empty_ok_from_yaml_config() {
    let config =
        CompilerConfig::from_yaml_str("dialect: typed_visibility_gated\nempty_ok: true\n")
            .unwrap();
    let mut compiled = Compiler::new(config).compile(&typed_tree()).unwrap();
    let empty = row(&[("level", ""), ("ratio", ""), ("label", "")]);
    assert!(compiled
        .schema
        .validate_row("metrics", &empty, RowMode::CollectAll)
        .unwrap()
        .is_empty());

    let mut strict = compile(&typed_tree(), Dialect::TypedVisibilityGated).unwrap();
    assert!(!strict
        .schema
        .validate_row("metrics", &empty, RowMode::CollectAll)
        .unwrap()
        .is_empty());
}

#[test]
fn test_reset_between_passes() {
    let mut compiled = compile(&composed_tree(), Dialect::EntityAttributeComposed).unwrap();
    let r = row(&[("sku", "A1"), ("region", "eu")]);
    compiled.schema.validate_row("orders", &r, RowMode::CollectAll).unwrap();
    assert_eq!(
        compiled.schema.validate_row("orders", &r, RowMode::CollectAll).unwrap().len(),
        1
    );
    compiled.schema.reset();
    assert!(compiled
        .schema
        .validate_row("orders", &r, RowMode::CollectAll)
        .unwrap()
        .is_empty());
}
