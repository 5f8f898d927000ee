//! Table descriptor construction and caching.

mod common;

use std::sync::Arc;

use oxide_sqlgen_core::config::{BuilderConfig, IdentityConvention};
use oxide_sqlgen_core::dialect::DialectKind;
use oxide_sqlgen_core::error::{ErrorKind, SqlGenError};
use oxide_sqlgen_core::model::{FieldDescriptor, ModelDescriptor, SemanticType};
use oxide_sqlgen_core::table::{Column, TableCache, TableDescriptor};

use common::{aliased, person};

#[test]
fn test_repeat_requests_share_descriptor() {
    let cache = TableCache::new(BuilderConfig::new());
    let first = cache.get_or_build(&person(), DialectKind::Sqlite, None).unwrap();
    let second = cache.get_or_build(&person(), DialectKind::Sqlite, None).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(
        first.templates().select().sql(),
        second.templates().select().sql()
    );
}

#[test]
fn test_rebuilt_descriptor_is_byte_identical() {
    let config = BuilderConfig::new();
    let a = TableDescriptor::build(&person(), DialectKind::SqlServer, None, &config).unwrap();
    let b = TableDescriptor::build(&person(), DialectKind::SqlServer, None, &config).unwrap();
    assert_eq!(a.templates(), b.templates());
}

#[test]
fn test_same_name_different_key() {
    let cache = TableCache::default();
    let a = person().with_key("billing::Person");
    let b = ModelDescriptor::new("Person")
        .with_key("crm::Person")
        .field(FieldDescriptor::new("Email", SemanticType::String));

    let billing = cache.get_or_build(&a, DialectKind::Sqlite, None).unwrap();
    let crm = cache.get_or_build(&b, DialectKind::Sqlite, None).unwrap();
    assert_eq!(billing.columns().len(), 3);
    assert_eq!(crm.columns().len(), 1);
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_columns_in_declaration_order() {
    let cache = TableCache::default();
    let table = cache.get_or_build(&aliased(), DialectKind::Sqlite, None).unwrap();

    let fields: Vec<&str> = table.columns().iter().map(Column::field).collect();
    let columns: Vec<&str> = table.columns().iter().map(Column::quoted).collect();
    assert_eq!(fields, ["SomeName", "Email"]);
    assert_eq!(columns, ["[Name]", "[Email]"]);
    assert!(table.columns()[1].is_nullable());
}

#[test]
fn test_convention_requires_non_nullable_id() {
    let model = ModelDescriptor::new("Draft")
        .field(FieldDescriptor::new("Id", SemanticType::Int).nullable())
        .field(FieldDescriptor::new("Title", SemanticType::String));
    let table =
        TableDescriptor::build(&model, DialectKind::Sqlite, None, &BuilderConfig::new()).unwrap();
    assert!(table.identity().is_none());
}

#[test]
fn test_explicit_identity_beats_convention() {
    let model = ModelDescriptor::new("Order")
        .field(FieldDescriptor::new("Id", SemanticType::Long))
        .field(FieldDescriptor::new("Number", SemanticType::Int).identity());
    let table =
        TableDescriptor::build(&model, DialectKind::Sqlite, None, &BuilderConfig::new()).unwrap();
    assert_eq!(table.identity().map(Column::field), Some("Number"));
    assert!(!table.columns()[0].is_identity());
}

#[test]
fn test_config_from_json() {
    let config: BuilderConfig =
        serde_json::from_str(r#"{ "identity_convention": { "field_named": "Key" } }"#).unwrap();
    assert_eq!(
        config.identity_convention,
        IdentityConvention::FieldNamed(String::from("Key"))
    );

    let model = ModelDescriptor::new("Setting")
        .field(FieldDescriptor::new("Key", SemanticType::Short))
        .field(FieldDescriptor::new("Value", SemanticType::String));
    let cache = TableCache::new(config);
    let table = cache.get_or_build(&model, DialectKind::Sqlite, None).unwrap();
    assert_eq!(table.identity().map(Column::name), Some("Key"));
}

#[test]
fn test_model_from_json() {
    let model: ModelDescriptor = serde_json::from_str(
        r#"{
            "name": "Person",
            "table": "People",
            "fields": [
                { "name": "Id", "type": "long", "identity": true },
                { "name": "SomeName", "type": "string", "column": "Name" },
                { "name": "Home", "type": { "custom": "Address" }, "ignored": true }
            ]
        }"#,
    )
    .unwrap();
    let table =
        TableDescriptor::build(&model, DialectKind::Sqlite, None, &BuilderConfig::new()).unwrap();

    assert_eq!(table.quoted_name(), "[People]");
    assert_eq!(table.columns().len(), 2);
    assert_eq!(
        table.resolve("Home").unwrap_err(),
        SqlGenError::IgnoredField {
            model: String::from("Person"),
            field: String::from("Home"),
        }
    );
}

#[test]
fn test_build_errors_are_configuration() {
    let models = [
        ModelDescriptor::new("Empty"),
        ModelDescriptor::new("Twice")
            .field(FieldDescriptor::new("A", SemanticType::Long).identity())
            .field(FieldDescriptor::new("B", SemanticType::Long).identity()),
        ModelDescriptor::new("Clash")
            .field(FieldDescriptor::new("A", SemanticType::Int))
            .field(FieldDescriptor::new("B", SemanticType::Int).column("a")),
        ModelDescriptor::new("Money")
            .field(FieldDescriptor::new("Id", SemanticType::Decimal).identity()),
    ];
    for model in &models {
        let err = TableDescriptor::build(model, DialectKind::SqlServer, None, &BuilderConfig::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration, "{}", model.name);
        assert!(err.to_string().contains(&model.name), "{err}");
    }
}
