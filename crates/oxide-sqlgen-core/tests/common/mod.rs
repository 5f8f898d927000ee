#![allow(dead_code)]

use std::sync::Arc;

use oxide_sqlgen_core::config::BuilderConfig;
use oxide_sqlgen_core::dialect::DialectKind;
use oxide_sqlgen_core::model::{FieldDescriptor, ModelDescriptor, SemanticType};
use oxide_sqlgen_core::table::{TableCache, TableDescriptor};

/// `Person { Id, Name, Age }` with `Id` picked up by the identity convention.
pub fn person() -> ModelDescriptor {
    ModelDescriptor::new("Person")
        .field(FieldDescriptor::new("Id", SemanticType::Long))
        .field(FieldDescriptor::new("Name", SemanticType::String))
        .field(FieldDescriptor::new("Age", SemanticType::Int))
}

/// A model without identity whose `SomeName` field is stored as `Name`.
pub fn aliased() -> ModelDescriptor {
    ModelDescriptor::new("Contact")
        .field(FieldDescriptor::new("SomeName", SemanticType::String).column("Name"))
        .field(FieldDescriptor::new("Email", SemanticType::String).nullable())
        .field(FieldDescriptor::new("Scratch", SemanticType::Custom("Buffer".into())).ignored())
}

pub fn table(model: &ModelDescriptor, dialect: DialectKind) -> Arc<TableDescriptor> {
    TableCache::new(BuilderConfig::new())
        .get_or_build(model, dialect, None)
        .unwrap_or_else(|e| panic!("Failed to build {}: {e}", model.name))
}

pub fn person_table(dialect: DialectKind) -> Arc<TableDescriptor> {
    table(&person(), dialect)
}
