//! Compiled table metadata.
//!
//! A [`TableDescriptor`] is the immutable result of compiling a
//! [`ModelDescriptor`](crate::model::ModelDescriptor) against one dialect. It
//! owns the quoted names, the identity column, the field/column lookup maps
//! and the memoized CRUD templates. Descriptors are shared through a
//! [`TableCache`].

mod builder;
mod cache;

use std::collections::HashMap;

pub use cache::TableCache;

use crate::dialect::{Dialect, DialectKind};
use crate::error::{Result, SqlGenError};
use crate::model::SemanticType;
use crate::template::TableTemplates;

/// A persisted column of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    field: String,
    name: String,
    quoted: String,
    ty: SemanticType,
    native_type: &'static str,
    nullable: bool,
    identity: bool,
}

impl Column {
    /// Returns the model field name.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the unquoted column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the column name quoted for the table's dialect.
    #[must_use]
    pub fn quoted(&self) -> &str {
        &self.quoted
    }

    /// Returns the semantic type.
    #[must_use]
    pub const fn ty(&self) -> &SemanticType {
        &self.ty
    }

    /// Returns the dialect's column type, resolved when the table was built.
    #[must_use]
    pub const fn native_type(&self) -> &'static str {
        self.native_type
    }

    /// Returns whether the column accepts NULL.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns whether this is the identity column.
    #[must_use]
    pub const fn is_identity(&self) -> bool {
        self.identity
    }
}

/// Immutable metadata mapping a model to a relational table.
#[derive(Debug)]
pub struct TableDescriptor {
    model: String,
    name: String,
    quoted_name: String,
    dialect: DialectKind,
    columns: Vec<Column>,
    identity: Option<usize>,
    ignored: Vec<String>,
    by_field: HashMap<String, usize>,
    by_column: HashMap<String, usize>,
    templates: TableTemplates,
}

impl TableDescriptor {
    /// Returns the model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the unquoted table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the table name quoted for the dialect.
    #[must_use]
    pub fn quoted_name(&self) -> &str {
        &self.quoted_name
    }

    /// Returns the dialect tag.
    #[must_use]
    pub const fn dialect_kind(&self) -> DialectKind {
        self.dialect
    }

    /// Returns the dialect strategy.
    #[must_use]
    pub fn dialect(&self) -> &'static dyn Dialect {
        self.dialect.dialect()
    }

    /// Returns the persisted columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the identity column, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&Column> {
        self.identity.map(|i| &self.columns[i])
    }

    /// Returns the memoized CRUD templates.
    #[must_use]
    pub const fn templates(&self) -> &TableTemplates {
        &self.templates
    }

    /// Looks up a column by model field name.
    #[must_use]
    pub fn column_by_field(&self, field: &str) -> Option<&Column> {
        self.by_field.get(field).map(|&i| &self.columns[i])
    }

    /// Looks up a column by column name, ignoring ASCII case.
    #[must_use]
    pub fn column_by_name(&self, column: &str) -> Option<&Column> {
        self.by_column
            .get(&column.to_ascii_lowercase())
            .map(|&i| &self.columns[i])
    }

    /// Resolves a field or column name to a persisted column.
    ///
    /// Field names take precedence over column names.
    ///
    /// # Errors
    ///
    /// Returns [`SqlGenError::IgnoredField`] for ignored fields and
    /// [`SqlGenError::UnknownField`] for anything else that is not a column.
    pub fn resolve(&self, name: &str) -> Result<&Column> {
        if let Some(column) = self
            .column_by_field(name)
            .or_else(|| self.column_by_name(name))
        {
            return Ok(column);
        }
        if self.ignored.iter().any(|f| f == name) {
            return Err(SqlGenError::IgnoredField {
                model: self.model.clone(),
                field: name.to_string(),
            });
        }
        Err(SqlGenError::UnknownField {
            model: self.model.clone(),
            field: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::config::BuilderConfig;
    use crate::dialect::DialectKind;
    use crate::error::SqlGenError;
    use crate::model::{FieldDescriptor, ModelDescriptor, SemanticType};

    use super::TableDescriptor;

    fn person() -> TableDescriptor {
        let model = ModelDescriptor::new("Person")
            .field(FieldDescriptor::new("Id", SemanticType::Long).identity())
            .field(FieldDescriptor::new("SomeName", SemanticType::String).column("Name"))
            .field(FieldDescriptor::new("Cache", SemanticType::String).ignored());
        TableDescriptor::build(&model, DialectKind::Sqlite, None, &BuilderConfig::new()).unwrap()
    }

    #[test]
    fn test_resolve_by_field_and_column() {
        let table = person();
        assert_eq!(table.resolve("SomeName").unwrap().name(), "Name");
        assert_eq!(table.resolve("name").unwrap().field(), "SomeName");
    }

    #[test]
    fn test_resolve_ignored_field() {
        let err = person().resolve("Cache").unwrap_err();
        assert_eq!(
            err,
            SqlGenError::IgnoredField {
                model: String::from("Person"),
                field: String::from("Cache"),
            }
        );
    }

    #[test]
    fn test_resolve_unknown_field() {
        let err = person().resolve("Height").unwrap_err();
        assert_eq!(err.to_string(), "model `Person` has no field `Height`");
    }
}
