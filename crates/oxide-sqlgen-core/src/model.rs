//! Model descriptors.
//!
//! A [`ModelDescriptor`] is the static description of a record type: its name,
//! an optional table alias and its fields in declaration order. It is usually
//! generated by `#[derive(Model)]`, but can be built by hand or deserialized
//! from JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Dialect-independent type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    /// Boolean.
    Bool,
    /// 8-bit integer.
    Byte,
    /// 16-bit integer.
    Short,
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    Long,
    /// Single precision float.
    Float,
    /// Double precision float.
    Double,
    /// Exact decimal.
    Decimal,
    /// Unicode text.
    String,
    /// 128-bit unique identifier.
    Guid,
    /// Date and time without offset.
    DateTime,
    /// Date and time with offset.
    DateTimeOffset,
    /// Binary data.
    Bytes,
    /// Enumeration stored as its integer discriminant.
    Enum,
    /// A host type without a native column type.
    Custom(String),
}

impl SemanticType {
    /// Returns `true` for integer types that a database can generate.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::Byte | Self::Short | Self::Int | Self::Long)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "Bool",
            Self::Byte => "Byte",
            Self::Short => "Short",
            Self::Int => "Int",
            Self::Long => "Long",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Decimal => "Decimal",
            Self::String => "String",
            Self::Guid => "Guid",
            Self::DateTime => "DateTime",
            Self::DateTimeOffset => "DateTimeOffset",
            Self::Bytes => "Bytes",
            Self::Enum => "Enum",
            Self::Custom(name) => return write!(f, "Custom({name})"),
        };
        f.write_str(name)
    }
}

/// Metadata for one field of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name as declared on the model.
    pub name: String,
    /// Semantic type.
    #[serde(rename = "type")]
    pub ty: SemanticType,
    /// Whether the field accepts NULL.
    #[serde(default)]
    pub nullable: bool,
    /// Explicit identity marker.
    #[serde(default)]
    pub identity: bool,
    /// Excluded from persistence.
    #[serde(default)]
    pub ignored: bool,
    /// Column alias; the field name is used when absent.
    #[serde(default)]
    pub column: Option<String>,
}

impl FieldDescriptor {
    /// Creates a non-nullable, persisted field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: SemanticType) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
            identity: false,
            ignored: false,
            column: None,
        }
    }

    /// Marks the field as nullable.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Marks the field as the identity.
    #[must_use]
    pub const fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    /// Excludes the field from persistence.
    #[must_use]
    pub const fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Stores the field under a different column name.
    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Returns the column name: the alias if present, else the field name.
    #[must_use]
    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }
}

/// Description of a model type.
///
/// ```rust
/// use oxide_sqlgen_core::model::{FieldDescriptor, ModelDescriptor, SemanticType};
///
/// let person = ModelDescriptor::new("Person")
///     .field(FieldDescriptor::new("Id", SemanticType::Long).identity())
///     .field(FieldDescriptor::new("Name", SemanticType::String))
///     .field(FieldDescriptor::new("Age", SemanticType::Int));
///
/// assert_eq!(person.key(), "Person");
/// assert_eq!(person.fields.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Unique cache key; defaults to `name`.
    #[serde(default)]
    pub key: Option<String>,
    /// Simple type name.
    pub name: String,
    /// Type-level table alias.
    #[serde(default)]
    pub table: Option<String>,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl ModelDescriptor {
    /// Creates an empty descriptor for a model.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            key: None,
            name: name.into(),
            table: None,
            fields: Vec::new(),
        }
    }

    /// Sets a key that distinguishes this model from others with the same
    /// simple name, typically its module path.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the type-level table alias.
    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Returns the cache key of the model.
    ///
    /// Descriptors built by hand or loaded from JSON default to their simple
    /// name, so two different models named `Person` need distinct keys from
    /// [`Self::with_key`] to share a [`TableCache`](crate::table::TableCache).
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.name)
    }
}

/// Types that describe themselves as a model.
///
/// Implemented by `#[derive(Model)]`.
pub trait Model {
    /// Returns the descriptor of this model.
    fn descriptor() -> ModelDescriptor;
}

/// A checked reference to a model field, produced by the accessors that
/// `#[derive(Model)]` generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldRef(&'static str);

impl FieldRef {
    /// Creates a field reference.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the field name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl From<FieldRef> for String {
    fn from(field: FieldRef) -> Self {
        Self::from(field.0)
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
