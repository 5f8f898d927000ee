//! Error types for SQL generation.

use thiserror::Error;

/// Broad classification of a [`SqlGenError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The model or a requested artifact is misconfigured. Raised while a
    /// table descriptor is built, or when DDL is requested for a feature the
    /// dialect lacks.
    Configuration,
    /// A filter, payload or column list names a field that is not persisted.
    UnknownField,
    /// A partial payload carries no fields.
    EmptyPayload,
}

/// Errors raised while describing tables or generating SQL.
///
/// Apart from [`SqlGenError::ConflictingModelKey`], which depends on what a
/// cache already holds, every error is derived from its inputs alone, so
/// retrying the same call always fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SqlGenError {
    /// More than one field is marked as identity.
    #[error("model `{model}` marks more than one identity field: `{first}` and `{second}`")]
    DuplicateIdentity {
        /// Model name.
        model: String,
        /// First identity field.
        first: String,
        /// Second identity field.
        second: String,
    },

    /// Two fields resolve to the same column.
    #[error("model `{model}`: fields `{first}` and `{second}` both map to column `{column}`")]
    ColumnCollision {
        /// Model name.
        model: String,
        /// Column both fields map to.
        column: String,
        /// First field.
        first: String,
        /// Second field.
        second: String,
    },

    /// The same field name is declared twice.
    #[error("model `{model}` declares field `{field}` more than once")]
    DuplicateField {
        /// Model name.
        model: String,
        /// Field name.
        field: String,
    },

    /// Every field is ignored, or the model has none.
    #[error("model `{model}` has no persisted columns")]
    NoColumns {
        /// Model name.
        model: String,
    },

    /// The dialect has no native column type for a field.
    #[error("dialect `{dialect}` has no native type for `{ty}` (model `{model}`, field `{field}`)")]
    UnmappedType {
        /// Dialect name.
        dialect: &'static str,
        /// Model name.
        model: String,
        /// Field name.
        field: String,
        /// Semantic type name.
        ty: String,
    },

    /// The identity field is not an integer type.
    #[error("model `{model}`: identity field `{field}` must be an integer type, found `{ty}`")]
    InvalidIdentityType {
        /// Model name.
        model: String,
        /// Field name.
        field: String,
        /// Semantic type name.
        ty: String,
    },

    /// The dialect cannot express the requested artifact.
    #[error("dialect `{dialect}` does not support {feature}")]
    Unsupported {
        /// Dialect name.
        dialect: &'static str,
        /// Feature description.
        feature: &'static str,
    },

    /// Two different descriptors share one cache key.
    #[error("model key `{key}` is already cached for a different descriptor")]
    ConflictingModelKey {
        /// Cache key both descriptors report.
        key: String,
    },

    /// A full-text index was requested without any column.
    #[error("full-text index for model `{model}` needs at least one column")]
    EmptyFtsColumns {
        /// Model name.
        model: String,
    },

    /// A filter was spliced into a template without a WHERE placeholder.
    #[error("the {template} template has no WHERE placeholder")]
    NoFilterSlot {
        /// Template name.
        template: &'static str,
    },

    /// The referenced field does not exist on the model.
    #[error("model `{model}` has no field `{field}`")]
    UnknownField {
        /// Model name.
        model: String,
        /// Field name.
        field: String,
    },

    /// The referenced field exists but is ignored for persistence.
    #[error("field `{field}` of model `{model}` is ignored and has no column")]
    IgnoredField {
        /// Model name.
        model: String,
        /// Field name.
        field: String,
    },

    /// A partial payload without fields.
    #[error("partial payload for model `{model}` has no fields")]
    EmptyPayload {
        /// Model name.
        model: String,
    },
}

impl SqlGenError {
    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownField { .. } | Self::IgnoredField { .. } => ErrorKind::UnknownField,
            Self::EmptyPayload { .. } => ErrorKind::EmptyPayload,
            _ => ErrorKind::Configuration,
        }
    }
}

/// Result type alias for SQL generation.
pub type Result<T> = std::result::Result<T, SqlGenError>;
