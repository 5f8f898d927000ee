//! Table builder configuration.

use serde::{Deserialize, Serialize};

/// How an identity field is picked when no field is explicitly marked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityConvention {
    /// Only explicitly marked fields become identities.
    Disabled,
    /// A non-nullable integer field with exactly this name becomes the
    /// identity.
    FieldNamed(String),
}

impl Default for IdentityConvention {
    fn default() -> Self {
        Self::FieldNamed(String::from("Id"))
    }
}

impl IdentityConvention {
    /// Returns the conventional identity field name, if enabled.
    #[must_use]
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::Disabled => None,
            Self::FieldNamed(name) => Some(name),
        }
    }
}

/// Settings shared by every table a [`TableCache`](crate::table::TableCache)
/// builds.
///
/// ```rust
/// use oxide_sqlgen_core::config::{BuilderConfig, IdentityConvention};
///
/// let config: BuilderConfig =
///     serde_json::from_str(r#"{ "identity_convention": "disabled" }"#).unwrap();
/// assert_eq!(config.identity_convention, IdentityConvention::Disabled);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Identity fallback for models without an explicit marker.
    pub identity_convention: IdentityConvention,
}

impl BuilderConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the identity convention.
    #[must_use]
    pub fn identity_convention(mut self, convention: IdentityConvention) -> Self {
        self.identity_convention = convention;
        self
    }
}
