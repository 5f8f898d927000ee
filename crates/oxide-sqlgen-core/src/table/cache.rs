//! Shared table descriptor cache.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, trace};

use super::TableDescriptor;
use crate::config::BuilderConfig;
use crate::dialect::DialectKind;
use crate::error::{Result, SqlGenError};
use crate::model::{Model, ModelDescriptor};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    model: String,
    dialect: DialectKind,
    table: Option<String>,
}

#[derive(Debug)]
struct CacheEntry {
    model: ModelDescriptor,
    table: Arc<TableDescriptor>,
}

impl CacheEntry {
    fn lookup(&self, model: &ModelDescriptor) -> Result<Arc<TableDescriptor>> {
        if self.model != *model {
            return Err(SqlGenError::ConflictingModelKey {
                key: model.key().to_string(),
            });
        }
        Ok(Arc::clone(&self.table))
    }
}

/// Cache of compiled table descriptors, keyed by model, dialect and table
/// name override.
///
/// A descriptor is built on the first request for its key and returned by
/// reference on every later request, so everything sharing a cache sees
/// identical SQL. Concurrent misses for the same key may each build a
/// descriptor; the first one published wins and the others are dropped.
///
/// Entries are keyed by [`ModelDescriptor::key`]. Asking for a key that is
/// already cached with a different descriptor is an error rather than a
/// silent reuse of the first model's SQL.
///
/// ```rust
/// use std::sync::Arc;
///
/// use oxide_sqlgen_core::config::BuilderConfig;
/// use oxide_sqlgen_core::dialect::DialectKind;
/// use oxide_sqlgen_core::model::{FieldDescriptor, ModelDescriptor, SemanticType};
/// use oxide_sqlgen_core::table::TableCache;
///
/// let cache = TableCache::new(BuilderConfig::new());
/// let person = ModelDescriptor::new("Person")
///     .field(FieldDescriptor::new("Id", SemanticType::Long).identity())
///     .field(FieldDescriptor::new("Name", SemanticType::String));
///
/// let first = cache.get_or_build(&person, DialectKind::Sqlite, None).unwrap();
/// let second = cache.get_or_build(&person, DialectKind::Sqlite, None).unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
#[derive(Debug, Default)]
pub struct TableCache {
    config: BuilderConfig,
    tables: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl TableCache {
    /// Creates an empty cache whose tables are built with `config`.
    #[must_use]
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            config,
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the builder configuration.
    #[must_use]
    pub const fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Returns the cached descriptor for `model`, building it on first use.
    ///
    /// # Errors
    ///
    /// Returns the configuration error raised by
    /// [`TableDescriptor::build`]. Failed builds are not cached. Returns
    /// [`SqlGenError::ConflictingModelKey`] when the key is already cached for
    /// a descriptor that differs from `model`.
    pub fn get_or_build(
        &self,
        model: &ModelDescriptor,
        dialect: DialectKind,
        table_override: Option<&str>,
    ) -> Result<Arc<TableDescriptor>> {
        let key = CacheKey {
            model: model.key().to_string(),
            dialect,
            table: table_override.map(str::to_string),
        };

        {
            // Builds never panic while holding the lock, so a poisoned map
            // still holds complete descriptors.
            let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = tables.get(&key) {
                trace!(model = %key.model, dialect = %dialect, "table cache hit");
                return entry.lookup(model);
            }
        }

        let built = Arc::new(TableDescriptor::build(
            model,
            dialect,
            table_override,
            &self.config,
        )?);

        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let published = tables.entry(key).or_insert_with(|| {
            debug!(table = %built.name(), dialect = %dialect, "published table descriptor");
            CacheEntry {
                model: model.clone(),
                table: built,
            }
        });
        published.lookup(model)
    }

    /// Returns the cached descriptor for a model type.
    ///
    /// # Errors
    ///
    /// See [`TableCache::get_or_build`].
    pub fn table<M: Model>(
        &self,
        dialect: DialectKind,
        table_override: Option<&str>,
    ) -> Result<Arc<TableDescriptor>> {
        self.get_or_build(&M::descriptor(), dialect, table_override)
    }

    /// Returns the number of cached descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing has been built yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
