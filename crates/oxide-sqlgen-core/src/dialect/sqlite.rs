//! SQLite dialect.

use super::{Dialect, DialectKind};
use crate::model::SemanticType;
use crate::table::Column;

/// SQLite dialect.
///
/// Identifiers are bracket-quoted, which SQLite accepts for compatibility.
/// Every integer type maps to `INTEGER` so that an identity column becomes an
/// alias of the rowid.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Sqlite
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('[', ']')
    }

    fn map_type(&self, ty: &SemanticType) -> Option<&'static str> {
        // SQLite has dynamic typing with type affinity
        let native = match ty {
            SemanticType::Bool
            | SemanticType::Byte
            | SemanticType::Short
            | SemanticType::Int
            | SemanticType::Long
            | SemanticType::Enum => "INTEGER",
            SemanticType::Float | SemanticType::Double => "REAL",
            SemanticType::Decimal => "NUMERIC",
            SemanticType::String
            | SemanticType::Guid
            | SemanticType::DateTime
            | SemanticType::DateTimeOffset => "TEXT",
            SemanticType::Bytes => "BLOB",
            SemanticType::Custom(_) => return None,
        };
        Some(native)
    }

    fn insert_returning_identity(
        &self,
        table: &str,
        columns: &[&Column],
        identity: &Column,
    ) -> String {
        format!(
            "{}\nSELECT last_insert_rowid() AS {};",
            self.insert(table, columns),
            identity.field()
        )
    }

    fn identity_suffix(&self) -> &'static str {
        " PRIMARY KEY AUTOINCREMENT"
    }

    fn supports_fts(&self) -> bool {
        true
    }
}
