//! SQL dialect support.
//!
//! Each supported database gets one stateless strategy implementing
//! [`Dialect`]. Dialects differ in how a generated identity is read back after
//! an insert, in native column types and in a few DDL details; everything else
//! is shared through the provided trait methods.

mod sql_server;
mod sqlite;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use sql_server::SqlServerDialect;
pub use sqlite::SqliteDialect;

use crate::model::SemanticType;
use crate::table::Column;

static SQLITE: SqliteDialect = SqliteDialect::new();
static SQL_SERVER: SqlServerDialect = SqlServerDialect::new();

/// Tag identifying a dialect. Used as part of the table cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialectKind {
    /// SQLite.
    Sqlite,
    /// Microsoft SQL Server.
    SqlServer,
}

impl DialectKind {
    /// Returns the strategy for this dialect.
    #[must_use]
    pub fn dialect(self) -> &'static dyn Dialect {
        match self {
            Self::Sqlite => &SQLITE,
            Self::SqlServer => &SQL_SERVER,
        }
    }

    /// Returns the dialect name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::SqlServer => "sqlserver",
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown dialect name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect `{0}`, expected `sqlite` or `sqlserver`")]
pub struct UnknownDialect(pub String);

impl FromStr for DialectKind {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "sqlserver" | "mssql" => Ok(Self::SqlServer),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}

/// Trait for SQL dialect-specific behavior.
pub trait Dialect: fmt::Debug + Send + Sync {
    /// Returns the tag of this dialect.
    fn kind(&self) -> DialectKind;

    /// Returns the name of the dialect.
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Returns the opening and closing identifier quote characters.
    fn identifier_quotes(&self) -> (char, char) {
        ('"', '"')
    }

    /// Quotes an identifier, doubling any embedded closing quote.
    fn quote_identifier(&self, name: &str) -> String {
        let (open, close) = self.identifier_quotes();
        let mut quoted = String::with_capacity(name.len() + 2);
        quoted.push(open);
        for c in name.chars() {
            if c == close {
                quoted.push(close);
            }
            quoted.push(c);
        }
        quoted.push(close);
        quoted
    }

    /// Quotes a result column alias.
    fn quote_alias(&self, alias: &str) -> String {
        format!("'{}'", alias.replace('\'', "''"))
    }

    /// Returns the named parameter prefix.
    fn parameter_prefix(&self) -> char {
        '@'
    }

    /// Returns the placeholder for a named parameter.
    fn parameter(&self, name: &str) -> String {
        format!("{}{name}", self.parameter_prefix())
    }

    /// Maps a semantic type to the native DDL type keyword.
    ///
    /// Returns `None` for types the dialect cannot store.
    fn map_type(&self, ty: &SemanticType) -> Option<&'static str>;

    /// Renders a plain INSERT of the given columns, bound by field name.
    fn insert(&self, table: &str, columns: &[&Column]) -> String {
        if columns.is_empty() {
            return format!("INSERT INTO {table} DEFAULT VALUES;");
        }
        format!(
            "INSERT INTO {table} {}\nVALUES {};",
            column_list(columns),
            self.value_list(columns)
        )
    }

    /// Renders an INSERT that reads back the generated identity.
    fn insert_returning_identity(&self, table: &str, columns: &[&Column], identity: &Column)
        -> String;

    /// Wraps an INSERT that supplies the identity value explicitly.
    fn insert_explicit_identity(&self, _table: &str, insert: String) -> String {
        insert
    }

    /// Returns whether an UPDATE may assign the identity column.
    fn updates_identity(&self) -> bool {
        true
    }

    /// Renders the parenthesized parameter list for an INSERT.
    fn value_list(&self, columns: &[&Column]) -> String {
        let values: Vec<String> = columns.iter().map(|c| self.parameter(c.field())).collect();
        format!("({})", values.join(","))
    }

    /// Renders the statement head that opens a CREATE TABLE body.
    fn create_table_head(&self, table: &str) -> String {
        format!("CREATE TABLE IF NOT EXISTS {table} (")
    }

    /// Generates the DDL for a column.
    fn column_definition(&self, column: &Column) -> String {
        let ty = column.native_type();
        if column.is_identity() {
            return format!("{} {ty}{}", column.quoted(), self.identity_suffix());
        }
        let mut sql = format!("{} {ty}", column.quoted());
        if !column.is_nullable() {
            sql.push_str(" NOT NULL");
        }
        sql
    }

    /// Returns the constraint text that follows an identity column's type.
    fn identity_suffix(&self) -> &'static str;

    /// Returns whether the dialect supports FTS5 virtual tables.
    fn supports_fts(&self) -> bool {
        false
    }
}

/// Renders the parenthesized, quoted column list for an INSERT.
pub(crate) fn column_list(columns: &[&Column]) -> String {
    let names: Vec<&str> = columns.iter().map(|c| c.quoted()).collect();
    format!("({})", names.join(","))
}
