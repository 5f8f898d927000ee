//! Microsoft SQL Server dialect.

use super::{column_list, Dialect, DialectKind};
use crate::model::SemanticType;
use crate::table::Column;

/// Name of the table variable that collects generated identities.
const INSERTED_IDS: &str = "@InsertedIds";

/// SQL Server dialect.
///
/// Generated identities are captured with `OUTPUT Inserted.<col> INTO` a table
/// variable and selected back after the insert.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlServerDialect;

impl SqlServerDialect {
    /// Creates a new SQL Server dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqlServerDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::SqlServer
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('[', ']')
    }

    fn map_type(&self, ty: &SemanticType) -> Option<&'static str> {
        let native = match ty {
            SemanticType::Bool => "BIT",
            SemanticType::Byte => "TINYINT",
            SemanticType::Short => "SMALLINT",
            SemanticType::Int | SemanticType::Enum => "INT",
            SemanticType::Long => "BIGINT",
            SemanticType::Float => "REAL",
            SemanticType::Double => "FLOAT",
            SemanticType::Decimal => "DECIMAL(38, 18)",
            SemanticType::String => "NVARCHAR(MAX)",
            SemanticType::Guid => "UNIQUEIDENTIFIER",
            SemanticType::DateTime => "DATETIME2",
            SemanticType::DateTimeOffset => "DATETIMEOFFSET",
            SemanticType::Bytes => "VARBINARY(MAX)",
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
        let id_type = identity.native_type();
        let mut sql = format!(
            "DECLARE {INSERTED_IDS} TABLE ({} {id_type});\nINSERT INTO {table}",
            identity.quoted()
        );
        if !columns.is_empty() {
            sql.push(' ');
            sql.push_str(&column_list(columns));
        }
        sql.push_str(&format!(
            "\nOUTPUT Inserted.{} INTO {INSERTED_IDS}\n",
            identity.quoted()
        ));
        if columns.is_empty() {
            sql.push_str("DEFAULT VALUES;");
        } else {
            sql.push_str(&format!("VALUES {};", self.value_list(columns)));
        }
        sql.push_str(&format!(
            "\nSELECT {} AS {} FROM {INSERTED_IDS};",
            identity.quoted(),
            identity.field()
        ));
        sql
    }

    fn insert_explicit_identity(&self, table: &str, insert: String) -> String {
        format!("SET IDENTITY_INSERT {table} ON;\n{insert}\nSET IDENTITY_INSERT {table} OFF;")
    }

    // IDENTITY columns cannot be assigned by UPDATE.
    fn updates_identity(&self) -> bool {
        false
    }

    fn create_table_head(&self, table: &str) -> String {
        format!(
            "IF OBJECT_ID(N'{}', N'U') IS NULL\nCREATE TABLE {table} (",
            table.replace('\'', "''")
        )
    }

    fn identity_suffix(&self) -> &'static str {
        " IDENTITY(1,1) PRIMARY KEY"
    }
}
