//! SQLite FTS5 full-text index scripts.
//!
//! For a table `Note` indexed on `Title`, external-content mode produces the
//! virtual table `[Note_fts]` and four triggers keeping it in sync:
//!
//! ```text
//! CREATE VIRTUAL TABLE IF NOT EXISTS [Note_fts] USING fts5(
//!     [Title],
//!     content = 'Note',
//!     content_rowid = 'Id'
//! );
//!
//! CREATE TRIGGER IF NOT EXISTS [Note_bu] BEFORE UPDATE ON [Note] BEGIN
//!     DELETE FROM [Note_fts] WHERE rowid = old.[Id];
//! END;
//! ...
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SqlGenError};
use crate::table::{Column, TableDescriptor};

/// How the FTS5 table stores indexed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FtsMode {
    /// The virtual table stores its own copy of the text.
    Content,
    /// The virtual table stores only the index (`content = ''`).
    ContentLess,
    /// The virtual table reads text from the base table and is kept in sync
    /// by triggers.
    ExternalContent,
}

/// Builds the FTS5 virtual table and, for external content, its sync
/// triggers.
///
/// # Errors
///
/// Returns [`SqlGenError::Unsupported`] for dialects without FTS5,
/// [`SqlGenError::EmptyFtsColumns`] when `columns` is empty,
/// [`SqlGenError::ColumnCollision`] when two names resolve to the same column,
/// and an unknown-field error for columns that do not resolve.
pub fn build_fts_artifacts(
    table: &TableDescriptor,
    columns: &[&str],
    mode: FtsMode,
) -> Result<String> {
    let dialect = table.dialect();
    if !dialect.supports_fts() {
        return Err(SqlGenError::Unsupported {
            dialect: dialect.name(),
            feature: "FTS5 virtual tables",
        });
    }
    if columns.is_empty() {
        return Err(SqlGenError::EmptyFtsColumns {
            model: table.model().to_string(),
        });
    }
    let mut indexed: Vec<&Column> = Vec::with_capacity(columns.len());
    for name in columns {
        let column = table.resolve(name)?;
        if let Some(prior) = indexed.iter().find(|c| c.field() == column.field()) {
            return Err(SqlGenError::ColumnCollision {
                model: table.model().to_string(),
                column: column.name().to_string(),
                first: prior.field().to_string(),
                second: (*name).to_string(),
            });
        }
        indexed.push(column);
    }

    let fts_table = dialect.quote_identifier(&format!("{}_fts", table.name()));
    let mut options: Vec<String> = indexed.iter().map(|c| c.quoted().to_string()).collect();
    match mode {
        FtsMode::Content => {}
        FtsMode::ContentLess => options.push(String::from("content = ''")),
        FtsMode::ExternalContent => {
            options.push(format!("content = {}", sql_string(table.name())));
            if let Some(identity) = table.identity() {
                options.push(format!("content_rowid = {}", sql_string(identity.name())));
            }
        }
    }

    let mut script = format!(
        "CREATE VIRTUAL TABLE IF NOT EXISTS {fts_table} USING fts5(\n    {}\n);",
        options.join(",\n    ")
    );

    if mode == FtsMode::ExternalContent {
        let row_key = table.identity().map_or("rowid", Column::quoted);
        let delete = format!("DELETE FROM {fts_table} WHERE rowid = old.{row_key};");

        let targets: Vec<&str> = indexed.iter().map(|c| c.quoted()).collect();
        let values: Vec<String> = targets.iter().map(|c| format!("new.{c}")).collect();
        let insert = format!(
            "INSERT INTO {fts_table} (rowid, {}) VALUES (new.{row_key}, {});",
            targets.join(", "),
            values.join(", ")
        );

        for (suffix, timing, body) in [
            ("bu", "BEFORE UPDATE", &delete),
            ("bd", "BEFORE DELETE", &delete),
            ("au", "AFTER UPDATE", &insert),
            ("ai", "AFTER INSERT", &insert),
        ] {
            let trigger = dialect.quote_identifier(&format!("{}_{suffix}", table.name()));
            script.push_str(&format!(
                "\n\nCREATE TRIGGER IF NOT EXISTS {trigger} {timing} ON {} BEGIN\n    {body}\nEND;",
                table.quoted_name()
            ));
        }
    }

    debug!(table = %table.name(), mode = ?mode, columns = indexed.len(), "generated FTS5 script");
    Ok(script)
}

fn sql_string(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}
