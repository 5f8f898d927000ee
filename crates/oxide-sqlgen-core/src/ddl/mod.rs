//! DDL generation.
//!
//! Scripts are rendered from a [`TableDescriptor`] and its dialect's type map;
//! they are deterministic and meant to be run by an external executor.

pub mod fts;

use tracing::debug;

use crate::table::TableDescriptor;

pub use fts::{build_fts_artifacts, FtsMode};

/// Generates the CREATE TABLE statement for `table`.
///
/// The statement is guarded so that it is a no-op when the table exists.
#[must_use]
pub fn create_table(table: &TableDescriptor) -> String {
    let dialect = table.dialect();

    let mut sql = dialect.create_table_head(table.quoted_name());
    sql.push('\n');

    let col_defs: Vec<String> = table
        .columns()
        .iter()
        .map(|c| format!("    {}", dialect.column_definition(c)))
        .collect();
    sql.push_str(&col_defs.join(",\n"));
    sql.push_str("\n);");

    debug!(table = %table.name(), dialect = %table.dialect_kind(), "generated CREATE TABLE");
    sql
}
