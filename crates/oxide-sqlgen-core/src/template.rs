//! Canonical CRUD templates.
//!
//! Every [`TableDescriptor`] carries one set of templates, generated while the
//! descriptor is built. Templates that can be filtered end in an always-true
//! WHERE placeholder; a [`CompiledFilter`] replaces that placeholder verbatim.
//!
//! For `Person { Id (identity), Name, Age }` on SQLite the select template is:
//!
//! ```text
//! SELECT
//!     [Person].[Id] AS 'Id',
//!     [Person].[Name] AS 'Name',
//!     [Person].[Age] AS 'Age'
//! FROM [Person]
//! WHERE
//!     1 = 1;
//! ```

use std::fmt;
use std::ops::Range;

use crate::dialect::Dialect;
use crate::error::{Result, SqlGenError};
use crate::filter::{CompiledFilter, ParameterBag};
use crate::table::{Column, TableDescriptor};

/// Always-true placeholder used by SELECT and UPDATE templates.
pub(crate) const WHERE_ALL: &str = "1 = 1";

/// Always-true placeholder used by the DELETE template.
const DELETE_ALL: &str = "1=1";

/// A complete statement ready for an executor.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// SQL text.
    pub sql: String,
    /// Parameters the executor binds from the caller's object, in order.
    pub parameter_names: Vec<String>,
    /// Parameters bound from filter or payload values.
    pub parameters: ParameterBag,
}

/// A SQL template with its expected parameters and optional filter slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlTemplate {
    kind: &'static str,
    sql: String,
    parameters: Vec<String>,
    filter_slot: Option<Range<usize>>,
}

impl SqlTemplate {
    fn new(kind: &'static str, sql: String, parameters: Vec<String>) -> Self {
        Self {
            kind,
            sql,
            parameters,
            filter_slot: None,
        }
    }

    fn filterable(
        kind: &'static str,
        sql: String,
        placeholder: &str,
        parameters: Vec<String>,
    ) -> Self {
        let filter_slot = sql
            .rfind(placeholder)
            .map(|start| start..start + placeholder.len());
        Self {
            kind,
            sql,
            parameters,
            filter_slot,
        }
    }

    /// Returns the template name (`select`, `insert`, ...).
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    /// Returns the SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the parameter placeholders bound from the caller's object.
    #[must_use]
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Returns whether a filter can be spliced into this template.
    #[must_use]
    pub const fn has_filter_slot(&self) -> bool {
        self.filter_slot.is_some()
    }

    /// Returns the template as an unfiltered statement.
    #[must_use]
    pub fn statement(&self) -> Statement {
        Statement {
            sql: self.sql.clone(),
            parameter_names: self.parameters.clone(),
            parameters: ParameterBag::new(),
        }
    }

    /// Replaces the WHERE placeholder with a compiled filter.
    ///
    /// # Errors
    ///
    /// Returns [`SqlGenError::NoFilterSlot`] for templates without a WHERE
    /// placeholder, such as inserts.
    pub fn splice(&self, filter: &CompiledFilter) -> Result<Statement> {
        let slot = self
            .filter_slot
            .clone()
            .ok_or(SqlGenError::NoFilterSlot {
                template: self.kind,
            })?;
        let mut sql = String::with_capacity(self.sql.len() + filter.where_clause().len());
        sql.push_str(&self.sql[..slot.start]);
        sql.push_str(filter.where_clause());
        sql.push_str(&self.sql[slot.end..]);
        Ok(Statement {
            sql,
            parameter_names: self.parameters.clone(),
            parameters: filter.parameters().clone(),
        })
    }
}

impl fmt::Display for SqlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// The memoized CRUD templates of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableTemplates {
    select: SqlTemplate,
    insert: SqlTemplate,
    insert_all: SqlTemplate,
    update_by_identity: Option<SqlTemplate>,
    update_all: Option<SqlTemplate>,
    delete: SqlTemplate,
}

impl TableTemplates {
    pub(crate) fn generate(table: &TableDescriptor) -> Self {
        let dialect = table.dialect();
        let all: Vec<&Column> = table.columns().iter().collect();
        let data: Vec<&Column> = all.iter().copied().filter(|c| !c.is_identity()).collect();

        Self {
            select: select(dialect, table, &all),
            insert: insert(dialect, table, &data),
            insert_all: insert_all(dialect, table, &all),
            update_by_identity: update_by_identity(dialect, table, &data),
            update_all: update_all(dialect, table, &all),
            delete: SqlTemplate::filterable(
                "delete",
                format!("DELETE FROM {} WHERE {DELETE_ALL};", table.quoted_name()),
                DELETE_ALL,
                Vec::new(),
            ),
        }
    }

    /// SELECT of every column, aliased to field names.
    #[must_use]
    pub const fn select(&self) -> &SqlTemplate {
        &self.select
    }

    /// INSERT without the identity column, reading back the generated
    /// identity. Plain INSERT of all columns for tables without identity.
    #[must_use]
    pub const fn insert(&self) -> &SqlTemplate {
        &self.insert
    }

    /// INSERT of every column, identity included.
    #[must_use]
    pub const fn insert_all(&self) -> &SqlTemplate {
        &self.insert_all
    }

    /// UPDATE of every non-identity column filtered by identity. Absent when
    /// the table has no identity or nothing besides it.
    #[must_use]
    pub const fn update_by_identity(&self) -> Option<&SqlTemplate> {
        self.update_by_identity.as_ref()
    }

    /// UPDATE of every column with a WHERE placeholder. Absent when the
    /// dialect cannot assign any column of the table.
    #[must_use]
    pub const fn update_all(&self) -> Option<&SqlTemplate> {
        self.update_all.as_ref()
    }

    /// DELETE with a WHERE placeholder.
    #[must_use]
    pub const fn delete(&self) -> &SqlTemplate {
        &self.delete
    }

    /// Iterates over the templates that exist for this table.
    pub fn iter(&self) -> impl Iterator<Item = &SqlTemplate> {
        [
            Some(&self.select),
            Some(&self.insert),
            Some(&self.insert_all),
            self.update_by_identity.as_ref(),
            self.update_all.as_ref(),
            Some(&self.delete),
        ]
        .into_iter()
        .flatten()
    }
}

fn parameters(dialect: &dyn Dialect, columns: &[&Column]) -> Vec<String> {
    columns.iter().map(|c| dialect.parameter(c.field())).collect()
}

fn select(dialect: &dyn Dialect, table: &TableDescriptor, columns: &[&Column]) -> SqlTemplate {
    let lines: Vec<String> = columns
        .iter()
        .map(|c| {
            format!(
                "    {}.{} AS {}",
                table.quoted_name(),
                c.quoted(),
                dialect.quote_alias(c.field())
            )
        })
        .collect();
    let sql = format!(
        "SELECT\n{}\nFROM {}\nWHERE\n    {WHERE_ALL};",
        lines.join(",\n"),
        table.quoted_name()
    );
    SqlTemplate::filterable("select", sql, WHERE_ALL, Vec::new())
}

fn insert(dialect: &dyn Dialect, table: &TableDescriptor, data: &[&Column]) -> SqlTemplate {
    let sql = match table.identity() {
        Some(identity) => dialect.insert_returning_identity(table.quoted_name(), data, identity),
        None => dialect.insert(table.quoted_name(), data),
    };
    SqlTemplate::new("insert", sql, parameters(dialect, data))
}

fn insert_all(dialect: &dyn Dialect, table: &TableDescriptor, all: &[&Column]) -> SqlTemplate {
    let mut sql = dialect.insert(table.quoted_name(), all);
    if table.identity().is_some() {
        sql = dialect.insert_explicit_identity(table.quoted_name(), sql);
    }
    SqlTemplate::new("insert_all", sql, parameters(dialect, all))
}

fn update_by_identity(
    dialect: &dyn Dialect,
    table: &TableDescriptor,
    data: &[&Column],
) -> Option<SqlTemplate> {
    let identity = table.identity()?;
    if data.is_empty() {
        return None;
    }
    let condition = format!("{} = {}", identity.quoted(), dialect.parameter(identity.field()));
    let mut params = parameters(dialect, data);
    params.push(dialect.parameter(identity.field()));
    Some(SqlTemplate::new(
        "update_by_identity",
        update_sql(dialect, table.quoted_name(), data, &condition),
        params,
    ))
}

fn update_all(
    dialect: &dyn Dialect,
    table: &TableDescriptor,
    all: &[&Column],
) -> Option<SqlTemplate> {
    let assigned: Vec<&Column> = all
        .iter()
        .copied()
        .filter(|c| dialect.updates_identity() || !c.is_identity())
        .collect();
    if assigned.is_empty() {
        return None;
    }
    Some(SqlTemplate::filterable(
        "update_all",
        update_sql(dialect, table.quoted_name(), &assigned, WHERE_ALL),
        WHERE_ALL,
        parameters(dialect, &assigned),
    ))
}

/// Renders `UPDATE <table> SET <col> = @<field>, ... WHERE <condition>;`.
pub(crate) fn update_sql(
    dialect: &dyn Dialect,
    table: &str,
    columns: &[&Column],
    condition: &str,
) -> String {
    let assignments: Vec<String> = columns
        .iter()
        .map(|c| format!("    {} = {}", c.quoted(), dialect.parameter(c.field())))
        .collect();
    format!(
        "UPDATE {table}\nSET\n{}\nWHERE\n    {condition};",
        assignments.join(",\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuilderConfig;
    use crate::dialect::DialectKind;
    use crate::model::{FieldDescriptor, ModelDescriptor, SemanticType};

    fn counter(dialect: DialectKind) -> TableDescriptor {
        let model = ModelDescriptor::new("Counter")
            .field(FieldDescriptor::new("Id", SemanticType::Int).identity());
        TableDescriptor::build(&model, dialect, None, &BuilderConfig::new()).unwrap()
    }

    #[test]
    fn test_identity_only_table_inserts_default_values() {
        let table = counter(DialectKind::Sqlite);
        assert_eq!(
            table.templates().insert().sql(),
            "INSERT INTO [Counter] DEFAULT VALUES;\nSELECT last_insert_rowid() AS Id;"
        );
        assert!(table.templates().insert().parameters().is_empty());
        assert!(table.templates().update_by_identity().is_none());
    }

    #[test]
    fn test_identity_only_table_on_sql_server() {
        let table = counter(DialectKind::SqlServer);
        assert_eq!(
            table.templates().insert().sql(),
            "DECLARE @InsertedIds TABLE ([Id] INT);\n\
             INSERT INTO [Counter]\n\
             OUTPUT Inserted.[Id] INTO @InsertedIds\n\
             DEFAULT VALUES;\n\
             SELECT [Id] AS Id FROM @InsertedIds;"
        );
        assert!(table.templates().update_all().is_none());
        assert_eq!(table.templates().iter().count(), 4);
    }

    #[test]
    fn test_splice_without_slot_fails() {
        let table = counter(DialectKind::Sqlite);
        let filter = CompiledFilter::always_true();
        assert_eq!(
            table.templates().insert().splice(&filter).unwrap_err(),
            SqlGenError::NoFilterSlot { template: "insert" }
        );
    }

    #[test]
    fn test_splice_replaces_placeholder() {
        let table = counter(DialectKind::Sqlite);
        let statement = table
            .templates()
            .delete()
            .splice(&CompiledFilter::always_true())
            .unwrap();
        assert_eq!(statement.sql, "DELETE FROM [Counter] WHERE 1 = 1;");
        assert!(statement.parameters.is_empty());
    }
}
