//! Partial payloads for targeted inserts and updates.
//!
//! A [`Payload`] is an ordered bag of field values. Only the columns named in
//! the payload take part in the generated statement, and every value is bound
//! as `@<field>` in payload order.

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{Result, SqlGenError};
use crate::filter::{Filter, ParameterBag};
use crate::table::{Column, TableDescriptor};
use crate::template::{update_sql, Statement};
use crate::value::{SqlValue, ToSqlValue};

/// Ordered field-name to value map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(IndexMap<String, SqlValue>);

impl Payload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Sets a field value, builder style.
    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: impl ToSqlValue) -> Self {
        self.insert(field, value);
        self
    }

    /// Sets a field value. Setting a field twice keeps its first position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl ToSqlValue) {
        self.0.insert(field.into(), value.to_sql_value());
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(field, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<IndexMap<String, SqlValue>> for Payload {
    fn from(map: IndexMap<String, SqlValue>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: ToSqlValue> FromIterator<(K, V)> for Payload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut payload = Self::new();
        for (field, value) in iter {
            payload.insert(field, value);
        }
        payload
    }
}

/// A payload value resolved to its column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnBinding<'a> {
    /// Target column.
    pub column: &'a Column,
    /// Value to bind.
    pub value: &'a SqlValue,
}

/// Resolves every payload key to a column of `table`, in payload order.
///
/// Keys are matched like filter fields: field name first, then column name
/// ignoring ASCII case.
///
/// # Errors
///
/// Returns [`SqlGenError::EmptyPayload`] for an empty payload, an
/// unknown-field error for keys that are not persisted columns, and
/// [`SqlGenError::ColumnCollision`] when two keys name the same column.
pub fn resolve_columns<'a>(
    table: &'a TableDescriptor,
    payload: &'a Payload,
) -> Result<Vec<ColumnBinding<'a>>> {
    if payload.is_empty() {
        return Err(SqlGenError::EmptyPayload {
            model: table.model().to_string(),
        });
    }

    let mut bindings: Vec<ColumnBinding<'a>> = Vec::with_capacity(payload.len());
    for (key, value) in &payload.0 {
        let column = table.resolve(key)?;
        if let Some(prior) = bindings.iter().find(|b| b.column.field() == column.field()) {
            return Err(SqlGenError::ColumnCollision {
                model: table.model().to_string(),
                column: column.name().to_string(),
                first: prior.column.field().to_string(),
                second: key.clone(),
            });
        }
        bindings.push(ColumnBinding { column, value });
    }
    Ok(bindings)
}

fn bind(table: &TableDescriptor, bindings: &[ColumnBinding<'_>]) -> ParameterBag {
    let dialect = table.dialect();
    let mut params = ParameterBag::new();
    for binding in bindings {
        let name = dialect.parameter(binding.column.field());
        trace!(parameter = %name, value = %binding.value, "bound payload value");
        params.push(name, binding.value.clone());
    }
    params
}

/// Builds an INSERT of the payload's columns only.
///
/// When the table has an identity that the payload does not supply, the
/// dialect's generated-identity fetch is appended. A payload that supplies
/// the identity is inserted the way the dialect inserts explicit identities.
///
/// # Errors
///
/// See [`resolve_columns`].
pub fn partial_insert(table: &TableDescriptor, payload: &Payload) -> Result<Statement> {
    let bindings = resolve_columns(table, payload)?;
    let dialect = table.dialect();
    let columns: Vec<&Column> = bindings.iter().map(|b| b.column).collect();

    let sql = match table.identity() {
        Some(identity) if !columns.iter().any(|c| c.is_identity()) => {
            dialect.insert_returning_identity(table.quoted_name(), &columns, identity)
        }
        Some(_) => {
            let insert = dialect.insert(table.quoted_name(), &columns);
            dialect.insert_explicit_identity(table.quoted_name(), insert)
        }
        None => dialect.insert(table.quoted_name(), &columns),
    };

    debug!(table = %table.name(), columns = columns.len(), "built partial insert");
    Ok(Statement {
        sql,
        parameter_names: Vec::new(),
        parameters: bind(table, &bindings),
    })
}

/// Builds an UPDATE of the payload's columns, restricted by `filter`.
///
/// Payload parameters come first, followed by the filter's `@pN` parameters.
///
/// # Errors
///
/// Fails like [`resolve_columns`] and [`Filter::compile`], and with
/// [`SqlGenError::Unsupported`] when the payload assigns the identity on a
/// dialect that forbids it.
pub fn partial_update(
    table: &TableDescriptor,
    payload: &Payload,
    filter: &Filter,
) -> Result<Statement> {
    let bindings = resolve_columns(table, payload)?;
    let dialect = table.dialect();
    if !dialect.updates_identity() && bindings.iter().any(|b| b.column.is_identity()) {
        return Err(SqlGenError::Unsupported {
            dialect: dialect.name(),
            feature: "updating an identity column",
        });
    }

    let (where_clause, filter_params) = filter.compile(table)?.into_parts();
    let columns: Vec<&Column> = bindings.iter().map(|b| b.column).collect();
    let sql = update_sql(dialect, table.quoted_name(), &columns, &where_clause);

    let mut parameters = bind(table, &bindings);
    parameters.extend(filter_params);

    debug!(table = %table.name(), columns = columns.len(), "built partial update");
    Ok(Statement {
        sql,
        parameter_names: Vec::new(),
        parameters,
    })
}
