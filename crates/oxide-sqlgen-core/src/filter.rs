//! Chained filter expressions.
//!
//! A [`Filter`] is a left-leaning chain of predicates joined by AND or OR. It
//! compiles against a [`TableDescriptor`] into the complete body of a WHERE
//! clause plus the values to bind. Chains are compiled strictly left to right
//! with no operator precedence:
//!
//! ```rust
//! use oxide_sqlgen_core::config::BuilderConfig;
//! use oxide_sqlgen_core::dialect::DialectKind;
//! use oxide_sqlgen_core::filter::{Filter, Operator};
//! use oxide_sqlgen_core::model::{FieldDescriptor, ModelDescriptor, SemanticType};
//! use oxide_sqlgen_core::table::TableDescriptor;
//! use oxide_sqlgen_core::value::SqlValue;
//!
//! let person = ModelDescriptor::new("Person")
//!     .field(FieldDescriptor::new("Id", SemanticType::Long).identity())
//!     .field(FieldDescriptor::new("Name", SemanticType::String))
//!     .field(FieldDescriptor::new("Age", SemanticType::Int));
//! let table =
//!     TableDescriptor::build(&person, DialectKind::Sqlite, None, &BuilderConfig::new()).unwrap();
//!
//! let compiled = Filter::new()
//!     .and("Age", Operator::GreaterThan, 30)
//!     .or("Name", Operator::Equal, "P1")
//!     .compile(&table)
//!     .unwrap();
//!
//! assert_eq!(compiled.where_clause(), "(Age > @p0) OR (Name = @p1)");
//! assert_eq!(
//!     compiled.parameters().values().cloned().collect::<Vec<_>>(),
//!     vec![SqlValue::Int(30), SqlValue::Text("P1".into())]
//! );
//! ```

use std::fmt;

use tracing::{debug, trace};

use crate::error::Result;
use crate::table::TableDescriptor;
use crate::template::WHERE_ALL;
use crate::value::{SqlValue, ToSqlValue};

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Equal (=)
    Equal,
    /// Not equal (<>)
    NotEqual,
    /// Greater than (>)
    GreaterThan,
    /// Greater than or equal (>=)
    GreaterThanOrEqual,
    /// Less than (<)
    LessThan,
    /// Less than or equal (<=)
    LessThanOrEqual,
    /// Member of a value set (IN)
    In,
    /// Not a member of a value set (NOT IN)
    NotIn,
}

impl Operator {
    /// Returns the SQL spelling of the operator.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
        }
    }

    /// Returns `true` for set operators.
    #[must_use]
    pub const fn is_set(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Boolean connective between a chain and its next predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    /// AND
    And,
    /// OR
    Or,
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::And => "AND",
            Self::Or => "OR",
        })
    }
}

/// A single `field op value` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    field: String,
    operator: Operator,
    values: Vec<SqlValue>,
}

impl Predicate {
    /// Creates a comparison predicate. With `In` or `NotIn` the value is
    /// treated as a one-element set.
    #[must_use]
    pub fn new(field: impl Into<String>, operator: Operator, value: impl ToSqlValue) -> Self {
        Self {
            field: field.into(),
            operator,
            values: vec![value.to_sql_value()],
        }
    }

    /// Creates an `IN` predicate.
    #[must_use]
    pub fn is_in<V: ToSqlValue>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::set(field, Operator::In, values)
    }

    /// Creates a `NOT IN` predicate.
    #[must_use]
    pub fn not_in<V: ToSqlValue>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::set(field, Operator::NotIn, values)
    }

    fn set<V: ToSqlValue>(
        field: impl Into<String>,
        operator: Operator,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            values: values.into_iter().map(ToSqlValue::to_sql_value).collect(),
        }
    }

    /// Returns the referenced field.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the operator.
    #[must_use]
    pub const fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns the operand values.
    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    fn compile(&self, table: &TableDescriptor, params: &mut ParameterBag) -> Result<String> {
        let column = table.resolve(&self.field)?.name();
        let dialect = table.dialect();

        if self.operator.is_set() {
            if self.values.is_empty() {
                // Empty sets compile to constants and bind nothing.
                let constant = if self.operator == Operator::In { "1=0" } else { "1=1" };
                return Ok(constant.to_string());
            }
            let placeholders: Vec<String> = self
                .values
                .iter()
                .map(|value| params.bind(dialect, value.clone()))
                .collect();
            return Ok(format!(
                "{column} {} ({})",
                self.operator,
                placeholders.join(",")
            ));
        }

        let value = self.values.first().cloned().unwrap_or(SqlValue::Null);
        if value.is_null() {
            match self.operator {
                Operator::Equal => return Ok(format!("{column} IS NULL")),
                Operator::NotEqual => return Ok(format!("{column} IS NOT NULL")),
                _ => {}
            }
        }
        let placeholder = params.bind(dialect, value);
        Ok(format!("{column} {} {placeholder}", self.operator))
    }
}

/// One link of a filter chain, in compilation order.
///
/// `And` and `Or` combine everything before them with their predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterNode<'a> {
    /// The first predicate of a chain.
    Predicate(&'a Predicate),
    /// `(prior) AND (predicate)`
    And(&'a Predicate),
    /// `(prior) OR (predicate)`
    Or(&'a Predicate),
}

/// A composable filter.
///
/// The first predicate added to an empty filter starts the chain, whichever
/// connective adds it. The chain is stored flat, so its length is bounded by
/// memory only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    first: Option<Predicate>,
    rest: Vec<(Connective, Predicate)>,
}

impl Filter {
    /// Creates an empty filter, which matches every row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            first: None,
            rest: Vec::new(),
        }
    }

    /// Creates a filter from its first predicate.
    #[must_use]
    pub fn where_(field: impl Into<String>, operator: Operator, value: impl ToSqlValue) -> Self {
        Self::new().and(field, operator, value)
    }

    /// Appends `AND field op value`.
    #[must_use]
    pub fn and(
        self,
        field: impl Into<String>,
        operator: Operator,
        value: impl ToSqlValue,
    ) -> Self {
        self.push(Connective::And, Predicate::new(field, operator, value))
    }

    /// Appends `OR field op value`.
    #[must_use]
    pub fn or(self, field: impl Into<String>, operator: Operator, value: impl ToSqlValue) -> Self {
        self.push(Connective::Or, Predicate::new(field, operator, value))
    }

    /// Appends `AND field IN (values)`.
    #[must_use]
    pub fn and_in<V: ToSqlValue>(
        self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.push(Connective::And, Predicate::is_in(field, values))
    }

    /// Appends `OR field IN (values)`.
    #[must_use]
    pub fn or_in<V: ToSqlValue>(
        self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.push(Connective::Or, Predicate::is_in(field, values))
    }

    /// Appends `AND field NOT IN (values)`.
    #[must_use]
    pub fn and_not_in<V: ToSqlValue>(
        self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.push(Connective::And, Predicate::not_in(field, values))
    }

    /// Appends `OR field NOT IN (values)`.
    #[must_use]
    pub fn or_not_in<V: ToSqlValue>(
        self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.push(Connective::Or, Predicate::not_in(field, values))
    }

    /// Appends a predicate with the given connective.
    #[must_use]
    pub fn push(mut self, connective: Connective, predicate: Predicate) -> Self {
        if self.first.is_none() {
            self.first = Some(predicate);
        } else {
            self.rest.push((connective, predicate));
        }
        self
    }

    /// Iterates over the chain in compilation order.
    pub fn nodes(&self) -> impl Iterator<Item = FilterNode<'_>> {
        self.first
            .iter()
            .map(FilterNode::Predicate)
            .chain(self.rest.iter().map(|(connective, predicate)| match connective {
                Connective::And => FilterNode::And(predicate),
                Connective::Or => FilterNode::Or(predicate),
            }))
    }

    /// Returns the number of predicates.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.first.is_some()) + self.rest.len()
    }

    /// Returns `true` if no predicate has been added.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    /// Compiles the filter into a WHERE body for `table`.
    ///
    /// # Errors
    ///
    /// Returns an unknown-field error naming the first predicate whose field
    /// is missing from the table or ignored.
    pub fn compile(&self, table: &TableDescriptor) -> Result<CompiledFilter> {
        let Some(first) = &self.first else {
            return Ok(CompiledFilter::always_true());
        };

        // `((a) OR (b)) AND (c)`: every combinator opens one parenthesis up
        // front and closes it after the accumulated text.
        let mut params = ParameterBag::new();
        let mut sql = "(".repeat(self.rest.len());
        sql.push_str(&first.compile(table, &mut params)?);
        for (connective, predicate) in &self.rest {
            let term = predicate.compile(table, &mut params)?;
            sql.push_str(&format!(") {connective} ("));
            sql.push_str(&term);
            sql.push(')');
        }

        debug!(table = %table.name(), where_clause = %sql, params = params.len(), "compiled filter");
        Ok(CompiledFilter { sql, params })
    }
}

impl From<Predicate> for Filter {
    fn from(predicate: Predicate) -> Self {
        Self::new().push(Connective::And, predicate)
    }
}

/// Ordered named parameter values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterBag(Vec<(String, SqlValue)>);

impl ParameterBag {
    /// Creates an empty bag.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a named value.
    pub fn push(&mut self, name: impl Into<String>, value: SqlValue) {
        self.0.push((name.into(), value));
    }

    /// Appends a value under the next sequential name (`@p0`, `@p1`, ...)
    /// and returns that name.
    fn bind(&mut self, dialect: &dyn crate::dialect::Dialect, value: SqlValue) -> String {
        let name = dialect.parameter(&format!("p{}", self.0.len()));
        trace!(parameter = %name, value = %value, "bound filter parameter");
        self.0.push((name.clone(), value));
        name
    }

    /// Appends every entry of `other`.
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Iterates over `(name, value)` pairs in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Iterates over parameter names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    /// Iterates over parameter values.
    pub fn values(&self) -> impl Iterator<Item = &SqlValue> {
        self.0.iter().map(|(_, v)| v)
    }
}

impl IntoIterator for ParameterBag {
    type Item = (String, SqlValue);
    type IntoIter = std::vec::IntoIter<(String, SqlValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A compiled WHERE body and its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFilter {
    sql: String,
    params: ParameterBag,
}

impl CompiledFilter {
    /// The filter that matches every row.
    #[must_use]
    pub fn always_true() -> Self {
        Self {
            sql: WHERE_ALL.to_string(),
            params: ParameterBag::new(),
        }
    }

    /// Returns the WHERE body.
    #[must_use]
    pub fn where_clause(&self) -> &str {
        &self.sql
    }

    /// Returns the parameters to bind.
    #[must_use]
    pub const fn parameters(&self) -> &ParameterBag {
        &self.params
    }

    /// Splits into WHERE body and parameters.
    #[must_use]
    pub fn into_parts(self) -> (String, ParameterBag) {
        (self.sql, self.params)
    }
}
