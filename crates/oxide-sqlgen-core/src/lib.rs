//! # oxide-sqlgen-core
//!
//! Metadata-driven SQL generation for SQLite and SQL Server.
//!
//! This crate provides:
//! - Table descriptors compiled once per model and dialect, cached behind an
//!   [`Arc`](std::sync::Arc)
//! - Canonical select/insert/update/delete templates with dialect-specific
//!   identity retrieval
//! - A chained filter compiler producing parameterized WHERE clauses
//! - Partial inserts and updates from ordered value payloads
//! - CREATE TABLE and SQLite FTS5 scripts
//!
//! Nothing here talks to a database. Statements carry their SQL text and the
//! named parameters to bind; executing them is up to the caller.
//!
//! ## Templates and filters
//!
//! ```rust
//! use oxide_sqlgen_core::config::BuilderConfig;
//! use oxide_sqlgen_core::dialect::DialectKind;
//! use oxide_sqlgen_core::filter::{Filter, Operator};
//! use oxide_sqlgen_core::model::{FieldDescriptor, ModelDescriptor, SemanticType};
//! use oxide_sqlgen_core::table::TableCache;
//!
//! let person = ModelDescriptor::new("Person")
//!     .field(FieldDescriptor::new("Id", SemanticType::Long))
//!     .field(FieldDescriptor::new("Name", SemanticType::String))
//!     .field(FieldDescriptor::new("Age", SemanticType::Int));
//!
//! let cache = TableCache::new(BuilderConfig::new());
//! let table = cache.get_or_build(&person, DialectKind::Sqlite, None).unwrap();
//!
//! assert_eq!(
//!     table.templates().insert().sql(),
//!     "INSERT INTO [Person] ([Name],[Age])\nVALUES (@Name,@Age);\nSELECT last_insert_rowid() AS Id;"
//! );
//!
//! let filter = Filter::new()
//!     .and("Age", Operator::GreaterThan, 30)
//!     .or("Name", Operator::Equal, "P1")
//!     .compile(&table)
//!     .unwrap();
//! let statement = table.templates().select().splice(&filter).unwrap();
//!
//! assert!(statement.sql.ends_with("WHERE\n    (Age > @p0) OR (Name = @p1);"));
//! assert_eq!(statement.parameters.len(), 2);
//! ```
//!
//! ## SQL Injection Prevention
//!
//! Caller values never reach the SQL text. Identifiers come from model
//! metadata and are quoted by the dialect; values are bound by name:
//!
//! ```rust
//! # use oxide_sqlgen_core::config::BuilderConfig;
//! # use oxide_sqlgen_core::dialect::DialectKind;
//! # use oxide_sqlgen_core::model::{FieldDescriptor, ModelDescriptor, SemanticType};
//! # use oxide_sqlgen_core::table::TableDescriptor;
//! use oxide_sqlgen_core::payload::{partial_update, Payload};
//! use oxide_sqlgen_core::filter::{Filter, Operator};
//! use oxide_sqlgen_core::value::SqlValue;
//!
//! # let person = ModelDescriptor::new("Person")
//! #     .field(FieldDescriptor::new("Id", SemanticType::Long))
//! #     .field(FieldDescriptor::new("Name", SemanticType::String));
//! # let table = TableDescriptor::build(&person, DialectKind::Sqlite, None, &BuilderConfig::new()).unwrap();
//! let user_input = "'; DROP TABLE Person; --";
//! let statement = partial_update(
//!     &table,
//!     &Payload::new().set("Name", user_input),
//!     &Filter::where_("Id", Operator::Equal, 1),
//! )
//! .unwrap();
//!
//! assert_eq!(statement.sql, "UPDATE [Person]\nSET\n    [Name] = @Name\nWHERE\n    Id = @p0;");
//! assert_eq!(
//!     statement.parameters.get("@Name"),
//!     Some(&SqlValue::Text(user_input.to_string()))
//! );
//! ```

pub mod config;
pub mod ddl;
pub mod dialect;
pub mod error;
pub mod filter;
pub mod model;
pub mod payload;
pub mod table;
pub mod template;
pub mod value;

pub use config::{BuilderConfig, IdentityConvention};
pub use dialect::{Dialect, DialectKind};
pub use error::{ErrorKind, Result, SqlGenError};
pub use filter::{CompiledFilter, Filter, Operator, ParameterBag};
pub use model::{FieldDescriptor, FieldRef, Model, ModelDescriptor, SemanticType};
pub use payload::{partial_insert, partial_update, Payload};
pub use table::{Column, TableCache, TableDescriptor};
pub use template::{SqlTemplate, Statement, TableTemplates};
pub use value::{SqlValue, ToSqlValue};
