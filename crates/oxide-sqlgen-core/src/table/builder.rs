//! Compilation of model descriptors into table descriptors.

use std::collections::HashMap;

use tracing::debug;

use super::{Column, TableDescriptor};
use crate::config::BuilderConfig;
use crate::dialect::DialectKind;
use crate::error::{Result, SqlGenError};
use crate::model::ModelDescriptor;
use crate::template::TableTemplates;

impl TableDescriptor {
    /// Compiles a model into a table descriptor without caching it.
    ///
    /// The table name is `table_override`, else the model's table alias, else
    /// the model name. Fields keep their declaration order; ignored fields get
    /// no column.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the model declares a field twice,
    /// maps two fields to one column, marks more than one identity, marks a
    /// non-integer identity, has a type the dialect cannot store, or has no
    /// persisted field at all.
    pub fn build(
        model: &ModelDescriptor,
        dialect: DialectKind,
        table_override: Option<&str>,
        config: &BuilderConfig,
    ) -> Result<Self> {
        let strategy = dialect.dialect();
        let name = table_override
            .or(model.table.as_deref())
            .unwrap_or(&model.name)
            .to_string();

        let mut columns: Vec<Column> = Vec::with_capacity(model.fields.len());
        let mut ignored = Vec::new();
        let mut by_field: HashMap<String, usize> = HashMap::new();
        let mut by_column: HashMap<String, usize> = HashMap::new();
        let mut marked_identity: Option<usize> = None;

        for field in &model.fields {
            if by_field.contains_key(&field.name) || ignored.contains(&field.name) {
                return Err(SqlGenError::DuplicateField {
                    model: model.name.clone(),
                    field: field.name.clone(),
                });
            }
            if field.ignored {
                ignored.push(field.name.clone());
                continue;
            }
            let Some(native_type) = strategy.map_type(&field.ty) else {
                return Err(SqlGenError::UnmappedType {
                    dialect: strategy.name(),
                    model: model.name.clone(),
                    field: field.name.clone(),
                    ty: field.ty.to_string(),
                });
            };

            let column_name = field.column_name();
            let index = columns.len();
            if let Some(&existing) = by_column.get(&column_name.to_ascii_lowercase()) {
                return Err(SqlGenError::ColumnCollision {
                    model: model.name.clone(),
                    column: column_name.to_string(),
                    first: columns[existing].field.clone(),
                    second: field.name.clone(),
                });
            }
            if field.identity {
                if let Some(first) = marked_identity {
                    return Err(SqlGenError::DuplicateIdentity {
                        model: model.name.clone(),
                        first: columns[first].field.clone(),
                        second: field.name.clone(),
                    });
                }
                marked_identity = Some(index);
            }

            by_field.insert(field.name.clone(), index);
            by_column.insert(column_name.to_ascii_lowercase(), index);
            columns.push(Column {
                field: field.name.clone(),
                name: column_name.to_string(),
                quoted: strategy.quote_identifier(column_name),
                ty: field.ty.clone(),
                native_type,
                nullable: field.nullable,
                identity: false,
            });
        }

        if columns.is_empty() {
            return Err(SqlGenError::NoColumns {
                model: model.name.clone(),
            });
        }

        let identity = marked_identity.or_else(|| {
            let conventional = config.identity_convention.field_name()?;
            by_field
                .get(conventional)
                .copied()
                .filter(|&i| columns[i].ty.is_integer() && !columns[i].nullable)
        });
        if let Some(i) = identity {
            let column = &mut columns[i];
            if !column.ty.is_integer() {
                return Err(SqlGenError::InvalidIdentityType {
                    model: model.name.clone(),
                    field: column.field.clone(),
                    ty: column.ty.to_string(),
                });
            }
            column.identity = true;
        }

        let mut table = Self {
            model: model.name.clone(),
            quoted_name: strategy.quote_identifier(&name),
            name,
            dialect,
            columns,
            identity,
            ignored,
            by_field,
            by_column,
            templates: TableTemplates::default(),
        };
        table.templates = TableTemplates::generate(&table);

        debug!(
            model = %model.key(),
            table = %table.name,
            dialect = %dialect,
            columns = table.columns.len(),
            identity = ?table.identity().map(Column::field),
            "built table descriptor"
        );
        Ok(table)
    }
}
