//! Primary key collation and foreign key enrichment.

use crate::catalog::{ForeignKeyRow, PrimaryKeyRow};
use crate::error::BuildError;
use crate::model::{Column, Constraint, ForeignKey, PrimaryKey};

/// Collate ordered per-column primary key rows into a single key.
///
/// Returns `None` when the table has no primary key rows.
pub fn collate_primary_key(
    table: &str,
    rows: &[PrimaryKeyRow],
) -> Result<Option<PrimaryKey>, BuildError> {
    let Some(first) = rows.first() else {
        return Ok(None);
    };

    let mut key = PrimaryKey {
        name: first.constraint_name.clone(),
        columns: Vec::with_capacity(rows.len()),
    };

    for row in rows {
        if row.constraint_name != key.name {
            return Err(BuildError::ConflictingPrimaryKey {
                table: table.to_string(),
                first: key.name,
                second: row.constraint_name.clone(),
            });
        }
        key.columns.push(row.column_name.clone());
    }

    Ok(Some(key))
}

/// Check that every primary key column exists in the table
pub fn check_primary_key(
    table: &str,
    key: &PrimaryKey,
    columns: &[Column],
) -> Result<(), BuildError> {
    for name in &key.columns {
        if !columns.iter().any(|c| &c.name == name) {
            return Err(BuildError::MissingColumn {
                constraint_kind: "primary key",
                constraint: key.name.clone(),
                table: table.to_string(),
                column: name.clone(),
            });
        }
    }
    Ok(())
}

/// Build foreign keys for a table and tag their source columns.
///
/// Each key's nullability is copied from its source column. A key whose
/// source column is not in `columns` is an error.
pub fn enrich_foreign_keys(
    schema_name: &str,
    table: &str,
    columns: &mut [Column],
    rows: &[ForeignKeyRow],
) -> Result<Vec<ForeignKey>, BuildError> {
    let mut foreign_keys = Vec::with_capacity(rows.len());

    for row in rows {
        let column = columns
            .iter_mut()
            .find(|c| c.name == row.source_column)
            .ok_or_else(|| BuildError::MissingColumn {
                constraint_kind: "foreign key",
                constraint: row.constraint_name.clone(),
                table: table.to_string(),
                column: row.source_column.clone(),
            })?;

        column.constraints.insert(Constraint::Fk);

        foreign_keys.push(ForeignKey {
            name: row.constraint_name.clone(),
            source_table: table.to_string(),
            source_column: row.source_column.clone(),
            target_table: row.target_table.clone(),
            target_column: row.target_column.clone(),
            referenced_schema: row
                .target_schema
                .clone()
                .unwrap_or_else(|| schema_name.to_string()),
            nullable: column.nullable,
        });
    }

    Ok(foreign_keys)
}
