//! DuckDB catalog dialect.
//!
//! Reads catalog metadata from an embedded DuckDB database file through
//! `information_schema` and the `duckdb_*()` table functions. DuckDB has no
//! partitioning or materialized views, and struct types are reported by their
//! full definition, so only enums resolve through the user-defined type path.
//!
//! DuckDB reports a column's type by name only, never by the schema that owns
//! the type. When enums with the same name exist in several schemas, a column
//! resolves to the enum in its own schema if there is one, otherwise to the
//! first owning schema by name. A column typed `other.status` in a schema that
//! also has its own `status` is therefore shown with the local enum.

use super::{
    CatalogConnection, CatalogReader, ColumnRow, CompositeTypeRow, ConnectionFactory, Dialect,
    EnumRow, ForeignKeyRow, PrimaryKeyRow, TableRow, ViewRow,
};
use crate::model::{ColumnKey, UdtMap, UdtReference};
use ::duckdb::{params, AccessMode, Config, Connection};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

const LIST_SCHEMAS: &str = "\
    SELECT schema_name FROM information_schema.schemata \
    WHERE catalog_name = current_database() \
      AND schema_name NOT IN ('information_schema', 'pg_catalog') \
    ORDER BY schema_name";

const LIST_RELATIONS: &str = "\
    SELECT table_name FROM information_schema.tables \
    WHERE table_catalog = current_database() AND table_schema = ? AND table_type = ? \
    ORDER BY table_name";

const LIST_COLUMNS: &str = "\
    SELECT c.column_name, \
           CAST(c.ordinal_position AS INTEGER), \
           CASE WHEN EXISTS ( \
               SELECT 1 FROM duckdb_types() t \
               WHERE t.database_name = c.table_catalog \
                 AND t.logical_type = 'ENUM' \
                 AND t.type_name = c.data_type \
           ) THEN 'USER-DEFINED' ELSE c.data_type END, \
           c.is_nullable, \
           CAST(c.character_maximum_length AS INTEGER), \
           c.column_default \
    FROM information_schema.columns c \
    WHERE c.table_catalog = current_database() AND c.table_schema = ? AND c.table_name = ? \
    ORDER BY c.ordinal_position";

const LIST_COLUMN_CONSTRAINTS: &str = "\
    SELECT DISTINCT constraint_type, column_name FROM ( \
        SELECT constraint_type, unnest(constraint_column_names) AS column_name \
        FROM duckdb_constraints() \
        WHERE database_name = current_database() AND schema_name = ? AND table_name = ? \
          AND constraint_type IN ('UNIQUE', 'CHECK') \
    ) c";

const PRIMARY_KEY: &str = "\
    SELECT constraint_name, unnest(constraint_column_names) AS column_name \
    FROM duckdb_constraints() \
    WHERE database_name = current_database() AND schema_name = ? AND table_name = ? \
      AND constraint_type = 'PRIMARY KEY'";

const FOREIGN_KEYS: &str = "\
    SELECT constraint_name, \
           unnest(constraint_column_names) AS source_column, \
           referenced_table, \
           unnest(referenced_column_names) AS target_column \
    FROM duckdb_constraints() \
    WHERE database_name = current_database() AND schema_name = ? AND table_name = ? \
      AND constraint_type = 'FOREIGN KEY' \
    ORDER BY constraint_index";

const LIST_ENUMS: &str = "\
    SELECT type_name FROM duckdb_types() \
    WHERE database_name = current_database() AND schema_name = ? AND logical_type = 'ENUM' \
    ORDER BY type_oid";

const UDT_MAPPINGS: &str = "\
    SELECT c.table_name, c.column_name, t.schema_name, t.type_name \
    FROM information_schema.columns c \
    JOIN duckdb_types() t \
      ON t.database_name = c.table_catalog AND t.logical_type = 'ENUM' AND t.type_name = c.data_type \
    WHERE c.table_catalog = current_database() AND c.table_schema = ? \
    ORDER BY c.table_name, c.ordinal_position, t.schema_name = c.table_schema DESC, t.schema_name";

/// Connection factory for a DuckDB database file
#[derive(Debug, Clone)]
pub struct DuckDbConnector {
    path: PathBuf,
}

impl DuckDbConnector {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl ConnectionFactory for DuckDbConnector {
    fn dialect(&self) -> Dialect {
        Dialect::DuckDb
    }

    fn acquire(&self) -> Result<Box<dyn CatalogConnection>> {
        if !self.path.exists() {
            bail!("DuckDB database not found: {}", self.path.display());
        }

        let config = Config::default()
            .access_mode(AccessMode::ReadOnly)
            .context("Failed to configure read-only DuckDB access")?;
        let conn = Connection::open_with_flags(&self.path, config).with_context(|| {
            format!("Failed to open DuckDB database: {}", self.path.display())
        })?;

        Ok(Box::new(DuckDbConnection { conn: Some(conn) }))
    }
}

/// An open DuckDB connection
pub struct DuckDbConnection {
    conn: Option<Connection>,
}

impl DuckDbConnection {
    /// Wrap an already open connection
    pub fn new(conn: Connection) -> Self {
        Self { conn: Some(conn) }
    }
}

impl CatalogConnection for DuckDbConnection {
    fn reader(&mut self) -> Result<Box<dyn CatalogReader + '_>> {
        match self.conn.as_ref() {
            Some(conn) => Ok(Box::new(DuckDbReader::new(conn))),
            None => bail!("DuckDB connection is closed"),
        }
    }

    fn close(&mut self) -> Result<()> {
        match self.conn.take() {
            Some(conn) => conn
                .close()
                .map_err(|(_, e)| e)
                .context("Failed to close DuckDB connection"),
            None => bail!("DuckDB connection already closed"),
        }
    }
}

/// Catalog reader issuing DuckDB catalog queries
pub struct DuckDbReader<'a> {
    conn: &'a Connection,
}

impl<'a> DuckDbReader<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn relations(&self, schema: &str, table_type: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(LIST_RELATIONS)
            .context("Failed to prepare relation query")?;
        let names = stmt
            .query_map(params![schema, table_type], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to list {} relations in '{}'", table_type, schema))?;
        Ok(names)
    }

    fn column_constraints(&self, schema: &str, table: &str) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare(LIST_COLUMN_CONSTRAINTS)
            .context("Failed to prepare column constraint query")?;
        let rows = stmt
            .query_map(params![schema, table], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to list constraints of {}.{}", schema, table))?;
        Ok(rows)
    }
}

impl CatalogReader for DuckDbReader<'_> {
    fn list_schemas(&mut self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(LIST_SCHEMAS)
            .context("Failed to prepare schema query")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to list schemas")?;
        Ok(names)
    }

    fn list_tables(&mut self, schema: &str) -> Result<Vec<TableRow>> {
        Ok(self
            .relations(schema, "BASE TABLE")?
            .into_iter()
            .map(|name| TableRow {
                name,
                ..TableRow::default()
            })
            .collect())
    }

    fn list_columns(&mut self, schema: &str, relation: &str) -> Result<Vec<ColumnRow>> {
        let constraints = self.column_constraints(schema, relation)?;

        let mut stmt = self
            .conn
            .prepare(LIST_COLUMNS)
            .context("Failed to prepare column query")?;
        let rows = stmt
            .query_map(params![schema, relation], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i32>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<i32>>(4)?,
                    row.get::<_, Option<String>>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to list columns of {}.{}", schema, relation))?;

        let has = |kind: &str, column: &str| {
            constraints
                .iter()
                .any(|(k, c)| k == kind && c == column)
        };

        Ok(rows
            .into_iter()
            .map(|(name, ordinal, data_type, is_nullable, max_length, default)| {
                let auto_increment = default
                    .as_deref()
                    .map(|d| d.to_lowercase().starts_with("nextval("))
                    .unwrap_or(false);
                ColumnRow {
                    unique: has("UNIQUE", &name),
                    check: has("CHECK", &name),
                    default: default.is_some() && !auto_increment,
                    auto_increment,
                    generated: false,
                    ordinal: ordinal.max(0) as u32,
                    data_type,
                    nullable: is_nullable.eq_ignore_ascii_case("YES"),
                    max_length: max_length.unwrap_or(0).max(0) as u32,
                    name,
                }
            })
            .collect())
    }

    fn primary_key(&mut self, schema: &str, table: &str) -> Result<Vec<PrimaryKeyRow>> {
        let mut stmt = self
            .conn
            .prepare(PRIMARY_KEY)
            .context("Failed to prepare primary key query")?;
        let rows = stmt
            .query_map(params![schema, table], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to read primary key of {}.{}", schema, table))?;

        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(i, (constraint_name, column_name))| PrimaryKeyRow {
                constraint_name,
                column_name,
                ordinal: i as u32 + 1,
            })
            .collect())
    }

    fn list_foreign_keys(&mut self, schema: &str, table: &str) -> Result<Vec<ForeignKeyRow>> {
        let mut stmt = self
            .conn
            .prepare(FOREIGN_KEYS)
            .context("Failed to prepare foreign key query")?;
        let rows = stmt
            .query_map(params![schema, table], |row| {
                Ok(ForeignKeyRow {
                    constraint_name: row.get(0)?,
                    source_column: row.get(1)?,
                    target_table: row.get(2)?,
                    target_column: row.get(3)?,
                    target_schema: None,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to list foreign keys of {}.{}", schema, table))?;
        Ok(rows)
    }

    fn list_enums(&mut self, schema: &str) -> Result<Vec<EnumRow>> {
        let mut stmt = self
            .conn
            .prepare(LIST_ENUMS)
            .context("Failed to prepare enum query")?;
        let names = stmt
            .query_map(params![schema], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to list enums in '{}'", schema))?;
        Ok(names.into_iter().map(|name| EnumRow { name }).collect())
    }

    fn list_enum_values(&mut self, schema: &str, enum_name: &str) -> Result<Vec<String>> {
        // Enum values sort by declaration position
        let sql = format!(
            "SELECT CAST(v AS VARCHAR) FROM (SELECT unnest(enum_range(NULL::{}.{})) AS v) e ORDER BY v",
            quote_ident(schema),
            quote_ident(enum_name)
        );
        let mut stmt = self
            .conn
            .prepare(&sql)
            .context("Failed to prepare enum value query")?;
        let values = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to list values of enum {}.{}", schema, enum_name))?;
        Ok(values)
    }

    fn list_composite_types(&mut self, _schema: &str) -> Result<Vec<CompositeTypeRow>> {
        Ok(Vec::new())
    }

    fn list_views(&mut self, schema: &str) -> Result<Vec<ViewRow>> {
        Ok(self
            .relations(schema, "VIEW")?
            .into_iter()
            .map(|name| ViewRow { name })
            .collect())
    }

    fn list_materialized_views(&mut self, _schema: &str) -> Result<Vec<ViewRow>> {
        Ok(Vec::new())
    }

    fn column_udt_mappings(&mut self, schema: &str) -> Result<UdtMap> {
        let mut stmt = self
            .conn
            .prepare(UDT_MAPPINGS)
            .context("Failed to prepare type mapping query")?;
        let rows = stmt
            .query_map(params![schema], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to read type mappings of '{}'", schema))?;

        let mut map = UdtMap::new();
        for (relation, column, type_schema, type_name) in rows {
            // Same-schema types sort first; keep the first match per column
            map.entry(ColumnKey::new(relation, column))
                .or_insert_with(|| UdtReference::new(type_schema, type_name));
        }
        Ok(map)
    }
}

/// Quote an identifier for interpolation into DuckDB SQL
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
