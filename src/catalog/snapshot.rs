//! YAML catalog snapshots.
//!
//! A snapshot holds the raw catalog rows of one or more schemas, exactly as a
//! live dialect would return them. Useful for generating diagrams without
//! database access and for reproducible fixtures.
//!
//! ```yaml
//! schemas:
//!   - name: public
//!     enums:
//!       - name: order_status
//!         values: [pending, paid]
//!     tables:
//!       - name: orders
//!         columns:
//!           - { name: id, ordinal: 1, data_type: integer }
//!           - { name: status, ordinal: 2, data_type: USER-DEFINED }
//!         primary_key:
//!           - { constraint_name: orders_pkey, column_name: id, ordinal: 1 }
//!     udt_mappings:
//!       - { relation: orders, column: status, type_schema: public, type_name: order_status }
//! ```

use super::{
    CatalogConnection, CatalogReader, ColumnRow, CompositeTypeRow, ConnectionFactory, Dialect,
    EnumRow, ForeignKeyRow, PrimaryKeyRow, TableRow, ViewRow,
};
use crate::model::{ColumnKey, UdtMap, UdtReference};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Enum with its labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotEnum {
    pub name: String,
    pub values: Vec<String>,
}

/// Table with all of its catalog rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotTable {
    #[serde(flatten)]
    pub table: TableRow,
    pub columns: Vec<ColumnRow>,
    pub primary_key: Vec<PrimaryKeyRow>,
    pub foreign_keys: Vec<ForeignKeyRow>,
}

/// View or materialized view with its columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotView {
    pub name: String,
    pub columns: Vec<ColumnRow>,
}

/// Column-to-type mapping row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotUdtMapping {
    pub relation: String,
    pub column: String,
    pub type_schema: String,
    pub type_name: String,
}

/// All catalog rows of one schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotSchema {
    pub name: String,
    pub enums: Vec<SnapshotEnum>,
    pub composite_types: Vec<CompositeTypeRow>,
    pub tables: Vec<SnapshotTable>,
    pub views: Vec<SnapshotView>,
    pub materialized_views: Vec<SnapshotView>,
    pub udt_mappings: Vec<SnapshotUdtMapping>,
}

/// Complete catalog snapshot file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSnapshot {
    pub schemas: Vec<SnapshotSchema>,
}

impl CatalogSnapshot {
    /// Load a snapshot from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog snapshot: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Invalid catalog snapshot: {}", path.display()))
    }

    /// Parse a snapshot from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let snapshot: CatalogSnapshot = serde_yaml_ng::from_str(yaml)?;
        Ok(snapshot)
    }

    /// Serialize the snapshot to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Get a schema by name
    pub fn schema(&self, name: &str) -> Option<&SnapshotSchema> {
        self.schemas.iter().find(|s| s.name == name)
    }
}

impl SnapshotSchema {
    fn columns_of(&self, relation: &str) -> Vec<ColumnRow> {
        let columns = self
            .tables
            .iter()
            .find(|t| t.table.name == relation)
            .map(|t| &t.columns)
            .or_else(|| {
                self.views
                    .iter()
                    .chain(self.materialized_views.iter())
                    .find(|v| v.name == relation)
                    .map(|v| &v.columns)
            });

        let mut columns = columns.cloned().unwrap_or_default();
        columns.sort_by_key(|c| c.ordinal);
        columns
    }

    fn table(&self, name: &str) -> Option<&SnapshotTable> {
        self.tables.iter().find(|t| t.table.name == name)
    }
}

/// Connection factory reading a snapshot file on every acquire
#[derive(Debug, Clone)]
pub struct SnapshotConnector {
    path: PathBuf,
}

impl SnapshotConnector {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl ConnectionFactory for SnapshotConnector {
    fn dialect(&self) -> Dialect {
        Dialect::Snapshot
    }

    fn acquire(&self) -> Result<Box<dyn CatalogConnection>> {
        let snapshot = CatalogSnapshot::load(&self.path)?;
        Ok(Box::new(SnapshotConnection::new(snapshot)))
    }
}

/// An open snapshot "connection"
#[derive(Debug)]
pub struct SnapshotConnection {
    snapshot: Option<CatalogSnapshot>,
}

impl SnapshotConnection {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
        }
    }
}

impl CatalogConnection for SnapshotConnection {
    fn reader(&mut self) -> Result<Box<dyn CatalogReader + '_>> {
        match self.snapshot.as_ref() {
            Some(snapshot) => Ok(Box::new(SnapshotReader { snapshot })),
            None => bail!("snapshot connection is closed"),
        }
    }

    fn close(&mut self) -> Result<()> {
        if self.snapshot.take().is_none() {
            bail!("snapshot connection already closed");
        }
        Ok(())
    }
}

/// Catalog reader over an in-memory snapshot
pub struct SnapshotReader<'a> {
    snapshot: &'a CatalogSnapshot,
}

impl<'a> SnapshotReader<'a> {
    pub fn new(snapshot: &'a CatalogSnapshot) -> Self {
        Self { snapshot }
    }

    fn schema(&self, name: &str) -> Option<&'a SnapshotSchema> {
        self.snapshot.schema(name)
    }
}

impl CatalogReader for SnapshotReader<'_> {
    fn list_schemas(&mut self) -> Result<Vec<String>> {
        Ok(self.snapshot.schemas.iter().map(|s| s.name.clone()).collect())
    }

    fn list_tables(&mut self, schema: &str) -> Result<Vec<TableRow>> {
        Ok(self
            .schema(schema)
            .map(|s| s.tables.iter().map(|t| t.table.clone()).collect())
            .unwrap_or_default())
    }

    fn list_columns(&mut self, schema: &str, relation: &str) -> Result<Vec<ColumnRow>> {
        Ok(self
            .schema(schema)
            .map(|s| s.columns_of(relation))
            .unwrap_or_default())
    }

    fn primary_key(&mut self, schema: &str, table: &str) -> Result<Vec<PrimaryKeyRow>> {
        let mut rows = self
            .schema(schema)
            .and_then(|s| s.table(table))
            .map(|t| t.primary_key.clone())
            .unwrap_or_default();
        rows.sort_by_key(|r| r.ordinal);
        Ok(rows)
    }

    fn list_foreign_keys(&mut self, schema: &str, table: &str) -> Result<Vec<ForeignKeyRow>> {
        Ok(self
            .schema(schema)
            .and_then(|s| s.table(table))
            .map(|t| t.foreign_keys.clone())
            .unwrap_or_default())
    }

    fn list_enums(&mut self, schema: &str) -> Result<Vec<EnumRow>> {
        Ok(self
            .schema(schema)
            .map(|s| {
                s.enums
                    .iter()
                    .map(|e| EnumRow {
                        name: e.name.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_enum_values(&mut self, schema: &str, enum_name: &str) -> Result<Vec<String>> {
        Ok(self
            .schema(schema)
            .and_then(|s| s.enums.iter().find(|e| e.name == enum_name))
            .map(|e| e.values.clone())
            .unwrap_or_default())
    }

    fn list_composite_types(&mut self, schema: &str) -> Result<Vec<CompositeTypeRow>> {
        Ok(self
            .schema(schema)
            .map(|s| s.composite_types.clone())
            .unwrap_or_default())
    }

    fn list_views(&mut self, schema: &str) -> Result<Vec<ViewRow>> {
        Ok(self
            .schema(schema)
            .map(|s| {
                s.views
                    .iter()
                    .map(|v| ViewRow {
                        name: v.name.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_materialized_views(&mut self, schema: &str) -> Result<Vec<ViewRow>> {
        Ok(self
            .schema(schema)
            .map(|s| {
                s.materialized_views
                    .iter()
                    .map(|v| ViewRow {
                        name: v.name.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn column_udt_mappings(&mut self, schema: &str) -> Result<UdtMap> {
        let mut map = UdtMap::new();
        if let Some(s) = self.schema(schema) {
            for mapping in &s.udt_mappings {
                map.insert(
                    ColumnKey::new(&mapping.relation, &mapping.column),
                    UdtReference::new(&mapping.type_schema, &mapping.type_name),
                );
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"
schemas:
  - name: public
    enums:
      - name: order_status
        values: [pending, paid, shipped]
    tables:
      - name: orders
        partition_strategy: range
        partitions: [orders_2024, orders_2025]
        columns:
          - { name: status, ordinal: 2, data_type: USER-DEFINED }
          - { name: id, ordinal: 1, data_type: integer }
        primary_key:
          - { constraint_name: orders_pkey, column_name: id, ordinal: 1 }
    udt_mappings:
      - { relation: orders, column: status, type_schema: public, type_name: order_status }
"#;

    #[test]
    fn test_parse_snapshot() {
        let snapshot = CatalogSnapshot::from_yaml(SNAPSHOT).unwrap();
        let schema = snapshot.schema("public").unwrap();

        assert_eq!(schema.tables.len(), 1);
        assert_eq!(
            schema.tables[0].table.partition_strategy.as_deref(),
            Some("range")
        );
        assert_eq!(schema.tables[0].table.partitions.len(), 2);
        assert!(!schema.tables[0].columns[0].nullable);
    }

    #[test]
    fn test_reader_orders_columns_by_ordinal() {
        let snapshot = CatalogSnapshot::from_yaml(SNAPSHOT).unwrap();
        let mut reader = SnapshotReader::new(&snapshot);

        let columns = reader.list_columns("public", "orders").unwrap();
        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "status"]);
    }

    #[test]
    fn test_reader_unknown_schema_is_empty() {
        let snapshot = CatalogSnapshot::from_yaml(SNAPSHOT).unwrap();
        let mut reader = SnapshotReader::new(&snapshot);

        assert!(reader.list_tables("missing").unwrap().is_empty());
        assert!(reader.column_udt_mappings("missing").unwrap().is_empty());
    }

    #[test]
    fn test_connection_close_once() {
        let snapshot = CatalogSnapshot::from_yaml(SNAPSHOT).unwrap();
        let mut conn = SnapshotConnection::new(snapshot);

        assert!(conn.reader().is_ok());
        assert!(conn.close().is_ok());
        assert!(conn.close().is_err());
        assert!(conn.reader().is_err());
    }
}
