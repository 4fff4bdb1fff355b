//! Catalog access layer.
//!
//! This module provides:
//! - Raw row types returned by dialect catalog queries
//! - The `CatalogReader` trait every dialect implements
//! - Scoped connection handling (`ConnectionFactory` / `CatalogConnection`)
//!
//! The schema builder only ever talks to these traits, never to a concrete
//! dialect.

pub mod duckdb;
pub mod snapshot;

use crate::model::UdtMap;
use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub use self::duckdb::DuckDbConnector;
pub use snapshot::{CatalogSnapshot, SnapshotConnector};

/// Data type marker reported for columns typed with an enum or composite type
pub const USER_DEFINED: &str = "USER-DEFINED";

/// Check if a raw data type is the user-defined marker
pub fn is_user_defined(data_type: &str) -> bool {
    data_type.eq_ignore_ascii_case(USER_DEFINED)
}

/// A table as listed by the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRow {
    pub name: String,
    /// Partition strategy (range, list, hash)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_strategy: Option<String>,
    /// Child partition names in declared order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub partitions: Vec<String>,
}

/// A column of a table or view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnRow {
    pub name: String,
    pub ordinal: u32,
    /// Raw data type, possibly the `USER-DEFINED` marker
    pub data_type: String,
    pub nullable: bool,
    /// Maximum character length (0 = not applicable)
    pub max_length: u32,
    pub unique: bool,
    pub check: bool,
    pub default: bool,
    pub auto_increment: bool,
    pub generated: bool,
}

/// One column of a primary key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimaryKeyRow {
    pub constraint_name: String,
    pub column_name: String,
    pub ordinal: u32,
}

/// One source/target column pair of a foreign key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForeignKeyRow {
    pub constraint_name: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
    /// Schema of the referenced table (None = same schema)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_schema: Option<String>,
}

/// An enum type as listed by the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumRow {
    pub name: String,
}

/// A composite type field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeFieldRow {
    pub name: String,
    pub data_type: String,
    pub position: u32,
}

/// A composite type with its fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeTypeRow {
    pub name: String,
    pub fields: Vec<CompositeFieldRow>,
}

/// A view or materialized view as listed by the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewRow {
    pub name: String,
}

/// Catalog queries a dialect must answer, one schema at a time.
///
/// Every call is a blocking query that returns its complete result.
pub trait CatalogReader {
    /// Non-system schemas in the database
    fn list_schemas(&mut self) -> Result<Vec<String>>;

    fn list_tables(&mut self, schema: &str) -> Result<Vec<TableRow>>;

    /// Columns of a table, view or materialized view, ordered by ordinal
    fn list_columns(&mut self, schema: &str, relation: &str) -> Result<Vec<ColumnRow>>;

    /// Primary key rows ordered by ordinal (empty = no primary key)
    fn primary_key(&mut self, schema: &str, table: &str) -> Result<Vec<PrimaryKeyRow>>;

    fn list_foreign_keys(&mut self, schema: &str, table: &str) -> Result<Vec<ForeignKeyRow>>;

    fn list_enums(&mut self, schema: &str) -> Result<Vec<EnumRow>>;

    /// Enum labels in declared order
    fn list_enum_values(&mut self, schema: &str, enum_name: &str) -> Result<Vec<String>>;

    fn list_composite_types(&mut self, schema: &str) -> Result<Vec<CompositeTypeRow>>;

    fn list_views(&mut self, schema: &str) -> Result<Vec<ViewRow>>;

    fn list_materialized_views(&mut self, schema: &str) -> Result<Vec<ViewRow>>;

    /// Which type each user-defined column of the schema refers to
    fn column_udt_mappings(&mut self, schema: &str) -> Result<UdtMap>;
}

/// An open catalog connection
pub trait CatalogConnection {
    /// Create the dialect query runner for this connection
    fn reader(&mut self) -> Result<Box<dyn CatalogReader + '_>>;

    /// Release the connection
    fn close(&mut self) -> Result<()>;
}

/// Source of catalog connections
pub trait ConnectionFactory {
    fn dialect(&self) -> Dialect;

    fn acquire(&self) -> Result<Box<dyn CatalogConnection>>;
}

/// Supported catalog dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Embedded DuckDB database file
    #[default]
    DuckDb,
    /// YAML catalog snapshot
    Snapshot,
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "duckdb" | "duck" => Ok(Dialect::DuckDb),
            "snapshot" | "yaml" => Ok(Dialect::Snapshot),
            _ => Err(format!(
                "Unknown dialect: {}. Valid options: duckdb, snapshot",
                s
            )),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::DuckDb => write!(f, "duckdb"),
            Dialect::Snapshot => write!(f, "snapshot"),
        }
    }
}

impl Dialect {
    /// Detect dialect from the source file extension
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Dialect::Snapshot,
            _ => Dialect::DuckDb,
        }
    }

    /// Create the connection factory for a source path
    pub fn connector(self, path: &Path) -> Box<dyn ConnectionFactory> {
        match self {
            Dialect::DuckDb => Box::new(DuckDbConnector::new(path)),
            Dialect::Snapshot => Box::new(SnapshotConnector::new(path)),
        }
    }
}
