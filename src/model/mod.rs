//! Resolved schema model.
//!
//! This module provides:
//! - Entity types for tables, views, materialized views, enums and composite types
//! - Primary/foreign key definitions with derived nullability
//! - Lookup keys used while resolving user-defined column types
//!
//! Every value here is built once per introspection pass by the schema builder
//! and never mutated afterwards.

mod constraint;

pub use constraint::*;

use ahash::AHashMap;
use std::fmt;

/// Column definition within a table or view
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Position in the relation (1-indexed, as reported by the catalog)
    pub ordinal: u32,
    /// Resolved data type name
    pub data_type: String,
    /// Whether this column allows NULL values
    pub nullable: bool,
    /// Maximum character length (0 = not applicable)
    pub max_length: u32,
    /// Display constraint tags
    pub constraints: ConstraintSet,
}

impl Column {
    /// Create a column with no constraint tags
    pub fn new(name: impl Into<String>, ordinal: u32, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ordinal,
            data_type: data_type.into(),
            nullable: false,
            max_length: 0,
            constraints: ConstraintSet::new(),
        }
    }
}

/// Primary key definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKey {
    /// Constraint name
    pub name: String,
    /// Column names in catalog-declared order
    pub columns: Vec<String>,
}

impl PrimaryKey {
    /// Check if a column is part of this key
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// Foreign key definition (one source column to one target column)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Constraint name
    pub name: String,
    /// Table owning the FK
    pub source_table: String,
    /// FK column in the source table
    pub source_column: String,
    /// Referenced table
    pub target_table: String,
    /// Referenced column
    pub target_column: String,
    /// Schema of the referenced table
    pub referenced_schema: String,
    /// Copied from the source column after enrichment
    pub nullable: bool,
}

/// Complete table definition
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Table name
    pub name: String,
    /// Partition strategy (range, list, hash) if the table is partitioned
    pub partition_strategy: Option<String>,
    /// Names of the partition child tables
    pub partitions: Vec<String>,
    /// Column definitions in ordinal order
    pub columns: Vec<Column>,
    /// Primary key, if the table declares one
    pub primary_key: Option<PrimaryKey>,
    /// Foreign key constraints
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    /// Get a column by name
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check if a column is part of the primary key
    pub fn is_pk_column(&self, name: &str) -> bool {
        self.primary_key
            .as_ref()
            .map(|pk| pk.contains(name))
            .unwrap_or(false)
    }
}

/// Plain view definition
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub name: String,
    pub columns: Vec<Column>,
}

/// Materialized view definition
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializedView {
    pub name: String,
    pub columns: Vec<Column>,
}

/// Enumerated type with its labels in declared order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbEnum {
    pub schema_name: String,
    pub name: String,
    pub values: Vec<String>,
}

impl DbEnum {
    /// Identity key of this enum
    pub fn key(&self) -> TypeKey {
        TypeKey::new(&self.schema_name, &self.name)
    }
}

/// One field of a composite type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeField {
    pub name: String,
    pub data_type: String,
    pub position: u32,
}

/// Composite (structured) type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbCompositeType {
    pub schema_name: String,
    pub name: String,
    /// Fields in declared order
    pub fields: Vec<CompositeField>,
}

/// What a user-defined column actually refers to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UdtReference {
    pub schema_name: String,
    pub type_name: String,
}

impl UdtReference {
    pub fn new(schema_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Lookup key for a column: owning table or view plus column name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnKey {
    pub relation: String,
    pub column: String,
}

impl ColumnKey {
    pub fn new(relation: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            column: column.into(),
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.relation, self.column)
    }
}

/// Identity key for a schema-scoped type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    pub schema_name: String,
    pub type_name: String,
}

impl TypeKey {
    pub fn new(schema_name: &str, type_name: &str) -> Self {
        Self {
            schema_name: schema_name.to_string(),
            type_name: type_name.to_string(),
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema_name, self.type_name)
    }
}

/// Column-to-UDT lookup supplied by the catalog layer
pub type UdtMap = AHashMap<ColumnKey, UdtReference>;

/// Enum lookup keyed by (schema, enum name)
pub type EnumMap = AHashMap<TypeKey, DbEnum>;

/// A fully built database schema
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub name: String,
    pub tables: Vec<Table>,
    pub views: Vec<View>,
    pub materialized_views: Vec<MaterializedView>,
    pub enums: Vec<DbEnum>,
    pub composite_types: Vec<DbCompositeType>,
}

impl Schema {
    /// Create an empty schema
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
            views: Vec::new(),
            materialized_views: Vec::new(),
            enums: Vec::new(),
            composite_types: Vec::new(),
        }
    }

    /// Get table by name
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Iterate over every foreign key of every table
    pub fn foreign_keys(&self) -> impl Iterator<Item = &ForeignKey> {
        self.tables.iter().flat_map(|t| t.foreign_keys.iter())
    }

    /// Total number of columns across tables
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    /// Check if the schema has nothing to draw
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
            && self.views.is_empty()
            && self.materialized_views.is_empty()
            && self.enums.is_empty()
            && self.composite_types.is_empty()
    }
}
