//! JSON export of built schemas.

use super::relationship::group_by_target;
use crate::model::{Column, Schema};
use schemars::JsonSchema;
use serde::Serialize;

/// JSON representation of the whole diagram
#[derive(Debug, Serialize, JsonSchema)]
pub struct DiagramJson {
    pub schemas: Vec<SchemaJson>,
    pub stats: DiagramStats,
}

/// JSON representation of one schema
#[derive(Debug, Serialize, JsonSchema)]
pub struct SchemaJson {
    pub name: String,
    pub enums: Vec<EnumJson>,
    pub composite_types: Vec<CompositeTypeJson>,
    pub tables: Vec<TableJson>,
    pub views: Vec<ViewJson>,
    pub materialized_views: Vec<ViewJson>,
    pub relationships: Vec<RelationshipJson>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct EnumJson {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct CompositeTypeJson {
    pub name: String,
    pub fields: Vec<FieldJson>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct FieldJson {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

/// JSON representation of a table with full column details
#[derive(Debug, Serialize, JsonSchema)]
pub struct TableJson {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_strategy: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub partitions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<PrimaryKeyJson>,
    pub columns: Vec<ColumnJson>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct PrimaryKeyJson {
    pub name: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ViewJson {
    pub name: String,
    pub columns: Vec<ColumnJson>,
}

/// JSON representation of a column
#[derive(Debug, Serialize, JsonSchema)]
pub struct ColumnJson {
    pub name: String,
    pub ordinal: u32,
    #[serde(rename = "type")]
    pub data_type: String,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    /// Constraint tags in display order
    pub constraints: Vec<String>,
}

/// JSON representation of a relationship
#[derive(Debug, Serialize, JsonSchema)]
pub struct RelationshipJson {
    pub name: String,
    pub from_table: String,
    pub from_column: String,
    pub to_schema: String,
    pub to_table: String,
    pub to_column: String,
    pub nullable: bool,
}

/// Diagram statistics
#[derive(Debug, Serialize, JsonSchema)]
pub struct DiagramStats {
    pub schema_count: usize,
    pub table_count: usize,
    pub view_count: usize,
    pub enum_count: usize,
    pub relationship_count: usize,
}

/// Generate JSON output for built schemas
pub fn to_json(schemas: &[Schema]) -> String {
    let diagram = build_diagram_json(schemas);
    serde_json::to_string_pretty(&diagram).unwrap_or_else(|_| "{}".to_string())
}

/// Build the JSON structure
pub fn build_diagram_json(schemas: &[Schema]) -> DiagramJson {
    let stats = DiagramStats {
        schema_count: schemas.len(),
        table_count: schemas.iter().map(|s| s.tables.len()).sum(),
        view_count: schemas
            .iter()
            .map(|s| s.views.len() + s.materialized_views.len())
            .sum(),
        enum_count: schemas.iter().map(|s| s.enums.len()).sum(),
        relationship_count: schemas.iter().map(|s| s.foreign_keys().count()).sum(),
    };

    DiagramJson {
        schemas: schemas.iter().map(build_schema_json).collect(),
        stats,
    }
}

fn build_schema_json(schema: &Schema) -> SchemaJson {
    // Same order as the relationship block of the diagram
    let relationships = group_by_target(schema)
        .into_values()
        .flatten()
        .map(|fk| RelationshipJson {
            name: fk.name.clone(),
            from_table: fk.source_table.clone(),
            from_column: fk.source_column.clone(),
            to_schema: fk.referenced_schema.clone(),
            to_table: fk.target_table.clone(),
            to_column: fk.target_column.clone(),
            nullable: fk.nullable,
        })
        .collect();

    SchemaJson {
        name: schema.name.clone(),
        enums: schema
            .enums
            .iter()
            .map(|e| EnumJson {
                name: e.name.clone(),
                values: e.values.clone(),
            })
            .collect(),
        composite_types: schema
            .composite_types
            .iter()
            .map(|c| CompositeTypeJson {
                name: c.name.clone(),
                fields: c
                    .fields
                    .iter()
                    .map(|f| FieldJson {
                        name: f.name.clone(),
                        data_type: f.data_type.clone(),
                    })
                    .collect(),
            })
            .collect(),
        tables: schema
            .tables
            .iter()
            .map(|t| TableJson {
                name: t.name.clone(),
                partition_strategy: t.partition_strategy.clone(),
                partitions: t.partitions.clone(),
                primary_key: t.primary_key.as_ref().map(|pk| PrimaryKeyJson {
                    name: pk.name.clone(),
                    columns: pk.columns.clone(),
                }),
                columns: t.columns.iter().map(column_json).collect(),
            })
            .collect(),
        views: schema
            .views
            .iter()
            .map(|v| ViewJson {
                name: v.name.clone(),
                columns: v.columns.iter().map(column_json).collect(),
            })
            .collect(),
        materialized_views: schema
            .materialized_views
            .iter()
            .map(|v| ViewJson {
                name: v.name.clone(),
                columns: v.columns.iter().map(column_json).collect(),
            })
            .collect(),
        relationships,
    }
}

fn column_json(column: &Column) -> ColumnJson {
    ColumnJson {
        name: column.name.clone(),
        ordinal: column.ordinal,
        data_type: column.data_type.clone(),
        nullable: column.nullable,
        max_length: (column.max_length > 0).then_some(column.max_length),
        constraints: column
            .constraints
            .ordered()
            .iter()
            .map(|c| c.to_string())
            .collect(),
    }
}
