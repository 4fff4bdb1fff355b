//! PlantUML diagram rendering.
//!
//! This module provides:
//! - Entity blocks for tables, views, materialized views, composite types and enums
//! - Relationship lines grouped by target table
//! - Whole-diagram assembly with package blocks per schema
//! - JSON export of the same model
//!
//! Rendering is deterministic: the same schema always yields the same bytes.

pub mod column;
pub mod diagram;
pub mod entity;
pub(crate) mod json;
pub mod relationship;

pub use column::{format_column_line, format_column_type, format_constraints};
pub use diagram::{render_diagram, render_diagram_with, render_package};
pub use entity::{
    render_composite_type, render_enum, render_materialized_view, render_table, render_view,
};
pub use json::{build_diagram_json, to_json, DiagramJson};
pub use relationship::{
    group_by_target, render_relationships, CrowsFootFormatter, MultiplicityFormatter, TargetKey,
};

use schemars::JsonSchema;
use std::fmt;
use std::str::FromStr;

/// Output format for the generated diagram
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PlantUML entity diagram
    #[default]
    PlantUml,
    /// JSON model for programmatic use
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plantuml" | "puml" | "uml" => Ok(OutputFormat::PlantUml),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Unknown format: {}. Valid options: plantuml, json",
                s
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::PlantUml => write!(f, "plantuml"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl OutputFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::PlantUml => "puml",
            OutputFormat::Json => "json",
        }
    }

    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "puml" | "plantuml" | "uml" | "pu" => Some(OutputFormat::PlantUml),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    /// Render built schemas in this format
    pub fn render(&self, schemas: &[crate::model::Schema]) -> String {
        match self {
            OutputFormat::PlantUml => render_diagram(schemas),
            OutputFormat::Json => to_json(schemas),
        }
    }
}
