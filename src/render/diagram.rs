//! Diagram assembly.
//!
//! Wraps every schema in a `package` block. Inside a package, enums always
//! precede tables and the relationship block always comes last.

use super::entity::{
    render_composite_type, render_enum, render_materialized_view, render_table, render_view,
};
use super::relationship::{render_relationships, CrowsFootFormatter, MultiplicityFormatter};
use crate::model::Schema;

pub const DIAGRAM_START: &str = "@startuml";
pub const DIAGRAM_END: &str = "@enduml";

/// Render the complete diagram using crow's foot multiplicities
pub fn render_diagram(schemas: &[Schema]) -> String {
    render_diagram_with(schemas, &CrowsFootFormatter)
}

/// Render the complete diagram with a custom multiplicity formatter
pub fn render_diagram_with(schemas: &[Schema], formatter: &dyn MultiplicityFormatter) -> String {
    let mut output = String::new();
    output.push_str(DIAGRAM_START);
    output.push('\n');
    output.push_str("hide methods\n");
    output.push_str("hide stereotypes\n");
    output.push('\n');

    for schema in schemas {
        output.push_str(&render_package(schema, formatter));
        output.push('\n');
    }

    output.push_str(DIAGRAM_END);
    output.push('\n');
    output
}

/// Render one schema as a package block
pub fn render_package(schema: &Schema, formatter: &dyn MultiplicityFormatter) -> String {
    let mut blocks: Vec<String> = Vec::new();

    blocks.extend(schema.enums.iter().map(render_enum));
    blocks.extend(schema.composite_types.iter().map(render_composite_type));
    blocks.extend(schema.tables.iter().map(render_table));
    blocks.extend(schema.views.iter().map(render_view));
    blocks.extend(schema.materialized_views.iter().map(render_materialized_view));

    let relationships = render_relationships(schema, formatter);
    if !relationships.is_empty() {
        blocks.push(relationships);
    }

    let mut output = format!("package \"{}\" {{\n", schema.name);
    output.push_str(&blocks.join("\n"));
    output.push_str("}\n");
    output
}
