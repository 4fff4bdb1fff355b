//! Entity block renderers for tables, views, materialized views, composite
//! types and enums.

use super::column::{format_column_line, ENTITY_INDENT, MEMBER_INDENT, SEPARATOR};
use crate::model::{Column, DbCompositeType, DbEnum, MaterializedView, Table, View};

fn entity_header(name: &str, stereotype: Option<&str>) -> String {
    match stereotype {
        Some(stereotype) => format!(
            "{}entity \"{}\" <<{}>> {{\n",
            ENTITY_INDENT, name, stereotype
        ),
        None => format!("{}entity \"{}\" {{\n", ENTITY_INDENT, name),
    }
}

fn block_close() -> String {
    format!("{}}}\n", ENTITY_INDENT)
}

fn render_columns<'c>(output: &mut String, columns: impl IntoIterator<Item = &'c Column>) {
    for column in columns {
        output.push_str(&format_column_line(column));
    }
}

/// Render a table.
///
/// Primary key columns come first in key order, then a `--` separator and
/// the remaining columns in ordinal order.
pub fn render_table(table: &Table) -> String {
    let stereotype = table
        .partition_strategy
        .as_ref()
        .map(|strategy| format!("partitioned: {}", strategy));

    let mut output = entity_header(&table.name, stereotype.as_deref());

    let mut columns: Vec<&Column> = table.columns.iter().collect();
    columns.sort_by_key(|c| c.ordinal);

    match &table.primary_key {
        Some(pk) => {
            let key_columns = pk
                .columns
                .iter()
                .filter_map(|name| columns.iter().copied().find(|c| &c.name == name));
            render_columns(&mut output, key_columns);

            let rest: Vec<&Column> = columns
                .iter()
                .copied()
                .filter(|c| !pk.contains(&c.name))
                .collect();
            if !rest.is_empty() {
                output.push_str(MEMBER_INDENT);
                output.push_str(SEPARATOR);
                output.push('\n');
                render_columns(&mut output, rest);
            }
        }
        None => render_columns(&mut output, columns),
    }

    output.push_str(&block_close());

    if !table.partitions.is_empty() {
        output.push_str(&format!(
            "{}' Partitions: {}\n",
            ENTITY_INDENT,
            table.partitions.join(", ")
        ));
    }

    output
}

/// Render a plain view
pub fn render_view(view: &View) -> String {
    let mut output = entity_header(&view.name, Some("view"));
    render_columns(&mut output, &view.columns);
    output.push_str(&block_close());
    output
}

/// Render a materialized view
pub fn render_materialized_view(view: &MaterializedView) -> String {
    let mut output = entity_header(&view.name, Some("materialized_view"));
    render_columns(&mut output, &view.columns);
    output.push_str(&block_close());
    output
}

/// Render a composite type, one `name : type` line per field in declared order
pub fn render_composite_type(composite: &DbCompositeType) -> String {
    let mut output = entity_header(&composite.name, Some("composite"));
    for field in &composite.fields {
        output.push_str(&format!(
            "{}{} : {}\n",
            MEMBER_INDENT, field.name, field.data_type
        ));
    }
    output.push_str(&block_close());
    output
}

/// Render an enum, one label per line in declared order
pub fn render_enum(db_enum: &DbEnum) -> String {
    let mut output = format!("{}enum \"{}\" {{\n", ENTITY_INDENT, db_enum.name);
    for value in &db_enum.values {
        output.push_str(MEMBER_INDENT);
        output.push_str(value);
        output.push('\n');
    }
    output.push_str(&block_close());
    output
}
