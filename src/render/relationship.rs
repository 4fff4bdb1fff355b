//! Relationship (foreign key) rendering.

use super::column::ENTITY_INDENT;
use crate::model::{ForeignKey, Schema};
use std::collections::BTreeMap;

/// Formats one foreign key as a relationship arrow line
pub trait MultiplicityFormatter {
    /// `target_schema` is set only when the FK points outside `schema_name`
    fn format(&self, fk: &ForeignKey, schema_name: &str, target_schema: Option<&str>) -> String;
}

/// Crow's foot notation: `users ||--|{ orders`, or `||--o{` for nullable keys
#[derive(Debug, Clone, Copy, Default)]
pub struct CrowsFootFormatter;

impl CrowsFootFormatter {
    /// Arrow for a foreign key, driven by its derived nullability
    pub fn arrow(fk: &ForeignKey) -> &'static str {
        if fk.nullable {
            "||--o{"
        } else {
            "||--|{"
        }
    }
}

impl MultiplicityFormatter for CrowsFootFormatter {
    fn format(&self, fk: &ForeignKey, _schema_name: &str, target_schema: Option<&str>) -> String {
        let target = match target_schema {
            Some(schema) => format!("{}.{}", schema, fk.target_table),
            None => fk.target_table.clone(),
        };
        format!("{} {} {}", target, Self::arrow(fk), fk.source_table)
    }
}

/// Key of a relationship group: target table, then its schema when it lies
/// outside the rendered one
pub type TargetKey<'a> = (&'a str, Option<&'a str>);

/// Group a schema's foreign keys by target table, sorted by target name.
///
/// Same-named targets in different schemas form separate groups, with the
/// local table first.
pub fn group_by_target(schema: &Schema) -> BTreeMap<TargetKey<'_>, Vec<&ForeignKey>> {
    let mut groups: BTreeMap<TargetKey<'_>, Vec<&ForeignKey>> = BTreeMap::new();
    for fk in schema.foreign_keys() {
        let target_schema =
            (fk.referenced_schema != schema.name).then_some(fk.referenced_schema.as_str());
        groups
            .entry((fk.target_table.as_str(), target_schema))
            .or_default()
            .push(fk);
    }
    groups
}

/// Render the relationship block of a schema.
///
/// Returns an empty string when the schema has no foreign keys. Groups are
/// separated by a blank line.
pub fn render_relationships(schema: &Schema, formatter: &dyn MultiplicityFormatter) -> String {
    let groups = group_by_target(schema);

    let rendered: Vec<String> = groups
        .iter()
        .map(|((_, target_schema), fks)| {
            let mut block = String::new();
            for fk in fks {
                block.push_str(ENTITY_INDENT);
                block.push_str(&formatter.format(fk, &schema.name, *target_schema));
                block.push('\n');
            }
            block
        })
        .collect();

    rendered.join("\n")
}
