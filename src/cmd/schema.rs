//! Schema command: export JSON Schemas for the config file and JSON output.

use crate::json_schema::{all_schemas, get_schema, schema_names};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn run(name: Option<String>, output_dir: Option<PathBuf>, list: bool) -> Result<()> {
    if list {
        for name in schema_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let schemas = match name {
        Some(name) => match get_schema(&name) {
            Some(schema) => vec![(name, schema)],
            None => bail!(
                "Unknown schema: {}. Available: {}",
                name,
                schema_names().join(", ")
            ),
        },
        None => all_schemas()
            .into_iter()
            .map(|(name, schema)| (name.to_string(), schema))
            .collect(),
    };

    if let Some(dir) = output_dir {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        for (name, schema) in &schemas {
            let path = dir.join(format!("{}.schema.json", name));
            fs::write(&path, serde_json::to_string_pretty(schema)?)?;
            eprintln!("Schema written to: {}", path.display());
        }
        return Ok(());
    }

    if schemas.len() == 1 {
        println!("{}", serde_json::to_string_pretty(&schemas[0].1)?);
    } else {
        let combined: serde_json::Map<String, serde_json::Value> = schemas
            .iter()
            .map(|(name, schema)| -> Result<(String, serde_json::Value)> {
                Ok((name.clone(), serde_json::to_value(schema)?))
            })
            .collect::<Result<_>>()?;
        println!("{}", serde_json::to_string_pretty(&combined)?);
    }

    Ok(())
}
