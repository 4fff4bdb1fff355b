//! Generate command implementation.

use crate::builder::SchemaBuilder;
use crate::catalog::Dialect;
use crate::config::{split_list, GenerateConfig};
use crate::model::Schema;
use crate::progress::BuildProgress;
use crate::render::OutputFormat;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Flags of the generate subcommand
pub struct GenerateArgs {
    pub source: Option<PathBuf>,
    pub dialect: Option<String>,
    pub schemas: Vec<String>,
    pub output: Option<PathBuf>,
    pub format: Option<String>,
    pub tables: Option<String>,
    pub exclude: Option<String>,
    pub no_views: bool,
    pub no_composites: bool,
    pub config: Option<PathBuf>,
    pub verbose: bool,
    pub quiet: bool,
    pub progress: bool,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let dialect = args
        .dialect
        .map(|d| d.parse::<Dialect>())
        .transpose()
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let format = args
        .format
        .map(|f| f.parse::<OutputFormat>())
        .transpose()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let config = GenerateConfig::builder()
        .source(args.source)
        .dialect(dialect)
        .schemas(args.schemas)
        .tables(args.tables.as_deref().map(split_list))
        .exclude(args.exclude.as_deref().map(split_list).unwrap_or_default())
        .output(args.output)
        .format(format)
        .no_views(args.no_views)
        .no_composites(args.no_composites)
        .config_file(args.config)
        .use_default_config(true)
        .verbose(args.verbose)
        .quiet(args.quiet)
        .progress(args.progress)
        .build()?;
    config.validate()?;

    // JSON on stdout stays machine-readable
    let chatty = !config.quiet && !(config.format == OutputFormat::Json && config.output.is_none());

    if chatty {
        eprintln!(
            "Generating diagram: {} [dialect: {}, format: {}]",
            config.source.display(),
            config.dialect,
            config.format
        );
    }

    let start_time = Instant::now();
    let factory = config.dialect.connector(&config.source);
    let builder = SchemaBuilder::with_options(factory.as_ref(), config.build_options());

    let schema_names = if config.schemas.is_empty() {
        let listed = builder
            .list_schemas()
            .context("Failed to list catalog schemas")?;
        if config.verbose && chatty {
            eprintln!("Discovered schemas: {}", listed.join(", "));
        }
        listed
    } else {
        config.schemas.clone()
    };

    let mut progress = BuildProgress::new(config.progress && chatty);
    let mut schemas: Vec<Schema> = Vec::with_capacity(schema_names.len());
    for name in &schema_names {
        let schema = builder
            .build_with_progress(name, &mut |step| progress.step(name, step))
            .with_context(|| format!("Failed to build schema '{}'", name))?;

        if schema.is_empty() && !config.quiet {
            eprintln!(
                "Warning: schema '{}' has no objects in the catalog (misspelled or filtered out?)",
                name
            );
        }
        if config.verbose && chatty {
            eprintln!(
                "  {}: {} tables, {} views, {} enums, {} composite types, {} relationships",
                schema.name,
                schema.tables.len(),
                schema.views.len() + schema.materialized_views.len(),
                schema.enums.len(),
                schema.composite_types.len(),
                schema.foreign_keys().count()
            );
        }
        schemas.push(schema);
    }
    progress.finish();

    let content = config.format.render(&schemas);

    if let Some(ref out_path) = config.output {
        let mut file = File::create(out_path)
            .with_context(|| format!("Failed to create output file: {}", out_path.display()))?;
        file.write_all(content.as_bytes())?;
        if chatty {
            eprintln!("Diagram written to: {}", out_path.display());
        }
    } else {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        if config.format == OutputFormat::Json {
            stdout.write_all(b"\n")?;
        }
        stdout.flush()?;
    }

    if chatty {
        let tables: usize = schemas.iter().map(|s| s.tables.len()).sum();
        let columns: usize = schemas.iter().map(|s| s.column_count()).sum();
        let relationships: usize = schemas.iter().map(|s| s.foreign_keys().count()).sum();
        eprintln!(
            "\nDiagram: {} schemas, {} tables, {} columns, {} relationships ({:.3}s)",
            schemas.len(),
            tables,
            columns,
            relationships,
            start_time.elapsed().as_secs_f64()
        );
    }

    Ok(())
}
