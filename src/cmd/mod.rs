mod generate;
mod schema;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate as generate_completions, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "schema-uml")]
#[command(author = "Helge Sverre <helge.sverre@gmail.com>")]
#[command(version)]
#[command(about = "Render database catalog metadata as PlantUML entity diagrams", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Introspect a catalog and render a PlantUML (or JSON) schema diagram
    Generate {
        /// DuckDB database file or YAML catalog snapshot (.yaml/.yml)
        source: Option<PathBuf>,

        /// Catalog dialect: duckdb or snapshot (auto-detected if not specified)
        #[arg(short, long)]
        dialect: Option<String>,

        /// Schema to render (repeatable, default: every schema in the catalog)
        #[arg(short, long = "schema")]
        schemas: Vec<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: plantuml, json (default: from output extension, else plantuml)
        #[arg(short, long)]
        format: Option<String>,

        /// Only render specific tables (comma-separated glob patterns)
        #[arg(short, long)]
        tables: Option<String>,

        /// Exclude specific tables (comma-separated glob patterns)
        #[arg(short, long)]
        exclude: Option<String>,

        /// Skip views and materialized views
        #[arg(long)]
        no_views: bool,

        /// Skip composite types
        #[arg(long)]
        no_composites: bool,

        /// YAML config file (default: <config dir>/schema-uml/config.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,

        /// Suppress the summary on stderr
        #[arg(short, long, conflicts_with = "verbose")]
        quiet: bool,

        /// Show progress during introspection
        #[arg(short, long)]
        progress: bool,
    },

    /// Print JSON Schemas for the config file and the JSON diagram model
    Schema {
        /// Schema to print: config or model (default: all)
        name: Option<String>,

        /// Write schemas into this directory instead of stdout
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// List available schema names
        #[arg(long)]
        list: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            source,
            dialect,
            schemas,
            output,
            format,
            tables,
            exclude,
            no_views,
            no_composites,
            config,
            verbose,
            quiet,
            progress,
        } => generate::run(generate::GenerateArgs {
            source,
            dialect,
            schemas,
            output,
            format,
            tables,
            exclude,
            no_views,
            no_composites,
            config,
            verbose,
            quiet,
            progress,
        }),
        Commands::Schema {
            name,
            output_dir,
            list,
        } => schema::run(name, output_dir, list),
        Commands::Completions { shell } => {
            generate_completions(shell, &mut Cli::command(), "schema-uml", &mut io::stdout());
            Ok(())
        }
    }
}
