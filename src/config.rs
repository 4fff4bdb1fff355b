//! Configuration for diagram generation.
//!
//! Settings come from an optional YAML file and from command-line flags;
//! flags always win.
//!
//! ```yaml
//! source:
//!   dialect: duckdb
//!   path: shop.duckdb
//! schemas: [main, billing]
//! tables:
//!   include: ["order*"]
//!   exclude: ["*_archive"]
//! output: schema.puml
//! format: plantuml
//! include_views: true
//! include_composites: true
//! ```

use crate::builder::BuildOptions;
use crate::catalog::Dialect;
use crate::render::OutputFormat;
use anyhow::{bail, Context};
use glob::Pattern;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the user config directory
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Catalog source section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SourceConfig {
    /// Catalog dialect (detected from the path when omitted)
    pub dialect: Option<Dialect>,
    /// Database file or catalog snapshot
    pub path: Option<PathBuf>,
}

/// Table filter section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TableFilterConfig {
    /// Glob patterns of tables to include (empty = all)
    pub include: Vec<String>,
    /// Glob patterns of tables to exclude
    pub exclude: Vec<String>,
}

/// Complete YAML configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GenerateYamlConfig {
    pub source: SourceConfig,
    /// Schemas to render, in package order (empty = every schema)
    pub schemas: Vec<String>,
    pub tables: TableFilterConfig,
    /// Output file (stdout when omitted)
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub include_views: Option<bool>,
    pub include_composites: Option<bool>,
}

impl GenerateYamlConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: GenerateYamlConfig = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Config file in the user config directory, if one exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("schema-uml").join(DEFAULT_CONFIG_FILE))
            .filter(|path| path.is_file())
    }
}

/// Runtime configuration for diagram generation
#[derive(Debug)]
pub struct GenerateConfig {
    /// Database file or catalog snapshot
    pub source: PathBuf,
    pub dialect: Dialect,
    /// Schemas to render (empty = every schema the catalog reports)
    pub schemas: Vec<String>,
    pub include: Vec<Pattern>,
    pub exclude: Vec<Pattern>,
    /// Output file (None for stdout)
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub include_views: bool,
    pub include_composites: bool,
    pub verbose: bool,
    pub quiet: bool,
    pub progress: bool,
}

impl GenerateConfig {
    /// Create a new builder
    pub fn builder() -> GenerateConfigBuilder {
        GenerateConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.source.exists() {
            bail!("Catalog source not found: {}", self.source.display());
        }
        if self.schemas.iter().any(|s| s.trim().is_empty()) {
            bail!("Schema names must not be empty");
        }
        Ok(())
    }

    /// Options for the schema builder
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            include_views: self.include_views,
            include_composites: self.include_composites,
        }
    }
}

/// Builder for GenerateConfig
#[derive(Default)]
pub struct GenerateConfigBuilder {
    source: Option<PathBuf>,
    dialect: Option<Dialect>,
    schemas: Vec<String>,
    tables: Option<Vec<String>>,
    exclude: Vec<String>,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    no_views: bool,
    no_composites: bool,
    config_file: Option<PathBuf>,
    use_default_config: bool,
    verbose: bool,
    quiet: bool,
    progress: bool,
}

impl GenerateConfigBuilder {
    pub fn source(mut self, path: Option<PathBuf>) -> Self {
        self.source = path;
        self
    }

    pub fn dialect(mut self, dialect: Option<Dialect>) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn schemas(mut self, schemas: Vec<String>) -> Self {
        self.schemas = schemas;
        self
    }

    pub fn tables(mut self, tables: Option<Vec<String>>) -> Self {
        self.tables = tables;
        self
    }

    pub fn exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn output(mut self, path: Option<PathBuf>) -> Self {
        self.output = path;
        self
    }

    pub fn format(mut self, format: Option<OutputFormat>) -> Self {
        self.format = format;
        self
    }

    pub fn no_views(mut self, no_views: bool) -> Self {
        self.no_views = no_views;
        self
    }

    pub fn no_composites(mut self, no_composites: bool) -> Self {
        self.no_composites = no_composites;
        self
    }

    pub fn config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_file = path;
        self
    }

    /// Fall back to the user config directory when no config file is given
    pub fn use_default_config(mut self, enabled: bool) -> Self {
        self.use_default_config = enabled;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Build the GenerateConfig
    pub fn build(self) -> anyhow::Result<GenerateConfig> {
        let config_path = self.config_file.clone().or_else(|| {
            if self.use_default_config {
                GenerateYamlConfig::default_path()
            } else {
                None
            }
        });
        let yaml = match config_path {
            Some(ref path) => GenerateYamlConfig::load(path)?,
            None => GenerateYamlConfig::default(),
        };

        let source = self
            .source
            .or(yaml.source.path)
            .ok_or_else(|| anyhow::anyhow!("A catalog source (database file or snapshot) is required"))?;
        let dialect = self
            .dialect
            .or(yaml.source.dialect)
            .unwrap_or_else(|| Dialect::from_path(&source));

        let schemas = if self.schemas.is_empty() {
            yaml.schemas
        } else {
            self.schemas
        };

        let include_patterns = self.tables.unwrap_or(yaml.tables.include);
        let exclude_patterns = if self.exclude.is_empty() {
            yaml.tables.exclude
        } else {
            self.exclude
        };

        let output = self.output.or(yaml.output);
        let format = self
            .format
            .or(yaml.format)
            .or_else(|| {
                output
                    .as_ref()
                    .and_then(|p| p.extension())
                    .and_then(|e| e.to_str())
                    .and_then(OutputFormat::from_extension)
            })
            .unwrap_or_default();

        Ok(GenerateConfig {
            source,
            dialect,
            schemas,
            include: compile_patterns(&include_patterns)?,
            exclude: compile_patterns(&exclude_patterns)?,
            output,
            format,
            include_views: !self.no_views && yaml.include_views.unwrap_or(true),
            include_composites: !self.no_composites && yaml.include_composites.unwrap_or(true),
            verbose: self.verbose,
            quiet: self.quiet,
            progress: self.progress,
        })
    }
}

/// Compile glob patterns, rejecting invalid ones
pub fn compile_patterns(patterns: &[String]) -> anyhow::Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid table pattern: {}", p)))
        .collect()
}

/// Split a comma-separated CLI list
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
