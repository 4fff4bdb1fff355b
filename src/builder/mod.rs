//! Schema builder.
//!
//! Orchestrates one introspection pass per schema: acquire a connection, fetch
//! enums and composite types, resolve tables (columns, keys), views and
//! materialized views, then release the connection. The connection is closed
//! exactly once whether the build succeeds or fails.

use crate::catalog::{CatalogConnection, CatalogReader, ConnectionFactory, TableRow};
use crate::error::BuildError;
use crate::model::{
    CompositeField, DbCompositeType, DbEnum, MaterializedView, Schema, Table, TypeKey, View,
};
use crate::resolve::{
    build_enum_map, build_type_map, check_primary_key, collate_primary_key, enrich_foreign_keys,
    TypeResolver,
};
use glob::Pattern;

/// Options controlling which objects a build includes
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Only build tables matching one of these patterns (empty = all)
    pub include: Vec<Pattern>,
    /// Skip tables matching any of these patterns
    pub exclude: Vec<Pattern>,
    pub include_views: bool,
    pub include_composites: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            include_views: true,
            include_composites: true,
        }
    }
}

impl BuildOptions {
    /// Check if a table passes the include/exclude filters
    pub fn accepts(&self, table: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|p| p.matches(table));
        included && !self.exclude.iter().any(|p| p.matches(table))
    }
}

/// A catalog fetch step, reported to progress observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep<'a> {
    Enums,
    CompositeTypes,
    TypeMappings,
    Table(&'a str),
    Views,
    MaterializedViews,
}

impl std::fmt::Display for BuildStep<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildStep::Enums => write!(f, "enums"),
            BuildStep::CompositeTypes => write!(f, "composite types"),
            BuildStep::TypeMappings => write!(f, "type mappings"),
            BuildStep::Table(name) => write!(f, "table {}", name),
            BuildStep::Views => write!(f, "views"),
            BuildStep::MaterializedViews => write!(f, "materialized views"),
        }
    }
}

/// Closes the wrapped connection exactly once, on drop at the latest
struct ConnectionGuard {
    conn: Box<dyn CatalogConnection>,
    closed: bool,
}

impl ConnectionGuard {
    fn new(conn: Box<dyn CatalogConnection>) -> Self {
        Self {
            conn,
            closed: false,
        }
    }

    fn connection(&mut self) -> &mut dyn CatalogConnection {
        self.conn.as_mut()
    }

    fn close(&mut self) -> anyhow::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.conn.close()
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            eprintln!("Warning: failed to close catalog connection: {:#}", e);
        }
    }
}

/// Builds schema models from a connection factory
pub struct SchemaBuilder<'a> {
    factory: &'a dyn ConnectionFactory,
    options: BuildOptions,
}

impl<'a> SchemaBuilder<'a> {
    pub fn new(factory: &'a dyn ConnectionFactory) -> Self {
        Self {
            factory,
            options: BuildOptions::default(),
        }
    }

    pub fn with_options(factory: &'a dyn ConnectionFactory, options: BuildOptions) -> Self {
        Self { factory, options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Build one schema
    pub fn build(&self, schema_name: &str) -> Result<Schema, BuildError> {
        self.build_with_progress(schema_name, &mut |_| {})
    }

    /// Build one schema, reporting each catalog fetch step
    pub fn build_with_progress(
        &self,
        schema_name: &str,
        on_step: &mut dyn FnMut(BuildStep<'_>),
    ) -> Result<Schema, BuildError> {
        let mut guard = ConnectionGuard::new(self.factory.acquire()?);

        let built = match guard.connection().reader() {
            Ok(mut reader) => assemble(reader.as_mut(), schema_name, &self.options, on_step),
            Err(e) => Err(BuildError::Catalog(e)),
        };

        match (built, guard.close()) {
            (Ok(schema), Ok(())) => Ok(schema),
            (Ok(_), Err(close_err)) => Err(BuildError::Catalog(close_err)),
            (Err(build_err), Ok(())) => Err(build_err),
            (Err(build_err), Err(close_err)) => {
                eprintln!(
                    "Warning: failed to close catalog connection: {:#}",
                    close_err
                );
                Err(build_err)
            }
        }
    }

    /// List every schema the catalog reports
    pub fn list_schemas(&self) -> Result<Vec<String>, BuildError> {
        let mut guard = ConnectionGuard::new(self.factory.acquire()?);

        let listed = match guard.connection().reader() {
            Ok(mut reader) => reader.list_schemas().map_err(BuildError::Catalog),
            Err(e) => Err(BuildError::Catalog(e)),
        };
        let closed = guard.close();

        let schemas = listed?;
        closed?;
        Ok(schemas)
    }
}

/// Assemble a schema from an open catalog reader
pub fn assemble(
    reader: &mut dyn CatalogReader,
    schema_name: &str,
    options: &BuildOptions,
    on_step: &mut dyn FnMut(BuildStep<'_>),
) -> Result<Schema, BuildError> {
    let mut schema = Schema::new(schema_name);

    on_step(BuildStep::Enums);
    for row in reader.list_enums(schema_name)? {
        let values = reader.list_enum_values(schema_name, &row.name)?;
        schema.enums.push(DbEnum {
            schema_name: schema_name.to_string(),
            name: row.name,
            values,
        });
    }
    let enum_map = build_enum_map(&schema.enums)?;

    if options.include_composites {
        on_step(BuildStep::CompositeTypes);
        schema.composite_types = build_composite_types(reader, schema_name)?;
    }

    on_step(BuildStep::TypeMappings);
    let udt_map = reader.column_udt_mappings(schema_name)?;
    let resolver = TypeResolver::new(schema_name, &udt_map, &enum_map);

    let table_rows = reader.list_tables(schema_name)?;
    check_unique_names("table", schema_name, &table_rows, |t| t.name.as_str())?;
    for row in table_rows {
        if !options.accepts(&row.name) {
            continue;
        }
        on_step(BuildStep::Table(&row.name));
        schema
            .tables
            .push(build_table(reader, &resolver, schema_name, row)?);
    }

    if options.include_views {
        on_step(BuildStep::Views);
        let view_rows = reader.list_views(schema_name)?;
        check_unique_names("view", schema_name, &view_rows, |v| v.name.as_str())?;
        for row in view_rows {
            let columns = reader.list_columns(schema_name, &row.name)?;
            schema.views.push(View {
                columns: resolver.resolve_columns(&row.name, &columns),
                name: row.name,
            });
        }

        on_step(BuildStep::MaterializedViews);
        let mview_rows = reader.list_materialized_views(schema_name)?;
        check_unique_names("materialized view", schema_name, &mview_rows, |v| v.name.as_str())?;
        for row in mview_rows {
            let columns = reader.list_columns(schema_name, &row.name)?;
            schema.materialized_views.push(MaterializedView {
                columns: resolver.resolve_columns(&row.name, &columns),
                name: row.name,
            });
        }
    }

    Ok(schema)
}

/// Reject a relation listing that names the same entity twice
fn check_unique_names<T>(
    kind: &'static str,
    schema_name: &str,
    rows: &[T],
    name_of: impl Fn(&T) -> &str,
) -> Result<(), BuildError> {
    build_type_map(kind, rows.iter(), |row| TypeKey::new(schema_name, name_of(row)))?;
    Ok(())
}

fn build_composite_types(
    reader: &mut dyn CatalogReader,
    schema_name: &str,
) -> Result<Vec<DbCompositeType>, BuildError> {
    let composites: Vec<DbCompositeType> = reader
        .list_composite_types(schema_name)?
        .into_iter()
        .map(|row| {
            let mut fields: Vec<CompositeField> = row
                .fields
                .into_iter()
                .map(|f| CompositeField {
                    name: f.name,
                    data_type: f.data_type,
                    position: f.position,
                })
                .collect();
            fields.sort_by_key(|f| f.position);
            DbCompositeType {
                schema_name: schema_name.to_string(),
                name: row.name,
                fields,
            }
        })
        .collect();

    build_type_map("composite type", composites.iter(), |c| {
        TypeKey::new(&c.schema_name, &c.name)
    })?;

    Ok(composites)
}

fn build_table(
    reader: &mut dyn CatalogReader,
    resolver: &TypeResolver<'_>,
    schema_name: &str,
    row: TableRow,
) -> Result<Table, BuildError> {
    let column_rows = reader.list_columns(schema_name, &row.name)?;
    let mut columns = resolver.resolve_columns(&row.name, &column_rows);

    let pk_rows = reader.primary_key(schema_name, &row.name)?;
    let primary_key = collate_primary_key(&row.name, &pk_rows)?;
    if let Some(ref pk) = primary_key {
        check_primary_key(&row.name, pk, &columns)?;
    }

    let fk_rows = reader.list_foreign_keys(schema_name, &row.name)?;
    let foreign_keys = enrich_foreign_keys(schema_name, &row.name, &mut columns, &fk_rows)?;

    Ok(Table {
        name: row.name,
        partition_strategy: row.partition_strategy,
        partitions: row.partitions,
        columns,
        primary_key,
        foreign_keys,
    })
}
