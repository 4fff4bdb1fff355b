//! User-defined type resolution.

use crate::catalog::{is_user_defined, ColumnRow};
use crate::error::DuplicateKeyError;
use crate::model::{
    Column, ColumnKey, Constraint, ConstraintSet, DbEnum, EnumMap, TypeKey, UdtMap,
};
use ahash::AHashMap;

/// Build a lookup map keyed by (schema, name), rejecting duplicates
pub fn build_type_map<T, F>(
    kind: &'static str,
    items: impl IntoIterator<Item = T>,
    key_of: F,
) -> Result<AHashMap<TypeKey, T>, DuplicateKeyError>
where
    F: Fn(&T) -> TypeKey,
{
    let mut map = AHashMap::new();
    for item in items {
        let key = key_of(&item);
        if map.contains_key(&key) {
            return Err(DuplicateKeyError { kind, key });
        }
        map.insert(key, item);
    }
    Ok(map)
}

/// Build the enum lookup map for a schema
pub fn build_enum_map(enums: &[DbEnum]) -> Result<EnumMap, DuplicateKeyError> {
    build_type_map("enum", enums.iter().cloned(), |e| e.key())
}

/// Resolves raw column rows into model columns for one schema being built
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    schema_name: &'a str,
    udts: &'a UdtMap,
    enums: &'a EnumMap,
}

impl<'a> TypeResolver<'a> {
    pub fn new(schema_name: &'a str, udts: &'a UdtMap, enums: &'a EnumMap) -> Self {
        Self {
            schema_name,
            udts,
            enums,
        }
    }

    /// Resolved data type name for a column of `relation`.
    ///
    /// Unmapped user-defined columns keep the raw marker.
    pub fn resolve_type(&self, relation: &str, row: &ColumnRow) -> String {
        if !is_user_defined(&row.data_type) {
            return row.data_type.clone();
        }

        let Some(reference) = self.udts.get(&ColumnKey::new(relation, &row.name)) else {
            return row.data_type.clone();
        };

        let key = TypeKey::new(&reference.schema_name, &reference.type_name);
        let type_name = self
            .enums
            .get(&key)
            .map(|e| e.name.as_str())
            .unwrap_or(reference.type_name.as_str());

        if reference.schema_name == self.schema_name {
            type_name.to_string()
        } else {
            format!("{}.{}", reference.schema_name, type_name)
        }
    }

    /// Convert a catalog column row into a resolved column
    pub fn resolve_column(&self, relation: &str, row: &ColumnRow) -> Column {
        Column {
            name: row.name.clone(),
            ordinal: row.ordinal,
            data_type: self.resolve_type(relation, row),
            nullable: row.nullable,
            max_length: row.max_length,
            constraints: column_constraints(row),
        }
    }

    /// Resolve every column of a relation, keeping catalog order
    pub fn resolve_columns(&self, relation: &str, rows: &[ColumnRow]) -> Vec<Column> {
        rows.iter()
            .map(|row| self.resolve_column(relation, row))
            .collect()
    }
}

/// Constraint tags implied by a column row's flags
pub fn column_constraints(row: &ColumnRow) -> ConstraintSet {
    let flags = [
        (row.nullable, Constraint::Nullable),
        (row.unique, Constraint::Unique),
        (row.check, Constraint::Check),
        (row.default, Constraint::Default),
        (row.auto_increment, Constraint::AutoIncrement),
        (row.generated, Constraint::Generated),
    ];

    flags
        .into_iter()
        .filter(|(set, _)| *set)
        .map(|(_, tag)| tag)
        .collect()
}
