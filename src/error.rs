//! Error types raised while building a schema model.

use crate::model::TypeKey;
use thiserror::Error;

/// Two catalog entries share the same (schema, name) identity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate {kind} '{key}' in catalog")]
pub struct DuplicateKeyError {
    /// Kind of entry ("enum", "composite type", "table", ...)
    pub kind: &'static str,
    pub key: TypeKey,
}

/// Errors that abort a schema build
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    DuplicateKey(#[from] DuplicateKeyError),

    /// A key references a column its owning table does not have
    #[error("{constraint_kind} '{constraint}' on table '{table}' references missing column '{column}'")]
    MissingColumn {
        constraint_kind: &'static str,
        constraint: String,
        table: String,
        column: String,
    },

    #[error("table '{table}' reports more than one primary key ('{first}' and '{second}')")]
    ConflictingPrimaryKey {
        table: String,
        first: String,
        second: String,
    },

    /// Query or connection failure from the catalog layer
    #[error(transparent)]
    Catalog(#[from] anyhow::Error),
}
