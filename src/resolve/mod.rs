//! Cross-referencing of raw catalog rows into the schema model.
//!
//! This module provides:
//! - User-defined type resolution for columns
//! - Duplicate-checked type lookup maps
//! - Primary key collation and foreign key enrichment

mod keys;
mod types;

pub use keys::*;
pub use types::*;
