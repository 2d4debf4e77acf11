//! This module contains types related to tables and their records.

mod column_def;
mod record;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::column_def::{ColumnDef, TableDef};
pub use self::record::{Record, Row};

/// Table related errors
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableError {
    #[error("Table already exists: {0}")]
    TableAlreadyExists(String),
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),
}
