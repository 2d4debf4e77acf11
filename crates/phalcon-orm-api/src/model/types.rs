//! This module exposes the column data types understood by the models layer.

use serde::{Deserialize, Serialize};

/// An enumeration of all supported data type kinds for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataTypeKind {
    Boolean,
    Integer,
    Decimal,
    Text,
}

impl DataTypeKind {
    /// Returns whether sum and average can be computed over values of this kind.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataTypeKind::Integer | DataTypeKind::Decimal)
    }
}

impl std::fmt::Display for DataTypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataTypeKind::Boolean => "Boolean",
            DataTypeKind::Integer => "Integer",
            DataTypeKind::Decimal => "Decimal",
            DataTypeKind::Text => "Text",
        };
        write!(f, "{name}")
    }
}
