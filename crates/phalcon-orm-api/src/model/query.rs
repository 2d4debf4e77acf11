//! This module contains the query types: conditions and aggregate specifications.

mod aggregate;
mod filter;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::aggregate::{
    AggregateKind, AggregateOrder, AggregateResult, AggregateRow, AggregateSpec,
};
pub use self::filter::Filter;

/// Query result type
pub type QueryResult<T> = Result<T, QueryError>;

/// Query related errors
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryError {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
    #[error("Table not found: {0}")]
    TableNotFound(String),
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Invalid condition at position {position}: {message}")]
    InvalidCondition { position: usize, message: String },
    #[error("Cannot aggregate non-numeric value of type {type_name} in column '{column}'")]
    NonNumericAggregate { column: String, type_name: String },
    #[error("Primary key conflict")]
    PrimaryKeyConflict,
    #[error("Record of table '{0}' has no primary key value")]
    MissingPrimaryKey(String),
}

/// Sorting direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderDirection {
    #[default]
    Ascending,
    Descending,
}

impl std::str::FromStr for OrderDirection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(OrderDirection::Ascending)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(OrderDirection::Descending)
        } else {
            Err(QueryError::InvalidQuery(format!(
                "invalid order direction '{s}'"
            )))
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_should_parse_order_direction() {
        assert_eq!(
            "DESC".parse::<OrderDirection>().unwrap(),
            OrderDirection::Descending
        );
        assert_eq!(
            "asc".parse::<OrderDirection>().unwrap(),
            OrderDirection::Ascending
        );
        assert!("sideways".parse::<OrderDirection>().is_err());
    }

    #[test]
    fn test_should_display_query_error() {
        let error = QueryError::InvalidCondition {
            position: 7,
            message: "unexpected end of input".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid condition at position 7: unexpected end of input"
        );
    }
}
