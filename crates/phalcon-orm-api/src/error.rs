use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::message::Message;

/// Orm Error type
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrmError {
    #[error("Query error: {0}")]
    Query(#[from] crate::model::query::QueryError),
    #[error("Table error: {0}")]
    Table(#[from] crate::model::table::TableError),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Settings error: {0}")]
    Settings(String),
    #[error("Record was not saved: {}", first_message(.0))]
    Constraint(Vec<Message>),
}

fn first_message(messages: &[Message]) -> &str {
    messages.first().map(Message::message).unwrap_or("no messages")
}

/// Orm Result type
pub type OrmResult<T> = Result<T, OrmError>;

#[cfg(test)]
mod test {

    use super::*;
    use crate::model::query::QueryError;
    use crate::model::table::TableError;

    #[test]
    fn test_should_display_query_error() {
        let error = OrmError::Query(QueryError::UnknownColumn("foo".to_string()));
        assert_eq!(error.to_string(), "Query error: Unknown column: foo");
    }

    #[test]
    fn test_should_display_table_error() {
        let error = OrmError::Table(TableError::TableAlreadyExists("robots".to_string()));
        assert_eq!(error.to_string(), "Table error: Table already exists: robots");
    }

    #[test]
    fn test_should_display_storage_error() {
        let error = OrmError::Storage("disk full".to_string());
        assert_eq!(error.to_string(), "Storage error: disk full");
    }

    #[test]
    fn test_should_display_constraint_error() {
        let error = OrmError::Constraint(vec![Message::constraint_violation(
            "The robot code does not exist",
            "robots_id",
        )]);
        assert_eq!(
            error.to_string(),
            "Record was not saved: The robot code does not exist"
        );
    }

    #[test]
    fn test_should_convert_from_query_error() {
        let error: OrmError = QueryError::UnknownColumn("col".to_string()).into();
        assert!(matches!(error, OrmError::Query(_)));
    }

    #[test]
    fn test_should_convert_from_table_error() {
        let error: OrmError = TableError::SchemaMismatch("robots.year".to_string()).into();
        assert!(matches!(error, OrmError::Table(_)));
    }
}
