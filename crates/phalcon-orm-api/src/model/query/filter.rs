mod parser;

use serde::{Deserialize, Serialize};

use crate::model::query::{QueryError, QueryResult};
use crate::model::table::ColumnDef;
use crate::model::value::Value;

/// Row conditions.
///
/// The first value refers to the column name, and the second to the value to compare against.
///
/// Comparisons involving [`Value::Null`] never match; use [`Filter::IsNull`] and
/// [`Filter::NotNull`] to test for nulls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    Eq(String, Value),
    Ne(String, Value),
    Gt(String, Value),
    Lt(String, Value),
    Ge(String, Value),
    Le(String, Value),
    In(String, Vec<Value>),
    Like(String, String),
    NotNull(String),
    IsNull(String),
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    /// Creates an equality filter.
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Filter::Eq(field.to_string(), value.into())
    }

    /// Creates a not-equal filter.
    pub fn ne(field: &str, value: impl Into<Value>) -> Self {
        Filter::Ne(field.to_string(), value.into())
    }

    /// Creates a greater-than filter.
    pub fn gt(field: &str, value: impl Into<Value>) -> Self {
        Filter::Gt(field.to_string(), value.into())
    }

    /// Creates a less-than filter.
    pub fn lt(field: &str, value: impl Into<Value>) -> Self {
        Filter::Lt(field.to_string(), value.into())
    }

    /// Creates a greater-than-or-equal filter.
    pub fn ge(field: &str, value: impl Into<Value>) -> Self {
        Filter::Ge(field.to_string(), value.into())
    }

    /// Creates a less-than-or-equal filter.
    pub fn le(field: &str, value: impl Into<Value>) -> Self {
        Filter::Le(field.to_string(), value.into())
    }

    /// Creates an IN filter.
    pub fn in_list(field: &str, values: Vec<Value>) -> Self {
        Filter::In(field.to_string(), values)
    }

    /// Creates a LIKE filter.
    pub fn like(field: &str, pattern: &str) -> Self {
        Filter::Like(field.to_string(), pattern.to_string())
    }

    /// Creates a NOT NULL filter.
    pub fn not_null(field: &str) -> Self {
        Filter::NotNull(field.to_string())
    }

    /// Creates an IS NULL filter.
    pub fn is_null(field: &str) -> Self {
        Filter::IsNull(field.to_string())
    }

    /// Chain two filters with AND.
    pub fn and(self, other: Filter) -> Self {
        Filter::And(Box::new(self), Box::new(other))
    }

    /// Chain two filters with OR.
    pub fn or(self, other: Filter) -> Self {
        Filter::Or(Box::new(self), Box::new(other))
    }

    /// Negate a filter with NOT.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Filter::Not(Box::new(self))
    }

    /// Parses a condition string such as `estado = 'A' AND cupo > 1000`.
    pub fn parse(condition: &str) -> QueryResult<Self> {
        parser::Parser::new(condition)?.parse()
    }

    /// Checks if the given values match the filter.
    ///
    /// Referencing a column which is not part of `values` is an error.
    pub fn matches(&self, values: &[(ColumnDef, Value)]) -> QueryResult<bool> {
        let res = match self {
            Filter::Eq(field, value) => compare(values, field, value, |ord| ord.is_eq())?,
            Filter::Ne(field, value) => compare(values, field, value, |ord| ord.is_ne())?,
            Filter::Gt(field, value) => compare(values, field, value, |ord| ord.is_gt())?,
            Filter::Lt(field, value) => compare(values, field, value, |ord| ord.is_lt())?,
            Filter::Ge(field, value) => compare(values, field, value, |ord| ord.is_ge())?,
            Filter::Le(field, value) => compare(values, field, value, |ord| ord.is_le())?,
            Filter::In(field, list) => {
                let val = column_value(values, field)?;
                !val.is_null() && list.iter().any(|v| v == val)
            }
            Filter::Like(field, pattern) => match column_value(values, field)? {
                Value::Text(text) => {
                    like::Like::<true>::like(text.as_str(), pattern.as_str()).map_err(|e| {
                        QueryError::InvalidQuery(format!("Invalid LIKE pattern {pattern}: {e}"))
                    })?
                }
                Value::Null => false,
                _ => {
                    return Err(QueryError::InvalidQuery(
                        "LIKE operator can only be applied to Text values".to_string(),
                    ));
                }
            },
            Filter::NotNull(field) => !column_value(values, field)?.is_null(),
            Filter::IsNull(field) => column_value(values, field)?.is_null(),
            Filter::And(left, right) => left.matches(values)? && right.matches(values)?,
            Filter::Or(left, right) => left.matches(values)? || right.matches(values)?,
            Filter::Not(inner) => !inner.matches(values)?,
        };

        Ok(res)
    }
}

impl std::str::FromStr for Filter {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Filter::parse(s)
    }
}

fn column_value<'a>(values: &'a [(ColumnDef, Value)], field: &str) -> QueryResult<&'a Value> {
    values
        .iter()
        .find(|(col, _)| col.name == field)
        .map(|(_, val)| val)
        .ok_or_else(|| QueryError::UnknownColumn(field.to_string()))
}

fn compare<F>(values: &[(ColumnDef, Value)], field: &str, value: &Value, f: F) -> QueryResult<bool>
where
    F: FnOnce(std::cmp::Ordering) -> bool,
{
    let val = column_value(values, field)?;
    if val.is_null() || value.is_null() {
        return Ok(false);
    }

    Ok(f(val.cmp(value)))
}
