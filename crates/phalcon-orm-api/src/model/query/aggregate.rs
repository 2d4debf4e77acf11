use serde::{Deserialize, Serialize};

use crate::model::query::{Filter, OrderDirection, QueryError, QueryResult};
use crate::model::value::Value;

/// The aggregate functions which can be computed over a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateKind {
    Count,
    Sum,
    Average,
    Minimum,
    Maximum,
}

impl AggregateKind {
    /// Returns the alias under which the aggregate result is exposed in grouped rows.
    pub fn alias(&self) -> &'static str {
        match self {
            AggregateKind::Count => "rowcount",
            AggregateKind::Sum => "sumatory",
            AggregateKind::Average => "average",
            AggregateKind::Minimum => "minimum",
            AggregateKind::Maximum => "maximum",
        }
    }
}

/// Ordering of grouped aggregate rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateOrder {
    /// A group column, or the alias of the aggregate (e.g. `rowcount`).
    pub column: String,
    pub direction: OrderDirection,
}

impl std::str::FromStr for AggregateOrder {
    type Err = QueryError;

    /// Parses `"<column> [ASC|DESC]"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let column = parts
            .next()
            .ok_or_else(|| QueryError::InvalidQuery("empty order clause".to_string()))?;
        let direction = parts
            .next()
            .map(str::parse::<OrderDirection>)
            .transpose()?
            .unwrap_or_default();
        if let Some(extra) = parts.next() {
            return Err(QueryError::InvalidQuery(format!(
                "unexpected '{extra}' in order clause '{s}'"
            )));
        }

        Ok(Self {
            column: column.to_string(),
            direction,
        })
    }
}

/// Parameters of an aggregate query.
///
/// Build it with the builder-like methods:
///
/// ```rust
/// use phalcon_orm_api::prelude::*;
///
/// let spec = AggregateSpec::new()
///     .column("cupo")
///     .group("ciudad_id")
///     .order("sumatory", OrderDirection::Descending);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSpec {
    /// The aggregated column.
    pub column: Option<String>,
    /// Row condition, evaluated before aggregation.
    pub conditions: Option<Filter>,
    /// Group columns, in order.
    pub group: Vec<String>,
    pub order: Option<AggregateOrder>,
    /// Count distinct non-null values of this column (count only).
    pub distinct: Option<String>,
}

impl AggregateSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, column: &str) -> Self {
        self.column = Some(column.to_string());
        self
    }

    pub fn conditions(mut self, filter: Filter) -> Self {
        self.conditions = Some(filter);
        self
    }

    /// Sets the conditions from a condition string, e.g. `estado='I'`.
    pub fn conditions_str(self, conditions: &str) -> QueryResult<Self> {
        Ok(self.conditions(Filter::parse(conditions)?))
    }

    /// Groups by a single column.
    pub fn group(self, column: &str) -> Self {
        self.group_by([column])
    }

    /// Groups by several columns.
    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.group = columns
            .into_iter()
            .map(|column| column.as_ref().to_string())
            .collect();
        self
    }

    pub fn order(mut self, column: &str, direction: OrderDirection) -> Self {
        self.order = Some(AggregateOrder {
            column: column.to_string(),
            direction,
        });
        self
    }

    /// Sets the order from an order clause, e.g. `rowcount DESC`.
    pub fn order_str(mut self, order: &str) -> QueryResult<Self> {
        self.order = Some(order.parse()?);
        Ok(self)
    }

    pub fn distinct(mut self, column: &str) -> Self {
        self.distinct = Some(column.to_string());
        self
    }

    /// Returns whether the query produces grouped rows.
    pub fn is_grouped(&self) -> bool {
        !self.group.is_empty()
    }
}

/// A row of a grouped aggregate: the group key values and the aggregate value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub group: Vec<(String, Value)>,
    pub kind: AggregateKind,
    pub value: Value,
}

impl AggregateRow {
    /// Returns the value of a group column, or the aggregate value when `column` is the
    /// aggregate alias.
    pub fn get(&self, column: &str) -> Option<&Value> {
        if column == self.kind.alias() {
            return Some(&self.value);
        }
        self.group
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Returns the aggregate value.
    pub fn aggregate(&self) -> &Value {
        &self.value
    }
}

/// The result of an aggregate query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateResult {
    /// Result of an ungrouped aggregate.
    Scalar(Value),
    /// One row per group.
    Rows(Vec<AggregateRow>),
}

impl AggregateResult {
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            AggregateResult::Scalar(value) => Some(value),
            AggregateResult::Rows(_) => None,
        }
    }

    pub fn rows(&self) -> &[AggregateRow] {
        match self {
            AggregateResult::Scalar(_) => &[],
            AggregateResult::Rows(rows) => rows,
        }
    }

    pub fn into_rows(self) -> Vec<AggregateRow> {
        match self {
            AggregateResult::Scalar(_) => Vec::new(),
            AggregateResult::Rows(rows) => rows,
        }
    }
}
