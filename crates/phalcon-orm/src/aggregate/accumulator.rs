use std::collections::HashSet;

use phalcon_orm_api::prelude::{AggregateKind, QueryError, QueryResult, Value};
use rust_decimal::Decimal;

/// An accumulator for a single aggregate function
pub trait Accumulator {
    /// Add a value to the accumulator
    fn add(&mut self, value: &Value) -> QueryResult<()>;

    /// Finalize and return the result
    fn finalize(self: Box<Self>) -> QueryResult<Value>;
}

/// Creates the accumulator computing `kind` over the values of `column`.
///
/// When `distinct` is set, a count accumulator counts distinct values only.
pub fn accumulator(kind: AggregateKind, column: &str, distinct: bool) -> Box<dyn Accumulator> {
    match kind {
        AggregateKind::Count if distinct => Box::new(DistinctCountAccumulator::default()),
        AggregateKind::Count => Box::new(CountAccumulator::default()),
        AggregateKind::Sum => Box::new(SumAccumulator::new(column)),
        AggregateKind::Average => Box::new(AvgAccumulator::new(column)),
        AggregateKind::Minimum => Box::new(ExtremeAccumulator::new(std::cmp::Ordering::Less)),
        AggregateKind::Maximum => Box::new(ExtremeAccumulator::new(std::cmp::Ordering::Greater)),
    }
}

/// COUNT accumulator
#[derive(Default)]
struct CountAccumulator {
    count: u64,
}

impl Accumulator for CountAccumulator {
    fn add(&mut self, value: &Value) -> QueryResult<()> {
        if !value.is_null() {
            self.count += 1;
        }
        Ok(())
    }

    fn finalize(self: Box<Self>) -> QueryResult<Value> {
        Ok(Value::Integer(self.count as i64))
    }
}

/// COUNT DISTINCT accumulator
#[derive(Default)]
struct DistinctCountAccumulator {
    seen: HashSet<Value>,
}

impl Accumulator for DistinctCountAccumulator {
    fn add(&mut self, value: &Value) -> QueryResult<()> {
        if !value.is_null() && !self.seen.contains(value) {
            self.seen.insert(value.clone());
        }
        Ok(())
    }

    fn finalize(self: Box<Self>) -> QueryResult<Value> {
        Ok(Value::Integer(self.seen.len() as i64))
    }
}

fn non_numeric(column: &str, value: &Value) -> QueryError {
    QueryError::NonNumericAggregate {
        column: column.to_string(),
        type_name: value.type_name().to_string(),
    }
}

fn decimal_overflow(column: &str) -> QueryError {
    QueryError::InvalidQuery(format!("decimal overflow while aggregating '{column}'"))
}

/// SUM accumulator
///
/// Integers are summed as integers, until a decimal is met or the sum overflows.
struct SumAccumulator {
    column: String,
    sum: Option<Value>,
}

impl SumAccumulator {
    fn new(column: &str) -> Self {
        Self {
            column: column.to_string(),
            sum: None,
        }
    }

    fn add_decimals(&self, a: Decimal, b: Decimal) -> QueryResult<Value> {
        a.checked_add(b)
            .map(Value::Decimal)
            .ok_or_else(|| decimal_overflow(&self.column))
    }
}

impl Accumulator for SumAccumulator {
    fn add(&mut self, value: &Value) -> QueryResult<()> {
        if value.is_null() {
            return Ok(());
        }
        if !value.is_numeric() {
            return Err(non_numeric(&self.column, value));
        }

        self.sum = Some(match (&self.sum, value) {
            (None, v) => v.clone(),
            (Some(Value::Integer(a)), Value::Integer(b)) => match a.checked_add(*b) {
                Some(sum) => Value::Integer(sum),
                None => self.add_decimals(Decimal::from(*a), Decimal::from(*b))?,
            },
            (Some(sum), v) => {
                let (Some(a), Some(b)) = (sum.as_decimal(), v.as_decimal()) else {
                    return Err(non_numeric(&self.column, v));
                };
                self.add_decimals(a, b)?
            }
        });

        Ok(())
    }

    fn finalize(self: Box<Self>) -> QueryResult<Value> {
        Ok(self.sum.unwrap_or(Value::Null))
    }
}

/// AVG accumulator
struct AvgAccumulator {
    column: String,
    sum: Decimal,
    count: u64,
}

impl AvgAccumulator {
    fn new(column: &str) -> Self {
        Self {
            column: column.to_string(),
            sum: Decimal::ZERO,
            count: 0,
        }
    }
}

impl Accumulator for AvgAccumulator {
    fn add(&mut self, value: &Value) -> QueryResult<()> {
        if value.is_null() {
            return Ok(());
        }
        let decimal = value
            .as_decimal()
            .ok_or_else(|| non_numeric(&self.column, value))?;

        self.sum = self
            .sum
            .checked_add(decimal)
            .ok_or_else(|| decimal_overflow(&self.column))?;
        self.count += 1;
        Ok(())
    }

    fn finalize(self: Box<Self>) -> QueryResult<Value> {
        if self.count == 0 {
            return Ok(Value::Null);
        }
        self.sum
            .checked_div(Decimal::from(self.count))
            .map(Value::Decimal)
            .ok_or_else(|| decimal_overflow(&self.column))
    }
}

/// MIN / MAX accumulator, keeping the value which compares as `keep` against all the others.
struct ExtremeAccumulator {
    keep: std::cmp::Ordering,
    extreme: Option<Value>,
}

impl ExtremeAccumulator {
    fn new(keep: std::cmp::Ordering) -> Self {
        Self {
            keep,
            extreme: None,
        }
    }
}

impl Accumulator for ExtremeAccumulator {
    fn add(&mut self, value: &Value) -> QueryResult<()> {
        if value.is_null() {
            return Ok(());
        }
        let replace = match &self.extreme {
            None => true,
            Some(current) => value.cmp(current) == self.keep,
        };
        if replace {
            self.extreme = Some(value.clone());
        }
        Ok(())
    }

    fn finalize(self: Box<Self>) -> QueryResult<Value> {
        Ok(self.extreme.unwrap_or(Value::Null))
    }
}
