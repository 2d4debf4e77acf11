//! This module exposes the evaluator of aggregate queries.

mod accumulator;

use std::collections::BTreeMap;

use phalcon_orm_api::prelude::{
    AggregateKind, AggregateResult, AggregateRow, AggregateSpec, ColumnDef, OrderDirection,
    OrmResult, QueryError, Row, TableDef, Value,
};

use self::accumulator::{Accumulator, accumulator};
use crate::storage::Storage;

/// Evaluates aggregate queries over the rows of a [`Storage`].
///
/// Rows are read through [`Storage::select`] with the query conditions and aggregated in
/// process.
pub struct AggregateEvaluator<'a, S>
where
    S: Storage,
{
    storage: &'a S,
}

impl<'a, S> AggregateEvaluator<'a, S>
where
    S: Storage,
{
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    /// Computes the aggregate `kind` over the rows of `table` matching the query.
    ///
    /// Returns [`AggregateResult::Scalar`] when the query is not grouped, and one
    /// [`AggregateRow`] per distinct group key otherwise.
    pub fn evaluate(
        &self,
        table: &str,
        spec: &AggregateSpec,
        kind: AggregateKind,
    ) -> OrmResult<AggregateResult> {
        let def = self
            .storage
            .table(table)
            .ok_or_else(|| QueryError::TableNotFound(table.to_string()))?;
        let input = AggregateInput::new(&def, spec, kind)?;

        let rows = self.storage.select(table, spec.conditions.as_ref())?;
        tracing::debug!(
            table,
            kind = kind.alias(),
            column = input.column,
            grouped = spec.is_grouped(),
            rows = rows.len(),
            "evaluating aggregate"
        );

        let mut aggregator = Aggregator::new(&input);
        for row in &rows {
            aggregator.add(row)?;
        }

        if !spec.is_grouped() {
            return Ok(AggregateResult::Scalar(aggregator.finalize_scalar()?));
        }

        let mut rows = aggregator.finalize_groups(&spec.group)?;
        if let Some(order) = &spec.order {
            sort_rows(&mut rows, &order.column, order.direction);
        }
        Ok(AggregateResult::Rows(rows))
    }
}

/// The validated inputs of an aggregate.
struct AggregateInput<'q> {
    kind: AggregateKind,
    /// Column fed to the accumulators; `None` counts rows.
    column: Option<&'q str>,
    distinct: bool,
    group: &'q [String],
}

impl<'q> AggregateInput<'q> {
    fn new(def: &TableDef, spec: &'q AggregateSpec, kind: AggregateKind) -> OrmResult<Self> {
        let check_column = |column: &str| -> OrmResult<&'static ColumnDef> {
            def.column(column)
                .ok_or_else(|| QueryError::UnknownColumn(column.to_string()).into())
        };

        if spec.distinct.is_some() && kind != AggregateKind::Count {
            return Err(QueryError::InvalidQuery(format!(
                "distinct is not supported by {}",
                kind.alias()
            ))
            .into());
        }

        let column = match kind {
            // count ignores the column, unless counting distinct values
            AggregateKind::Count => spec.distinct.as_deref(),
            _ => Some(spec.column.as_deref().ok_or_else(|| {
                QueryError::InvalidQuery(format!("{} requires a column", kind.alias()))
            })?),
        };
        if let Some(column) = column {
            let column_def = check_column(column)?;
            if matches!(kind, AggregateKind::Sum | AggregateKind::Average)
                && !column_def.data_type.is_numeric()
            {
                return Err(QueryError::NonNumericAggregate {
                    column: column.to_string(),
                    type_name: column_def.data_type.to_string(),
                }
                .into());
            }
        }
        for column in &spec.group {
            check_column(column)?;
        }
        if let Some(order) = &spec.order
            && spec.is_grouped()
            && order.column != kind.alias()
            && !spec.group.contains(&order.column)
        {
            return Err(QueryError::UnknownColumn(order.column.clone()).into());
        }

        Ok(Self {
            kind,
            column,
            distinct: spec.distinct.is_some(),
            group: &spec.group,
        })
    }
}

/// Groups rows by key and feeds each group accumulator.
struct Aggregator<'q> {
    input: &'q AggregateInput<'q>,
    buckets: BTreeMap<Vec<Value>, Box<dyn Accumulator>>,
}

impl<'q> Aggregator<'q> {
    fn new(input: &'q AggregateInput<'q>) -> Self {
        Self {
            input,
            buckets: BTreeMap::new(),
        }
    }

    fn add(&mut self, row: &Row) -> OrmResult<()> {
        let key = self
            .input
            .group
            .iter()
            .map(|column| column_value(row, column))
            .collect::<OrmResult<Vec<_>>>()?;
        let value = match self.input.column {
            Some(column) => column_value(row, column)?,
            // any non-null value counts the row
            None => Value::Boolean(true),
        };

        let input = self.input;
        self.buckets
            .entry(key)
            .or_insert_with(|| new_accumulator(input))
            .add(&value)?;
        Ok(())
    }

    fn finalize_scalar(mut self) -> OrmResult<Value> {
        let acc = self
            .buckets
            .remove(&Vec::new())
            .unwrap_or_else(|| new_accumulator(self.input));
        Ok(acc.finalize()?)
    }

    /// Returns one row per group, in ascending group key order.
    fn finalize_groups(self, group: &[String]) -> OrmResult<Vec<AggregateRow>> {
        let kind = self.input.kind;
        self.buckets
            .into_iter()
            .map(|(key, acc)| -> OrmResult<AggregateRow> {
                Ok(AggregateRow {
                    group: group.iter().cloned().zip(key).collect(),
                    kind,
                    value: acc.finalize()?,
                })
            })
            .collect()
    }
}

fn new_accumulator(input: &AggregateInput<'_>) -> Box<dyn Accumulator> {
    accumulator(input.kind, input.column.unwrap_or_default(), input.distinct)
}

fn column_value(row: &Row, column: &str) -> OrmResult<Value> {
    row.iter()
        .find(|(col, _)| col.name == column)
        .map(|(_, value)| value.clone())
        .ok_or_else(|| QueryError::UnknownColumn(column.to_string()).into())
}

/// Sorts rows by a group column or the aggregate alias; ties keep their order.
fn sort_rows(rows: &mut [AggregateRow], column: &str, direction: OrderDirection) {
    rows.sort_by(|a, b| {
        let ord = a.get(column).cmp(&b.get(column));
        match direction {
            OrderDirection::Ascending => ord,
            OrderDirection::Descending => ord.reverse(),
        }
    });
}
