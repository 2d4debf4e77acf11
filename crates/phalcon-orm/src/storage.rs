//! This module exposes the storage abstraction the models layer runs on.

mod memory;

use phalcon_orm_api::prelude::{Filter, OrmResult, Row, TableDef};

pub use self::memory::MemoryStorage;

/// The query capability required from a storage engine.
///
/// The models layer never assumes exclusive access to the storage; it only relies on the
/// operations below, each running to completion before returning.
///
/// Mutations between [`Storage::begin`] and [`Storage::commit`] must be undone by
/// [`Storage::rollback`]. Sections can be nested.
pub trait Storage {
    /// Returns the definition of a table, if it exists.
    fn table(&self, name: &str) -> Option<TableDef>;

    /// Returns all the rows of `table` matching `filter`, or all rows when `filter` is `None`.
    fn select(&self, table: &str, filter: Option<&Filter>) -> OrmResult<Vec<Row>>;

    /// Returns the number of rows of `table` matching `filter`.
    fn count(&self, table: &str, filter: Option<&Filter>) -> OrmResult<u64> {
        self.select(table, filter).map(|rows| rows.len() as u64)
    }

    /// Returns whether at least one row of `table` matches `filter`.
    fn exists(&self, table: &str, filter: &Filter) -> OrmResult<bool> {
        self.count(table, Some(filter)).map(|count| count > 0)
    }

    /// Inserts a row, returning it as stored (e.g. with a generated primary key).
    fn insert(&mut self, table: &str, row: Row) -> OrmResult<Row>;

    /// Replaces the rows matching `filter` with `row`, returning the number of replaced rows.
    fn update(&mut self, table: &str, filter: &Filter, row: Row) -> OrmResult<u64>;

    /// Deletes the rows matching `filter`, returning the number of deleted rows.
    fn delete(&mut self, table: &str, filter: &Filter) -> OrmResult<u64>;

    /// Opens an atomic section.
    fn begin(&mut self);

    /// Closes the innermost atomic section, keeping its changes.
    fn commit(&mut self) -> OrmResult<()>;

    /// Closes the innermost atomic section, discarding its changes.
    fn rollback(&mut self) -> OrmResult<()>;
}
