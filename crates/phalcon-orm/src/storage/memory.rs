use std::collections::BTreeMap;

use phalcon_orm_api::prelude::{
    DataTypeKind, Filter, OrmError, OrmResult, QueryError, Row, TableDef, TableError, Value,
};

/// A table held by the [`MemoryStorage`].
#[derive(Debug, Clone)]
struct MemoryTable {
    def: TableDef,
    rows: Vec<Row>,
    /// Next value for generated integer primary keys.
    next_id: i64,
}

impl MemoryTable {
    fn new(def: TableDef) -> Self {
        Self {
            def,
            rows: Vec::new(),
            next_id: 1,
        }
    }

    fn matching(&self, filter: Option<&Filter>) -> OrmResult<Vec<usize>> {
        let mut indexes = Vec::new();
        for (index, row) in self.rows.iter().enumerate() {
            let matches = match filter {
                Some(filter) => filter.matches(row)?,
                None => true,
            };
            if matches {
                indexes.push(index);
            }
        }
        Ok(indexes)
    }

    /// Checks that `row` holds exactly the columns of the table, with matching values.
    fn check_row(&self, row: &Row) -> OrmResult<()> {
        if row.len() != self.def.columns.len() {
            return Err(TableError::SchemaMismatch(format!(
                "table '{}' has {} columns, got {}",
                self.def.name,
                self.def.columns.len(),
                row.len()
            ))
            .into());
        }
        for ((col, value), def) in row.iter().zip(self.def.columns) {
            if col.name != def.name || !value.matches_kind(def.data_type) {
                return Err(TableError::SchemaMismatch(format!(
                    "unexpected value {} for column '{}' of table '{}'",
                    value.type_name(),
                    def.name,
                    self.def.name
                ))
                .into());
            }
        }
        Ok(())
    }

    fn primary_key_index(&self) -> OrmResult<usize> {
        self.def
            .columns
            .iter()
            .position(|col| col.name == self.def.primary_key)
            .ok_or_else(|| QueryError::UnknownColumn(self.def.primary_key.to_string()).into())
    }
}

/// An in-memory [`Storage`](super::Storage), keeping the rows of each table in insertion order.
///
/// Atomic sections are implemented by snapshotting the tables on
/// [`Storage::begin`](super::Storage::begin).
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    tables: BTreeMap<&'static str, MemoryTable>,
    snapshots: Vec<BTreeMap<&'static str, MemoryTable>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table.
    pub fn create_table(&mut self, def: TableDef) -> OrmResult<()> {
        if self.tables.contains_key(def.name) {
            return Err(TableError::TableAlreadyExists(def.name.to_string()).into());
        }
        self.tables.insert(def.name, MemoryTable::new(def));
        Ok(())
    }

    fn get(&self, table: &str) -> OrmResult<&MemoryTable> {
        self.tables
            .get(table)
            .ok_or_else(|| QueryError::TableNotFound(table.to_string()).into())
    }

    fn get_mut(&mut self, table: &str) -> OrmResult<&mut MemoryTable> {
        self.tables
            .get_mut(table)
            .ok_or_else(|| QueryError::TableNotFound(table.to_string()).into())
    }
}

impl super::Storage for MemoryStorage {
    fn table(&self, name: &str) -> Option<TableDef> {
        self.tables.get(name).map(|table| table.def)
    }

    fn select(&self, table: &str, filter: Option<&Filter>) -> OrmResult<Vec<Row>> {
        let table = self.get(table)?;
        let rows = table
            .matching(filter)?
            .into_iter()
            .map(|index| table.rows[index].clone())
            .collect();
        Ok(rows)
    }

    fn count(&self, table: &str, filter: Option<&Filter>) -> OrmResult<u64> {
        let table = self.get(table)?;
        Ok(table.matching(filter)?.len() as u64)
    }

    fn exists(&self, table: &str, filter: &Filter) -> OrmResult<bool> {
        let table = self.get(table)?;
        for row in &table.rows {
            if filter.matches(row)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn insert(&mut self, table: &str, mut row: Row) -> OrmResult<Row> {
        let table = self.get_mut(table)?;
        table.check_row(&row)?;

        let pk_index = table.primary_key_index()?;
        let (pk_col, pk_value) = &mut row[pk_index];
        if pk_value.is_null() {
            if pk_col.data_type != DataTypeKind::Integer {
                return Err(QueryError::MissingPrimaryKey(table.def.name.to_string()).into());
            }
            *pk_value = Value::Integer(table.next_id);
        }
        let pk_value = pk_value.clone();

        if table.rows.iter().any(|existing| existing[pk_index].1 == pk_value) {
            return Err(QueryError::PrimaryKeyConflict.into());
        }
        if let Value::Integer(id) = pk_value {
            table.next_id = table.next_id.max(id.saturating_add(1));
        }

        table.rows.push(row.clone());
        Ok(row)
    }

    fn update(&mut self, table: &str, filter: &Filter, row: Row) -> OrmResult<u64> {
        let table = self.get_mut(table)?;
        table.check_row(&row)?;

        let indexes = table.matching(Some(filter))?;
        for index in &indexes {
            table.rows[*index] = row.clone();
        }
        Ok(indexes.len() as u64)
    }

    fn delete(&mut self, table: &str, filter: &Filter) -> OrmResult<u64> {
        let table = self.get_mut(table)?;
        let before = table.rows.len();
        let mut error = None;
        table.rows.retain(|row| match filter.matches(row) {
            Ok(matches) => !matches,
            Err(err) => {
                error.get_or_insert(err);
                true
            }
        });
        if let Some(err) = error {
            return Err(OrmError::from(err));
        }
        Ok((before - table.rows.len()) as u64)
    }

    fn begin(&mut self) {
        self.snapshots.push(self.tables.clone());
    }

    fn commit(&mut self) -> OrmResult<()> {
        self.snapshots
            .pop()
            .map(|_| ())
            .ok_or_else(|| OrmError::Storage("no atomic section to commit".to_string()))
    }

    fn rollback(&mut self) -> OrmResult<()> {
        let snapshot = self
            .snapshots
            .pop()
            .ok_or_else(|| OrmError::Storage("no atomic section to roll back".to_string()))?;
        self.tables = snapshot;
        Ok(())
    }
}
