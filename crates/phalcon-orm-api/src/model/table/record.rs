use crate::model::message::Message;
use crate::model::query::QueryError;
use crate::model::table::{ColumnDef, TableDef, TableError};
use crate::model::value::Value;
use crate::prelude::OrmResult;

/// A row read from or written to the storage: every column of the table paired with its value.
pub type Row = Vec<(ColumnDef, Value)>;

/// A model record.
///
/// A record always holds one value per declared column of its [`TableDef`], in declaration
/// order; unset columns are [`Value::Null`]. Values are checked against the schema on every
/// assignment.
///
/// Messages produced by the last failed save or delete are accumulated on the record and can be
/// read back with [`Record::messages`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    table: TableDef,
    values: Row,
    messages: Vec<Message>,
}

impl Record {
    /// Creates an empty record for the given table.
    pub fn new(table: TableDef) -> Self {
        let values = table
            .columns
            .iter()
            .map(|col| (*col, Value::Null))
            .collect();

        Self {
            table,
            values,
            messages: Vec::new(),
        }
    }

    /// Creates a record for the given table, assigning the provided values.
    ///
    /// Columns which are not provided are set to [`Value::Null`].
    pub fn from_values<I, S>(table: TableDef, values: I) -> OrmResult<Self>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: AsRef<str>,
    {
        let mut record = Self::new(table);
        for (column, value) in values {
            record.set(column.as_ref(), value)?;
        }
        Ok(record)
    }

    /// Creates a record from a row read from the storage.
    ///
    /// The row must contain exactly the columns of the table.
    pub fn from_row(table: TableDef, row: Row) -> OrmResult<Self> {
        if row.len() != table.columns.len()
            || row
                .iter()
                .zip(table.columns)
                .any(|((col, _), def)| col.name != def.name)
        {
            return Err(TableError::SchemaMismatch(format!(
                "row does not match the columns of table '{}'",
                table.name
            ))
            .into());
        }

        Ok(Self {
            table,
            values: row,
            messages: Vec::new(),
        })
    }

    /// Assigns `value` to `column`.
    pub fn set(&mut self, column: &str, value: impl Into<Value>) -> OrmResult<()> {
        let value = value.into();
        let (col, slot) = self
            .values
            .iter_mut()
            .find(|(col, _)| col.name == column)
            .ok_or_else(|| QueryError::UnknownColumn(column.to_string()))?;

        if !value.matches_kind(col.data_type) {
            return Err(TableError::SchemaMismatch(format!(
                "column '{}' of table '{}' expects {}, got {}",
                col.name,
                self.table.name,
                col.data_type,
                value.type_name()
            ))
            .into());
        }

        *slot = value;
        Ok(())
    }

    /// Returns the value of `column`, if the column exists.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(col, _)| col.name == column)
            .map(|(_, value)| value)
    }

    /// Returns the primary key value, unless it is null.
    pub fn primary_key_value(&self) -> Option<&Value> {
        self.get(self.table.primary_key)
            .filter(|value| !value.is_null())
    }

    /// Returns the definition of the table owning this record.
    pub fn table(&self) -> &TableDef {
        &self.table
    }

    /// Returns the column values of the record, in declaration order.
    pub fn values(&self) -> &[(ColumnDef, Value)] {
        &self.values
    }

    /// Returns a copy of the column values, as written to the storage.
    pub fn to_row(&self) -> Row {
        self.values.clone()
    }

    /// Returns the messages produced by the last save or delete attempt.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Appends a message to the record.
    pub fn append_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Removes all the messages from the record.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }
}
