use crate::model::types::DataTypeKind;

/// Defines a column in a database table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColumnDef {
    /// The name of the column.
    pub name: &'static str,
    /// The data type of the column.
    pub data_type: DataTypeKind,
    /// Indicates if this column can contain NULL values.
    pub nullable: bool,
    /// Indicates if this column is the primary key.
    pub primary_key: bool,
}

impl ColumnDef {
    /// Creates a non-nullable, non-key column.
    pub const fn new(name: &'static str, data_type: DataTypeKind) -> Self {
        Self {
            name,
            data_type,
            nullable: false,
            primary_key: false,
        }
    }

    /// Marks the column as nullable.
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Marks the column as the primary key.
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
}

/// Defines a table, the model mapped onto it and its columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TableDef {
    /// Name of the table in the storage (e.g. "robots_parts").
    pub name: &'static str,
    /// Identity of the model mapped onto the table (e.g. `Phalcon\Test\Models\RobotsParts`).
    pub model: &'static str,
    /// Column definitions, in declaration order.
    pub columns: &'static [ColumnDef],
    /// Name of the primary key column.
    pub primary_key: &'static str,
}

impl TableDef {
    /// Returns the definition of the column with the given name.
    pub fn column(&self, name: &str) -> Option<&'static ColumnDef> {
        self.columns.iter().find(|col| col.name == name)
    }
}

#[cfg(test)]
mod test {

    use super::*;

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("id", DataTypeKind::Integer).primary_key(),
        ColumnDef::new("name", DataTypeKind::Text),
        ColumnDef::new("year", DataTypeKind::Integer).nullable(),
    ];

    const ROBOTS: TableDef = TableDef {
        name: "robots",
        model: "Robots",
        columns: COLUMNS,
        primary_key: "id",
    };

    #[test]
    fn test_should_create_column_def() {
        let column = ColumnDef::new("id", DataTypeKind::Integer).primary_key();

        assert_eq!(column.name, "id");
        assert_eq!(column.data_type, DataTypeKind::Integer);
        assert!(!column.nullable);
        assert!(column.primary_key);
    }

    #[test]
    fn test_should_find_column_by_name() {
        let column = ROBOTS.column("year").expect("should have year");
        assert!(column.nullable);
        assert!(ROBOTS.column("unknown").is_none());
    }
}
