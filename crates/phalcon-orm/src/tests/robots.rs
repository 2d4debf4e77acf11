//! Robots mock models; robots and parts are linked by robots_parts.

use phalcon_orm_api::prelude::{ColumnDef, DataTypeKind, Record, RelationDef, TableDef, Value};

use crate::storage::{MemoryStorage, Storage as _};

pub const ROBOTS: TableDef = TableDef {
    name: "robots",
    model: "Phalcon\\Test\\Models\\Robots",
    columns: &[
        ColumnDef::new("id", DataTypeKind::Integer).primary_key(),
        ColumnDef::new("name", DataTypeKind::Text),
        ColumnDef::new("type", DataTypeKind::Text),
        ColumnDef::new("year", DataTypeKind::Integer),
    ],
    primary_key: "id",
};

pub const PARTS: TableDef = TableDef {
    name: "parts",
    model: "Phalcon\\Test\\Models\\Parts",
    columns: &[
        ColumnDef::new("id", DataTypeKind::Integer).primary_key(),
        ColumnDef::new("name", DataTypeKind::Text),
    ],
    primary_key: "id",
};

pub const ROBOTS_PARTS: TableDef = TableDef {
    name: "robots_parts",
    model: "Phalcon\\Test\\Models\\RobotsParts",
    columns: &[
        ColumnDef::new("id", DataTypeKind::Integer).primary_key(),
        ColumnDef::new("robots_id", DataTypeKind::Integer).nullable(),
        ColumnDef::new("parts_id", DataTypeKind::Integer).nullable(),
    ],
    primary_key: "id",
};

pub const ROBOTS_FIXTURES: &[(i64, &str, &str, i64)] = &[
    (1, "Robotina", "mechanical", 1972),
    (2, "Astro Boy", "mechanical", 1952),
    (3, "Terminator", "cyborg", 2029),
];

pub const PARTS_FIXTURES: &[(i64, &str)] = &[
    (1, "Head"),
    (2, "Body"),
    (3, "Arms"),
    (4, "Legs"),
    (5, "CPU"),
];

/// `(id, robots_id, parts_id)`
pub const ROBOTS_PARTS_FIXTURES: &[(i64, i64, i64)] = &[(1, 1, 1), (2, 1, 2), (3, 1, 3)];

pub fn robots_relations() -> Vec<RelationDef> {
    vec![
        RelationDef::belongs_to("robots_parts", "robots_id", "robots", "id")
            .alias("robot")
            .message("The robot code does not exist"),
        RelationDef::belongs_to("robots_parts", "parts_id", "parts", "id").alias("part"),
        RelationDef::has_many("robots", "id", "robots_parts", "robots_id").alias("robotsParts"),
        RelationDef::has_many("parts", "id", "robots_parts", "parts_id")
            .alias("robotsParts")
            .message("Parts cannot be deleted because is referenced by a Robot"),
    ]
}

pub fn load_robots(storage: &mut MemoryStorage) {
    for table in [ROBOTS, PARTS, ROBOTS_PARTS] {
        storage
            .create_table(table)
            .expect("failed to create table");
    }

    for (id, name, kind, year) in ROBOTS_FIXTURES {
        insert(
            storage,
            ROBOTS,
            [
                ("id", Value::from(*id)),
                ("name", Value::from(*name)),
                ("type", Value::from(*kind)),
                ("year", Value::from(*year)),
            ],
        );
    }
    for (id, name) in PARTS_FIXTURES {
        insert(
            storage,
            PARTS,
            [("id", Value::from(*id)), ("name", Value::from(*name))],
        );
    }
    for (id, robots_id, parts_id) in ROBOTS_PARTS_FIXTURES {
        insert(
            storage,
            ROBOTS_PARTS,
            [
                ("id", Value::from(*id)),
                ("robots_id", Value::from(*robots_id)),
                ("parts_id", Value::from(*parts_id)),
            ],
        );
    }
}

pub(super) fn insert<const N: usize>(
    storage: &mut MemoryStorage,
    table: TableDef,
    values: [(&str, Value); N],
) {
    let record = Record::from_values(table, values).expect("invalid fixture");
    storage
        .insert(table.name, record.to_row())
        .expect("failed to insert fixture");
}
