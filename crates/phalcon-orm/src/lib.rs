#![crate_name = "phalcon_orm"]
#![crate_type = "lib"]

//! # Phalcon ORM
//!
//! The persistence core of the models layer:
//!
//! - the [`AggregateEvaluator`](crate::prelude::AggregateEvaluator), computing count, sum,
//!   average, minimum and maximum over the rows of a table, optionally filtered, grouped and
//!   ordered;
//! - the virtual foreign keys, enforced by the
//!   [`SaveIntegrityValidator`](crate::prelude::SaveIntegrityValidator) and the
//!   [`DeleteIntegrityValidator`](crate::prelude::DeleteIntegrityValidator) before records are
//!   saved or deleted.
//!
//! Both run over an abstract [`Storage`](crate::prelude::Storage);
//! [`MemoryStorage`](crate::prelude::MemoryStorage) is provided as an in-memory implementation.
//!
//! ```rust
//! use phalcon_orm::prelude::*;
//!
//! const PARTS: TableDef = TableDef {
//!     name: "parts",
//!     model: "Parts",
//!     columns: &[
//!         ColumnDef::new("id", DataTypeKind::Integer).primary_key(),
//!         ColumnDef::new("name", DataTypeKind::Text),
//!     ],
//!     primary_key: "id",
//! };
//!
//! let mut storage = MemoryStorage::new();
//! storage.create_table(PARTS).unwrap();
//!
//! let mut model = Model::new(storage, ModelsManager::new(), ModelSettings::default());
//! let mut part = Record::from_values(PARTS, [("name", Value::from("Head"))]).unwrap();
//! assert!(model.save(&mut part).unwrap());
//!
//! let count = model.count("parts", &AggregateSpec::new()).unwrap();
//! assert_eq!(count.as_scalar(), Some(&Value::Integer(1)));
//! ```

mod aggregate;
mod integrity;
mod model;
mod models_manager;
pub mod prelude;
mod storage;
