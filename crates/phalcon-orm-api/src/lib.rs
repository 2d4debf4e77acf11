#![crate_name = "phalcon_orm_api"]
#![crate_type = "lib"]

//! # Phalcon ORM API
//!
//! This crate exposes the types shared between the models engine and its callers.
//!
//! You can import all the useful types by using the prelude module:
//!
//! ```rust
//! use phalcon_orm_api::prelude::*;
//! ```
//!
//! ## Types
//!
//! ### Schema
//!
//! - [`ColumnDef`](crate::prelude::ColumnDef)
//! - [`DataTypeKind`](crate::prelude::DataTypeKind)
//! - [`Record`](crate::prelude::Record)
//! - [`Row`](crate::prelude::Row)
//! - [`TableDef`](crate::prelude::TableDef)
//! - [`TableError`](crate::prelude::TableError)
//! - [`Value`](crate::prelude::Value)
//!
//! ### Relations
//!
//! - [`ForeignKeyAction`](crate::prelude::ForeignKeyAction)
//! - [`RelationDef`](crate::prelude::RelationDef)
//! - [`RelationKind`](crate::prelude::RelationKind)
//!
//! ### Query
//!
//! - [`AggregateKind`](crate::prelude::AggregateKind)
//! - [`AggregateOrder`](crate::prelude::AggregateOrder)
//! - [`AggregateResult`](crate::prelude::AggregateResult)
//! - [`AggregateRow`](crate::prelude::AggregateRow)
//! - [`AggregateSpec`](crate::prelude::AggregateSpec)
//! - [`Filter`](crate::prelude::Filter)
//! - [`OrderDirection`](crate::prelude::OrderDirection)
//! - [`QueryError`](crate::prelude::QueryError)
//!
//! ### Messages and settings
//!
//! - [`Message`](crate::prelude::Message)
//! - [`MessageType`](crate::prelude::MessageType)
//! - [`ModelSettings`](crate::prelude::ModelSettings)
//! - [`OrmError`](crate::prelude::OrmError)

mod error;
mod model;
pub mod prelude;
