//! Prelude exposes all the types for `phalcon-orm-api` crate.

pub use crate::error::{OrmError, OrmResult};
pub use crate::model::message::{Message, MessageType};
pub use crate::model::query::{
    AggregateKind, AggregateOrder, AggregateResult, AggregateRow, AggregateSpec, Filter,
    OrderDirection, QueryError, QueryResult,
};
pub use crate::model::relation::{ForeignKeyAction, RelationDef, RelationKind};
pub use crate::model::settings::ModelSettings;
pub use crate::model::table::{ColumnDef, Record, Row, TableDef, TableError};
pub use crate::model::types::DataTypeKind;
pub use crate::model::value::Value;
