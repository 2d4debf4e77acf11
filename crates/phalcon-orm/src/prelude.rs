//! Re-exports all the most commonly used items from this crate.

pub use phalcon_orm_api::prelude::*;

pub use crate::aggregate::AggregateEvaluator;
pub use crate::integrity::{
    DeleteIntegrityValidator, SaveIntegrityValidator, check_non_nullable_fields,
};
pub use crate::model::Model;
pub use crate::models_manager::ModelsManager;
pub use crate::storage::{MemoryStorage, Storage};
