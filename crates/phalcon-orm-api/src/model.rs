//! This module contains the model abstractions shared by the engine and its callers.

pub mod message;
pub mod query;
pub mod relation;
pub mod settings;
pub mod table;
pub mod types;
pub mod value;
