//! Core row model, typed values and canonical column layouts for Leadflow.

pub mod layout;
pub mod rowset;
pub mod value;

pub use rowset::{RowSet, SchemaError};
pub use value::{ColumnType, TypedRowSet, Value};

pub const CRATE_NAME: &str = "leadflow-core";
