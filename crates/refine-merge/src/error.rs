//! Error types for refine-merge

use refine_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Cannot merge an empty list of search parameters")]
    EmptyInput,

    #[error("Snapshot {index} is missing required field: {field}")]
    MissingField { index: usize, field: &'static str },

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, MergeError>;
