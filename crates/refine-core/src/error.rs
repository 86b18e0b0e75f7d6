//! Error types for refine-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Parameter is managed and cannot be set as a query parameter: {0}")]
    ReservedParameter(String),

    #[error("Hierarchical facet already declared: {0}")]
    DuplicateHierarchicalFacet(String),

    #[error("Hierarchical facet not declared: {0}")]
    UnknownHierarchicalFacet(String),

    #[error("Numeric refinement on {0} must be a finite number")]
    NonFiniteNumber(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
