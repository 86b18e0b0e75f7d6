//! Refine Merge - Combine partial search parameter snapshots
//!
//! Widgets, URL state and defaults each contribute a partial
//! `SearchParameters`. This crate folds them left to right into one snapshot:
//! - attribute and tag lists are unioned without duplicates
//! - refinement maps are shallow-merged, the right side winning per key
//! - hierarchical facets are upserted by name
//! - every other query parameter is taken from the right side

pub mod error;
pub mod json;
pub mod mergers;
pub mod pipeline;

pub use error::*;
pub use json::*;
pub use mergers::*;
pub use pipeline::*;
