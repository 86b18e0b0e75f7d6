//! Refine Core - Search parameter snapshots
//!
//! This crate defines the value types that describe a search's filtering state:
//! - `SearchParameters`: an immutable snapshot of facets, refinements and query parameters
//! - `ParametersPatch`: a batch of fields to set on a snapshot
//! - `HierarchicalFacet` and the numeric refinement types

pub mod error;
pub mod facet;
pub mod params;
pub mod patch;

pub use error::*;
pub use facet::*;
pub use params::*;
pub use patch::*;
