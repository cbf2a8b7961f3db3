//! File boundary of the pipeline: topology input and GeoJSON output.
//!
//! # Responsibility
//! - Read and parse topology documents from disk.
//! - Serialize feature collections to disk.
//!
//! # Invariants
//! - File handles are scoped to a single call and closed on every path.
//! - Errors carry the offending path.

mod load;
mod write;

pub use load::{load_topology, LoadError};
pub use write::{write_feature_collection, WriteError};
