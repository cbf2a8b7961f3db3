//! Core logic for enriching US state geometries with acquisition years.
//! This crate owns decoding, enrichment and serialization; the CLI only wires it.

pub mod acquisition;
pub mod io;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod service;
pub mod topology;

pub use acquisition::{AcquisitionTable, TableError};
pub use io::{load_topology, write_feature_collection, LoadError, WriteError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::feature::{Feature, FeatureCollection, Geometry, Properties};
pub use pipeline::{enriched_features, run, PipelineConfig, PipelineError, PipelineSummary};
pub use service::enrich_service::{assign_year, enrich_with_years};
pub use topology::{ConvertError, FeatureSource, Topology};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
