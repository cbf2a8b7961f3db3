//! GeoJSON output model.
//!
//! # Responsibility
//! - Define the feature/geometry shapes written by the pipeline.
//! - Keep the wire shape identical to plain GeoJSON so output is consumable
//!   by any GeoJSON reader.
//!
//! # Invariants
//! - Feature identity is positional inside a `FeatureCollection`.
//! - `properties` is always serialized as an object, never `null`.

pub mod feature;
