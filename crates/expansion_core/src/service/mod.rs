//! Core use-case services.
//!
//! # Responsibility
//! - Apply domain rules to decoded features.
//! - Stay independent of file formats and storage details.

pub mod enrich_service;
