//! Batch pipeline: load → convert → enrich → write.
//!
//! # Responsibility
//! - Wire the four stages with one explicit configuration value.
//! - Report failures tagged with the stage that produced them.
//!
//! # Invariants
//! - Stages run strictly in order; the first failure aborts the run.
//! - The output file is only touched by the write stage, so load and convert
//!   failures never create it.

use crate::acquisition::AcquisitionTable;
use crate::io::{load_topology, write_feature_collection, LoadError, WriteError};
use crate::model::feature::FeatureCollection;
use crate::service::enrich_service::{enrich_with_years, YEAR_PROPERTY};
use crate::topology::{ConvertError, FeatureSource};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Instant;

/// Default input topology path, relative to the working directory.
pub const DEFAULT_INPUT_PATH: &str = "states.json";
/// Default output GeoJSON path, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "us_territorial_expansion.geojson";
/// Default topology object holding one geometry per state.
pub const DEFAULT_OBJECT_NAME: &str = "states";

/// Inputs of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub object_name: String,
    pub table: AcquisitionTable,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            object_name: DEFAULT_OBJECT_NAME.to_string(),
            table: AcquisitionTable::us_territorial(),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSummary {
    pub features: usize,
    pub matched: usize,
    pub output_path: PathBuf,
}

/// Stage-tagged pipeline failure.
#[derive(Debug)]
pub enum PipelineError {
    Load(LoadError),
    Convert(ConvertError),
    Write(WriteError),
}

impl PipelineError {
    /// Returns the failing stage name: `load`, `convert` or `write`.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Load(_) => "load",
            Self::Convert(_) => "convert",
            Self::Write(_) => "write",
        }
    }
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "{} stage failed: {err}", self.stage()),
            Self::Convert(err) => write!(f, "{} stage failed: {err}", self.stage()),
            Self::Write(err) => write!(f, "{} stage failed: {err}", self.stage()),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) => Some(err),
            Self::Convert(err) => Some(err),
            Self::Write(err) => Some(err),
        }
    }
}

impl From<LoadError> for PipelineError {
    fn from(value: LoadError) -> Self {
        Self::Load(value)
    }
}

impl From<ConvertError> for PipelineError {
    fn from(value: ConvertError) -> Self {
        Self::Convert(value)
    }
}

impl From<WriteError> for PipelineError {
    fn from(value: WriteError) -> Self {
        Self::Write(value)
    }
}

/// Decodes one named object from `source` and enriches every feature.
///
/// This is the in-memory half of the pipeline; nothing touches disk.
pub fn enriched_features<S: FeatureSource + ?Sized>(
    source: &S,
    object_name: &str,
    table: &AcquisitionTable,
) -> Result<FeatureCollection, ConvertError> {
    let mut collection = source.features(object_name)?;
    enrich_with_years(&mut collection, table);
    Ok(collection)
}

/// Runs the full pipeline described by `config`.
///
/// # Errors
/// Returns the first stage failure wrapped in `PipelineError`.
pub fn run(config: &PipelineConfig) -> Result<PipelineSummary, PipelineError> {
    let started_at = Instant::now();
    info!(
        "event=pipeline_run module=pipeline status=start input={} output={} object={}",
        config.input_path.display(),
        config.output_path.display(),
        config.object_name
    );

    match run_stages(config) {
        Ok(summary) => {
            info!(
                "event=pipeline_run module=pipeline status=ok duration_ms={} features={} matched={}",
                started_at.elapsed().as_millis(),
                summary.features,
                summary.matched
            );
            Ok(summary)
        }
        Err(err) => {
            error!(
                "event=pipeline_run module=pipeline status=error duration_ms={} stage={} error={}",
                started_at.elapsed().as_millis(),
                err.stage(),
                err
            );
            Err(err)
        }
    }
}

fn run_stages(config: &PipelineConfig) -> Result<PipelineSummary, PipelineError> {
    let topology = load_topology(&config.input_path)?;
    let collection = enriched_features(&topology, &config.object_name, &config.table)?;
    write_feature_collection(&config.output_path, &collection)?;

    let matched = collection
        .features
        .iter()
        .filter(|feature| {
            feature
                .properties
                .get(YEAR_PROPERTY)
                .is_some_and(|year| !year.is_null())
        })
        .count();

    Ok(PipelineSummary {
        features: collection.len(),
        matched,
        output_path: config.output_path.clone(),
    })
}
