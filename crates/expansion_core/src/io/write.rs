//! GeoJSON writer.

use crate::model::feature::FeatureCollection;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Error for writing the output collection.
#[derive(Debug)]
pub enum WriteError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for WriteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to write `{}`: {source}", path.display())
            }
            Self::Serialize { path, source } => write!(
                f,
                "failed to serialize feature collection to `{}`: {source}",
                path.display()
            ),
        }
    }
}

impl Error for WriteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize { source, .. } => Some(source),
        }
    }
}

/// Writes `collection` as compact GeoJSON, replacing any existing file.
///
/// # Side effects
/// - Creates or truncates `path`.
/// - Emits `geojson_write` logging events with duration and status.
pub fn write_feature_collection(
    path: impl AsRef<Path>,
    collection: &FeatureCollection,
) -> Result<(), WriteError> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!(
        "event=geojson_write module=io status=start path={} features={}",
        path.display(),
        collection.len()
    );

    match write_json(path, collection) {
        Ok(()) => {
            info!(
                "event=geojson_write module=io status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=geojson_write module=io status=error duration_ms={} error_code=output_write_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn write_json(path: &Path, collection: &FeatureCollection) -> Result<(), WriteError> {
    let io_error = |source: std::io::Error| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, collection).map_err(|source| {
        if source.is_io() {
            io_error(source.into())
        } else {
            WriteError::Serialize {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    writer.flush().map_err(io_error)?;
    Ok(())
}
