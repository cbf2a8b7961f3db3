//! Topology loader.

use crate::topology::Topology;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Error for reading a topology document.
#[derive(Debug)]
pub enum LoadError {
    /// Input path does not exist.
    NotFound(PathBuf),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Content is not well-formed JSON or not a topology document.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl LoadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "input_not_found",
            Self::Io { .. } => "input_io_failed",
            Self::Parse { .. } => "input_parse_failed",
        }
    }
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "input file not found: `{}`", path.display()),
            Self::Io { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse topology `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Reads and parses a topology document.
///
/// # Errors
/// - `NotFound` when `path` does not exist.
/// - `Io` for any other read failure.
/// - `Parse` when content is not a topology document.
pub fn load_topology(path: impl AsRef<Path>) -> Result<Topology, LoadError> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!(
        "event=topology_load module=io status=start path={}",
        path.display()
    );

    match read_topology(path) {
        Ok(topology) => {
            info!(
                "event=topology_load module=io status=ok duration_ms={} objects={} arcs={}",
                started_at.elapsed().as_millis(),
                topology.objects.len(),
                topology.arcs.len()
            );
            Ok(topology)
        }
        Err(err) => {
            error!(
                "event=topology_load module=io status=error duration_ms={} error_code={} error={}",
                started_at.elapsed().as_millis(),
                err.error_code(),
                err
            );
            Err(err)
        }
    }
}

fn read_topology(path: &Path) -> Result<Topology, LoadError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        if source.is_io() {
            LoadError::Io {
                path: path.to_path_buf(),
                source: source.into(),
            }
        } else {
            LoadError::Parse {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}
