//! Error types for encounter file operations

use std::path::PathBuf;
use thiserror::Error;

/// Failures at the file boundary. Converted into a message on the
/// structured save/load results, never propagated into the engine.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a valid encounter file: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize encounter: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(
        "{} was written by a newer version (file version {found}, supported {supported})",
        .path.display()
    )]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        supported: u32,
    },
}
