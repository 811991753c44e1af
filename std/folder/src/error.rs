use std::path::PathBuf;
use thiserror::Error;

/// Startup errors. Any of these aborts the server before it serves traffic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot access folder {path}: {source}")]
    Access {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to read folder {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize manifest {path}: {source}")]
    SerializeManifest {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write manifest {path}: {source}")]
    WriteManifest {
        path: PathBuf,
        source: std::io::Error,
    },
}
