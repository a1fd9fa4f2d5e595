//! Vision document error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a project vision document.
#[derive(Debug, Error)]
pub enum VisionError {
    /// The document could not be read from disk.
    #[error("failed to read vision document '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML for the expected shape.
    #[error("failed to parse vision document '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
