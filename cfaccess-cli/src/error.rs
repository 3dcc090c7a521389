//! CLI-specific error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while preparing or running the tools
#[derive(Debug, Error)]
pub enum CliError {
    /// The test file could not be read
    #[error("error reading tests file {path:?}: {source}")]
    ReadTestFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The test file is not valid YAML for the expected shape
    #[error(
        "error unmarshalling tests file {path:?} (this usually means your file is incorrectly formatted or has invalid keys): {source}"
    )]
    ParseTestFile {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// No directory user has the given email address
    #[error("no user found with email {0:?}")]
    UserNotFound(String),

    /// Platform API error
    #[error(transparent)]
    Platform(#[from] cfaccess_sdk::PlatformError),

    /// IO error (stdout, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
