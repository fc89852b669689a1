//! Error types for zowe-gateway

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for zowe-gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running the gateway
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O failure, optionally tied to a file
    #[error("I/O error{}: {source}", at_path(.path))]
    Io {
        /// File involved, if any
        path: Option<PathBuf>,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The platform authority could not be bound
    #[error("Platform error: {0}")]
    Platform(#[from] zowe_auth_platform::PlatformError),
}

fn at_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" at {}", p.display()))
        .unwrap_or_default()
}

impl Error {
    /// Configuration error with a message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// I/O error tied to a path.
    pub fn io_with_path(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            path: Some(path.into()),
            source,
        }
    }

    /// I/O error without a path.
    pub fn io(source: std::io::Error) -> Self {
        Self::Io { path: None, source }
    }
}
