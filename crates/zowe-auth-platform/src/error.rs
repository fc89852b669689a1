//! Error types for zowe-auth-platform

use thiserror::Error;

/// Result type alias for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;

/// Failures of the platform authority itself, as opposed to rejected credentials.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PlatformError {
    /// The native security library could not be loaded.
    #[error("native security service unavailable: {0}")]
    NativeUnavailable(String),

    /// The native call failed without producing a result.
    #[error("native security call failed: {0}")]
    Native(String),
}
