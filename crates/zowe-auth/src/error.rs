//! Auth-specific error types.

use std::fmt;

use serde::Serialize;

/// Classification of a platform error, deciding how much of it a caller sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformErrorType {
    /// Not explained to the caller; a generic message is shown.
    Default,
    /// A problem with the platform itself rather than the credentials.
    Internal,
    /// A problem the user can act on (wrong password, expired password...).
    UserExplained,
}

/// Error detail reported by the external identity authority.
///
/// Attached to [`AuthError::Platform`] and copied into the failure
/// response's extensions so that server-side logging can pick it up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformDiagnostic {
    /// Return code of the native call.
    pub rc: i32,
    /// Platform errno.
    pub errno: i32,
    /// Secondary reason code.
    pub errno2: i32,
    /// Symbolic errno name, when the errno is known.
    pub name: Option<String>,
    /// Human-readable explanation, when the errno is known.
    pub explanation: Option<String>,
    /// Classification of the errno; `Default` when unknown.
    pub error_type: PlatformErrorType,
}

impl fmt::Display for PlatformDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rc={} errno={} errno2=0x{:08x}",
            self.rc, self.errno, self.errno2
        )?;
        if let Some(name) = &self.name {
            write!(f, " ({name})")?;
        }
        Ok(())
    }
}

/// Errors that can occur while authenticating a request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Token is malformed, badly signed, expired or has no subject.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The platform identity authority rejected the credentials.
    #[error("{message}")]
    Platform {
        /// Message selected from the diagnostic classification.
        message: String,
        /// Raw detail returned by the authority.
        diagnostic: PlatformDiagnostic,
    },

    /// Any other failure while validating a credential.
    #[error("unexpected authentication failure: {0}")]
    Unexpected(String),
}

impl AuthError {
    /// Whether this error should result in a 401 (vs. a 500).
    pub fn is_client_error(&self) -> bool {
        matches!(self, AuthError::InvalidToken(_) | AuthError::Platform { .. })
    }

    /// The platform diagnostic carried by this error, if any.
    pub fn diagnostic(&self) -> Option<&PlatformDiagnostic> {
        match self {
            AuthError::Platform { diagnostic, .. } => Some(diagnostic),
            _ => None,
        }
    }

    /// Message that is safe to show to the caller.
    ///
    /// Unexpected faults never expose their detail.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::InvalidToken(_) => "Invalid or expired token".to_string(),
            AuthError::Platform { message, .. } => message.clone(),
            AuthError::Unexpected(_) => "Unexpected error during authentication".to_string(),
        }
    }
}
