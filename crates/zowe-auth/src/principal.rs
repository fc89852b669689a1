//! Authenticated principal and extraction helpers.

use serde::Serialize;

/// The identity established for one request.
///
/// Stored in HTTP request extensions by the auth middleware. Authorization
/// is handled elsewhere, so every path in this workspace produces an empty
/// authority list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    /// The user id.
    pub name: String,
    /// Granted authorities.
    pub authorities: Vec<String>,
}

impl Principal {
    /// Principal with no authorities.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            authorities: Vec::new(),
        }
    }
}

/// Extract the `Principal` from HTTP request `Parts`, if present.
pub fn principal_from_parts(parts: &http::request::Parts) -> Option<&Principal> {
    parts.extensions.get::<Principal>()
}

/// Extract the user id from HTTP request `Parts`.
///
/// Returns `"anonymous"` if the request carried no credential.
pub fn name_from_parts(parts: &http::request::Parts) -> &str {
    parts
        .extensions
        .get::<Principal>()
        .map(|p| p.name.as_str())
        .unwrap_or("anonymous")
}
