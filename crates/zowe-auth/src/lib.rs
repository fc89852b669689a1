//! Authentication primitives for the Zowe REST API gateway.
//!
//! Provides:
//! - [`Principal`] — Identity established for a request
//! - [`Credential`] / [`CredentialExtractor`] — What a request carries and how to find it
//! - [`CredentialValidator`] — Trait for async credential validation (token codec, platform provider)
//! - [`AuthFilter`] — Ordered extractor/validator pairs, one pass per request
//! - [`AuthLayer`] / [`AuthService`] — Tower middleware running the filter
//! - [`FailureHandler`] — Turns an [`AuthError`] into a terminal response

mod credential;
mod error;
mod failure;
mod filter;
mod middleware;
mod principal;

use std::future::Future;
use std::pin::Pin;

pub use credential::{
    BasicAuthExtractor, Credential, CredentialExtractor, DEFAULT_TOKEN_HEADER,
    HeaderTokenExtractor,
};
pub use error::{AuthError, PlatformDiagnostic, PlatformErrorType};
pub use failure::{FailureHandler, JsonFailureHandler};
pub use filter::{AuthFilter, AuthFilterBuilder, AuthOutcome};
pub use middleware::{AuthLayer, AuthService};
pub use principal::{name_from_parts, principal_from_parts, Principal};

/// Boxed future returned by [`CredentialValidator::validate`].
pub type ValidateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<Principal>, AuthError>> + Send + 'a>>;

/// Trait for validating a credential and establishing a principal.
///
/// `Ok(None)` means the credential was well-formed but named nobody; the
/// filter then treats the request as if no credential had been sent.
pub trait CredentialValidator: Send + Sync + 'static {
    /// Validate a credential and return the principal it identifies.
    fn validate<'a>(&'a self, credential: &'a Credential) -> ValidateFuture<'a>;
}
