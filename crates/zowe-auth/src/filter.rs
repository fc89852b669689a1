//! The authentication decision for a single request.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use http::request::Parts;

use crate::{AuthError, CredentialExtractor, CredentialValidator, Principal};

/// Result of one filter pass.
#[derive(Debug)]
pub enum AuthOutcome {
    /// No credential found; downstream authorization decides.
    Anonymous,
    /// Credential validated.
    Authenticated(Principal),
    /// Credential present but rejected.
    Rejected(AuthError),
}

struct Registration {
    extractor: Arc<dyn CredentialExtractor>,
    validator: Arc<dyn CredentialValidator>,
}

/// Ordered extractor/validator pairs.
///
/// The first extractor that finds a credential decides which validator runs;
/// later pairs are not consulted for that request.
#[derive(Clone, Default)]
pub struct AuthFilter {
    registrations: Arc<Vec<Registration>>,
}

impl AuthFilter {
    /// Start building a filter.
    pub fn builder() -> AuthFilterBuilder {
        AuthFilterBuilder::default()
    }

    /// Number of registered extractor/validator pairs.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Whether no pair is registered.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Run extraction and validation for a request head.
    pub async fn authenticate(&self, parts: &Parts) -> AuthOutcome {
        let found = self.registrations.iter().find_map(|r| {
            r.extractor
                .extract(parts)
                .map(|credential| (credential, r.validator.clone()))
        });

        let Some((credential, validator)) = found else {
            return AuthOutcome::Anonymous;
        };

        let result = AssertUnwindSafe(validator.validate(&credential))
            .catch_unwind()
            .await;

        match result {
            Ok(Ok(Some(principal))) => AuthOutcome::Authenticated(principal),
            Ok(Ok(None)) => AuthOutcome::Anonymous,
            Ok(Err(e)) => AuthOutcome::Rejected(e),
            Err(_) => AuthOutcome::Rejected(AuthError::Unexpected(
                "credential validator panicked".to_string(),
            )),
        }
    }
}

/// Builder for [`AuthFilter`].
#[derive(Default)]
pub struct AuthFilterBuilder {
    registrations: Vec<Registration>,
}

impl AuthFilterBuilder {
    /// Register an extractor and the validator for what it extracts.
    pub fn register<E, V>(mut self, extractor: E, validator: Arc<V>) -> Self
    where
        E: CredentialExtractor,
        V: CredentialValidator,
    {
        self.registrations.push(Registration {
            extractor: Arc::new(extractor),
            validator,
        });
        self
    }

    /// Finish the filter.
    pub fn build(self) -> AuthFilter {
        AuthFilter {
            registrations: Arc::new(self.registrations),
        }
    }
}
