//! JWT token codec for the Zowe gateway.
//!
//! Implements [`zowe_auth::CredentialValidator`] for token credentials:
//! - HS256 signature verification against a shared secret
//! - Expiry and optional issuer checks
//! - Subject claim extraction into a [`Principal`]
//!
//! The same codec issues tokens after a successful password login.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use zowe_auth::{AuthError, Credential, CredentialValidator, Principal, ValidateFuture};

/// Default token lifetime (8 hours).
pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(8 * 3600);

/// What to do with a correctly signed token whose subject is blank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlankSubject {
    /// Fail with [`AuthError::InvalidToken`].
    #[default]
    Reject,
    /// Treat the request as carrying no credential.
    Anonymous,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iss: Option<String>,
    #[serde(default)]
    iat: u64,
    exp: u64,
}

/// Signs and verifies gateway tokens.
pub struct JwtTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: Option<String>,
    expiration: Duration,
    blank_subject: BlankSubject,
}

impl JwtTokenCodec {
    /// Create a codec for the given shared secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            issuer: None,
            expiration: DEFAULT_EXPIRATION,
            blank_subject: BlankSubject::default(),
        }
    }

    /// Stamp issued tokens with `issuer` and require it on verification.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        let issuer = issuer.into();
        self.validation.set_issuer(&[issuer.as_str()]);
        // `set_issuer` alone lets tokens without an `iss` claim through.
        self.validation.set_required_spec_claims(&["exp", "iss"]);
        self.issuer = Some(issuer);
        self
    }

    /// Lifetime of issued tokens.
    pub fn with_expiration(mut self, expiration: Duration) -> Self {
        self.expiration = expiration;
        self
    }

    /// Policy for signed tokens with a blank subject.
    pub fn with_blank_subject(mut self, policy: BlankSubject) -> Self {
        self.blank_subject = policy;
        self
    }

    /// Verify a token and return its subject as a principal.
    pub fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        self.decode_subject(token)?
            .map(Principal::new)
            .ok_or_else(|| AuthError::InvalidToken("token has no subject".into()))
    }

    /// Check signature and claims; `None` when the subject is missing or blank.
    fn decode_subject(&self, token: &str) -> Result<Option<String>, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::InvalidToken("token has expired".into()),
                ErrorKind::InvalidSignature => {
                    AuthError::InvalidToken("signature does not match".into())
                }
                ErrorKind::InvalidIssuer => AuthError::InvalidToken("invalid issuer".into()),
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(data.claims.sub.filter(|sub| !sub.trim().is_empty()))
    }

    /// Issue a token for `userid`.
    pub fn issue(&self, userid: &str) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AuthError::Unexpected(e.to_string()))?
            .as_secs();
        let claims = Claims {
            sub: Some(userid.to_string()),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + self.expiration.as_secs(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Unexpected(format!("failed to sign token: {e}")))
    }

    fn validate_token(&self, token: &str) -> Result<Option<Principal>, AuthError> {
        match (self.decode_subject(token)?, self.blank_subject) {
            (Some(sub), _) => Ok(Some(Principal::new(sub))),
            (None, BlankSubject::Anonymous) => {
                log::debug!("Token without subject treated as anonymous");
                Ok(None)
            }
            (None, BlankSubject::Reject) => {
                Err(AuthError::InvalidToken("token has no subject".into()))
            }
        }
    }
}

impl CredentialValidator for JwtTokenCodec {
    fn validate<'a>(&'a self, credential: &'a Credential) -> ValidateFuture<'a> {
        Box::pin(async move {
            match credential {
                Credential::Token(token) => self.validate_token(token),
                other => Err(AuthError::Unexpected(format!(
                    "token codec cannot validate {other:?}"
                ))),
            }
        })
    }
}
