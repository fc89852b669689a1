//! Password authentication against the bound platform authority.

use std::sync::Arc;
use std::time::Duration;

use zowe_auth::{
    AuthError, Credential, CredentialValidator, PlatformDiagnostic, PlatformErrorType, Principal,
    ValidateFuture,
};

use crate::errno::PlatformPwdErrno;
use crate::user::{PlatformReturned, PlatformUser};

/// Default bound on a single platform call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const GENERIC_MESSAGE: &str = "Authentication error";

/// Validates user id and password credentials with a [`PlatformUser`].
pub struct PlatformAuthenticationProvider {
    user: Arc<dyn PlatformUser>,
    timeout: Duration,
}

impl PlatformAuthenticationProvider {
    /// Provider over an already bound authority.
    pub fn new(user: Arc<dyn PlatformUser>) -> Self {
        Self {
            user,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Give up on the platform after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the credentials and return the principal they identify.
    ///
    /// The platform call runs on the blocking pool. A timeout, a crashed call
    /// or a platform error is reported as [`AuthError::Unexpected`].
    pub async fn authenticate(&self, userid: &str, password: &str) -> Result<Principal, AuthError> {
        let user = self.user.clone();
        let (uid, pwd) = (userid.to_string(), password.to_string());
        let call = tokio::task::spawn_blocking(move || user.authenticate(&uid, &pwd));

        let returned = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(Ok(returned))) => returned,
            Ok(Ok(Err(e))) => return Err(AuthError::Unexpected(e.to_string())),
            Ok(Err(join)) => {
                return Err(AuthError::Unexpected(format!(
                    "platform authentication aborted: {join}"
                )));
            }
            Err(_) => {
                return Err(AuthError::Unexpected(format!(
                    "platform authentication timed out after {:?}",
                    self.timeout
                )));
            }
        };

        decide(userid, returned)
    }
}

/// Map what the authority returned to a principal or a classified error.
fn decide(userid: &str, returned: Option<PlatformReturned>) -> Result<Principal, AuthError> {
    let returned = match returned {
        None => return Ok(Principal::new(userid)),
        Some(r) if r.success => return Ok(Principal::new(userid)),
        Some(r) => r,
    };

    let known = PlatformPwdErrno::from_errno(returned.errno);
    let message = match known {
        None => {
            log::debug!("Platform authentication failed: {returned:?}");
            GENERIC_MESSAGE.to_string()
        }
        Some(errno) => {
            log::debug!(
                "Platform authentication failed: {} {} {returned:?}",
                errno.name,
                errno.explanation
            );
            match errno.error_type {
                PlatformErrorType::Internal => {
                    format!("Internal authentication error: {}", errno.explanation)
                }
                PlatformErrorType::UserExplained => {
                    format!("{GENERIC_MESSAGE}: {}", errno.explanation)
                }
                PlatformErrorType::Default => GENERIC_MESSAGE.to_string(),
            }
        }
    };

    let diagnostic = PlatformDiagnostic {
        rc: returned.rc,
        errno: returned.errno,
        errno2: returned.errno2,
        name: known.map(|e| e.name.to_string()),
        explanation: known.map(|e| e.explanation.to_string()),
        error_type: known.map_or(PlatformErrorType::Default, |e| e.error_type),
    };

    Err(AuthError::Platform {
        message,
        diagnostic,
    })
}

impl CredentialValidator for PlatformAuthenticationProvider {
    fn validate<'a>(&'a self, credential: &'a Credential) -> ValidateFuture<'a> {
        Box::pin(async move {
            match credential {
                Credential::Password { userid, password } => {
                    self.authenticate(userid, password).await.map(Some)
                }
                other => Err(AuthError::Unexpected(format!(
                    "platform provider cannot validate {other:?}"
                ))),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::MockPlatformUser;
    use crate::{PlatformError, Result};

    /// Fails every check with the configured returned value.
    struct RejectingUser(PlatformReturned);

    impl PlatformUser for RejectingUser {
        fn name(&self) -> &'static str {
            "rejecting"
        }

        fn authenticate(&self, _userid: &str, _password: &str) -> Result<Option<PlatformReturned>> {
            Ok(Some(self.0.clone()))
        }
    }

    struct NullUser;

    impl PlatformUser for NullUser {
        fn name(&self) -> &'static str {
            "null"
        }

        fn authenticate(&self, _userid: &str, _password: &str) -> Result<Option<PlatformReturned>> {
            Ok(None)
        }
    }

    struct BrokenUser;

    impl PlatformUser for BrokenUser {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn authenticate(&self, _userid: &str, _password: &str) -> Result<Option<PlatformReturned>> {
            Err(PlatformError::Native("SAF router not active".into()))
        }
    }

    struct SlowUser;

    impl PlatformUser for SlowUser {
        fn name(&self) -> &'static str {
            "slow"
        }

        fn authenticate(&self, _userid: &str, _password: &str) -> Result<Option<PlatformReturned>> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(None)
        }
    }

    fn rejecting(errno: i32) -> PlatformAuthenticationProvider {
        PlatformAuthenticationProvider::new(Arc::new(RejectingUser(PlatformReturned::failure(
            -1, errno, 0x0BAD_0001,
        ))))
    }

    async fn message_for(errno: i32) -> String {
        match rejecting(errno).authenticate("alice", "pw").await {
            Err(AuthError::Platform { message, .. }) => message,
            other => panic!("expected platform error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_null_returned_is_success() {
        let provider = PlatformAuthenticationProvider::new(Arc::new(NullUser));
        let principal = provider.authenticate("alice", "pw").await.unwrap();
        assert_eq!(principal, Principal::new("alice"));
    }

    #[tokio::test]
    async fn test_mock_succeeds_with_empty_authorities() {
        let provider = PlatformAuthenticationProvider::new(Arc::new(MockPlatformUser));
        let principal = provider.authenticate("bob", "").await.unwrap();
        assert_eq!(principal.name, "bob");
        assert!(principal.authorities.is_empty());
    }

    #[tokio::test]
    async fn test_user_explained_message() {
        assert_eq!(
            message_for(111).await,
            "Authentication error: Permission is denied; the specified password is incorrect"
        );
    }

    #[tokio::test]
    async fn test_internal_message() {
        assert_eq!(
            message_for(157).await,
            "Internal authentication error: An MVS environmental error has been detected"
        );
    }

    #[tokio::test]
    async fn test_default_classification_is_generic() {
        assert_eq!(message_for(121).await, "Authentication error");
    }

    #[tokio::test]
    async fn test_unknown_errno_is_generic() {
        assert_eq!(message_for(4242).await, "Authentication error");
    }

    #[tokio::test]
    async fn test_diagnostic_is_attached() {
        let err = rejecting(168).authenticate("alice", "pw").await.unwrap_err();
        let diagnostic = err.diagnostic().unwrap();
        assert_eq!(diagnostic.rc, -1);
        assert_eq!(diagnostic.errno, 168);
        assert_eq!(diagnostic.errno2, 0x0BAD_0001);
        assert_eq!(diagnostic.name.as_deref(), Some("EMVSEXPIRE"));
        assert_eq!(diagnostic.error_type, PlatformErrorType::UserExplained);
    }

    #[tokio::test]
    async fn test_diagnostic_for_unknown_errno() {
        let err = rejecting(4242).authenticate("alice", "pw").await.unwrap_err();
        let diagnostic = err.diagnostic().unwrap();
        assert_eq!(diagnostic.errno, 4242);
        assert!(diagnostic.name.is_none());
        assert_eq!(diagnostic.error_type, PlatformErrorType::Default);
    }

    #[tokio::test]
    async fn test_platform_error_is_unexpected() {
        let provider = PlatformAuthenticationProvider::new(Arc::new(BrokenUser));
        let err = provider.authenticate("alice", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::Unexpected(ref m) if m.contains("SAF router")));
    }

    #[tokio::test]
    async fn test_timeout_is_unexpected() {
        let provider = PlatformAuthenticationProvider::new(Arc::new(SlowUser))
            .with_timeout(Duration::from_millis(20));
        let err = provider.authenticate("alice", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::Unexpected(ref m) if m.contains("timed out")));
    }

    #[tokio::test]
    async fn test_validator_accepts_password_credential() {
        let provider = PlatformAuthenticationProvider::new(Arc::new(MockPlatformUser));
        let credential = Credential::Password {
            userid: "alice".into(),
            password: "anything".into(),
        };
        let principal = provider.validate(&credential).await.unwrap();
        assert_eq!(principal, Some(Principal::new("alice")));
    }

    #[tokio::test]
    async fn test_validator_rejects_token_credential() {
        let provider = PlatformAuthenticationProvider::new(Arc::new(MockPlatformUser));
        let credential = Credential::Token("abc".into());
        assert!(matches!(
            provider.validate(&credential).await,
            Err(AuthError::Unexpected(_))
        ));
    }

    proptest::proptest! {
        #[test]
        fn prop_mock_accepts_any_password(userid in "[A-Z][A-Z0-9]{0,7}", password in ".{0,32}") {
            let provider = PlatformAuthenticationProvider::new(Arc::new(MockPlatformUser));
            let runtime = tokio::runtime::Runtime::new().unwrap();
            let principal = runtime.block_on(provider.authenticate(&userid, &password)).unwrap();
            proptest::prop_assert_eq!(principal.name, userid);
            proptest::prop_assert!(principal.authorities.is_empty());
        }

        #[test]
        fn prop_unknown_errno_never_leaks(errno in proptest::num::i32::ANY) {
            proptest::prop_assume!(PlatformPwdErrno::from_errno(errno).is_none());
            let err = decide("alice", Some(PlatformReturned::failure(-1, errno, 0))).unwrap_err();
            proptest::prop_assert_eq!(err.client_message(), GENERIC_MESSAGE);
        }
    }
}
