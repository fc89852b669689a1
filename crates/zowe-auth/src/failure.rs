//! Terminal responses for rejected requests.

use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::AuthError;

/// Turns an authentication failure into the response sent to the caller.
///
/// Must always produce a response; the request goes no further.
pub trait FailureHandler: Send + Sync + 'static {
    /// Build the terminal response for `error`.
    fn handle(&self, error: &AuthError) -> Response;
}

/// Writes `{"error": {"category": "authentication", "message": ...}}`.
///
/// Client errors map to 401 with a `WWW-Authenticate` challenge, unexpected
/// faults to 500. Platform diagnostics are put in the response extensions
/// and never in the body.
#[derive(Debug, Clone)]
pub struct JsonFailureHandler {
    realm: String,
}

impl JsonFailureHandler {
    /// Handler advertising the given realm in its challenge.
    pub fn new(realm: impl Into<String>) -> Self {
        Self {
            realm: realm.into(),
        }
    }
}

impl Default for JsonFailureHandler {
    fn default() -> Self {
        Self::new("zowe")
    }
}

impl FailureHandler for JsonFailureHandler {
    fn handle(&self, error: &AuthError) -> Response {
        let status = if error.is_client_error() {
            log::warn!("Authentication failed: {error}");
            StatusCode::UNAUTHORIZED
        } else {
            log::error!("Authentication aborted: {error}");
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({
            "error": {
                "category": "authentication",
                "message": error.client_message(),
            }
        });

        let mut response = (
            status,
            [(http::header::CONTENT_TYPE, "application/json")],
            serde_json::to_string(&body).unwrap_or_default(),
        )
            .into_response();

        if status == StatusCode::UNAUTHORIZED {
            let realm = self.realm.replace('\\', "\\\\").replace('"', "\\\"");
            let challenge = format!(r#"Basic realm="{realm}""#);
            if let Ok(value) = http::HeaderValue::from_str(&challenge) {
                response
                    .headers_mut()
                    .insert(http::header::WWW_AUTHENTICATE, value);
            }
        }

        if let Some(diagnostic) = error.diagnostic() {
            log::debug!("Platform diagnostic: {diagnostic}");
            response.extensions_mut().insert(diagnostic.clone());
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PlatformDiagnostic, PlatformErrorType};
    use axum::body::to_bytes;

    fn platform_error() -> AuthError {
        AuthError::Platform {
            message: "Internal authentication error: An MVS environmental error has been detected"
                .to_string(),
            diagnostic: PlatformDiagnostic {
                rc: -1,
                errno: 157,
                errno2: 0x0BE8_0001,
                name: Some("EMVSERR".to_string()),
                explanation: Some("An MVS environmental error has been detected".to_string()),
                error_type: PlatformErrorType::Internal,
            },
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_token_is_401() {
        let resp = JsonFailureHandler::default().handle(&AuthError::InvalidToken("sig".into()));
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers()[http::header::WWW_AUTHENTICATE],
            r#"Basic realm="zowe""#
        );
        let body = body_json(resp).await;
        assert_eq!(body["error"]["category"], "authentication");
        assert_eq!(body["error"]["message"], "Invalid or expired token");
    }

    #[test]
    fn test_realm_is_quoted() {
        let resp = JsonFailureHandler::new(r#"my "lab" \ zone"#)
            .handle(&AuthError::InvalidToken("sig".into()));
        assert_eq!(
            resp.headers()[http::header::WWW_AUTHENTICATE],
            r#"Basic realm="my \"lab\" \\ zone""#
        );
    }

    #[tokio::test]
    async fn test_platform_error_carries_diagnostic_in_extensions() {
        let resp = JsonFailureHandler::new("mainframe").handle(&platform_error());
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let diagnostic = resp.extensions().get::<PlatformDiagnostic>().cloned().unwrap();
        assert_eq!(diagnostic.errno, 157);

        let body = body_json(resp).await;
        assert_eq!(
            body["error"]["message"],
            "Internal authentication error: An MVS environmental error has been detected"
        );
        assert!(body["error"].get("errno").is_none());
    }

    #[tokio::test]
    async fn test_unexpected_fault_is_500_without_detail() {
        let resp =
            JsonFailureHandler::default().handle(&AuthError::Unexpected("timeout after 5s".into()));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(resp.headers().get(http::header::WWW_AUTHENTICATE).is_none());
        let body = body_json(resp).await;
        assert_eq!(body["error"]["message"], "Unexpected error during authentication");
    }
}
