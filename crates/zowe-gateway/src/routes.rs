//! HTTP routes served behind the auth layer.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Query, State};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::{HeaderName, HeaderValue, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use zowe_auth::{name_from_parts, principal_from_parts, Principal};
use zowe_auth_jwt::JwtTokenCodec;

/// Shared state of the gateway routes.
#[derive(Clone)]
pub struct AppState {
    /// Issues tokens after login.
    pub codec: Arc<JwtTokenCodec>,
    /// Header carrying the issued token.
    pub token_header: HeaderName,
}

/// Extractor that requires the auth layer to have established a principal.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        principal_from_parts(parts)
            .cloned()
            .map(Authenticated)
            .ok_or_else(authentication_required)
    }
}

/// Name of the caller, `anonymous` when no credential was sent.
#[derive(Debug, Clone)]
pub struct Caller(pub String);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Caller(name_from_parts(parts).to_string()))
    }
}

fn authentication_required() -> Response {
    let body = json!({
        "error": {
            "category": "authentication",
            "message": "Authentication is required",
        }
    });
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

/// Body of a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The issued token.
    pub token: String,
}

/// `POST /api/v1/auth/login` — exchange credentials for a token.
pub async fn login(State(state): State<AppState>, Authenticated(principal): Authenticated) -> Response {
    match state.codec.issue(&principal.name) {
        Ok(token) => {
            log::info!("Issued token for {}", principal.name);
            let mut response = Json(LoginResponse {
                token: token.clone(),
            })
            .into_response();
            if let Ok(value) = HeaderValue::from_str(&token) {
                response.headers_mut().insert(state.token_header.clone(), value);
            }
            response
        }
        Err(e) => {
            log::error!("Token issue failed for {}: {e}", principal.name);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": { "category": "internal", "message": "Token could not be issued" } })),
            )
                .into_response()
        }
    }
}

/// `GET /api/v1/auth/query` — who the caller is.
pub async fn query(Authenticated(principal): Authenticated) -> Json<Principal> {
    Json(principal)
}

/// Query string of the greeting route.
#[derive(Debug, Deserialize)]
pub struct GreetingParams {
    name: Option<String>,
}

/// Greeting body.
#[derive(Debug, Serialize, Deserialize)]
pub struct Greeting {
    /// Greeting text.
    pub content: String,
    /// Caller identity, `anonymous` without credentials.
    pub user: String,
}

/// `GET /api/v1/greeting` — sample resource open to anonymous callers.
pub async fn greeting(Caller(user): Caller, Query(params): Query<GreetingParams>) -> Json<Greeting> {
    let name = params.name.unwrap_or_else(|| "world".to_string());
    Json(Greeting {
        content: format!("Hello, {name}!"),
        user,
    })
}
