//! Gateway assembly and serving.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use zowe_auth::{AuthFilter, AuthLayer, BasicAuthExtractor, HeaderTokenExtractor, JsonFailureHandler};
use zowe_auth_jwt::JwtTokenCodec;
use zowe_auth_platform::{AuthorityBinding, NativeSecurityFactory, PlatformAuthenticationProvider};

use crate::config::GatewayConfig;
use crate::routes::{self, AppState};
use crate::{Error, Result};

/// Build the gateway router.
///
/// Binds the platform authority through `binding` (a no-op if it is already
/// bound), then puts every route behind the auth layer: tokens from the
/// configured header are checked by the codec, basic credentials by the
/// platform provider.
pub fn build_router(
    config: &GatewayConfig,
    binding: &AuthorityBinding,
    native: &dyn NativeSecurityFactory,
) -> Result<Router> {
    config.validate()?;
    let token_header = config.token_header()?;

    let user = binding.bind(&config.auth.profiles, native)?;
    let provider = Arc::new(
        PlatformAuthenticationProvider::new(user).with_timeout(config.auth.platform.timeout()),
    );

    let token = &config.auth.token;
    let mut codec = JwtTokenCodec::new(token.secret_key.as_bytes())
        .with_expiration(Duration::from_secs(token.expiration_secs))
        .with_blank_subject(token.blank_subject);
    if let Some(issuer) = &token.issuer {
        codec = codec.with_issuer(issuer.clone());
    }
    let codec = Arc::new(codec);

    let filter = AuthFilter::builder()
        .register(HeaderTokenExtractor::new(token_header.clone()), codec.clone())
        .register(BasicAuthExtractor, provider)
        .build();
    let auth = AuthLayer::new(
        filter,
        Arc::new(JsonFailureHandler::new(config.server.realm.clone())),
    );

    let state = AppState {
        codec,
        token_header,
    };

    Ok(Router::new()
        .route("/api/v1/auth/login", post(routes::login))
        .route("/api/v1/auth/query", get(routes::query))
        .route("/api/v1/greeting", get(routes::greeting))
        .layer(auth)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Serve the gateway until Ctrl-C.
pub async fn serve(config: GatewayConfig, native: &dyn NativeSecurityFactory) -> Result<()> {
    let app = build_router(&config, AuthorityBinding::global(), native)?;
    let addr = config.bind_addr()?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(Error::io)?;
    log::info!("Gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Error::io)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    log::info!("Shutdown requested");
}
