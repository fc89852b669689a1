//! Tower authentication middleware.
//!
//! `AuthLayer` and `AuthService` run an [`AuthFilter`] in front of any inner
//! service. Each request either reaches the inner service or the failure
//! handler, never both.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::IntoResponse;
use http::Request;
use tower::{Layer, Service};

use crate::{AuthFilter, AuthOutcome, FailureHandler};

/// Tower `Layer` that wraps services with request authentication.
#[derive(Clone)]
pub struct AuthLayer {
    filter: AuthFilter,
    failure_handler: Arc<dyn FailureHandler>,
}

impl AuthLayer {
    /// Create a new auth layer with the given filter and failure handler.
    pub fn new(filter: AuthFilter, failure_handler: Arc<dyn FailureHandler>) -> Self {
        Self {
            filter,
            failure_handler,
        }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            filter: self.filter.clone(),
            failure_handler: self.failure_handler.clone(),
        }
    }
}

/// Tower `Service` that authenticates requests before forwarding them.
///
/// On success, inserts the [`Principal`](crate::Principal) into request
/// extensions where it's available to downstream handlers.
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    filter: AuthFilter,
    failure_handler: Arc<dyn FailureHandler>,
}

impl<S> Service<Request<Body>> for AuthService<S>
where
    S: Service<Request<Body>, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    type Response = axum::response::Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let filter = self.filter.clone();
        let failure_handler = self.failure_handler.clone();

        Box::pin(async move {
            let (mut parts, body) = req.into_parts();

            match filter.authenticate(&parts).await {
                AuthOutcome::Anonymous => {}
                AuthOutcome::Authenticated(principal) => {
                    log::debug!("Authenticated {} for {}", principal.name, parts.uri.path());
                    parts.extensions.insert(principal);
                }
                AuthOutcome::Rejected(err) => {
                    return Ok(failure_handler.handle(&err));
                }
            }

            let resp = inner
                .call(Request::from_parts(parts, body))
                .await
                .unwrap_or_else(|infallible| match infallible {});
            Ok(resp.into_response())
        })
    }
}
