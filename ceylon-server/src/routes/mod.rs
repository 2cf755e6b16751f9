use axum::Router;
use axum::extract::DefaultBodyLimit;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api;
use crate::core::ServerState;

/// Largest accepted request body; a destination with its gallery and
/// highlight images arrives as one multipart request
const MAX_BODY_SIZE: usize = 64 * 1024 * 1024;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no outer middleware, no state)
pub fn build_router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        // Listings - reads public, writes admin
        .merge(api::destinations::router(state))
        .merge(api::tour_packages::router(state))
        .merge(api::hotels::router(state))
        .merge(api::transports::router(state))
        // Accounts
        .merge(api::users::router(state))
        // Public
        .merge(api::chatbot::router())
        .merge(api::search::router())
        .merge(api::health::router())
        // Images
        .merge(api::uploads::router(state))
}

/// Build the fully configured application with all middleware and state
///
/// Used by both the HTTP server and the integration tests.
pub fn build_app(state: ServerState) -> Router {
    let request_id = HeaderName::from_static("x-request-id");

    build_router(&state)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        // ========== Tower HTTP Middleware ==========
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        // ========== Request ID ==========
        .layer(SetRequestIdLayer::new(request_id.clone(), XRequestId))
        .layer(PropagateRequestIdLayer::new(request_id))
        .with_state(state)
}
