//! User API module: registration, login and the caller's profile

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/users", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    let public_routes = Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login));

    let account_routes = Router::new()
        .route("/me", get(handler::me))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public_routes.merge(account_routes)
}
