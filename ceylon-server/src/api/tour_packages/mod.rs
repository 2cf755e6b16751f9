//! Tour package API module
//!
//! Also hosts tour bookings: `/api/tour-packages/bookings`.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::{require_admin, require_auth};
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/tour-packages", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let booking_routes = Router::new()
        .route(
            "/bookings",
            get(handler::list_bookings).post(handler::create_booking),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    read_routes.merge(booking_routes).merge(manage_routes)
}
