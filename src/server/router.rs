use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::constants::MAX_REQUEST_BODY_BYTES;
use crate::server::handlers::{health, submit_incident, submit_incident_options};
use crate::server::state::AppState;

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/incidents/submit",
            post(submit_incident).options(submit_incident_options),
        )
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
