//! # mdv-api — HTTP Boundary
//!
//! The axum router over the verification pipeline. Three routes:
//! `GET /specs` lists the supported spec tuples, `POST /zkverify` runs a
//! verification, and `GET /healthz` answers liveness probes.

pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::AppState;

/// Builds the service router over shared state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/specs", get(routes::specs))
        .route(
            "/zkverify",
            post(routes::zkverify).fallback(routes::method_not_allowed),
        )
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}
