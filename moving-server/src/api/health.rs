//! Health check route - public (no authentication)

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::db::repository::boxes;
use crate::server::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
    box_count: Option<i64>,
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    // Doubles as a database liveness probe
    let box_count = boxes::count(&state.pool).await.ok();

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        box_count,
    })
}
