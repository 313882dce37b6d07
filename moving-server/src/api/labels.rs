//! Label API handlers
//!
//! Artifact fetch, reprint, and the long-lived print-event stream the
//! printer client subscribes to.

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    response::Response,
    routing::{get, post},
};

use crate::labels::EventSubscription;
use crate::server::ServerState;
use crate::utils::{AppError, AppResponse, AppResult, ok};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/labels/events", get(events))
        .route("/api/labels/{id}", get(artifact))
        .route("/api/labels/{id}/print", post(reprint))
}

/// GET /api/labels/{id} - The compiled label PDF
pub async fn artifact(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let bytes = state.labels.artifact(id)?;

    Response::builder()
        .header(http::header::CONTENT_TYPE, "application/pdf")
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// POST /api/labels/{id}/print - Queue another physical print
///
/// Publish-only: the stored artifact is reused, nothing recompiles.
pub async fn reprint(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    state.labels.reprint(id).await?;
    Ok(ok(()))
}

/// GET /api/labels/events - The live print-event stream
///
/// Claims the single subscriber slot (409 when taken) and then streams
/// newline-delimited box ids for as long as the connection stays open.
/// The slot is released when the response body is dropped — normal
/// end, client disconnect, or shutdown.
pub async fn events(State(state): State<ServerState>) -> AppResult<Response> {
    let subscription = state
        .events
        .try_subscribe()
        .map_err(|_| AppError::Conflict("label event stream already streaming".to_string()))?;

    let stream = futures::stream::unfold(subscription, |mut sub: EventSubscription| async move {
        let id = sub.next_id().await?;
        Some((
            Ok::<_, std::convert::Infallible>(axum::body::Bytes::from(format!("{id}\n"))),
            sub,
        ))
    });

    Response::builder()
        .header(http::header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(http::header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(e.to_string()))
}
