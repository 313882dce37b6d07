//! Box API handlers

use axum::{
    Json, Router,
    extract::{Extension, Path, State},
    routing::{get, post},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::db::models::{BoxRecord, CreateBox};
use crate::db::repository::boxes;
use crate::server::ServerState;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_TITLE_LEN, validate_positive, validate_required_text,
};
use crate::utils::{AppResponse, AppResult, now_millis, ok};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/boxes", post(create).get(list))
        .route("/api/boxes/{id}", get(get_by_id).delete(remove))
}

#[derive(Debug, Deserialize)]
pub struct BoxCreate {
    pub title: String,
    pub description: String,
    /// Declared value, whole currency units
    pub value: i64,
}

fn validate_create(payload: &BoxCreate) -> AppResult<()> {
    validate_required_text(&payload.title, "title", MAX_TITLE_LEN)?;
    validate_required_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_positive(payload.value, "value")?;
    Ok(())
}

/// POST /api/boxes - Register a box and create its label
///
/// The box row is inserted first; the label pipeline (render, compile,
/// store, publish) runs after. A compile failure fails the request but
/// the box row persists — its label read surfaces not-found until a
/// future recompile path exists.
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<BoxCreate>,
) -> AppResult<Json<AppResponse<BoxRecord>>> {
    validate_create(&payload)?;

    let record = boxes::create(
        &state.pool,
        CreateBox {
            title: payload.title,
            description: payload.description,
            value: payload.value,
            owner: current_user.username,
            created_at: now_millis(),
        },
    )
    .await?;

    tracing::info!(box_id = record.id, title = %record.title, "Box registered");

    state.labels.create_label(record.id, &record.title).await?;

    Ok(ok(record))
}

/// GET /api/boxes - List all non-deleted boxes
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<BoxRecord>>>> {
    let records = boxes::list(&state.pool).await?;
    Ok(ok(records))
}

/// GET /api/boxes/{id} - Load one box
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<BoxRecord>>> {
    let record = boxes::get(&state.pool, id).await?;
    Ok(ok(record))
}

/// DELETE /api/boxes/{id} - Soft-delete a box
///
/// The label artifact is kept: deleted box ids stay resolvable for
/// labels already printed.
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    boxes::delete(&state.pool, id).await?;
    tracing::info!(box_id = id, "Box deleted");
    Ok(ok(()))
}
