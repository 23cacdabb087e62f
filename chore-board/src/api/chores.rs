//! Chore CRUD and completion history

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chore_common::assign::ChoreDraft;
use chore_common::db::ChoreStore;
use chore_common::models::{Chore, ChoreInput, Completion};
use chore_common::{uuid_utils, Error};
use uuid::Uuid;

use super::ApiError;
use crate::AppState;

/// Parse a chore or subtask id from the URL
///
/// A malformed id cannot name anything, so it is reported as not found.
pub(crate) fn path_id(kind: &str, raw: &str) -> Result<Uuid, ApiError> {
    uuid_utils::parse(raw).map_err(|_| ApiError(Error::NotFound(format!("{} {}", kind, raw))))
}

/// GET /api/chores
pub async fn list_chores(State(state): State<AppState>) -> Result<Json<Vec<Chore>>, ApiError> {
    Ok(Json(state.store().list_chores().await?))
}

/// GET /api/chores/:id
pub async fn get_chore(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Chore>, ApiError> {
    let chore_id = path_id("chore", &id)?;
    Ok(Json(state.store().get_chore(chore_id).await?))
}

/// POST /api/chores
pub async fn create_chore(
    State(state): State<AppState>,
    Json(input): Json<ChoreInput>,
) -> Result<(StatusCode, Json<Chore>), ApiError> {
    let chore = state.workflow.create(&input).await?;
    Ok((StatusCode::CREATED, Json(chore)))
}

/// POST /api/chores/draft
///
/// Accepts free-form editor state: "assigned to" hints in the title and
/// newline or `;` separated subtasks.
pub async fn create_from_draft(
    State(state): State<AppState>,
    Json(draft): Json<ChoreDraft>,
) -> Result<(StatusCode, Json<Chore>), ApiError> {
    let roster = state.store().list_people().await?;
    let input = draft.to_input(&roster);
    let chore = state.workflow.create(&input).await?;
    Ok((StatusCode::CREATED, Json(chore)))
}

/// PUT /api/chores/:id
pub async fn update_chore(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ChoreInput>,
) -> Result<Json<Chore>, ApiError> {
    let chore_id = path_id("chore", &id)?;
    Ok(Json(state.workflow.edit(chore_id, &input).await?))
}

/// DELETE /api/chores/:id
pub async fn delete_chore(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let chore_id = path_id("chore", &id)?;
    state.workflow.delete(chore_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/chores/:id/completions
///
/// Newest first. History outlives the chore, so no existence check here.
pub async fn list_completions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Completion>>, ApiError> {
    let chore_id = path_id("chore", &id)?;
    Ok(Json(state.store().list_completions(chore_id).await?))
}
