//! Checklist toggling and the gated finish

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use chore_common::workflow::{ChecklistProgress, FinishOutcome};
use chore_common::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::chores::path_id;
use super::ApiError;
use crate::AppState;

/// Body of POST /api/chores/:id/complete
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    #[serde(default)]
    pub completed_by_person_id: Option<Uuid>,
}

/// Result of a finish attempt
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteResponse {
    /// False when some subtask was still unchecked; nothing was persisted
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_done_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_id: Option<Uuid>,
    pub checklist: ChecklistProgress,
}

/// GET /api/chores/:id/checklist
pub async fn get_checklist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ChecklistProgress>, ApiError> {
    let chore_id = path_id("chore", &id)?;
    Ok(Json(state.workflow.progress(chore_id).await?))
}

/// POST /api/chores/:id/checklist/:subtask_id
pub async fn toggle_subtask(
    State(state): State<AppState>,
    Path((id, subtask)): Path<(String, String)>,
) -> Result<Json<ChecklistProgress>, ApiError> {
    let chore_id = path_id("chore", &id)?;
    let subtask_id = path_id("subtask", &subtask)?;
    Ok(Json(state.workflow.toggle(chore_id, subtask_id).await?))
}

impl CompleteRequest {
    /// An empty body means no attribution; anything else must parse
    fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|e| {
            ApiError(Error::InvalidInput(format!("completion request: {}", e)))
        })
    }
}

/// POST /api/chores/:id/complete
///
/// The body is optional; without it the completion is unattributed.
pub async fn complete_chore(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<CompleteResponse>, ApiError> {
    let chore_id = path_id("chore", &id)?;
    let request = CompleteRequest::from_body(&body)?;
    let now = state.clock.now();

    let response = match state
        .workflow
        .finish(chore_id, request.completed_by_person_id, now)
        .await?
    {
        FinishOutcome::Completed(completion) => CompleteResponse {
            completed: true,
            last_done_at: Some(completion.completed_at),
            completion_id: Some(completion.id),
            checklist: state.workflow.progress(chore_id).await?,
        },
        FinishOutcome::NotReady(progress) => CompleteResponse {
            completed: false,
            last_done_at: None,
            completion_id: None,
            checklist: progress,
        },
    };

    Ok(Json(response))
}
