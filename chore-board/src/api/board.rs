//! Board view

use axum::{
    extract::{Query, State},
    Json,
};
use chore_common::board::{build_view, BoardView, ViewFilter};
use chore_common::db::ChoreStore;
use chore_common::Error;
use serde::Deserialize;

use super::ApiError;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct BoardQuery {
    pub filter: Option<String>,
}

/// GET /api/board?filter=due|all|fresh
///
/// Every chore is classified against one `now` sampled at the start of the
/// request.
pub async fn get_board(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
) -> Result<Json<BoardView>, ApiError> {
    let filter = match query.filter.as_deref() {
        None => ViewFilter::default(),
        Some(raw) => raw
            .parse::<ViewFilter>()
            .map_err(|_| ApiError(Error::InvalidInput(format!("unknown board filter {:?}", raw))))?,
    };

    let now = state.clock.now();
    let chores = state.store().list_chores().await?;
    let checklist = state.workflow.checklist().await;

    Ok(Json(build_view(now, &chores, filter, &checklist)))
}
