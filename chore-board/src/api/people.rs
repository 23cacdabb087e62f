//! Household roster

use axum::{extract::State, Json};
use chore_common::db::ChoreStore;
use chore_common::models::Person;

use super::ApiError;
use crate::AppState;

/// GET /api/people
///
/// People ordered by name.
pub async fn list_people(State(state): State<AppState>) -> Result<Json<Vec<Person>>, ApiError> {
    Ok(Json(state.store().list_people().await?))
}
