//! chore-board library - household chore board service
//!
//! JSON API over the chore store and the checklist/completion workflow.

use axum::Router;
use chore_common::db::SqliteStore;
use chore_common::workflow::ChoreWorkflow;
use chore_common::Clock;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Store plus this process's checklist state
    pub workflow: Arc<ChoreWorkflow<SqliteStore>>,
    /// Reference instant source; sampled once per request
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: SqliteStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            workflow: Arc::new(ChoreWorkflow::new(store)),
            clock,
        }
    }

    pub fn store(&self) -> &SqliteStore {
        self.workflow.store()
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route("/api/people", get(api::list_people))
        .route("/api/chores", get(api::list_chores).post(api::create_chore))
        .route("/api/chores/draft", post(api::create_from_draft))
        .route(
            "/api/chores/:id",
            get(api::get_chore)
                .put(api::update_chore)
                .delete(api::delete_chore),
        )
        .route("/api/chores/:id/checklist", get(api::get_checklist))
        .route("/api/chores/:id/checklist/:subtask_id", post(api::toggle_subtask))
        .route("/api/chores/:id/complete", post(api::complete_chore))
        .route("/api/chores/:id/completions", get(api::list_completions))
        .route("/api/board", get(api::get_board));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
