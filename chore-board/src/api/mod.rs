//! HTTP API handlers for chore-board

pub mod board;
pub mod checklist;
pub mod chores;
pub mod error;
pub mod health;
pub mod people;

pub use board::get_board;
pub use checklist::{complete_chore, get_checklist, toggle_subtask};
pub use chores::{
    create_chore, create_from_draft, delete_chore, get_chore, list_chores, list_completions,
    update_chore,
};
pub use error::ApiError;
pub use health::health_routes;
pub use people::list_people;
