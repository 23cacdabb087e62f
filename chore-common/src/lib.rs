//! # Chore Board Common Library
//!
//! Shared code for the chore board:
//! - Due-status / freshness scheduling model and the cleanliness score
//! - Board ordering and filtering
//! - Checklist gate and completion workflow
//! - Assignee hints in free-text titles
//! - SQLite persistence, configuration, errors

pub mod assign;
pub mod board;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod schedule;
pub mod score;
pub mod time;
pub mod uuid_utils;
pub mod workflow;

pub use error::{Error, Result};
pub use schedule::{DueStatus, Frequency, Recurring};
pub use time::{Clock, ManualClock, SystemClock};
