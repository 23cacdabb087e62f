//! Common error types for the chore board

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Common result type for chore board operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the chore board crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Chore definition rejected before reaching persistence
    #[error("Invalid chore: {0}")]
    Validation(#[from] ValidationErrors),

    /// Malformed request parameter outside a chore definition
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for client-input errors, as opposed to connectivity/persistence failures
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::NotFound(_) | Error::InvalidInput(_)
        )
    }
}

/// Editable chore field a validation message is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChoreField {
    Title,
    Frequency,
    AssigneeIds,
    Subtasks,
}

impl fmt::Display for ChoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChoreField::Title => "title",
            ChoreField::Frequency => "frequency",
            ChoreField::AssigneeIds => "assigneeIds",
            ChoreField::Subtasks => "subtasks",
        };
        f.write_str(name)
    }
}

/// A single inline, field-level validation message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: ChoreField,
    pub message: String,
}

/// All field-level problems found in one chore definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: ChoreField, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// First message recorded for `field`, if any
    pub fn message_for(&self, field: ChoreField) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// `Ok(value)` when nothing was recorded, otherwise the collected errors
    pub fn into_result<T>(self, value: T) -> std::result::Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_display_joins_fields() {
        let mut errors = ValidationErrors::new();
        errors.push(ChoreField::Title, "title required");
        errors.push(ChoreField::Subtasks, "subtasks required");

        assert_eq!(
            errors.to_string(),
            "title: title required; subtasks: subtasks required"
        );
        assert_eq!(errors.message_for(ChoreField::Subtasks), Some("subtasks required"));
        assert_eq!(errors.message_for(ChoreField::Frequency), None);
    }

    #[test]
    fn test_into_result_empty_is_ok() {
        let errors = ValidationErrors::new();
        assert_eq!(errors.into_result(7), Ok(7));
    }

    #[test]
    fn test_client_error_classification() {
        let mut errors = ValidationErrors::new();
        errors.push(ChoreField::Title, "title required");
        assert!(Error::Validation(errors).is_client_error());
        assert!(Error::NotFound("chore".to_string()).is_client_error());
        assert!(!Error::Internal("boom".to_string()).is_client_error());
    }
}
