use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Status given to a todo created without one
pub const DEFAULT_STATUS: &str = "TO DO";

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

/// Todo entity - a persisted to-do record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Todo {
    /// Storage-assigned identifier, always positive
    pub id: i64,
    pub description: String,
    pub status: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or replacing a todo
///
/// Any `id` in the body is ignored: storage assigns identifiers on create,
/// and the path identifier wins on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct TodoInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(read_only)]
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 1000), custom(function = "validate_not_blank"))]
    pub description: String,
    /// Defaults to "TO DO" when absent
    #[validate(length(min = 1, max = 64))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl TodoInput {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// Validated values handed to storage for insert or replace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub description: String,
    pub status: String,
}

impl From<TodoInput> for NewTodo {
    fn from(input: TodoInput) -> Self {
        Self {
            description: input.description,
            status: input.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_todo_defaults_status() {
        let new: NewTodo = TodoInput::new("write tests").into();
        assert_eq!(new.status, DEFAULT_STATUS);
        assert_eq!(new.description, "write tests");
    }

    #[test]
    fn test_new_todo_keeps_explicit_status() {
        let new: NewTodo = TodoInput::new("ship").with_status("DONE").into();
        assert_eq!(new.status, "DONE");
    }

    #[test]
    fn test_input_accepts_body_id() {
        let input: TodoInput =
            serde_json::from_str(r#"{"id": 9, "description": "x", "status": "DONE"}"#).unwrap();
        assert_eq!(input.id, Some(9));
        assert_eq!(input.status.as_deref(), Some("DONE"));
    }

    #[test]
    fn test_input_validation_bounds() {
        assert!(TodoInput::new("").validate().is_err());
        assert!(TodoInput::new("   ").validate().is_err());
        assert!(TodoInput::new("x".repeat(1001)).validate().is_err());
        assert!(TodoInput::new("ok").with_status("").validate().is_err());
        assert!(TodoInput::new("ok").validate().is_ok());
    }
}
