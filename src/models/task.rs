use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    pub description: String,
    pub is_completed: bool,
    /// Identifier of the owning account. Every read and write path filters by
    /// it; a task is invisible outside its owner's scope.
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input structure for creating a task.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[validate(custom = "crate::models::not_blank")]
    pub description: String,
    /// Defaults to false when omitted.
    #[serde(default)]
    pub is_completed: bool,
}

/// Partial update for a task.
///
/// The allow-set is {description, isCompleted}; `deny_unknown_fields` rejects
/// any other key at deserialization, before any mutation is applied.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTask {
    #[validate(custom = "crate::models::not_blank")]
    pub description: Option<String>,
    pub is_completed: Option<bool>,
}

/// Query parameters accepted when listing tasks.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    /// Equality filter on completion state.
    pub is_completed: Option<bool>,
    /// Sort directive in `field:asc|desc` form, e.g. `createdAt:desc`.
    pub sort: Option<String>,
    #[validate(range(min = 0))]
    pub limit: Option<i64>,
    #[validate(range(min = 0))]
    pub skip: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_task_defaults_to_not_completed() {
        let task: NewTask = serde_json::from_value(json!({ "description": "buy milk" })).unwrap();
        assert!(!task.is_completed);
        assert!(task.validate().is_ok());

        let blank: NewTask = serde_json::from_value(json!({ "description": "  " })).unwrap();
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_update_task_rejects_unknown_fields() {
        let result: Result<UpdateTask, _> =
            serde_json::from_value(json!({ "description": "x", "priority": "high" }));
        assert!(result.is_err());

        let result: Result<UpdateTask, _> =
            serde_json::from_value(json!({ "isCompleted": true }));
        assert!(result.is_ok());
    }

    #[test]
    fn test_task_query_rejects_negative_pagination() {
        let query: TaskQuery =
            serde_json::from_value(json!({ "limit": -1, "skip": 0 })).unwrap();
        assert!(query.validate().is_err());

        let query: TaskQuery =
            serde_json::from_value(json!({ "isCompleted": true, "limit": 10, "skip": 5 })).unwrap();
        assert!(query.validate().is_ok());
    }
}
