//! Task record and the scope that partitions task collections.
//!
//! # Invariants
//! - `group_id` is `Some` exactly when the task lives in a grouped scope.
//! - `text` is stored trimmed and never blank.

use crate::model::id::{GroupId, TaskId};
use crate::model::timestamp::{self, iso_millis, iso_millis_option, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(with = "iso_millis")]
    pub created_at: Timestamp,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "iso_millis_option"
    )]
    pub updated_at: Option<Timestamp>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
}

impl Task {
    /// Creates a pending task owned by `scope`.
    pub fn new(text: impl Into<String>, scope: &TaskScope) -> Self {
        Self {
            id: TaskId::generate(),
            text: text.into(),
            completed: false,
            created_at: timestamp::now(),
            updated_at: None,
            username: scope.username.clone(),
            group_id: scope.group_id.clone(),
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.completed
    }

    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    /// Replaces the text and stamps `updated_at`.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.updated_at = Some(timestamp::now());
    }
}

/// Owner (and optional group) a task collection belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskScope {
    pub username: String,
    pub group_id: Option<GroupId>,
}

impl TaskScope {
    pub fn grouped(username: impl Into<String>, group_id: GroupId) -> Self {
        Self {
            username: username.into(),
            group_id: Some(group_id),
        }
    }

    /// Flat per-user task list without groups.
    pub fn ungrouped(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            group_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskScope};
    use crate::model::id::GroupId;

    #[test]
    fn ungrouped_task_omits_group_id_in_json() {
        let task = Task::new("buy milk", &TaskScope::ungrouped("alice"));
        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("groupId").is_none());
        assert!(json.get("updatedAt").is_none());
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn legacy_task_json_loads() {
        let raw = r#"{
            "id": "1712345678901",
            "text": "write report",
            "completed": true,
            "createdAt": "2024-04-05T19:34:38.901Z",
            "username": "alice",
            "groupId": "1712345600000"
        }"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert!(task.completed);
        assert_eq!(task.group_id, Some(GroupId::from("1712345600000")));
        assert_eq!(task.updated_at, None);
    }

    #[test]
    fn toggle_flips_back_and_forth() {
        let mut task = Task::new("x", &TaskScope::ungrouped("alice"));
        task.toggle();
        assert!(task.completed);
        task.toggle();
        assert!(task.is_pending());
    }
}
