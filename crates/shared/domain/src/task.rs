//! Care task entity and its enumerations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Lifecycle state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Skipped,
}

impl TaskStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }

    /// Completion toggle used by task cards: COMPLETED goes back to PENDING,
    /// anything else becomes COMPLETED.
    pub fn toggled(&self) -> Self {
        if self.is_completed() {
            TaskStatus::Pending
        } else {
            TaskStatus::Completed
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(TaskStatus::Pending),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "COMPLETED" => Ok(TaskStatus::Completed),
            "SKIPPED" => Ok(TaskStatus::Skipped),
            other => Err(format!("unknown task status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LOW" => Ok(TaskPriority::Low),
            "MEDIUM" => Ok(TaskPriority::Medium),
            "HIGH" => Ok(TaskPriority::High),
            "CRITICAL" => Ok(TaskPriority::Critical),
            other => Err(format!("unknown task priority: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskType {
    Medication,
    Meal,
    Hygiene,
    Activity,
    Appointment,
}

impl std::str::FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MEDICATION" => Ok(TaskType::Medication),
            "MEAL" => Ok(TaskType::Meal),
            "HYGIENE" => Ok(TaskType::Hygiene),
            "ACTIVITY" => Ok(TaskType::Activity),
            "APPOINTMENT" => Ok(TaskType::Appointment),
            other => Err(format!("unknown task type: {}", other)),
        }
    }
}

/// A scheduled unit of care for one elderly profile.
///
/// Invariant: `completed_at` is `Some` exactly when `status` is
/// [`TaskStatus::Completed`]. Mutate status through [`Task::set_status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub elderly_id: String,
    /// `null` when unassigned
    #[serde(default)]
    pub assigned_to_id: Option<String>,
    pub created_by: String,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(rename = "type")]
    pub task_type: TaskType,
}

impl Task {
    /// Materialize a creation request under the given id.
    ///
    /// A task created already COMPLETED is stamped with `now`.
    pub fn from_new(id: String, new: NewTask, now: DateTime<Utc>) -> Self {
        let completed_at = new.status.is_completed().then_some(now);
        Self {
            id,
            title: new.title,
            description: new.description,
            elderly_id: new.elderly_id,
            assigned_to_id: new.assigned_to_id,
            created_by: new.created_by,
            scheduled_at: new.scheduled_at,
            completed_at,
            status: new.status,
            priority: new.priority,
            task_type: new.task_type,
        }
    }

    /// Set the status, stamping or clearing `completed_at` to keep the invariant
    pub fn set_status(&mut self, status: TaskStatus, now: DateTime<Utc>) {
        self.status = status;
        self.completed_at = status.is_completed().then_some(now);
    }

    /// Assign to a user, or clear the assignment with `None`
    pub fn assign(&mut self, user_id: Option<String>) {
        self.assigned_to_id = user_id;
    }

    pub fn is_assigned_to(&self, user_id: &str) -> bool {
        self.assigned_to_id.as_deref() == Some(user_id)
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Calendar day (UTC) the task is scheduled on
    pub fn scheduled_day(&self) -> NaiveDate {
        self.scheduled_at.date_naive()
    }
}

/// Task creation data transfer object
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Caller-chosen id; generated when absent
    #[serde(default)]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Elderly profile is required"))]
    pub elderly_id: String,
    #[serde(default)]
    pub assigned_to_id: Option<String>,
    pub created_by: String,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default = "default_status")]
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(rename = "type")]
    pub task_type: TaskType,
}

fn default_status() -> TaskStatus {
    TaskStatus::Pending
}

impl NewTask {
    /// A PENDING, unassigned task with no description
    pub fn new(
        title: impl Into<String>,
        elderly_id: impl Into<String>,
        created_by: impl Into<String>,
        scheduled_at: DateTime<Utc>,
        priority: TaskPriority,
        task_type: TaskType,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            elderly_id: elderly_id.into(),
            assigned_to_id: None,
            created_by: created_by.into(),
            scheduled_at,
            status: TaskStatus::Pending,
            priority,
            task_type,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Task {
        let at = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let new = NewTask::new("Give pill", "e1", "u1", at, TaskPriority::High, TaskType::Medication);
        Task::from_new("t1".to_string(), new, at)
    }

    #[test]
    fn test_set_status_keeps_completed_at_invariant() {
        let mut task = sample();
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 9, 30, 0).unwrap();

        task.set_status(TaskStatus::Completed, now);
        assert_eq!(task.completed_at, Some(now));

        for status in [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Skipped] {
            task.set_status(status, now);
            assert_eq!(task.status, status);
            assert!(task.completed_at.is_none());
        }
    }

    #[test]
    fn test_created_completed_is_stamped() {
        let at = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let mut new = NewTask::new("Bath", "e2", "u1", at, TaskPriority::Low, TaskType::Hygiene);
        new.status = TaskStatus::Completed;
        let task = Task::from_new("t2".to_string(), new, at);
        assert_eq!(task.completed_at, Some(at));
    }

    #[test]
    fn test_toggle_status() {
        assert_eq!(TaskStatus::Completed.toggled(), TaskStatus::Pending);
        assert_eq!(TaskStatus::Pending.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Skipped.toggled(), TaskStatus::Completed);
    }

    #[test]
    fn test_wire_format() {
        let task = sample();
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["elderlyId"], "e1");
        assert_eq!(json["type"], "MEDICATION");
        assert_eq!(json["status"], "PENDING");
        assert!(json["assignedToId"].is_null());
        assert!(json.get("completedAt").is_none());

        let parsed: Task = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, task);
    }

    #[test]
    fn test_in_progress_wire_name() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
        assert_eq!("in_progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
    }
}
