//! Onboarding tasks instantiated from the onboarding template.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Who is expected to complete a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssigneeRole {
    /// The new hire.
    NewHire,
    /// The new hire's manager.
    Manager,
    /// An HR administrator.
    Hr,
    /// An IT administrator.
    It,
}

/// Category of an onboarding task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Paperwork and document collection.
    Documentation,
    /// Accounts and system access.
    ItSetup,
    /// Laptop, badge and other equipment.
    Equipment,
    /// Company orientation.
    Orientation,
    /// Mandatory training.
    Training,
    /// Regulatory registration (GOSI, QIWA).
    Compliance,
    /// Team introductions and check-ins.
    Introduction,
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Must be done first.
    High,
    /// Normal priority.
    Medium,
    /// Can wait.
    Low,
}

/// Progress of an onboarding task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not picked up.
    NotStarted,
    /// Being worked on.
    InProgress,
    /// Done.
    Completed,
    /// Past its due date without completion.
    Overdue,
}

impl TaskStatus {
    /// Returns true if a caller may move a task from `self` to `next`.
    ///
    /// `Overdue` is only ever set by the reminder sweep, never requested.
    ///
    /// # Example
    ///
    /// ```
    /// use hrms_engine::models::TaskStatus;
    ///
    /// assert!(TaskStatus::NotStarted.can_transition_to(TaskStatus::Completed));
    /// assert!(!TaskStatus::Completed.can_transition_to(TaskStatus::InProgress));
    /// assert!(!TaskStatus::InProgress.can_transition_to(TaskStatus::Overdue));
    /// ```
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::NotStarted, TaskStatus::InProgress)
                | (TaskStatus::NotStarted, TaskStatus::Completed)
                | (TaskStatus::InProgress, TaskStatus::Completed)
                | (TaskStatus::Overdue, TaskStatus::InProgress)
                | (TaskStatus::Overdue, TaskStatus::Completed)
        )
    }

    /// Returns true for tasks the reminder sweep looks at.
    pub fn is_open(&self) -> bool {
        matches!(self, TaskStatus::NotStarted | TaskStatus::InProgress)
    }

    /// The wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "not_started",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Overdue => "overdue",
        }
    }
}

/// A concrete onboarding to-do item for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingTask {
    /// Unique identifier.
    pub id: String,
    /// The new hire.
    pub employee_id: String,
    /// Checklist the task was created from.
    #[serde(default)]
    pub checklist_id: Option<String>,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Category.
    pub task_type: TaskType,
    /// Who completes the task.
    pub assignee_role: AssigneeRole,
    /// Priority.
    pub priority: TaskPriority,
    /// Offset in days from the start date.
    pub day_number: u32,
    /// `start_date + day_number`.
    pub due_date: NaiveDate,
    /// Progress.
    pub status: TaskStatus,
    /// When the task was completed.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_transitions() {
        use TaskStatus::*;
        assert!(NotStarted.can_transition_to(InProgress));
        assert!(NotStarted.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Overdue.can_transition_to(Completed));
        assert!(!InProgress.can_transition_to(NotStarted));
        assert!(!Completed.can_transition_to(Overdue));
        assert!(!NotStarted.can_transition_to(Overdue));
    }

    #[test]
    fn test_open_statuses() {
        assert!(TaskStatus::NotStarted.is_open());
        assert!(TaskStatus::InProgress.is_open());
        assert!(!TaskStatus::Overdue.is_open());
        assert!(!TaskStatus::Completed.is_open());
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&AssigneeRole::NewHire).unwrap(),
            "\"new_hire\""
        );
        assert_eq!(
            serde_json::to_string(&TaskType::ItSetup).unwrap(),
            "\"it_setup\""
        );
    }
}
