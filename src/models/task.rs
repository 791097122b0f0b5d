//! Task domain records
//!
//! Read-only inputs supplied by the persistence layer. Field names follow the
//! camelCase JSON of the task API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Status ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
    Cancelled,
}

// == Priority ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// Sort rank, lowest first: URGENT < HIGH < MEDIUM < LOW.
    pub fn rank(self) -> u8 {
        match self {
            TaskPriority::Urgent => 0,
            TaskPriority::High => 1,
            TaskPriority::Medium => 2,
            TaskPriority::Low => 3,
        }
    }

    /// Whether the priority alone makes a task critical.
    pub fn is_critical(self) -> bool {
        matches!(self, TaskPriority::High | TaskPriority::Urgent)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "LOW",
            TaskPriority::Medium => "MEDIUM",
            TaskPriority::High => "HIGH",
            TaskPriority::Urgent => "URGENT",
        }
    }
}

// == User Summary ==
/// Creator or assignee of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserSummary {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
        }
    }

    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(id)
        }
    }

    /// Name for display, falling back to email then id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}

// == Task ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<UserSummary>,
    #[serde(default)]
    pub assigned_to: Option<UserSummary>,
}

impl Task {
    /// Creates a TODO, MEDIUM priority task with no optional fields set.
    pub fn new(id: impl Into<String>, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            category: None,
            due_date: None,
            created_at,
            updated_at: None,
            created_by: None,
            assigned_to: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn created_by(mut self, user: UserSummary) -> Self {
        self.created_by = Some(user);
        self
    }

    pub fn assigned_to(mut self, user: UserSummary) -> Self {
        self.assigned_to = Some(user);
        self
    }

    /// Trimmed category, None when unset or blank.
    pub fn category_name(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Neither completed nor cancelled.
    pub fn is_active(&self) -> bool {
        !matches!(self.status, TaskStatus::Completed | TaskStatus::Cancelled)
    }

    /// Active and past its due date at `now`.
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && self.due_date.is_some_and(|due| due < now)
    }

    /// Whole days past due at `now`; 0 when not overdue.
    pub fn days_overdue_at(&self, now: DateTime<Utc>) -> i64 {
        match self.due_date {
            Some(due) if self.is_overdue_at(now) => (now - due).num_days(),
            _ => 0,
        }
    }

    /// Created by or assigned to `user_id`.
    pub fn involves_user(&self, user_id: &str) -> bool {
        self.created_by.as_ref().is_some_and(|u| u.id == user_id)
            || self.assigned_to.as_ref().is_some_and(|u| u.id == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_task_deserialize_camel_case() {
        let json = r#"{
            "id": "t1",
            "title": "Write report",
            "status": "IN_PROGRESS",
            "priority": "URGENT",
            "category": "Work",
            "dueDate": "2024-03-10T00:00:00Z",
            "createdAt": "2024-03-01T00:00:00Z",
            "createdBy": {"id": "u1", "name": "Ada"}
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::Urgent);
        assert_eq!(task.category_name(), Some("Work"));
        assert!(task.due_date.is_some());
        assert!(task.involves_user("u1"));
        assert!(task.description.is_none());
    }

    #[test]
    fn test_task_defaults() {
        let json = r#"{"id": "t1", "title": "x", "createdAt": "2024-03-01T00:00:00Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(task.is_active());
    }

    #[test]
    fn test_blank_category_is_none() {
        let task = Task::new("t1", "x", at(1)).with_category("   ");
        assert_eq!(task.category_name(), None);
    }

    #[test]
    fn test_overdue_requires_active() {
        let now = at(20);
        let task = Task::new("t1", "x", at(1)).with_due_date(at(10));

        assert!(task.is_overdue_at(now));
        assert_eq!(task.days_overdue_at(now), 10);

        let done = task.clone().with_status(TaskStatus::Completed);
        assert!(!done.is_overdue_at(now));
        assert_eq!(done.days_overdue_at(now), 0);

        let future = Task::new("t2", "x", at(1)).with_due_date(now + Duration::days(1));
        assert!(!future.is_overdue_at(now));
    }

    #[test]
    fn test_priority_rank_order() {
        let mut priorities = vec![
            TaskPriority::Low,
            TaskPriority::Urgent,
            TaskPriority::Medium,
            TaskPriority::High,
        ];
        priorities.sort_by_key(|p| p.rank());

        assert_eq!(
            priorities,
            vec![
                TaskPriority::Urgent,
                TaskPriority::High,
                TaskPriority::Medium,
                TaskPriority::Low
            ]
        );
        assert!(TaskPriority::High.is_critical());
        assert!(!TaskPriority::Medium.is_critical());
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(UserSummary::named("u1", "Ada").display_name(), "Ada");
        assert_eq!(UserSummary::new("u2").display_name(), "u2");
    }
}
