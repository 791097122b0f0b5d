//! Request DTOs for the task assist API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use super::task::Task;

/// Returns an error message when `value` is blank.
fn require(field: &str, value: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some(format!("{} cannot be empty", field))
    } else {
        None
    }
}

/// Request body for POST /ai/category
///
/// # Fields
/// - `user_id`: Whose history to predict from
/// - `tasks`: Optional history; loaded from the task source when omitted
/// - `title`: Optional title of the task being created
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryRequest {
    pub user_id: String,
    pub tasks: Option<Vec<Task>>,
    pub title: Option<String>,
}

impl CategoryRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        require("userId", &self.user_id)
    }
}

/// Request body for POST /ai/description
///
/// Every field may be blank: an empty summary yields no description and an
/// empty title is described as "this task".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescriptionRequest {
    pub title: String,
    pub summary: String,
    pub user_id: Option<String>,
}

/// Request body for POST /ai/titles
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TitleSuggestionRequest {
    pub prefix: String,
    pub user_id: String,
}

impl TitleSuggestionRequest {
    /// Short prefixes are valid and yield no suggestions.
    pub fn validate(&self) -> Option<String> {
        require("userId", &self.user_id)
    }
}

/// Request body for POST /ai/prioritize
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrioritizeRequest {
    pub user_id: String,
    pub tasks: Option<Vec<Task>>,
}

impl PrioritizeRequest {
    pub fn validate(&self) -> Option<String> {
        require("userId", &self.user_id)
    }
}

/// Request body for POST /ai/critical-report
///
/// Without `tasks` the report covers every task in the task source.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CriticalReportRequest {
    pub tasks: Option<Vec<Task>>,
}

/// Validates a task record posted to POST /tasks.
pub fn validate_task(task: &Task) -> Option<String> {
    require("id", &task.id).or_else(|| require("title", &task.title))
}
