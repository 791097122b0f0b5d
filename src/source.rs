//! Task Source Module
//!
//! Read-only boundary to the persistence layer that feature functions gather
//! history from.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::Task;

// == Task Source Trait ==
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Tasks created by or assigned to `user_id`, newest first, at most `limit`.
    async fn recent_tasks(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<Task>>;

    /// Every task, newest first.
    async fn all_tasks(&self) -> Result<Vec<Task>>;
}

// == In-Memory Source ==
/// Process-local task list used by the HTTP service and tests.
#[derive(Debug, Default)]
pub struct InMemoryTaskSource {
    tasks: RwLock<Vec<Task>>,
}

impl InMemoryTaskSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RwLock::new(tasks),
        }
    }

    /// Inserts a task, replacing any existing task with the same id.
    pub async fn insert(&self, task: Task) {
        let mut tasks = self.tasks.write().await;
        tasks.retain(|t| t.id != task.id);
        tasks.push(task);
    }

    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }
}

fn newest_first(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    tasks
}

#[async_trait]
impl TaskSource for InMemoryTaskSource {
    async fn recent_tasks(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<Task>> {
        let matching: Vec<Task> = self
            .tasks
            .read()
            .await
            .iter()
            .filter(|t| t.involves_user(user_id))
            .cloned()
            .collect();

        let mut tasks = newest_first(matching);
        if let Some(limit) = limit {
            tasks.truncate(limit);
        }
        Ok(tasks)
    }

    async fn all_tasks(&self) -> Result<Vec<Task>> {
        Ok(newest_first(self.tasks.read().await.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserSummary;
    use chrono::{Duration, Utc};

    fn task(id: &str, user: &str, age_hours: i64) -> Task {
        Task::new(id, format!("Task {}", id), Utc::now() - Duration::hours(age_hours))
            .created_by(UserSummary::new(user))
    }

    #[tokio::test]
    async fn test_recent_tasks_scoped_and_ordered() {
        let source = InMemoryTaskSource::with_tasks(vec![
            task("old", "u1", 10),
            task("other", "u2", 1),
            task("new", "u1", 1),
            task("mid", "u1", 5),
        ]);

        let tasks = source.recent_tasks("u1", None).await.unwrap();
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();

        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_recent_tasks_limit_and_assignee() {
        let source = InMemoryTaskSource::new();
        source.insert(task("a", "u1", 3)).await;
        source
            .insert(task("b", "u2", 2).assigned_to(UserSummary::new("u1")))
            .await;
        source.insert(task("c", "u1", 1)).await;

        let tasks = source.recent_tasks("u1", Some(2)).await.unwrap();
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();

        assert_eq!(ids, vec!["c", "b"]);
    }

    #[tokio::test]
    async fn test_insert_replaces_same_id() {
        let source = InMemoryTaskSource::new();
        source.insert(task("a", "u1", 3)).await;
        source.insert(task("a", "u1", 1).with_category("Work")).await;

        assert_eq!(source.len().await, 1);
        let all = source.all_tasks().await.unwrap();
        assert_eq!(all[0].category_name(), Some("Work"));
    }
}
