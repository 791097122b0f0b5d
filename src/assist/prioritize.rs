//! Task prioritization
//!
//! Orders a user's active tasks, flags the ones at risk and suggests next
//! steps.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use super::parse::{json_object, Parsed};
use super::{AssistService, AI_FAILURE_MESSAGE};
use crate::ai::CallOptions;
use crate::cache::{cache_key, Tier};
use crate::error::Result;
use crate::models::Task;

const PRIORITIZATION_TTL: Duration = Duration::from_secs(30 * 60);
const TOP_TASKS: usize = 5;
/// Tasks due within this window count as at risk.
const AT_RISK_HOURS: i64 = 48;

const NO_TASKS_MESSAGE: &str = "No active tasks to prioritize";
const SUCCESS_MESSAGE: &str = "Tasks prioritized successfully";
const LOCAL_LOGIC: &str = "Overdue tasks first, then by priority (URGENT > HIGH > MEDIUM > LOW), \
                           then by earliest due date; tasks without a due date come last.";

// == Result Types ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prioritization {
    pub message: String,
    pub prioritized_tasks: Vec<PrioritizedTask>,
    pub logic: String,
    pub at_risk_tasks: Vec<AtRiskTask>,
    pub suggestions: Vec<String>,
}

impl Prioritization {
    fn empty(message: &str) -> Self {
        Self {
            message: message.to_string(),
            prioritized_tasks: Vec::new(),
            logic: String::new(),
            at_risk_tasks: Vec::new(),
            suggestions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizedTask {
    #[serde(alias = "taskId")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtRiskTask {
    #[serde(default, alias = "taskId")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "reason")]
    pub risk: String,
}

/// Shape requested from the model; also what the local plan renders to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Plan {
    #[serde(default)]
    prioritized_tasks: Vec<PrioritizedTask>,
    #[serde(default)]
    logic: String,
    #[serde(default)]
    at_risk_tasks: Vec<AtRiskTask>,
    #[serde(default)]
    suggestions: Vec<String>,
}

impl Plan {
    fn into_prioritization(self, message: &str) -> Prioritization {
        Prioritization {
            message: message.to_string(),
            prioritized_tasks: self.prioritized_tasks,
            logic: self.logic,
            at_risk_tasks: self.at_risk_tasks,
            suggestions: self.suggestions,
        }
    }
}

impl AssistService {
    // == Generate Task Prioritization ==
    /// Prioritizes the non-completed, non-cancelled tasks among `tasks`.
    pub async fn generate_task_prioritization(&self, user_id: &str, tasks: &[Task]) -> Prioritization {
        match self.try_prioritize(tasks).await {
            Ok(prioritization) => prioritization,
            Err(err) => {
                warn!(error = %err, user_id, "Task prioritization failed");
                Prioritization::empty(AI_FAILURE_MESSAGE)
            }
        }
    }

    async fn try_prioritize(&self, tasks: &[Task]) -> Result<Prioritization> {
        let active: Vec<&Task> = tasks.iter().filter(|t| t.is_active()).collect();
        if active.is_empty() {
            return Ok(Prioritization::empty(NO_TASKS_MESSAGE));
        }

        let key = prioritization_key(&active);
        if let Some(cached) = self.cached::<Prioritization>(Tier::Medium, &key).await {
            return Ok(cached);
        }

        let now = Utc::now();
        let prompt = prioritization_prompt(&active, now)?;
        let local = local_plan(&active, now);
        let local_text = serde_json::to_string(&local)?;
        let fallback = |_: &str| local_text.clone();
        let options = CallOptions::default()
            .with_ttl(PRIORITIZATION_TTL)
            .with_fallback(&fallback);
        let raw = self.generator.call(&prompt, options).await?;

        let plan = parse_plan(&raw, &active).unwrap_or_else(|_| {
            debug!("Unusable prioritization response, using local ordering");
            local
        });

        let prioritization = plan.into_prioritization(SUCCESS_MESSAGE);
        self.remember(Tier::Medium, key, &prioritization, Some(PRIORITIZATION_TTL))
            .await;
        Ok(prioritization)
    }
}

fn prioritization_key(active: &[&Task]) -> String {
    let fingerprint: Vec<String> = active
        .iter()
        .map(|t| {
            format!(
                "{}|{:?}|{}|{}",
                t.id,
                t.status,
                t.priority.as_str(),
                t.due_date.map(|d| d.to_rfc3339()).unwrap_or_default()
            )
        })
        .collect();
    cache_key(&["prioritize", fingerprint.join(";").as_str()])
}

fn prioritization_prompt(active: &[&Task], now: DateTime<Utc>) -> Result<String> {
    let summaries: Vec<_> = active
        .iter()
        .map(|t| {
            json!({
                "id": t.id,
                "title": t.title,
                "status": t.status,
                "priority": t.priority,
                "category": t.category_name(),
                "dueDate": t.due_date,
                "overdue": t.is_overdue_at(now),
            })
        })
        .collect();

    Ok(format!(
        "You are a productivity assistant. Today is {}. Prioritize the user's active \
         tasks below, considering due dates, overdue status and priority.\n\n\
         Tasks:\n{}\n\n\
         Respond with only a JSON object of this shape:\n\
         {{\"prioritizedTasks\": [{{\"id\": \"...\", \"title\": \"...\", \"reason\": \"...\"}}], \
         \"logic\": \"...\", \
         \"atRiskTasks\": [{{\"id\": \"...\", \"title\": \"...\", \"risk\": \"...\"}}], \
         \"suggestions\": [\"...\"]}}\n\
         List at most {} tasks in prioritizedTasks, most important first, using the ids above.",
        now.format("%Y-%m-%d"),
        serde_json::to_string_pretty(&summaries)?,
        TOP_TASKS
    ))
}

/// Parses the model's JSON and keeps only entries naming known active tasks.
fn parse_plan(raw: &str, active: &[&Task]) -> Parsed<Plan> {
    let find = |id: &str| active.iter().find(|t| t.id == id);

    let Parsed::Valid(mut plan) = json_object::<Plan>(raw) else {
        return Parsed::Unparsable(raw.to_string());
    };

    plan.prioritized_tasks.retain(|p| find(&p.id).is_some());
    plan.prioritized_tasks.truncate(TOP_TASKS);
    if plan.prioritized_tasks.is_empty() {
        return Parsed::Unparsable(raw.to_string());
    }

    for entry in &mut plan.prioritized_tasks {
        if let Some(task) = find(&entry.id) {
            entry.title = task.title.clone();
        }
    }
    plan.at_risk_tasks.retain(|r| find(&r.id).is_some());
    for entry in &mut plan.at_risk_tasks {
        if let Some(task) = find(&entry.id) {
            entry.title = task.title.clone();
        }
    }
    Parsed::Valid(plan)
}

// == Local Plan ==
/// Deterministic ordering: overdue first, then priority rank, then earliest
/// due date with undated tasks last.
fn local_plan(active: &[&Task], now: DateTime<Utc>) -> Plan {
    let mut ordered: Vec<&Task> = active.to_vec();
    ordered.sort_by_key(|t| {
        (
            !t.is_overdue_at(now),
            t.priority.rank(),
            t.due_date.is_none(),
            t.due_date,
        )
    });

    let prioritized_tasks = ordered
        .iter()
        .take(TOP_TASKS)
        .map(|t| PrioritizedTask {
            id: t.id.clone(),
            title: t.title.clone(),
            reason: local_reason(t, now),
        })
        .collect();

    let at_risk_tasks = ordered
        .iter()
        .filter_map(|t| {
            let due = t.due_date?;
            let risk = if t.is_overdue_at(now) {
                format!("Overdue since {}", due.format("%Y-%m-%d"))
            } else if (due - now).num_hours() < AT_RISK_HOURS {
                format!("Due within {} hours", AT_RISK_HOURS)
            } else {
                return None;
            };
            Some(AtRiskTask {
                id: t.id.clone(),
                title: t.title.clone(),
                risk,
            })
        })
        .collect();

    Plan {
        prioritized_tasks,
        logic: LOCAL_LOGIC.to_string(),
        at_risk_tasks,
        suggestions: local_suggestions(&ordered, now),
    }
}

fn local_reason(task: &Task, now: DateTime<Utc>) -> String {
    let priority = task.priority.as_str();
    match task.due_date {
        Some(due) if task.is_overdue_at(now) => {
            format!("{} priority, overdue since {}", priority, due.format("%Y-%m-%d"))
        }
        Some(due) => format!("{} priority, due {}", priority, due.format("%Y-%m-%d")),
        None => format!("{} priority, no due date", priority),
    }
}

fn local_suggestions(ordered: &[&Task], now: DateTime<Utc>) -> Vec<String> {
    let overdue = ordered.iter().filter(|t| t.is_overdue_at(now)).count();
    let critical = ordered.iter().filter(|t| t.priority.is_critical()).count();
    let undated = ordered.iter().filter(|t| t.due_date.is_none()).count();

    let mut suggestions = Vec::new();
    if overdue > 0 {
        suggestions.push(format!(
            "Finish or reschedule the {} overdue task(s) before starting new work.",
            overdue
        ));
    }
    if critical > TOP_TASKS {
        suggestions.push(format!(
            "{} tasks are HIGH or URGENT; consider lowering the priority of some of them.",
            critical
        ));
    }
    if undated > 0 {
        suggestions.push(format!(
            "Add due dates to the {} task(s) without one so they can be scheduled.",
            undated
        ));
    }
    suggestions.push("Revisit this list once the top task is done.".to_string());
    suggestions
}
