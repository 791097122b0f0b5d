//! Critical tasks report
//!
//! Prose executive summary of high-priority and overdue work across all users.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use super::parse::strip_code_fence;
use super::{AssistService, AI_FAILURE_MESSAGE};
use crate::ai::CallOptions;
use crate::cache::{cache_key, Tier, MEDIUM_TTL};
use crate::error::Result;
use crate::models::Task;

const NOTHING_CRITICAL: &str = "No critical or overdue tasks found. Everything is on track.";

/// A task as embedded in the report prompt.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportItem<'a> {
    id: &'a str,
    title: &'a str,
    priority: &'static str,
    status: crate::models::TaskStatus,
    due_date: Option<DateTime<Utc>>,
    days_overdue: i64,
    created_by: Option<&'a str>,
    assigned_to: Option<&'a str>,
}

impl<'a> ReportItem<'a> {
    fn new(task: &'a Task, now: DateTime<Utc>) -> Self {
        Self {
            id: &task.id,
            title: &task.title,
            priority: task.priority.as_str(),
            status: task.status,
            due_date: task.due_date,
            days_overdue: task.days_overdue_at(now),
            created_by: task.created_by.as_ref().map(|u| u.display_name()),
            assigned_to: task.assigned_to.as_ref().map(|u| u.display_name()),
        }
    }
}

/// Critical (HIGH/URGENT, active) and overdue tasks at one instant.
struct CriticalSets<'a> {
    critical: Vec<&'a Task>,
    /// Most overdue first
    overdue: Vec<&'a Task>,
    now: DateTime<Utc>,
}

impl<'a> CriticalSets<'a> {
    fn compute(tasks: &'a [Task], now: DateTime<Utc>) -> Self {
        let critical = tasks
            .iter()
            .filter(|t| t.is_active() && t.priority.is_critical())
            .collect();

        let mut overdue: Vec<&Task> = tasks.iter().filter(|t| t.is_overdue_at(now)).collect();
        overdue.sort_by_key(|t| t.due_date);

        Self {
            critical,
            overdue,
            now,
        }
    }

    fn is_empty(&self) -> bool {
        self.critical.is_empty() && self.overdue.is_empty()
    }

    fn items(&self, tasks: &[&'a Task]) -> Vec<ReportItem<'a>> {
        tasks.iter().map(|t| ReportItem::new(*t, self.now)).collect()
    }
}

impl AssistService {
    // == Generate Critical Tasks Report ==
    /// Summarizes critical and overdue tasks as markdown prose.
    pub async fn generate_critical_tasks_report(&self, tasks: &[Task]) -> String {
        match self.try_critical_report(tasks).await {
            Ok(report) => report,
            Err(err) => {
                warn!(error = %err, "Critical tasks report failed");
                format!("{}: the critical tasks report could not be generated.", AI_FAILURE_MESSAGE)
            }
        }
    }

    async fn try_critical_report(&self, tasks: &[Task]) -> Result<String> {
        let now = Utc::now();
        let sets = CriticalSets::compute(tasks, now);
        if sets.is_empty() {
            return Ok(NOTHING_CRITICAL.to_string());
        }

        let key = report_key(tasks);
        if let Some(report) = self.cached::<String>(Tier::Medium, &key).await {
            return Ok(report);
        }

        let prompt = report_prompt(&sets)?;
        let local = local_report(&sets);
        let fallback = |_: &str| local.clone();
        let options = CallOptions::default()
            .with_ttl(MEDIUM_TTL)
            .with_fallback(&fallback);
        let raw = self.generator.call(&prompt, options).await?;

        let report = match strip_code_fence(&raw) {
            "" => local.clone(),
            text => text.to_string(),
        };

        self.remember(Tier::Medium, key, &report, Some(MEDIUM_TTL)).await;
        Ok(report)
    }
}

fn report_key(tasks: &[Task]) -> String {
    let summary: Vec<String> = tasks
        .iter()
        .map(|t| {
            format!(
                "{}|{:?}|{}|{}|{}",
                t.id,
                t.status,
                t.priority.as_str(),
                t.due_date.map(|d| d.to_rfc3339()).unwrap_or_default(),
                t.assigned_to.as_ref().map_or("", |u| u.id.as_str())
            )
        })
        .collect();
    cache_key(&["critical-report", summary.join(";").as_str()])
}

fn report_prompt(sets: &CriticalSets<'_>) -> Result<String> {
    let critical = serde_json::to_string_pretty(&sets.items(&sets.critical))?;
    let overdue = serde_json::to_string_pretty(&sets.items(&sets.overdue))?;

    Ok(format!(
        "You are writing an executive summary for a team lead. Today is {}.\n\n\
         Critical tasks (HIGH or URGENT priority, not completed):\n{}\n\n\
         Overdue tasks (most overdue first):\n{}\n\n\
         Write a concise markdown report with these sections:\n\
         1. Overview: the overall situation in two or three sentences.\n\
         2. Urgent highlights: the tasks needing attention today.\n\
         3. Patterns: e.g. people with several overdue tasks, recurring categories.\n\
         4. Recommendations: concrete next steps.\n\
         Only refer to the tasks listed above.",
        sets.now.format("%Y-%m-%d"),
        critical,
        overdue
    ))
}

// == Local Report ==
fn local_report(sets: &CriticalSets<'_>) -> String {
    let mut out = String::new();
    let owner = |t: &Task| {
        t.assigned_to
            .as_ref()
            .or(t.created_by.as_ref())
            .map_or("unassigned".to_string(), |u| u.display_name().to_string())
    };

    let _ = writeln!(out, "# Critical Tasks Report\n");
    let _ = writeln!(out, "## Overview");
    let _ = writeln!(
        out,
        "There are {} critical task(s) and {} overdue task(s) that need attention.\n",
        sets.critical.len(),
        sets.overdue.len()
    );

    let _ = writeln!(out, "## Critical Tasks");
    if sets.critical.is_empty() {
        let _ = writeln!(out, "- None");
    }
    for task in &sets.critical {
        let due = task
            .due_date
            .map_or("no due date".to_string(), |d| format!("due {}", d.format("%Y-%m-%d")));
        let _ = writeln!(
            out,
            "- **{}** ({}, {}), owner: {}",
            task.title,
            task.priority.as_str(),
            due,
            owner(*task)
        );
    }

    let _ = writeln!(out, "\n## Overdue Tasks");
    if sets.overdue.is_empty() {
        let _ = writeln!(out, "- None");
    }
    for task in &sets.overdue {
        let _ = writeln!(
            out,
            "- **{}**: {} day(s) overdue, owner: {}",
            task.title,
            task.days_overdue_at(sets.now),
            owner(*task)
        );
    }

    let _ = writeln!(out, "\n## Recommendations");
    let _ = writeln!(out, "- Review the overdue tasks first and agree on new due dates.");
    let _ = writeln!(out, "- Make sure every URGENT task has an owner working on it today.");
    let _ = write!(out, "- Rebalance work for anyone holding several overdue tasks.");
    out
}
