//! Category prediction
//!
//! Predicts the category of a user's next task from their history. With
//! enough history and a title the model is asked; otherwise, or when its
//! answer is not a known category, a recency/frequency rule decides.

use tracing::{debug, warn};

use super::{newest_first, AssistService};
use crate::ai::CallOptions;
use crate::cache::{cache_key, Tier, SHORT_TTL};
use crate::error::{AssistError, Result};
use crate::models::Task;

/// Most recent tasks considered.
const HISTORY_LIMIT: usize = 50;
/// Categorized tasks required before the model is consulted.
const MIN_TASKS_FOR_MODEL: usize = 5;
/// Recent (title, category) pairs shown in the prompt.
const PROMPT_EXAMPLES: usize = 10;
/// Window of the recency rule.
const RECENT_WINDOW: usize = 3;

const USAGE_HEADER: &str = "Category usage:";
const RECENT_HEADER: &str = "Recent tasks (newest first):";

impl AssistService {
    // == Predict Next Category ==
    /// Predicts the category for the user's next task.
    ///
    /// Returns None when the user has no categorized history. `tasks`, when
    /// given, replaces the history lookup.
    pub async fn predict_next_category(
        &self,
        user_id: &str,
        tasks: Option<&[Task]>,
        title_hint: Option<&str>,
    ) -> Option<String> {
        match self.try_predict_category(user_id, tasks, title_hint).await {
            Ok(category) => category,
            Err(err) => {
                warn!(error = %err, user_id, "Category prediction failed");
                None
            }
        }
    }

    async fn try_predict_category(
        &self,
        user_id: &str,
        tasks: Option<&[Task]>,
        title_hint: Option<&str>,
    ) -> Result<Option<String>> {
        let recent = match tasks {
            Some(tasks) => newest_first(tasks, HISTORY_LIMIT),
            None => self.tasks.recent_tasks(user_id, Some(HISTORY_LIMIT)).await?,
        };

        let history = CategoryHistory::from_tasks(&recent);
        if history.is_empty() {
            return Ok(None);
        }

        let title = title_hint.map(str::trim).filter(|t| !t.is_empty());
        let fingerprint: Vec<String> = recent
            .iter()
            .map(|t| format!("{}:{}", t.id, t.category_name().unwrap_or_default()))
            .collect();
        let fingerprint = fingerprint.join(",");
        let key = cache_key(&["category", user_id, title.unwrap_or_default(), fingerprint.as_str()]);

        if let Some(category) = self.cached::<String>(Tier::Short, &key).await {
            return Ok(Some(category));
        }

        let prediction = match title {
            Some(title) if history.len() >= MIN_TASKS_FOR_MODEL => {
                let prompt = history.prompt(title);
                let options = CallOptions::default()
                    .with_ttl(SHORT_TTL)
                    .with_fallback(&category_from_prompt);
                let raw = self.generator.call(&prompt, options).await?;

                match history.validate(&raw) {
                    Ok(category) => Some(category),
                    Err(err) => {
                        debug!(error = %err, "Discarding model category");
                        history.statistical()
                    }
                }
            }
            _ => history.statistical(),
        };

        let Some(prediction) = prediction else {
            return Ok(None);
        };
        self.remember(Tier::Short, key, &prediction, Some(SHORT_TTL)).await;
        Ok(Some(prediction))
    }
}

// == Category History ==
/// Categorized part of a user's history.
#[derive(Debug, Default)]
struct CategoryHistory {
    /// (title, category), newest first
    entries: Vec<(String, String)>,
    /// (category, count), most used first; ties keep the most recently used first
    usage: Vec<(String, usize)>,
}

impl CategoryHistory {
    fn from_tasks(tasks: &[Task]) -> Self {
        let entries: Vec<(String, String)> = tasks
            .iter()
            .filter_map(|t| Some((t.title.clone(), t.category_name()?.to_string())))
            .collect();

        let mut usage: Vec<(String, usize)> = Vec::new();
        for (_, category) in &entries {
            match usage.iter_mut().find(|(c, _)| c == category) {
                Some((_, count)) => *count += 1,
                None => usage.push((category.clone(), 1)),
            }
        }
        // Stable sort keeps first-seen (most recent) order among equal counts
        usage.sort_by(|a, b| b.1.cmp(&a.1));

        Self { entries, usage }
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn statistical(&self) -> Option<String> {
        let recent: Vec<&str> = self.entries.iter().map(|(_, c)| c.as_str()).collect();
        statistical_category(&recent, &self.usage)
    }

    fn prompt(&self, title: &str) -> String {
        let categories: Vec<&str> = self.usage.iter().map(|(c, _)| c.as_str()).collect();

        let mut prompt = String::from(
            "You help a user organise their tasks. Predict the single most likely \
             category for their new task based on how they categorised past tasks.\n\n",
        );
        prompt.push_str(&format!("New task title: \"{}\"\n\n", title));
        prompt.push_str(&format!("Available categories: {}\n\n", categories.join(", ")));

        prompt.push_str(USAGE_HEADER);
        prompt.push('\n');
        for (category, count) in &self.usage {
            prompt.push_str(&format!("- {}: {}\n", category, count));
        }

        prompt.push('\n');
        prompt.push_str(RECENT_HEADER);
        prompt.push('\n');
        for (title, category) in self.entries.iter().take(PROMPT_EXAMPLES) {
            prompt.push_str(&format!("- \"{}\" -> {}\n", title, category));
        }

        prompt.push_str(
            "\nRespond with only the category name, exactly as written in the list above.",
        );
        prompt
    }

    /// Maps a model answer onto a known category.
    ///
    /// Exact match first, then a case-insensitive substring match in either
    /// direction, most used category first.
    fn validate(&self, raw: &str) -> Result<String> {
        let answer = clean_answer(raw);
        if answer.is_empty() {
            return Err(AssistError::Validation("empty category answer".to_string()));
        }

        if let Some((category, _)) = self.usage.iter().find(|(c, _)| c == answer) {
            return Ok(category.clone());
        }

        let lowered = answer.to_lowercase();
        self.usage
            .iter()
            .map(|(c, _)| c)
            .find(|c| {
                let known = c.to_lowercase();
                known.contains(&lowered) || lowered.contains(&known)
            })
            .cloned()
            .ok_or_else(|| {
                AssistError::Validation(format!("'{}' is not a known category", answer))
            })
    }
}

/// Strips whitespace, quotes and trailing punctuation from a one-word answer.
fn clean_answer(raw: &str) -> &str {
    let first_line = raw.trim().lines().next().unwrap_or_default();
    first_line
        .trim()
        .trim_start_matches("Category:")
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '*' | '.'))
        .trim()
}

// == Statistical Rule ==
/// Recency rule, then overall frequency.
///
/// `recent` is newest first; `usage` is ordered most used first.
fn statistical_category(recent: &[&str], usage: &[(String, usize)]) -> Option<String> {
    let window = &recent[..recent.len().min(RECENT_WINDOW)];
    let repeated = window
        .iter()
        .find(|c| window.iter().filter(|other| other == c).count() >= 2);
    if let Some(category) = repeated {
        return Some(category.to_string());
    }

    let mut best: Option<&(String, usize)> = None;
    for entry in usage {
        if best.map_or(true, |(_, count)| entry.1 > *count) {
            best = Some(entry);
        }
    }
    best.map(|(category, _)| category.clone())
}

// == Prompt Fallback ==
/// Re-derives usage counts and recent categories from a rendered prompt and
/// applies the statistical rule. Keeps the fallback a pure function of the
/// prompt text.
fn category_from_prompt(prompt: &str) -> String {
    let mut usage: Vec<(String, usize)> = Vec::new();
    let mut recent: Vec<String> = Vec::new();
    let mut section = "";

    for line in prompt.lines() {
        let line = line.trim();
        if line == USAGE_HEADER || line == RECENT_HEADER {
            section = line;
            continue;
        }
        let Some(item) = line.strip_prefix("- ") else {
            section = "";
            continue;
        };

        if section == USAGE_HEADER {
            if let Some((category, count)) = item.rsplit_once(": ") {
                if let Ok(count) = count.trim().parse() {
                    usage.push((category.trim().to_string(), count));
                }
            }
        } else if section == RECENT_HEADER {
            if let Some((_, category)) = item.rsplit_once(" -> ") {
                recent.push(category.trim().to_string());
            }
        }
    }

    let recent: Vec<&str> = recent.iter().map(String::as_str).collect();
    statistical_category(&recent, &usage).unwrap_or_default()
}
