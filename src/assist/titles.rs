//! Title suggestions
//!
//! Completes a typed title prefix into five suggestions.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, warn};

use super::parse::{json_string_array, quoted_strings};
use super::AssistService;
use crate::ai::CallOptions;
use crate::cache::{cache_key, Tier, SHORT_TTL};
use crate::error::Result;
use crate::models::Task;

/// Shorter prefixes get no suggestions.
const MIN_PREFIX_CHARS: usize = 3;
const SUGGESTION_COUNT: usize = 5;
/// Recent titles given to the model as context.
const CONTEXT_LIMIT: usize = 20;

const STATIC_SUFFIXES: [&str; SUGGESTION_COUNT] = ["task", "project", "review", "update", "meeting"];

impl AssistService {
    // == Generate Title Suggestions ==
    /// Returns up to five titles completing `prefix`; empty for prefixes
    /// shorter than three characters.
    pub async fn generate_title_suggestions(&self, prefix: &str, user_id: &str) -> Vec<String> {
        match self.try_title_suggestions(prefix, user_id).await {
            Ok(suggestions) => suggestions,
            Err(err) => {
                warn!(error = %err, user_id, "Title suggestion failed");
                Vec::new()
            }
        }
    }

    async fn try_title_suggestions(&self, prefix: &str, user_id: &str) -> Result<Vec<String>> {
        let prefix = prefix.trim();
        if prefix.chars().count() < MIN_PREFIX_CHARS {
            return Ok(Vec::new());
        }

        let key = cache_key(&["titles", user_id, prefix]);
        if let Some(suggestions) = self.cached::<Vec<String>>(Tier::Short, &key).await {
            return Ok(suggestions);
        }

        let context = self.context_tasks(user_id, CONTEXT_LIMIT).await;
        let prompt = titles_prompt(prefix, &context);
        let fallback = |_: &str| Value::from(static_suggestions(prefix)).to_string();
        let options = CallOptions::default()
            .with_ttl(SHORT_TTL)
            .with_fallback(&fallback);
        let raw = self.generator.call(&prompt, options).await?;

        let suggestions = parse_suggestions(&raw, prefix);
        self.remember(Tier::Short, key, &suggestions, Some(SHORT_TTL))
            .await;
        Ok(suggestions)
    }
}

fn titles_prompt(prefix: &str, context: &[Task]) -> String {
    let mut prompt = format!(
        "Suggest exactly {} task titles for a task management app. Each title must \
         start with or contain \"{}\" and be 3-8 words long.\n",
        SUGGESTION_COUNT, prefix
    );

    if !context.is_empty() {
        prompt.push_str("\nThe user's recent tasks, for context:\n");
        for task in context {
            match task.category_name() {
                Some(category) => prompt.push_str(&format!("- {} ({})\n", task.title, category)),
                None => prompt.push_str(&format!("- {}\n", task.title)),
            }
        }
    }

    prompt.push_str(
        "\nRespond with only a JSON array of strings, for example: \
         [\"Title one\", \"Title two\"]",
    );
    prompt
}

/// Strict JSON array, then quoted strings line by line, then the static list.
/// Results are trimmed to five and topped up from the static list.
fn parse_suggestions(raw: &str, prefix: &str) -> Vec<String> {
    let mut suggestions = json_string_array(raw)
        .or_else(|raw| quoted_strings(&raw))
        .unwrap_or_else(|raw| {
            debug!(len = raw.len(), "Unparsable title suggestions, using static list");
            Vec::new()
        });

    let mut seen = HashSet::new();
    suggestions.retain(|s| seen.insert(s.clone()));
    suggestions.truncate(SUGGESTION_COUNT);
    for filler in static_suggestions(prefix) {
        if suggestions.len() == SUGGESTION_COUNT {
            break;
        }
        if !suggestions.contains(&filler) {
            suggestions.push(filler);
        }
    }
    suggestions
}

fn static_suggestions(prefix: &str) -> Vec<String> {
    STATIC_SUFFIXES
        .iter()
        .map(|suffix| format!("{} {}", prefix, suffix))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::ScriptedGenerator;
    use crate::assist::test_support::{service, user_task};

    #[test]
    fn test_parse_json_array() {
        let raw = r#"Sure! ["Update report", "Update slides", 3, "Update roadmap"]"#;
        let suggestions = parse_suggestions(raw, "Update");

        assert_eq!(
            suggestions,
            vec![
                "Update report",
                "Update slides",
                "Update roadmap",
                "Update task",
                "Update project"
            ]
        );
    }

    #[test]
    fn test_parse_truncates_to_five() {
        let raw = r#"["a1", "a2", "a3", "a4", "a5", "a6", "a7"]"#;
        assert_eq!(parse_suggestions(raw, "a"), vec!["a1", "a2", "a3", "a4", "a5"]);
    }

    #[test]
    fn test_parse_quoted_lines() {
        let raw = "1. \"Plan offsite\"\n2. \"Plan budget\"";
        let suggestions = parse_suggestions(raw, "Plan");

        assert_eq!(&suggestions[..2], &["Plan offsite", "Plan budget"]);
        assert_eq!(suggestions.len(), 5);
    }

    #[test]
    fn test_parse_prose_uses_static_list() {
        let suggestions = parse_suggestions("I would suggest planning ahead.", "Plan");
        assert_eq!(suggestions, static_suggestions("Plan"));
    }

    #[tokio::test]
    async fn test_short_prefix_returns_empty_without_call() {
        let (service, generator) = service(ScriptedGenerator::replying("[]"), Vec::new());

        assert!(service.generate_title_suggestions("ab", "u1").await.is_empty());
        assert!(service.generate_title_suggestions("  ab  ", "u1").await.is_empty());
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_prose_response_still_gives_five() {
        let (service, _generator) =
            service(ScriptedGenerator::replying("Here are some ideas for you."), Vec::new());

        let suggestions = service.generate_title_suggestions("write", "u1").await;

        assert_eq!(suggestions.len(), 5);
        assert!(suggestions.iter().all(|s| !s.is_empty()));
    }

    #[tokio::test]
    async fn test_fallback_mode_keeps_prefix() {
        let history = vec![
            user_task("t1", "Update report", 1),
            user_task("t2", "Update slides", 2),
        ];
        let (service, generator) = service(ScriptedGenerator::failing(), history);

        let suggestions = service.generate_title_suggestions("upd", "u1").await;

        assert_eq!(suggestions.len(), 5);
        assert!(suggestions.iter().all(|s| s.starts_with("upd")));
        assert_eq!(suggestions[0], "upd task");
        let prompt = generator.last_prompt().unwrap();
        assert!(prompt.contains("- Update slides\n"));
    }

    #[tokio::test]
    async fn test_cached_per_user_and_prefix() {
        let (service, generator) =
            service(ScriptedGenerator::replying(r#"["Call mom", "Call dentist"]"#), Vec::new());

        let first = service.generate_title_suggestions("Call", "u1").await;
        let second = service.generate_title_suggestions("Call", "u1").await;
        service.generate_title_suggestions("Call", "u2").await;

        assert_eq!(first, second);
        // u2 has its own feature key but the same prompt, served by the prompt cache
        assert_eq!(generator.calls(), 1);
    }
}
