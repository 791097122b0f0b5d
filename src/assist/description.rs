//! Description generation
//!
//! Expands a short summary into a structured task description.

use tracing::warn;

use super::parse::strip_code_fence;
use super::AssistService;
use crate::ai::CallOptions;
use crate::cache::{cache_key, Tier, MEDIUM_TTL};
use crate::error::Result;

/// Recent tasks consulted for writing style.
const STYLE_HISTORY_LIMIT: usize = 5;
/// Style examples quoted in the prompt.
const STYLE_EXAMPLES: usize = 3;
const STYLE_EXCERPT_CHARS: usize = 200;
/// Sentences with fewer words are dropped from the local description.
const MIN_SENTENCE_WORDS: usize = 3;

impl AssistService {
    // == Generate Task Description ==
    /// Expands `summary` into a multi-paragraph description for `title`.
    ///
    /// Returns None for an empty summary without calling the model.
    pub async fn generate_task_description(
        &self,
        title: &str,
        summary: &str,
        user_id: Option<&str>,
    ) -> Option<String> {
        match self.try_generate_description(title, summary, user_id).await {
            Ok(description) => description,
            Err(err) => {
                warn!(error = %err, "Description generation failed");
                None
            }
        }
    }

    async fn try_generate_description(
        &self,
        title: &str,
        summary: &str,
        user_id: Option<&str>,
    ) -> Result<Option<String>> {
        let title = title.trim();
        let summary = summary.trim();
        if summary.is_empty() {
            return Ok(None);
        }

        let key = cache_key(&["description", title, summary]);
        if let Some(description) = self.cached::<String>(Tier::Medium, &key).await {
            return Ok(Some(description));
        }

        let style_examples = match user_id {
            Some(user_id) => self.style_examples(user_id).await,
            None => Vec::new(),
        };

        let prompt = description_prompt(title, summary, &style_examples);
        let fallback = |_: &str| structured_description(title, summary);
        let options = CallOptions::default()
            .with_ttl(MEDIUM_TTL)
            .with_fallback(&fallback);
        let raw = self.generator.call(&prompt, options).await?;

        let description = match strip_code_fence(&raw) {
            "" => structured_description(title, summary),
            text => text.to_string(),
        };

        self.remember(Tier::Medium, key, &description, Some(MEDIUM_TTL))
            .await;
        Ok(Some(description))
    }

    async fn style_examples(&self, user_id: &str) -> Vec<String> {
        self.context_tasks(user_id, STYLE_HISTORY_LIMIT)
            .await
            .into_iter()
            .filter_map(|task| {
                let description = task.description?;
                let description = description.trim();
                if description.is_empty() {
                    return None;
                }
                let excerpt: String = description.chars().take(STYLE_EXCERPT_CHARS).collect();
                Some(format!("\"{}\": {}", task.title, excerpt))
            })
            .take(STYLE_EXAMPLES)
            .collect()
    }
}

fn description_prompt(title: &str, summary: &str, style_examples: &[String]) -> String {
    let mut prompt = String::from(
        "Expand the task summary below into a clear, structured task description of \
         3-4 short paragraphs covering the goal, key points, implementation approach \
         and acceptance criteria. Use only facts stated in the title and summary; do \
         not invent names, dates, numbers or requirements.\n\n",
    );
    prompt.push_str(&format!("Title: {}\n", title));
    prompt.push_str(&format!("Summary: {}\n", summary));

    if !style_examples.is_empty() {
        prompt.push_str("\nMatch the tone of the user's previous task descriptions:\n");
        for example in style_examples {
            prompt.push_str(&format!("- {}\n", example));
        }
    }

    prompt.push_str("\nRespond with the description text only.");
    prompt
}

// == Local Description ==
/// Builds an Overview / Key Points / Implementation / Acceptance Criteria
/// description from the summary's sentences.
fn structured_description(title: &str, summary: &str) -> String {
    let mut sentences: Vec<String> = split_sentences(summary)
        .into_iter()
        .filter(|s| s.split_whitespace().count() >= MIN_SENTENCE_WORDS)
        .collect();
    if sentences.is_empty() {
        sentences.push(summary.trim().to_string());
    }

    let subject = if title.is_empty() { "this task" } else { title };
    let mut out = String::new();

    out.push_str("## Overview\n");
    if title.is_empty() {
        out.push_str(&format!("{}\n\n", sentences[0]));
    } else {
        out.push_str(&format!("{}: {}\n\n", title, sentences[0]));
    }

    out.push_str("## Key Points\n");
    for sentence in &sentences {
        out.push_str(&format!("- {}\n", sentence));
    }

    out.push_str("\n## Implementation\n");
    out.push_str(&format!(
        "- Break \"{}\" into smaller steps, one per key point above.\n",
        subject
    ));
    out.push_str("- Complete and verify each step before moving to the next.\n");

    out.push_str("\n## Acceptance Criteria\n");
    for sentence in &sentences {
        out.push_str(&format!("- [ ] {}\n", sentence));
    }
    out.push_str(&format!("- [ ] \"{}\" has been reviewed and marked complete.", subject));

    out
}

/// Splits on `.`, `!` or `?` followed by whitespace, and on line breaks.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            sentences.push(std::mem::take(&mut current));
            continue;
        }
        current.push(c);
        let at_boundary = chars.peek().map_or(true, |next| next.is_whitespace());
        if matches!(c, '.' | '!' | '?') && at_boundary {
            sentences.push(std::mem::take(&mut current));
        }
    }
    sentences.push(current);

    sentences
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::ScriptedGenerator;
    use crate::assist::test_support::{service, user_task};

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("Fix the login. Add tests!\nShip v1.2 soon? ok");
        assert_eq!(
            sentences,
            vec!["Fix the login.", "Add tests!", "Ship v1.2 soon?", "ok"]
        );
    }

    #[test]
    fn test_structured_description_sections() {
        let description = structured_description(
            "Migrate billing",
            "Move invoices to the new provider. Done. Keep the old exports working.",
        );

        assert!(description.starts_with("## Overview\nMigrate billing: Move invoices to the new provider."));
        assert!(description.contains("## Key Points\n- Move invoices to the new provider.\n- Keep the old exports working.\n"));
        assert!(description.contains("## Implementation"));
        assert!(description.contains("## Acceptance Criteria"));
        // Trivial sentences are dropped
        assert!(!description.contains("- Done."));
    }

    #[test]
    fn test_structured_description_short_summary_kept() {
        let description = structured_description("", "Fix it");
        assert!(description.starts_with("## Overview\nFix it\n"));
        assert!(description.contains("\"this task\""));
    }

    #[tokio::test]
    async fn test_empty_summary_returns_none_without_call() {
        let (service, generator) = service(ScriptedGenerator::replying("text"), Vec::new());

        assert_eq!(service.generate_task_description("Title", "   ", None).await, None);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_model_description_returned_and_cached() {
        let (service, generator) =
            service(ScriptedGenerator::replying("```\nA detailed plan.\n```"), Vec::new());

        let first = service
            .generate_task_description("Plan", "Write the plan for Q3.", None)
            .await;
        let second = service
            .generate_task_description("Plan", "Write the plan for Q3.", None)
            .await;

        assert_eq!(first, Some("A detailed plan.".to_string()));
        assert_eq!(second, first);
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_uses_structured_fallback() {
        let (service, _generator) = service(ScriptedGenerator::failing(), Vec::new());

        let description = service
            .generate_task_description("Plan", "Write the plan for Q3.", None)
            .await
            .unwrap();

        assert_eq!(description, structured_description("Plan", "Write the plan for Q3."));
    }

    #[tokio::test]
    async fn test_style_examples_in_prompt() {
        let history = vec![
            user_task("t1", "Old task", 1).with_description("Terse notes, bullet style."),
            user_task("t2", "Blank task", 2).with_description("   "),
        ];
        let (service, generator) = service(ScriptedGenerator::replying("ok"), history);

        service
            .generate_task_description("New", "Summarise the meeting notes.", Some("u1"))
            .await;

        let prompt = generator.last_prompt().unwrap();
        assert!(prompt.contains("\"Old task\": Terse notes, bullet style."));
        assert!(!prompt.contains("Blank task"));
    }
}
