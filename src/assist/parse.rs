//! Response parsing helpers
//!
//! Model output is free text. Each helper either yields a typed value or hands
//! back the raw text so the caller can try the next strategy in its chain.

use serde::de::DeserializeOwned;
use serde_json::Value;

// == Parsed ==
/// Outcome of one parsing strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    Valid(T),
    /// Raw text that did not match the expected structure
    Unparsable(String),
}

impl<T> Parsed<T> {
    /// Tries `next` on the raw text if this strategy failed.
    pub fn or_else(self, next: impl FnOnce(String) -> Parsed<T>) -> Parsed<T> {
        match self {
            Parsed::Valid(value) => Parsed::Valid(value),
            Parsed::Unparsable(raw) => next(raw),
        }
    }

    /// Returns the value, or computes a default from the raw text.
    pub fn unwrap_or_else(self, default: impl FnOnce(String) -> T) -> T {
        match self {
            Parsed::Valid(value) => value,
            Parsed::Unparsable(raw) => default(raw),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        match self {
            Parsed::Valid(value) => Parsed::Valid(f(value)),
            Parsed::Unparsable(raw) => Parsed::Unparsable(raw),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Parsed::Valid(_))
    }
}

/// Span from the first `open` to the last `close` after it, inclusive.
pub fn bracketed(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..end + close.len_utf8()])
}

/// Parses the first `[...]` span as an array, keeping non-empty strings.
pub fn json_string_array(text: &str) -> Parsed<Vec<String>> {
    let strings: Option<Vec<String>> = bracketed(text, '[', ']')
        .and_then(|span| serde_json::from_str::<Vec<Value>>(span).ok())
        .map(|items| {
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.trim().to_string()),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect()
        });

    match strings {
        Some(strings) if !strings.is_empty() => Parsed::Valid(strings),
        _ => Parsed::Unparsable(text.to_string()),
    }
}

/// Scans line by line for the first double-quoted string on each line.
pub fn quoted_strings(text: &str) -> Parsed<Vec<String>> {
    let strings: Vec<String> = text
        .lines()
        .filter_map(|line| {
            let (_, rest) = line.split_once('"')?;
            let (quoted, _) = rest.split_once('"')?;
            let quoted = quoted.trim();
            (!quoted.is_empty()).then(|| quoted.to_string())
        })
        .collect();

    if strings.is_empty() {
        Parsed::Unparsable(text.to_string())
    } else {
        Parsed::Valid(strings)
    }
}

/// Deserializes the first `{...}` span into `T`.
pub fn json_object<T: DeserializeOwned>(text: &str) -> Parsed<T> {
    match bracketed(text, '{', '}').and_then(|span| serde_json::from_str(span).ok()) {
        Some(value) => Parsed::Valid(value),
        None => Parsed::Unparsable(text.to_string()),
    }
}

/// Trims whitespace and a surrounding markdown code fence.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag line
    let inner = inner.split_once('\n').map_or("", |(_, body)| body);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_bracketed_spans_first_open_to_last_close() {
        assert_eq!(bracketed("x [1, [2]] y", '[', ']'), Some("[1, [2]]"));
        assert_eq!(bracketed("no brackets", '[', ']'), None);
        assert_eq!(bracketed("] backwards [", '[', ']'), None);
    }

    #[test]
    fn test_json_string_array_filters_non_strings() {
        let raw = "Here you go:\n[\"Update docs\", 42, null, \"  \", \"Update API\"]\nThanks";
        assert_eq!(
            json_string_array(raw),
            Parsed::Valid(vec!["Update docs".to_string(), "Update API".to_string()])
        );
    }

    #[test]
    fn test_json_string_array_rejects_prose() {
        assert!(!json_string_array("I cannot help with that.").is_valid());
        assert!(!json_string_array("[not, json]").is_valid());
        assert!(!json_string_array("[1, 2]").is_valid());
    }

    #[test]
    fn test_quoted_strings_one_per_line() {
        let raw = "1. \"Update report\" is good\n2. \"Update slides\"\nnothing here\n\"\"";
        assert_eq!(
            quoted_strings(raw),
            Parsed::Valid(vec!["Update report".to_string(), "Update slides".to_string()])
        );
    }

    #[test]
    fn test_chain_falls_through_to_default() {
        let result = json_string_array("no structure at all")
            .or_else(|raw| quoted_strings(&raw))
            .unwrap_or_else(|_| vec!["default".to_string()]);
        assert_eq!(result, vec!["default".to_string()]);
    }

    #[test]
    fn test_json_object_inside_prose() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Plan {
            logic: String,
        }

        let raw = "```json\n{\"logic\": \"urgent first\"}\n```";
        assert_eq!(
            json_object::<Plan>(raw),
            Parsed::Valid(Plan {
                logic: "urgent first".to_string()
            })
        );
        assert!(!json_object::<Plan>("{broken").is_valid());
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```markdown\n# Title\nBody\n```"), "# Title\nBody");
        assert_eq!(strip_code_fence("  plain text \n"), "plain text");
    }
}
