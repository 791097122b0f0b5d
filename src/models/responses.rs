//! Response DTOs for the task assist API
//!
//! Defines the structure of outgoing HTTP response bodies. The
//! prioritization endpoint answers with [`crate::assist::Prioritization`]
//! directly.

use serde::Serialize;

use crate::cache::{CacheStats, TierStats};

/// Response body for POST /ai/category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    /// Predicted category, null when there is no history to predict from
    pub category: Option<String>,
}

/// Response body for POST /ai/description
#[derive(Debug, Clone, Serialize)]
pub struct DescriptionResponse {
    pub description: Option<String>,
}

/// Response body for POST /ai/titles
#[derive(Debug, Clone, Serialize)]
pub struct TitleSuggestionsResponse {
    /// At most five suggestions
    pub suggestions: Vec<String>,
}

/// Response body for POST /ai/critical-report
#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    /// Markdown report
    pub report: String,
}

/// Response body for POST /tasks
#[derive(Debug, Clone, Serialize)]
pub struct TaskStoredResponse {
    /// Success message
    pub message: String,
    /// The stored task id
    pub id: String,
}

impl TaskStoredResponse {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            message: format!("Task '{}' stored successfully", id),
            id,
        }
    }
}

/// Statistics of one cache tier
#[derive(Debug, Clone, Serialize)]
pub struct TierStatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<&CacheStats> for TierStatsResponse {
    fn from(stats: &CacheStats) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            expired: stats.expired,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub short: TierStatsResponse,
    pub medium: TierStatsResponse,
    pub long: TierStatsResponse,
}

impl From<TierStats> for StatsResponse {
    fn from(stats: TierStats) -> Self {
        Self {
            short: (&stats.short).into(),
            medium: (&stats.medium).into(),
            long: (&stats.long).into(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Whether a remote generation credential is configured
    pub ai_configured: bool,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(ai_configured: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            ai_configured,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_response_null() {
        let json = serde_json::to_string(&CategoryResponse { category: None }).unwrap();
        assert_eq!(json, r#"{"category":null}"#);
    }

    #[test]
    fn test_task_stored_response() {
        let resp = TaskStoredResponse::new("t1");
        assert_eq!(resp.id, "t1");
        assert!(resp.message.contains("successfully"));
    }

    #[test]
    fn test_stats_response_from_tiers() {
        let mut short = CacheStats::new();
        short.record_hit();
        short.record_hit();
        short.record_hit();
        short.record_miss();
        let stats = TierStats {
            short,
            medium: CacheStats::new(),
            long: CacheStats::new(),
        };

        let resp = StatsResponse::from(stats);
        assert_eq!(resp.short.hits, 3);
        assert!((resp.short.hit_rate - 0.75).abs() < 0.001);
        assert_eq!(resp.medium.hit_rate, 0.0);
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy(false)).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains(r#""ai_configured":false"#));
        assert!(json.contains("timestamp"));
    }
}
