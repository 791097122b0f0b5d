//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Default root of the Gemini REST API.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Gemini model id.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Default TTL in seconds of the short cache tier
    pub short_ttl: u64,
    /// Default TTL in seconds of the medium cache tier
    pub medium_ttl: u64,
    /// Default TTL in seconds of the long cache tier
    pub long_ttl: u64,
    /// Credential for the text-generation endpoint; None disables remote calls
    pub gemini_api_key: Option<String>,
    /// Model id used for generation
    pub gemini_model: String,
    /// Root URL of the generation API
    pub gemini_base_url: String,
    /// HTTP client timeout in seconds
    pub request_timeout: u64,
    /// Sampling temperature for completions
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_output_tokens: u32,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `SHORT_TTL` / `MEDIUM_TTL` / `LONG_TTL` - Tier TTLs in seconds (default: 300 / 3600 / 86400)
    /// - `GEMINI_API_KEY` - Generation API credential (default: unset)
    /// - `GEMINI_MODEL` - Model id (default: gemini-1.5-flash)
    /// - `GEMINI_BASE_URL` - API root (default: public Gemini endpoint)
    /// - `REQUEST_TIMEOUT_SECS` - HTTP timeout in seconds (default: 30)
    /// - `AI_TEMPERATURE` - Sampling temperature (default: 0.7)
    /// - `AI_MAX_OUTPUT_TOKENS` - Output token bound (default: 1024)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            short_ttl: parse_var("SHORT_TTL").unwrap_or(defaults.short_ttl),
            medium_ttl: parse_var("MEDIUM_TTL").unwrap_or(defaults.medium_ttl),
            long_ttl: parse_var("LONG_TTL").unwrap_or(defaults.long_ttl),
            gemini_api_key: env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: env::var("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            request_timeout: parse_var("REQUEST_TIMEOUT_SECS").unwrap_or(defaults.request_timeout),
            temperature: parse_var("AI_TEMPERATURE").unwrap_or(defaults.temperature),
            max_output_tokens: parse_var("AI_MAX_OUTPUT_TOKENS")
                .unwrap_or(defaults.max_output_tokens),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cleanup_interval: 60,
            short_ttl: 300,
            medium_ttl: 3600,
            long_ttl: 86_400,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            request_timeout: 30,
            temperature: 0.7,
            max_output_tokens: 1024,
        }
    }
}
