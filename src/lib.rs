//! Task Assist - AI-assisted features for a task management service
//!
//! Wraps a remote text-generation endpoint behind tiered TTL caches and local
//! heuristic fallbacks, so every feature degrades instead of failing.

pub mod ai;
pub mod api;
pub mod assist;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod source;
pub mod tasks;

pub use api::AppState;
pub use assist::AssistService;
pub use config::Config;
pub use error::{AssistError, Result};
pub use tasks::spawn_cleanup_task;
