//! API Module
//!
//! HTTP handlers and routing for the task assist REST API.
//!
//! # Endpoints
//! - `POST /ai/category`, `/ai/description`, `/ai/titles`, `/ai/prioritize`,
//!   `/ai/critical-report` - The AI-assisted features
//! - `POST /tasks` - Store a task record
//! - `GET /stats` - Per-tier cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
