//! API Routes
//!
//! Configures the Axum router with all task assist endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    category_handler, critical_report_handler, description_handler, health_handler,
    prioritize_handler, stats_handler, store_task_handler, titles_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /ai/category` - Predict the next task category
/// - `POST /ai/description` - Expand a summary into a description
/// - `POST /ai/titles` - Suggest titles for a prefix
/// - `POST /ai/prioritize` - Prioritize a user's active tasks
/// - `POST /ai/critical-report` - Report on critical and overdue tasks
/// - `POST /tasks` - Store a task record
/// - `GET /stats` - Per-tier cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let ai = Router::new()
        .route("/category", post(category_handler))
        .route("/description", post(description_handler))
        .route("/titles", post(titles_handler))
        .route("/prioritize", post(prioritize_handler))
        .route("/critical-report", post(critical_report_handler));

    Router::new()
        .nest("/ai", ai)
        .route("/tasks", post(store_task_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
