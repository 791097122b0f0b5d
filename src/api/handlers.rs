//! API Handlers
//!
//! HTTP request handlers for each task assist endpoint. Feature failures
//! never surface here as errors: the assist service already degraded them.

use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::info;

use crate::ai::{GeminiClient, TextGenerator};
use crate::assist::{AssistService, Prioritization};
use crate::cache::CacheTiers;
use crate::config::Config;
use crate::error::{AssistError, Result};
use crate::models::{
    validate_task, CategoryRequest, CategoryResponse, CriticalReportRequest, DescriptionRequest,
    DescriptionResponse, HealthResponse, PrioritizeRequest, ReportResponse, StatsResponse, Task,
    TaskStoredResponse, TitleSuggestionRequest, TitleSuggestionsResponse,
};
use crate::source::{InMemoryTaskSource, TaskSource};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The AI-assisted features
    pub assist: AssistService,
    /// Task store the features read history from
    pub tasks: Arc<InMemoryTaskSource>,
}

impl AppState {
    /// Creates a new AppState around `generator` with an empty task store.
    pub fn new(generator: Arc<dyn TextGenerator>, tiers: CacheTiers) -> Self {
        let tasks = Arc::new(InMemoryTaskSource::new());
        let assist = AssistService::new(generator, tiers, tasks.clone());
        Self { assist, tasks }
    }

    /// Creates a new AppState from configuration, talking to Gemini.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = GeminiClient::from_config(config)?;
        Ok(Self::new(Arc::new(client), CacheTiers::from_config(config)))
    }
}

fn reject_invalid(error: Option<String>) -> Result<()> {
    match error {
        Some(message) => Err(AssistError::InvalidRequest(message)),
        None => Ok(()),
    }
}

/// Handler for POST /ai/category
pub async fn category_handler(
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> Result<Json<CategoryResponse>> {
    reject_invalid(req.validate())?;

    let category = state
        .assist
        .predict_next_category(&req.user_id, req.tasks.as_deref(), req.title.as_deref())
        .await;

    Ok(Json(CategoryResponse { category }))
}

/// Handler for POST /ai/description
pub async fn description_handler(
    State(state): State<AppState>,
    Json(req): Json<DescriptionRequest>,
) -> Result<Json<DescriptionResponse>> {
    let description = state
        .assist
        .generate_task_description(&req.title, &req.summary, req.user_id.as_deref())
        .await;

    Ok(Json(DescriptionResponse { description }))
}

/// Handler for POST /ai/titles
pub async fn titles_handler(
    State(state): State<AppState>,
    Json(req): Json<TitleSuggestionRequest>,
) -> Result<Json<TitleSuggestionsResponse>> {
    reject_invalid(req.validate())?;

    let suggestions = state
        .assist
        .generate_title_suggestions(&req.prefix, &req.user_id)
        .await;

    Ok(Json(TitleSuggestionsResponse { suggestions }))
}

/// Handler for POST /ai/prioritize
///
/// Without `tasks` the user's tasks are loaded from the task store.
pub async fn prioritize_handler(
    State(state): State<AppState>,
    Json(req): Json<PrioritizeRequest>,
) -> Result<Json<Prioritization>> {
    reject_invalid(req.validate())?;

    let tasks = match req.tasks {
        Some(tasks) => tasks,
        None => state.tasks.recent_tasks(&req.user_id, None).await?,
    };

    let prioritization = state
        .assist
        .generate_task_prioritization(&req.user_id, &tasks)
        .await;

    Ok(Json(prioritization))
}

/// Handler for POST /ai/critical-report
pub async fn critical_report_handler(
    State(state): State<AppState>,
    Json(req): Json<CriticalReportRequest>,
) -> Result<Json<ReportResponse>> {
    let tasks = match req.tasks {
        Some(tasks) => tasks,
        None => state.tasks.all_tasks().await?,
    };

    let report = state.assist.generate_critical_tasks_report(&tasks).await;

    Ok(Json(ReportResponse { report }))
}

/// Handler for POST /tasks
///
/// Stores a task record so later requests can use it as history.
pub async fn store_task_handler(
    State(state): State<AppState>,
    Json(task): Json<Task>,
) -> Result<Json<TaskStoredResponse>> {
    reject_invalid(validate_task(&task))?;

    let id = task.id.clone();
    state.tasks.insert(task).await;
    info!(task_id = %id, "Stored task");

    Ok(Json(TaskStoredResponse::new(id)))
}

/// Handler for GET /stats
///
/// Returns per-tier cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.assist.tiers().stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.assist.is_ai_configured()))
}
