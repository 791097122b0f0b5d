//! Domain records and API models
//!
//! Task records consumed by the assist features, plus the DTOs used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;
pub mod task;

// Re-export commonly used types
pub use requests::{
    validate_task, CategoryRequest, CriticalReportRequest, DescriptionRequest, PrioritizeRequest,
    TitleSuggestionRequest,
};
pub use responses::{
    CategoryResponse, DescriptionResponse, HealthResponse, ReportResponse, StatsResponse,
    TaskStoredResponse, TierStatsResponse, TitleSuggestionsResponse,
};
pub use task::{Task, TaskPriority, TaskStatus, UserSummary};
