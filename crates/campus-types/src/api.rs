use serde::{Deserialize, Serialize};

use crate::models::{EntityId, Faculty, Query, SessionUser};

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: SessionUser,
}

/// Current session plus the inline login error, if one is still showing.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: Option<SessionUser>,
    pub error: Option<String>,
}

// -- Dashboard --

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySummary {
    pub id: EntityId,
    pub title: String,
    pub preview: String,
    pub user_name: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub reply_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub user: SessionUser,
    pub faculties: Vec<Faculty>,
    pub recent_queries: Vec<QuerySummary>,
}

// -- Feedback --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    pub faculty_id: EntityId,
    pub rating: i64,
    pub feedback: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedbackParams {
    #[serde(default)]
    pub subject: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackPageResponse {
    pub faculties: Vec<Faculty>,
    pub subjects: Vec<String>,
    /// Confirmation text while the post-submit notice is still showing.
    pub confirmation: Option<String>,
}

// -- Forum --

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    MostReplies,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForumParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
}

#[derive(Debug, Serialize)]
pub struct ForumResponse {
    pub queries: Vec<Query>,
    pub selected: Option<Query>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateQueryRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateReplyRequest {
    pub content: String,
}
