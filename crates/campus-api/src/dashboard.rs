use axum::{Json, extract::State, response::IntoResponse};

use campus_types::api::{DashboardResponse, QuerySummary};

use crate::context::{AppContext, AppState};
use crate::error::ApiError;
use crate::views;

pub const RECENT_QUERY_COUNT: usize = 3;
pub const PREVIEW_CHARS: usize = 100;

impl AppContext {
    pub async fn dashboard(&self) -> Result<DashboardResponse, ApiError> {
        let user = self.require_user()?;
        let faculties = self.ensure_faculties().await?;
        let queries = self.ensure_queries().await?;

        let recent_queries = views::recent_queries(&queries, RECENT_QUERY_COUNT)
            .iter()
            .map(|q| QuerySummary {
                id: q.id,
                title: q.title.clone(),
                preview: views::preview(&q.content, PREVIEW_CHARS),
                user_name: q.user_name.clone(),
                timestamp: q.timestamp,
                reply_count: q.replies.len(),
            })
            .collect();

        Ok(DashboardResponse {
            user,
            faculties,
            recent_queries,
        })
    }
}

pub async fn get_dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.dashboard().await?))
}
