use std::time::Instant;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::info;

use campus_db::StoreKey;
use campus_types::api::{FeedbackPageResponse, FeedbackParams, SubmitFeedbackRequest};
use campus_types::models::Feedback;

use crate::context::{AppContext, AppState};
use crate::error::ApiError;
use crate::flash::Flash;
use crate::reconcile::{self, FeedbackDraft};
use crate::views;

pub const FEEDBACK_THANKS: &str = "Thank you for your feedback! It has been submitted anonymously.";

impl AppContext {
    pub async fn feedback_page(&self, subject: &str, now: Instant) -> Result<FeedbackPageResponse, ApiError> {
        let faculties = self.ensure_faculties().await?;

        let confirmation = self
            .tab()?
            .feedback_notice
            .as_ref()
            .and_then(|flash| flash.visible_at(now))
            .map(str::to_string);

        Ok(FeedbackPageResponse {
            subjects: views::subjects(&faculties),
            faculties: views::filter_faculties(&faculties, subject),
            confirmation,
        })
    }

    /// Append one anonymous record to `feedbacks`. The session identity is
    /// never consulted here.
    pub async fn submit_feedback(&self, draft: FeedbackDraft) -> Result<Feedback, ApiError> {
        let faculties = self.ensure_faculties().await?;
        if !faculties.iter().any(|f| f.id == draft.faculty_id) {
            return Err(ApiError::NotFound(format!("Faculty {}", draft.faculty_id)));
        }

        let mut tab = self.tab()?;
        let mut feedbacks: Vec<Feedback> = self.store.get_or_init(StoreKey::Feedbacks, Vec::new())?;

        let now = Utc::now();
        let feedback = reconcile::new_feedback(draft, self.ids.next(now), now);
        feedbacks.push(feedback.clone());
        self.store.set(StoreKey::Feedbacks, &feedbacks)?;

        tab.feedback_notice = Some(Flash::new(FEEDBACK_THANKS));
        info!("Feedback recorded for faculty {}", feedback.faculty_id);
        Ok(feedback)
    }
}

pub async fn get_feedback_page(
    State(state): State<AppState>,
    Query(params): Query<FeedbackParams>,
) -> Result<impl IntoResponse, ApiError> {
    let subject = params.subject.unwrap_or_default();
    Ok(Json(state.feedback_page(&subject, Instant::now()).await?))
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(req): Json<SubmitFeedbackRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = FeedbackDraft::try_from(req)?;
    let feedback = state.submit_feedback(draft).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}
