//! Pure construction and merging of forum and feedback records.
//!
//! Nothing in here touches storage. Callers write the returned collections
//! back through the store and then refresh their in-memory copies.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use campus_types::api::{CreateQueryRequest, CreateReplyRequest, SubmitFeedbackRequest};
use campus_types::models::{EntityId, Feedback, Query, Reply, SessionUser};

use crate::error::ApiError;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 10;

/// Timestamp-derived ids, strictly increasing within one process.
#[derive(Debug, Default)]
pub struct IdClock {
    last: AtomicU64,
}

impl IdClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self, now: DateTime<Utc>) -> EntityId {
        let now_ms = now.timestamp_millis().max(0) as u64;
        let prev = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now_ms.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now_ms.max(prev + 1)
    }
}

#[derive(Debug, Clone)]
pub struct QueryDraft {
    pub title: String,
    pub content: String,
}

impl TryFrom<CreateQueryRequest> for QueryDraft {
    type Error = ApiError;

    fn try_from(req: CreateQueryRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: required("title", req.title)?,
            content: required("content", req.content)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ReplyDraft {
    pub content: String,
}

impl TryFrom<CreateReplyRequest> for ReplyDraft {
    type Error = ApiError;

    fn try_from(req: CreateReplyRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            content: required("content", req.content)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct FeedbackDraft {
    pub faculty_id: EntityId,
    pub rating: u8,
    pub feedback: String,
}

impl TryFrom<SubmitFeedbackRequest> for FeedbackDraft {
    type Error = ApiError;

    fn try_from(req: SubmitFeedbackRequest) -> Result<Self, Self::Error> {
        if !(MIN_RATING..=MAX_RATING).contains(&req.rating) {
            return Err(ApiError::Validation(format!(
                "rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }

        Ok(Self {
            faculty_id: req.faculty_id,
            rating: req.rating as u8,
            feedback: required("feedback", req.feedback)?,
        })
    }
}

fn required(field: &str, value: String) -> Result<String, ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{} is required", field)));
    }
    Ok(value)
}

pub fn new_query(draft: QueryDraft, author: &SessionUser, id: EntityId, now: DateTime<Utc>) -> Query {
    Query {
        id,
        title: draft.title,
        content: draft.content,
        timestamp: now,
        user_id: author.id,
        user_name: author.name.clone(),
        replies: Vec::new(),
    }
}

pub fn new_reply(draft: ReplyDraft, author: &SessionUser, id: EntityId, now: DateTime<Utc>) -> Reply {
    Reply {
        id,
        content: draft.content,
        timestamp: now,
        user_id: author.id,
        user_name: author.name.clone(),
    }
}

/// Builds a feedback record. Takes no author: there is nothing to capture.
pub fn new_feedback(draft: FeedbackDraft, id: EntityId, now: DateTime<Utc>) -> Feedback {
    Feedback {
        id,
        faculty_id: draft.faculty_id,
        rating: draft.rating,
        feedback: draft.feedback,
        timestamp: now,
    }
}

/// A copy of `query` with `reply` appended. `query` is left untouched.
pub fn append_reply(query: &Query, reply: Reply) -> Query {
    let mut replies = Vec::with_capacity(query.replies.len() + 1);
    replies.extend(query.replies.iter().cloned());
    replies.push(reply);

    Query {
        replies,
        ..query.clone()
    }
}

/// Newest first.
pub fn prepend_query(queries: &[Query], query: Query) -> Vec<Query> {
    std::iter::once(query).chain(queries.iter().cloned()).collect()
}

/// Swap in `updated` where its id matches; everything else is kept in place.
pub fn replace_query(queries: &[Query], updated: &Query) -> Vec<Query> {
    queries
        .iter()
        .map(|q| if q.id == updated.id { updated.clone() } else { q.clone() })
        .collect()
}
