use axum::{
    Json,
    extract::{Path, Query as QueryParams, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::info;

use campus_db::StoreKey;
use campus_seed::NewRemotePost;
use campus_types::api::{CreateQueryRequest, CreateReplyRequest, ForumParams, ForumResponse};
use campus_types::models::{EntityId, Query};

use crate::context::{AppContext, AppState};
use crate::error::ApiError;
use crate::reconcile::{self, QueryDraft, ReplyDraft};
use crate::views;

impl AppContext {
    /// Reload the forum from storage and project it through search and sort.
    pub async fn forum(&self, params: &ForumParams) -> Result<ForumResponse, ApiError> {
        let stored = self.ensure_queries().await?;

        let mut tab = self.tab()?;
        tab.selected = tab
            .selected
            .as_ref()
            .and_then(|sel| stored.iter().find(|q| q.id == sel.id).cloned());
        tab.queries = stored;

        let search = params.search.as_deref().unwrap_or("");
        let filtered = views::filter_queries(&tab.queries, search);

        Ok(ForumResponse {
            queries: views::sort_queries(&filtered, params.sort),
            selected: tab.selected.clone(),
        })
    }

    pub async fn select_query(&self, id: EntityId) -> Result<Query, ApiError> {
        let stored = self.ensure_queries().await?;
        let query = stored
            .iter()
            .find(|q| q.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Query {}", id)))?;

        let mut tab = self.tab()?;
        tab.queries = stored;
        tab.selected = Some(query.clone());
        Ok(query)
    }

    /// The query currently open in the detail pane, if any.
    pub fn selected_query(&self) -> Result<Option<Query>, ApiError> {
        Ok(self.tab()?.selected.clone())
    }

    /// Persist a new query at the head of the forum and mirror it in memory.
    pub async fn create_query(&self, draft: QueryDraft) -> Result<Query, ApiError> {
        self.ensure_queries().await?;

        let mut tab = self.tab()?;
        let author = tab.session.clone().ok_or(ApiError::Unauthenticated)?;
        let stored: Vec<Query> = self.store.get(StoreKey::Queries)?.unwrap_or_default();

        let now = Utc::now();
        let query = reconcile::new_query(draft, &author, self.ids.next(now), now);
        let updated = reconcile::prepend_query(&stored, query.clone());

        self.store.set(StoreKey::Queries, &updated)?;
        tab.queries = updated;

        info!("{} posted query {}", author.username, query.id);
        self.seeder.publish(NewRemotePost {
            user_id: author.id,
            title: query.title.clone(),
            body: query.content.clone(),
        });

        Ok(query)
    }

    /// Append a reply, write the collection back, and point the selection at
    /// the updated query so view and storage agree.
    pub async fn reply(&self, query_id: EntityId, draft: ReplyDraft) -> Result<Query, ApiError> {
        self.ensure_queries().await?;

        let mut tab = self.tab()?;
        let author = tab.session.clone().ok_or(ApiError::Unauthenticated)?;
        let stored: Vec<Query> = self.store.get(StoreKey::Queries)?.unwrap_or_default();
        let target = stored
            .iter()
            .find(|q| q.id == query_id)
            .ok_or_else(|| ApiError::NotFound(format!("Query {}", query_id)))?;

        let now = Utc::now();
        let reply = reconcile::new_reply(draft, &author, self.ids.next(now), now);
        let updated_query = reconcile::append_reply(target, reply);
        let updated = reconcile::replace_query(&stored, &updated_query);

        self.store.set(StoreKey::Queries, &updated)?;
        tab.queries = updated;
        tab.selected = Some(updated_query.clone());

        info!(
            "{} replied to query {} ({} replies)",
            author.username,
            query_id,
            updated_query.replies.len()
        );
        Ok(updated_query)
    }
}

pub async fn get_forum(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ForumParams>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.forum(&params).await?))
}

pub async fn get_query(
    State(state): State<AppState>,
    Path(query_id): Path<EntityId>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.select_query(query_id).await?))
}

pub async fn create_query(
    State(state): State<AppState>,
    Json(req): Json<CreateQueryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = QueryDraft::try_from(req)?;
    let query = state.create_query(draft).await?;
    Ok((StatusCode::CREATED, Json(query)))
}

pub async fn post_reply(
    State(state): State<AppState>,
    Path(query_id): Path<EntityId>,
    Json(req): Json<CreateReplyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = ReplyDraft::try_from(req)?;
    let query = state.reply(query_id, draft).await?;
    Ok((StatusCode::CREATED, Json(query)))
}
