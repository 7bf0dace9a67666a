// View scenarios against an in-memory store and an unreachable seed source.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use campus_api::auth::INVALID_CREDENTIALS;
use campus_api::feedback::FEEDBACK_THANKS;
use campus_api::reconcile::{FeedbackDraft, QueryDraft, ReplyDraft};
use campus_api::{ApiError, AppContext};
use campus_db::{KvBackend, MemoryBackend, Store, StoreKey};
use campus_seed::remote::{RemoteComment, RemotePost, RemoteUser};
use campus_seed::{NewRemotePost, SeedSource, Seeder};
use campus_types::api::{ForumParams, SortOrder};
use campus_types::models::{Feedback, Query, User};

struct Offline;

#[async_trait]
impl SeedSource for Offline {
    async fn fetch_users(&self) -> Result<Vec<RemoteUser>> {
        Err(anyhow!("dns error: no such host"))
    }
    async fn fetch_posts(&self) -> Result<Vec<RemotePost>> {
        Err(anyhow!("dns error: no such host"))
    }
    async fn fetch_comments(&self) -> Result<Vec<RemoteComment>> {
        Err(anyhow!("dns error: no such host"))
    }
    async fn publish_post(&self, _post: &NewRemotePost) -> Result<()> {
        Err(anyhow!("dns error: no such host"))
    }
}

fn offline_context() -> (AppContext, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    let store = Store::new(backend.clone());
    let ctx = AppContext::new(store, Seeder::new(Arc::new(Offline)), "test").unwrap();
    (ctx, backend)
}

async fn logged_in_context() -> (AppContext, Arc<MemoryBackend>) {
    let (ctx, backend) = offline_context();
    ctx.login_view(Instant::now()).await.unwrap();
    ctx.login("sai", "test").await.unwrap();
    (ctx, backend)
}

#[tokio::test]
async fn cold_start_offline_dashboard_shows_fallback_faculties() {
    let (ctx, _backend) = logged_in_context().await;

    let dashboard = ctx.dashboard().await.unwrap();

    let names: Vec<&str> = dashboard.faculties.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Dr. Robert Smith", "Prof. Maria Johnson", "Dr. James Wilson"]
    );
    assert!(dashboard.recent_queries.is_empty());
    assert_eq!(dashboard.user.username, "sai");
}

#[tokio::test]
async fn dashboard_requires_session() {
    let (ctx, _backend) = offline_context();
    assert!(matches!(ctx.dashboard().await, Err(ApiError::Unauthenticated)));
}

#[tokio::test]
async fn feedback_is_recorded_anonymously() {
    let (ctx, backend) = logged_in_context().await;

    let draft = FeedbackDraft {
        faculty_id: 2,
        rating: 7,
        feedback: "Great pace".into(),
    };
    ctx.submit_feedback(draft).await.unwrap();

    let stored: Vec<Feedback> = ctx.store().get(StoreKey::Feedbacks).unwrap().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].faculty_id, 2);
    assert_eq!(stored[0].rating, 7);
    assert_eq!(stored[0].feedback, "Great pace");

    let raw = backend.snapshot().unwrap()["feedbacks"].clone();
    assert!(!raw.contains("userId"));
    assert!(!raw.contains("userName"));
    assert!(!raw.contains("Sai Upase"));

    let page = ctx.feedback_page("", Instant::now()).await.unwrap();
    assert_eq!(page.confirmation.as_deref(), Some(FEEDBACK_THANKS));
    let later = ctx
        .feedback_page("", Instant::now() + Duration::from_secs(3))
        .await
        .unwrap();
    assert!(later.confirmation.is_none());
}

#[tokio::test]
async fn feedback_for_unknown_faculty_is_rejected() {
    let (ctx, _backend) = logged_in_context().await;

    let draft = FeedbackDraft {
        faculty_id: 99,
        rating: 5,
        feedback: "Who?".into(),
    };
    assert!(matches!(ctx.submit_feedback(draft).await, Err(ApiError::NotFound(_))));

    let stored: Option<Vec<Feedback>> = ctx.store().get(StoreKey::Feedbacks).unwrap();
    assert!(stored.is_none());
}

#[tokio::test]
async fn feedback_page_filters_by_subject() {
    let (ctx, _backend) = logged_in_context().await;

    let page = ctx.feedback_page("Web Development", Instant::now()).await.unwrap();
    assert_eq!(page.faculties.len(), 1);
    assert_eq!(page.faculties[0].name, "Dr. James Wilson");
    assert_eq!(page.subjects.len(), 3);
}

#[tokio::test]
async fn query_with_two_replies_converges() {
    let (ctx, _backend) = logged_in_context().await;

    let query = ctx
        .create_query(QueryDraft {
            title: "Why is X broken?".into(),
            content: "It worked yesterday.".into(),
        })
        .await
        .unwrap();
    ctx.select_query(query.id).await.unwrap();

    ctx.reply(query.id, ReplyDraft { content: "Clear your cache.".into() })
        .await
        .unwrap();
    ctx.reply(query.id, ReplyDraft { content: "Still broken.".into() })
        .await
        .unwrap();

    let selected = ctx.selected_query().unwrap().unwrap();
    let stored: Vec<Query> = ctx.store().get(StoreKey::Queries).unwrap().unwrap();
    let persisted = stored.iter().find(|q| q.id == query.id).unwrap();

    let expected = vec!["Clear your cache.", "Still broken."];
    let from_view: Vec<&str> = selected.replies.iter().map(|r| r.content.as_str()).collect();
    let from_store: Vec<&str> = persisted.replies.iter().map(|r| r.content.as_str()).collect();
    assert_eq!(from_view, expected);
    assert_eq!(from_store, expected);
    assert_eq!(&selected, persisted);
    assert!(selected.replies.iter().all(|r| r.user_name == "Sai Upase"));
}

#[tokio::test]
async fn new_queries_lead_the_forum_and_dashboard() {
    let (ctx, _backend) = logged_in_context().await;

    for title in ["first", "second", "third", "fourth"] {
        ctx.create_query(QueryDraft {
            title: title.into(),
            content: format!("{} body", title),
        })
        .await
        .unwrap();
    }

    let forum = ctx.forum(&ForumParams::default()).await.unwrap();
    let titles: Vec<&str> = forum.queries.iter().map(|q| q.title.as_str()).collect();
    assert_eq!(titles, vec!["fourth", "third", "second", "first"]);

    let dashboard = ctx.dashboard().await.unwrap();
    let recent: Vec<&str> = dashboard.recent_queries.iter().map(|q| q.title.as_str()).collect();
    assert_eq!(recent, vec!["fourth", "third", "second"]);

    let params = ForumParams {
        search: Some("SECOND".into()),
        sort: SortOrder::Oldest,
    };
    let searched = ctx.forum(&params).await.unwrap();
    assert_eq!(searched.queries.len(), 1);
    assert_eq!(searched.queries[0].title, "second");
}

#[tokio::test]
async fn forum_reload_follows_the_stored_selection() {
    let (ctx, _backend) = logged_in_context().await;

    let query = ctx
        .create_query(QueryDraft {
            title: "Lab hours?".into(),
            content: "When is the lab open?".into(),
        })
        .await
        .unwrap();
    ctx.select_query(query.id).await.unwrap();

    let mut edited = query.clone();
    edited.title = "Lab hours this week?".into();
    ctx.store().set(StoreKey::Queries, &[edited.clone()]).unwrap();

    let forum = ctx.forum(&ForumParams::default()).await.unwrap();
    assert_eq!(forum.selected.as_ref(), Some(&edited));
    assert_eq!(ctx.selected_query().unwrap(), Some(edited));

    ctx.store().set::<Query>(StoreKey::Queries, &[]).unwrap();

    let forum = ctx.forum(&ForumParams::default()).await.unwrap();
    assert!(forum.queries.is_empty());
    assert!(forum.selected.is_none());
    assert!(ctx.selected_query().unwrap().is_none());
}

#[tokio::test]
async fn reply_to_unknown_query_is_not_found() {
    let (ctx, _backend) = logged_in_context().await;
    let result = ctx.reply(12345, ReplyDraft { content: "hello?".into() }).await;
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn unknown_user_login_leaves_state_untouched() {
    let (ctx, backend) = offline_context();
    let before = backend.snapshot().unwrap();
    assert!(before.is_empty());

    let result = ctx.login("mallory", "test").await;

    assert!(matches!(result, Err(ApiError::InvalidCredentials)));
    assert!(ctx.current_user().unwrap().is_none());
    assert_eq!(backend.snapshot().unwrap(), before);
    assert_eq!(backend.write_count(), 0);

    let now = Instant::now();
    assert_eq!(
        ctx.login_error_at(now).unwrap().as_deref(),
        Some(INVALID_CREDENTIALS)
    );
    assert!(ctx.login_error_at(now + Duration::from_secs(3)).unwrap().is_none());
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let (ctx, backend) = offline_context();
    ctx.login_view(Instant::now()).await.unwrap();
    let before = backend.snapshot().unwrap();

    assert!(matches!(ctx.login("adi", "nope").await, Err(ApiError::InvalidCredentials)));
    assert!(ctx.current_user().unwrap().is_none());
    assert_eq!(backend.snapshot().unwrap(), before);
}

#[tokio::test]
async fn opening_login_view_seeds_users_with_distinct_salts() {
    let (ctx, backend) = offline_context();

    let view = ctx.login_view(Instant::now()).await.unwrap();
    assert!(view.user.is_none());
    assert!(view.error.is_none());
    assert!(backend.snapshot().unwrap().contains_key("users"));

    let users: Vec<User> = ctx.store().get(StoreKey::Users).unwrap().unwrap();
    assert_eq!(users.len(), 3);
    assert!(users.iter().all(|u| u.password.starts_with("$argon2")));
    assert_ne!(users[0].password, users[1].password);
    assert_ne!(users[1].password, users[2].password);

    assert_eq!(ctx.login("adi", "test").await.unwrap().username, "adi");
}

#[tokio::test]
async fn session_survives_restart_until_logout() {
    let backend = Arc::new(MemoryBackend::new());
    let seeder = Seeder::new(Arc::new(Offline));

    let ctx = AppContext::new(Store::new(backend.clone()), seeder.clone(), "test").unwrap();
    ctx.login_view(Instant::now()).await.unwrap();
    let user = ctx.login("shweta", "test").await.unwrap();
    assert_eq!(user.name, "Shweta Jadhav");

    let raw = backend.snapshot().unwrap()["currentUser"].clone();
    assert!(!raw.contains("password"));
    assert!(!raw.contains("argon2"));

    let restored = AppContext::new(Store::new(backend.clone()), seeder.clone(), "test").unwrap();
    assert_eq!(restored.current_user().unwrap(), Some(user));

    restored.logout().unwrap();
    assert!(restored.current_user().unwrap().is_none());

    let after_logout = AppContext::new(Store::new(backend), seeder, "test").unwrap();
    assert!(after_logout.current_user().unwrap().is_none());
}

#[tokio::test]
async fn corrupt_faculties_are_reseeded() {
    let (ctx, backend) = logged_in_context().await;
    backend.set_raw("faculties", "[{\"id\":1}]").unwrap();

    let dashboard = ctx.dashboard().await.unwrap();
    assert_eq!(dashboard.faculties.len(), 3);
}
