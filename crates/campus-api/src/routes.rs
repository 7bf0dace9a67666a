use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::context::AppState;
use crate::middleware::require_session;
use crate::{auth, dashboard, feedback, forum};

/// Login routes are open; every other view sits behind `require_session`.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::session));

    let protected_routes = Router::new()
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/feedback", get(feedback::get_feedback_page).post(feedback::submit_feedback))
        .route("/forum", get(forum::get_forum))
        .route("/forum/queries", post(forum::create_query))
        .route("/forum/queries/{query_id}", get(forum::get_query))
        .route("/forum/queries/{query_id}/replies", post(forum::post_reply))
        .layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
