use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::context::AppState;
use crate::error::ApiError;

/// Reject requests while no one is logged in. Handlers read the author from
/// the tab session themselves.
pub async fn require_session(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    state.require_user()?;
    Ok(next.run(req).await)
}
