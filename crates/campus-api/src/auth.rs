use std::time::Instant;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::{SaltString, rand_core::OsRng}};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{info, warn};

use campus_db::StoreKey;
use campus_types::api::{LoginRequest, LoginResponse, SessionResponse};
use campus_types::models::{SessionUser, User};

use crate::context::{AppContext, AppState};
use crate::error::ApiError;
use crate::flash::Flash;

pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Argon2id PHC string for `password`.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Hashing(e.to_string()))
}

/// False for a wrong password and for an unparsable stored hash alike.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        warn!("Stored password hash is not a PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

impl AppContext {
    /// What the login view shows: the current session and any inline error
    /// still visible at `now`. Opening the view seeds the user collection on
    /// a cold start.
    pub async fn login_view(&self, now: Instant) -> Result<SessionResponse, ApiError> {
        self.ensure_users().await?;
        Ok(SessionResponse {
            user: self.current_user()?,
            error: self.login_error_at(now)?,
        })
    }

    /// Check credentials against the stored user collection. On success the
    /// password-stripped identity becomes the session and is persisted. On
    /// failure only the inline error is raised; storage is left untouched.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionUser, ApiError> {
        let users: Vec<User> = self.store.get(StoreKey::Users)?.unwrap_or_default();

        let matched = users
            .into_iter()
            .find(|u| u.username == username)
            .filter(|u| verify_password(password, &u.password));

        let mut tab = self.tab()?;
        let Some(user) = matched else {
            warn!("Failed login attempt for '{}'", username);
            tab.login_error = Some(Flash::new(INVALID_CREDENTIALS));
            return Err(ApiError::InvalidCredentials);
        };

        let session = user.into_session();
        self.store.set_value(StoreKey::CurrentUser, &session)?;
        tab.session = Some(session.clone());
        tab.login_error = None;

        info!("{} logged in", session.username);
        Ok(session)
    }

    /// Clears the session unconditionally.
    pub fn logout(&self) -> Result<(), ApiError> {
        let mut tab = self.tab()?;
        self.store.remove(StoreKey::CurrentUser)?;
        if let Some(user) = tab.session.take() {
            info!("{} logged out", user.username);
        }
        tab.selected = None;
        Ok(())
    }

    /// The inline login error, if it is still showing at `now`.
    pub fn login_error_at(&self, now: Instant) -> Result<Option<String>, ApiError> {
        let tab = self.tab()?;
        Ok(tab
            .login_error
            .as_ref()
            .and_then(|flash| flash.visible_at(now))
            .map(str::to_string))
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation("username and password are required".into()));
    }

    let user = state.login(&req.username, &req.password).await?;
    Ok(Json(LoginResponse { user }))
}

pub async fn logout(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state.logout()?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn session(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.login_view(Instant::now()).await?))
}
