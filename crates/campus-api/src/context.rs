use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use campus_db::{Store, StoreError, StoreKey};
use campus_seed::Seeder;
use campus_types::models::{Faculty, Query, SessionUser, User};

use crate::auth::hash_password;
use crate::error::ApiError;
use crate::flash::Flash;
use crate::reconcile::IdClock;

pub type AppState = Arc<AppContext>;

/// In-memory view state of the single logical tab.
#[derive(Debug, Default)]
pub struct TabState {
    pub session: Option<SessionUser>,
    pub login_error: Option<Flash>,
    pub feedback_notice: Option<Flash>,
    /// Mirror of the persisted `queries` collection.
    pub queries: Vec<Query>,
    pub selected: Option<Query>,
}

/// Everything a view needs: persisted collections, seed source, session and
/// view state. Mutations hold the `tab` lock for their whole read-modify-write,
/// so each one runs to completion before the next starts.
pub struct AppContext {
    pub(crate) store: Store,
    pub(crate) seeder: Seeder,
    pub(crate) ids: IdClock,
    seed_password: String,
    tab: Mutex<TabState>,
}

impl AppContext {
    /// Builds the context, restoring a persisted session if one exists.
    pub fn new(store: Store, seeder: Seeder, seed_password: impl Into<String>) -> Result<Self, StoreError> {
        let session: Option<SessionUser> = store.get_value(StoreKey::CurrentUser)?;
        if let Some(user) = &session {
            info!("Restored session for {}", user.username);
        }

        Ok(Self {
            store,
            seeder,
            ids: IdClock::new(),
            seed_password: seed_password.into(),
            tab: Mutex::new(TabState {
                session,
                ..TabState::default()
            }),
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub(crate) fn tab(&self) -> Result<MutexGuard<'_, TabState>, ApiError> {
        self.tab.lock().map_err(|_| ApiError::Poisoned)
    }

    pub fn current_user(&self) -> Result<Option<SessionUser>, ApiError> {
        Ok(self.tab()?.session.clone())
    }

    pub fn require_user(&self) -> Result<SessionUser, ApiError> {
        self.current_user()?.ok_or(ApiError::Unauthenticated)
    }

    pub async fn ensure_faculties(&self) -> Result<Vec<Faculty>, ApiError> {
        self.ensure(StoreKey::Faculties, || async {
            Ok::<_, ApiError>(self.seeder.faculties().await)
        })
        .await
    }

    pub async fn ensure_queries(&self) -> Result<Vec<Query>, ApiError> {
        self.ensure(StoreKey::Queries, || async {
            Ok::<_, ApiError>(self.seeder.queries().await)
        })
        .await
    }

    pub async fn ensure_users(&self) -> Result<Vec<User>, ApiError> {
        self.ensure(StoreKey::Users, || async {
            let mut users = self.seeder.users(&self.seed_password).await;
            for user in &mut users {
                user.password = hash_password(&user.password)?;
            }
            Ok::<_, ApiError>(users)
        })
        .await
    }

    /// Read `key`; on a cold start fetch seed data outside the tab lock, then
    /// initialise under it. A value persisted meanwhile by another handler wins.
    async fn ensure<T, F, Fut>(&self, key: StoreKey, seed: F) -> Result<Vec<T>, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, ApiError>>,
    {
        if let Some(existing) = self.store.get(key)? {
            return Ok(existing);
        }

        info!("No stored '{}', seeding", key);
        let seeded = seed().await?;

        let _tab = self.tab()?;
        Ok(self.store.get_or_init(key, seeded)?)
    }
}
