pub mod fallback;
pub mod mapping;
pub mod remote;

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use campus_types::models::{Faculty, Query, User};

pub use remote::{HttpSeedSource, NewRemotePost, SeedSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedKind {
    Faculties,
    Users,
    Queries,
}

impl fmt::Display for SeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Faculties => "faculties",
            Self::Users => "users",
            Self::Queries => "queries",
        })
    }
}

/// Fetches seed collections, never failing: any remote error (or an empty
/// payload) is logged and replaced with the fixed fallback list.
#[derive(Clone)]
pub struct Seeder {
    source: Arc<dyn SeedSource>,
}

impl Seeder {
    pub fn new(source: Arc<dyn SeedSource>) -> Self {
        Self { source }
    }

    pub async fn faculties(&self) -> Vec<Faculty> {
        match self.source.fetch_users().await {
            Ok(users) if !users.is_empty() => {
                let faculties = map_faculties(users);
                seeded(SeedKind::Faculties, faculties.len());
                faculties
            }
            outcome => degrade(SeedKind::Faculties, outcome.err(), fallback::faculties()),
        }
    }

    /// Seed accounts carrying `password` in plaintext. Callers hash each
    /// record before persisting.
    pub async fn users(&self, password: &str) -> Vec<User> {
        match self.source.fetch_users().await {
            Ok(users) if !users.is_empty() => {
                let users: Vec<User> = users
                    .into_iter()
                    .map(|u| mapping::user_from_remote(u, password))
                    .collect();
                seeded(SeedKind::Users, users.len());
                users
            }
            outcome => degrade(SeedKind::Users, outcome.err(), fallback::users(password)),
        }
    }

    pub async fn queries(&self) -> Vec<Query> {
        let fetched = tokio::try_join!(
            self.source.fetch_posts(),
            self.source.fetch_comments(),
            self.source.fetch_users(),
        );

        match fetched {
            Ok((posts, comments, users)) if !posts.is_empty() => {
                let queries = mapping::queries_from_remote(posts, comments, &users, Utc::now());
                seeded(SeedKind::Queries, queries.len());
                queries
            }
            outcome => degrade(SeedKind::Queries, outcome.err(), fallback::queries()),
        }
    }

    /// Fire-and-forget post creation on the remote. Failures are only logged.
    pub fn publish(&self, post: NewRemotePost) {
        let source = self.source.clone();
        tokio::spawn(async move {
            if let Err(e) = source.publish_post(&post).await {
                warn!("Publishing query '{}' to seed source failed: {}", post.title, e);
            }
        });
    }
}

fn map_faculties(users: Vec<remote::RemoteUser>) -> Vec<Faculty> {
    let mut rng = rand::rng();
    users
        .into_iter()
        .map(|u| mapping::faculty_from_remote(u, &mut rng))
        .collect()
}

fn seeded(kind: SeedKind, count: usize) {
    info!("Seeded {} {} from remote source", count, kind);
}

fn degrade<T>(kind: SeedKind, error: Option<anyhow::Error>, fallback: Vec<T>) -> Vec<T> {
    match error {
        Some(e) => warn!("Remote {} fetch failed, using {} fallback entries: {}", kind, fallback.len(), e),
        None => warn!("Remote {} payload was empty, using {} fallback entries", kind, fallback.len()),
    }
    fallback
}
