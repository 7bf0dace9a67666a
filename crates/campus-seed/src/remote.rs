use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use campus_types::models::EntityId;

// -- Remote resource shapes --

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteUser {
    pub id: EntityId,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePost {
    pub user_id: EntityId,
    pub id: EntityId,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteComment {
    pub post_id: EntityId,
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub body: String,
}

/// Body of a best-effort post creation on the remote.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRemotePost {
    pub user_id: EntityId,
    pub title: String,
    pub body: String,
}

/// Where seed data comes from. Errors are returned as-is; callers decide
/// on fallback.
#[async_trait]
pub trait SeedSource: Send + Sync {
    async fn fetch_users(&self) -> Result<Vec<RemoteUser>>;
    async fn fetch_posts(&self) -> Result<Vec<RemotePost>>;
    async fn fetch_comments(&self) -> Result<Vec<RemoteComment>>;
    async fn publish_post(&self, post: &NewRemotePost) -> Result<()>;
}

/// JSONPlaceholder-shaped HTTP source.
pub struct HttpSeedSource {
    client: reqwest::Client,
    base_url: String,
    limit: usize,
}

impl HttpSeedSource {
    pub fn new(base_url: impl Into<String>, limit: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limit,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, resource: &str, limit: usize) -> Result<T> {
        let url = format!("{}/{}?_limit={}", self.base_url, resource, limit);
        debug!("Fetching seed resource {}", url);

        let value = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;

        Ok(value)
    }
}

#[async_trait]
impl SeedSource for HttpSeedSource {
    async fn fetch_users(&self) -> Result<Vec<RemoteUser>> {
        self.get_json("users", self.limit).await
    }

    async fn fetch_posts(&self) -> Result<Vec<RemotePost>> {
        self.get_json("posts", self.limit).await
    }

    async fn fetch_comments(&self) -> Result<Vec<RemoteComment>> {
        // Several comments per post
        self.get_json("comments", self.limit * 5).await
    }

    async fn publish_post(&self, post: &NewRemotePost) -> Result<()> {
        let url = format!("{}/posts", self.base_url);
        self.client
            .post(&url)
            .json(post)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_shapes_ignore_extra_fields() {
        let json = r#"{
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "address": { "city": "Gwenborough" },
            "phone": "1-770-736-8031 x56442",
            "website": "hildegard.org"
        }"#;

        let user: RemoteUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.username, "Bret");
        assert_eq!(user.phone, "1-770-736-8031 x56442");
    }

    #[test]
    fn comment_uses_camel_case_post_id() {
        let json = r#"{"postId": 3, "id": 11, "name": "n", "email": "e@x.io", "body": "b"}"#;
        let comment: RemoteComment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.post_id, 3);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let source = HttpSeedSource::new("https://example.test/", 10);
        assert_eq!(source.base_url, "https://example.test");
    }
}
