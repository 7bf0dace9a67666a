use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entity ids are milliseconds since the epoch at creation time.
pub type EntityId = u64;

/// A portal account. `password` holds an Argon2id PHC string, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub username: String,
    pub password: String,
    pub role: String,
    pub name: String,
}

impl User {
    /// Drop the password hash, keeping only what the session may hold.
    pub fn into_session(self) -> SessionUser {
        SessionUser {
            id: self.id,
            username: self.username,
            role: self.role,
            name: self.name,
        }
    }
}

/// The authenticated identity kept for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: EntityId,
    pub username: String,
    pub role: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: EntityId,
    pub name: String,
    pub subject: String,
    pub department: String,
    pub email: String,
    pub phone: String,
}

/// Anonymous feedback about a faculty member. Carries no author field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: EntityId,
    pub faculty_id: EntityId,
    pub rating: u8,
    pub feedback: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub id: EntityId,
    pub title: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: EntityId,
    pub user_name: String,
    /// Append-only, in insertion order.
    #[serde(default)]
    pub replies: Vec<Reply>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: EntityId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: EntityId,
    pub user_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_serializes_without_author_fields() {
        let fb = Feedback {
            id: 1,
            faculty_id: 2,
            rating: 7,
            feedback: "Great pace".into(),
            timestamp: Utc::now(),
        };

        let value = serde_json::to_value(&fb).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj["facultyId"], 2);
        assert!(!obj.contains_key("userId"));
        assert!(!obj.contains_key("userName"));
    }

    #[test]
    fn session_user_drops_password() {
        let user = User {
            id: 1,
            username: "adi".into(),
            password: "$argon2id$v=19$...".into(),
            role: "trainee".into(),
            name: "Adinath Panchal".into(),
        };

        let session = serde_json::to_value(user.into_session()).unwrap();
        assert!(session.get("password").is_none());
        assert_eq!(session["username"], "adi");
    }

    #[test]
    fn query_without_replies_field_deserializes_empty() {
        let json = r#"{
            "id": 5,
            "title": "t",
            "content": "c",
            "timestamp": "2024-01-01T00:00:00Z",
            "userId": 1,
            "userName": "Sai Upase"
        }"#;

        let q: Query = serde_json::from_str(json).unwrap();
        assert!(q.replies.is_empty());
    }
}
