//! Typed projections of remote resources into portal entities.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;

use campus_types::models::{EntityId, Faculty, Query, Reply, User};

use crate::remote::{RemoteComment, RemotePost, RemoteUser};

pub const SUBJECTS: &[&str] = &[
    "React Fundamentals",
    "Advanced JavaScript",
    "Web Development",
    "Data Structures",
    "Database Systems",
    "Cloud Computing",
];

pub const DEPARTMENTS: &[&str] = &[
    "Computer Science",
    "Information Technology",
    "Software Engineering",
];

pub const SEED_ROLE: &str = "trainee";

/// Remote users become faculty with a randomly drawn subject and department.
pub fn faculty_from_remote<R: Rng + ?Sized>(user: RemoteUser, rng: &mut R) -> Faculty {
    let subject = SUBJECTS.choose(rng).copied().unwrap_or(SUBJECTS[0]);
    let department = DEPARTMENTS.choose(rng).copied().unwrap_or(DEPARTMENTS[0]);

    Faculty {
        id: user.id,
        name: user.name,
        subject: subject.to_string(),
        department: department.to_string(),
        email: user.email,
        phone: user.phone,
    }
}

pub fn user_from_remote(user: RemoteUser, password: &str) -> User {
    User {
        id: user.id,
        username: user.username.to_lowercase(),
        password: password.to_string(),
        role: SEED_ROLE.to_string(),
        name: user.name,
    }
}

/// Remote commenters are not portal users: user id 0, email as display name.
pub fn reply_from_remote(comment: RemoteComment, at: DateTime<Utc>) -> Reply {
    Reply {
        id: comment.id,
        content: comment.body,
        timestamp: at,
        user_id: 0,
        user_name: comment.email,
    }
}

pub fn query_from_remote(
    post: RemotePost,
    author_name: String,
    replies: Vec<Reply>,
    at: DateTime<Utc>,
) -> Query {
    Query {
        id: post.id,
        title: post.title,
        content: post.body,
        timestamp: at,
        user_id: post.user_id,
        user_name: author_name,
        replies,
    }
}

/// Join posts with their comments (remote order kept) and their authors' names.
pub fn queries_from_remote(
    posts: Vec<RemotePost>,
    comments: Vec<RemoteComment>,
    users: &[RemoteUser],
    at: DateTime<Utc>,
) -> Vec<Query> {
    let names: HashMap<EntityId, &str> = users.iter().map(|u| (u.id, u.name.as_str())).collect();

    let mut by_post: HashMap<EntityId, Vec<Reply>> = HashMap::new();
    for comment in comments {
        by_post
            .entry(comment.post_id)
            .or_default()
            .push(reply_from_remote(comment, at));
    }

    posts
        .into_iter()
        .map(|post| {
            let author = names
                .get(&post.user_id)
                .map(|n| n.to_string())
                .unwrap_or_else(|| format!("User {}", post.user_id));
            let replies = by_post.remove(&post.id).unwrap_or_default();
            query_from_remote(post, author, replies, at)
        })
        .collect()
}
