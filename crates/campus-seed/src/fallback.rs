//! Fixed seed data used whenever the remote source is unavailable.

use campus_types::models::{Faculty, Query, User};

use crate::mapping::SEED_ROLE;

pub fn faculties() -> Vec<Faculty> {
    vec![
        faculty(1, "Dr. Robert Smith", "React Fundamentals", "Computer Science", "robert.smith", "555-0101"),
        faculty(2, "Prof. Maria Johnson", "Advanced JavaScript", "Software Engineering", "maria.johnson", "555-0102"),
        faculty(3, "Dr. James Wilson", "Web Development", "Information Technology", "james.wilson", "555-0103"),
    ]
}

/// Fallback accounts. All share the configured seed password.
pub fn users(password: &str) -> Vec<User> {
    [
        (1, "adi", "Adinath Panchal"),
        (2, "sai", "Sai Upase"),
        (3, "shweta", "Shweta Jadhav"),
    ]
    .into_iter()
    .map(|(id, username, name)| User {
        id,
        username: username.to_string(),
        password: password.to_string(),
        role: SEED_ROLE.to_string(),
        name: name.to_string(),
    })
    .collect()
}

/// The forum starts empty without a remote.
pub fn queries() -> Vec<Query> {
    Vec::new()
}

fn faculty(id: u64, name: &str, subject: &str, department: &str, mailbox: &str, phone: &str) -> Faculty {
    Faculty {
        id,
        name: name.to_string(),
        subject: subject.to_string(),
        department: department.to_string(),
        email: format!("{}@campus.edu", mailbox),
        phone: phone.to_string(),
    }
}
