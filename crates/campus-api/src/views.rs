//! Derived projections over in-memory collections. None of these mutate
//! their input.

use campus_types::api::SortOrder;
use campus_types::models::{Faculty, Query};

/// Case-insensitive substring match on title or content. Blank search keeps all.
pub fn filter_queries(queries: &[Query], search: &str) -> Vec<Query> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return queries.to_vec();
    }

    queries
        .iter()
        .filter(|q| {
            q.title.to_lowercase().contains(&needle) || q.content.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Stable: queries that compare equal keep their original relative order.
pub fn sort_queries(queries: &[Query], order: SortOrder) -> Vec<Query> {
    let mut sorted = queries.to_vec();
    match order {
        SortOrder::Newest => sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortOrder::Oldest => sorted.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
        SortOrder::MostReplies => sorted.sort_by(|a, b| b.replies.len().cmp(&a.replies.len())),
    }
    sorted
}

/// Exact subject match. Blank subject keeps all.
pub fn filter_faculties(faculties: &[Faculty], subject: &str) -> Vec<Faculty> {
    if subject.is_empty() {
        return faculties.to_vec();
    }
    faculties.iter().filter(|f| f.subject == subject).cloned().collect()
}

/// Distinct subjects in first-seen order.
pub fn subjects(faculties: &[Faculty]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for f in faculties {
        if !seen.contains(&f.subject) {
            seen.push(f.subject.clone());
        }
    }
    seen
}

/// The first `n` queries of a newest-first collection.
pub fn recent_queries(queries: &[Query], n: usize) -> &[Query] {
    &queries[..queries.len().min(n)]
}

/// Truncate to `max_chars` characters, marking the cut with an ellipsis.
pub fn preview(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}
