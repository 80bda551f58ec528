//! Tag representation normalizer.
//!
//! The list endpoint serializes tags as a single comma-separated string while
//! the detail endpoint uses a sequence of discrete strings. Every conversion
//! between the two representations goes through this module; call sites must
//! not split or join tag strings themselves.

/// Splits a comma-separated tag string into discrete tags.
///
/// Each token is trimmed of surrounding whitespace, empty tokens are dropped,
/// and duplicates are suppressed while preserving the order of first
/// occurrence. Applying this to already-normalized input is a no-op.
pub fn split_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for token in raw.split(',') {
        let tag = token.trim();
        if tag.is_empty() {
            continue;
        }
        if tags.iter().any(|existing| existing == tag) {
            continue;
        }
        tags.push(tag.to_string());
    }
    tags
}

/// Joins discrete tags back into the list endpoint's serialized form.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(",")
}
