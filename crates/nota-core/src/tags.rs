//! Tag normalization.
//!
//! Creation and edit paths share one normalization routine so the two can
//! never drift apart: trim, lowercase, drop empties, deduplicate while
//! keeping first-seen order (tags are displayed in insertion order).

use std::collections::HashSet;

/// Normalize a list of user-supplied tags.
///
/// Returns the tags trimmed, lowercased, with empty strings removed and
/// duplicates collapsed. First occurrence wins, so display order follows
/// the order the user typed.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for tag in tags {
        let normalized = tag.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            continue;
        }
        if seen.insert(normalized.clone()) {
            result.push(normalized);
        }
    }
    result
}

/// Normalize a single tag. Returns `None` if it normalizes to empty.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let normalized = tag.trim().to_lowercase();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}
