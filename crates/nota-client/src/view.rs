//! View derivation: the filter → sort → partition pipeline.
//!
//! Everything here is pure. The client fetches the collection once, then
//! re-derives the rendered view locally on every control change with no
//! further server calls.

use nota_core::Note;

/// Sentinel tag meaning "no tag filter".
pub const TAG_FILTER_ALL: &str = "all";

/// Tag filter control state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagFilter {
    /// Show notes regardless of tags.
    #[default]
    All,
    /// Show only notes carrying this (normalized) tag.
    Tag(String),
}

impl TagFilter {
    /// Parse the value of the tag filter control.
    pub fn parse(value: &str) -> Self {
        match nota_core::normalize_tag(value) {
            Some(tag) if tag != TAG_FILTER_ALL => Self::Tag(tag),
            _ => Self::All,
        }
    }

    fn matches(&self, note: &Note) -> bool {
        match self {
            Self::All => true,
            Self::Tag(tag) => note.tags.iter().any(|t| t == tag),
        }
    }
}

/// Sort field control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    /// Sort by `updated_at`.
    #[default]
    Date,
    /// Sort by title, case-insensitively.
    Title,
}

/// Sort direction control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    /// Newest first; the default for a notes list.
    #[default]
    Desc,
}

/// User-controlled view state: search term, tag filter, sort.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub search: String,
    pub tag: TagFilter,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

/// The derived view: pinned notes first, the rest after, each group in the
/// active sort order.
#[derive(Debug, Clone, Default)]
pub struct NoteView {
    pub pinned: Vec<Note>,
    pub others: Vec<Note>,
}

impl NoteView {
    /// Total notes in the view.
    pub fn len(&self) -> usize {
        self.pinned.len() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pinned.is_empty() && self.others.is_empty()
    }

    /// The view flattened back into one sequence, pinned group first.
    pub fn flattened(&self) -> Vec<Note> {
        self.pinned.iter().chain(self.others.iter()).cloned().collect()
    }
}

fn matches_search(note: &Note, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    note.title.to_lowercase().contains(needle) || note.content.to_lowercase().contains(needle)
}

/// Derive the rendered view from the collection and the control state.
///
/// 1. Filter by search term (case-insensitive substring of title or
///    content) and tag.
/// 2. Sort by `updated_at` or title; the sort is stable, so notes that
///    compare equal keep their input order.
/// 3. Stable-partition into pinned and other groups.
pub fn derive_view(notes: &[Note], state: &ViewState) -> NoteView {
    let needle = state.search.trim().to_lowercase();

    let mut filtered: Vec<Note> = notes
        .iter()
        .filter(|n| matches_search(n, &needle) && state.tag.matches(n))
        .cloned()
        .collect();

    filtered.sort_by(|a, b| {
        let ordering = match state.sort_by {
            SortField::Date => a.updated_at.cmp(&b.updated_at),
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        };
        match state.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    let (pinned, others) = filtered.into_iter().partition(|n| n.is_pinned);
    NoteView { pinned, others }
}

/// Tag vocabulary for the filter control: the "all" sentinel followed by
/// every distinct tag across the collection, in first-seen order.
pub fn tag_vocabulary(notes: &[Note]) -> Vec<String> {
    let mut vocab = vec![TAG_FILTER_ALL.to_string()];
    for note in notes {
        for tag in &note.tags {
            if !tag.is_empty() && !vocab.iter().any(|t| t == tag) {
                vocab.push(tag.clone());
            }
        }
    }
    vocab
}

/// Truncated content preview for card rendering.
pub fn preview_text(content: &str, max_len: usize) -> String {
    if content.chars().count() <= max_len {
        return content.to_string();
    }
    let truncated: String = content.chars().take(max_len).collect();
    format!("{}...", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use nota_core::{new_note, CreateNoteRequest};

    fn note(title: &str, content: &str, tags: &[&str], pinned: bool) -> Note {
        new_note(CreateNoteRequest {
            title: title.to_string(),
            content: content.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            is_pinned: pinned,
        })
        .unwrap()
    }

    fn titles(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|n| n.title.as_str()).collect()
    }

    #[test]
    fn test_empty_search_and_all_tag_keeps_everything() {
        let notes = vec![
            note("a", "", &[], false),
            note("b", "", &[], false),
            note("c", "", &[], false),
        ];
        let view = derive_view(&notes, &ViewState::default());
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn test_search_matches_title_or_content_case_insensitively() {
        let notes = vec![
            note("Rust patterns", "", &[], false),
            note("journal", "learning RUST today", &[], false),
            note("groceries", "milk", &[], false),
        ];
        let state = ViewState {
            search: "rust".to_string(),
            ..Default::default()
        };
        let view = derive_view(&notes, &state);
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_tag_filter_requires_membership() {
        let notes = vec![
            note("tagged", "", &["work"], false),
            note("other", "", &["home"], false),
            note("untagged", "", &[], false),
        ];
        let state = ViewState {
            tag: TagFilter::Tag("work".to_string()),
            ..Default::default()
        };
        let view = derive_view(&notes, &state);
        assert_eq!(titles(&view.others), vec!["tagged"]);
    }

    #[test]
    fn test_title_sort_asc_is_locale_insensitive_to_case() {
        let notes = vec![
            note("Banana", "", &[], false),
            note("apple", "", &[], false),
            note("Cherry", "", &[], false),
        ];
        let state = ViewState {
            sort_by: SortField::Title,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let view = derive_view(&notes, &state);
        assert_eq!(titles(&view.others), vec!["apple", "Banana", "Cherry"]);
    }

    #[test]
    fn test_date_sort_desc_puts_newest_first() {
        let mut old = note("old", "", &[], false);
        old.updated_at = Utc::now() - Duration::hours(2);
        let mut mid = note("mid", "", &[], false);
        mid.updated_at = Utc::now() - Duration::hours(1);
        let new = note("new", "", &[], false);

        let view = derive_view(&[old, mid, new], &ViewState::default());
        assert_eq!(titles(&view.others), vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_stable_tie_break_keeps_input_order() {
        let shared = Utc::now();
        let mut a = note("same", "first", &[], false);
        a.updated_at = shared;
        let mut b = note("same", "second", &[], false);
        b.updated_at = shared;

        let state = ViewState {
            sort_by: SortField::Title,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let view = derive_view(&[a.clone(), b.clone()], &state);
        assert_eq!(view.others[0].content, "first");
        assert_eq!(view.others[1].content, "second");
    }

    #[test]
    fn test_partition_reproduces_filtered_sorted_set() {
        let notes = vec![
            note("pinned one", "", &[], true),
            note("loose one", "", &[], false),
            note("pinned two", "", &[], true),
            note("loose two", "", &[], false),
        ];
        let state = ViewState {
            sort_by: SortField::Title,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let view = derive_view(&notes, &state);

        assert!(view.pinned.iter().all(|n| n.is_pinned));
        assert!(view.others.iter().all(|n| !n.is_pinned));

        // pinned ++ others == filtered+sorted with no dups or omissions
        let flattened = view.flattened();
        assert_eq!(flattened.len(), notes.len());
        let mut ids: Vec<_> = flattened.iter().map(|n| n.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), notes.len());

        // Within each group, the sort order is preserved
        assert_eq!(titles(&view.pinned), vec!["pinned one", "pinned two"]);
        assert_eq!(titles(&view.others), vec!["loose one", "loose two"]);
    }

    #[test]
    fn test_tag_vocabulary_has_sentinel_and_first_seen_order() {
        let notes = vec![
            note("a", "", &["work", "rust"], false),
            note("b", "", &["home", "work"], false),
        ];
        assert_eq!(tag_vocabulary(&notes), vec!["all", "work", "rust", "home"]);
    }

    #[test]
    fn test_tag_vocabulary_of_empty_collection() {
        assert_eq!(tag_vocabulary(&[]), vec!["all"]);
    }

    #[test]
    fn test_tag_filter_parse() {
        assert_eq!(TagFilter::parse("all"), TagFilter::All);
        assert_eq!(TagFilter::parse("  "), TagFilter::All);
        assert_eq!(TagFilter::parse(" Work "), TagFilter::Tag("work".to_string()));
    }

    #[test]
    fn test_preview_text_truncates_with_ellipsis() {
        assert_eq!(preview_text("short", 10), "short");
        assert_eq!(preview_text("0123456789abc", 10), "0123456789...");
    }
}
