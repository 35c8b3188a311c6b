//! Core data model for nota.
//!
//! The wire format is camelCase JSON (`isPinned`, `createdAt`, ...) with a
//! plain `id` field, matching what browser clients persist in their local
//! cache slot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::tags::normalize_tags;

/// Maximum title length accepted by validation.
pub const MAX_TITLE_LEN: usize = 100;

/// Maximum content length accepted by validation.
pub const MAX_CONTENT_LEN: usize = 5000;

/// A single user-authored text record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// UUIDv7, assigned by the store at creation. Immutable.
    pub id: Uuid,
    /// Required, trimmed, non-empty.
    pub title: String,
    /// May be empty.
    #[serde(default)]
    pub content: String,
    /// Normalized: trimmed, lowercased, deduplicated, insertion order kept.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Flagged for priority display above other notes.
    #[serde(default)]
    pub is_pinned: bool,
    /// Hidden from the main list view without being trashed.
    #[serde(default)]
    pub is_archived: bool,
    /// Trash marker. `Some` means the note awaits restore or purge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Set once at creation, never changes.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful mutation. Always >= created_at.
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// True if the note is in the trash.
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// True if the note belongs to the given list scope.
    pub fn matches_filter(&self, filter: ListFilter) -> bool {
        match filter {
            ListFilter::All => true,
            ListFilter::Active => !self.is_archived && !self.is_trashed(),
            ListFilter::Pinned => self.is_pinned && !self.is_archived && !self.is_trashed(),
            ListFilter::Archived => self.is_archived && !self.is_trashed(),
            ListFilter::Trash => self.is_trashed(),
        }
    }
}

/// Scope selector for listing notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListFilter {
    /// Every record, trash included. Mirroring clients fetch this.
    #[default]
    All,
    /// Not archived, not trashed.
    Active,
    /// Pinned subset of the active scope.
    Pinned,
    /// Archived, not trashed.
    Archived,
    /// Trashed records only.
    Trash,
}

impl std::fmt::Display for ListFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Active => write!(f, "active"),
            Self::Pinned => write!(f, "pinned"),
            Self::Archived => write!(f, "archived"),
            Self::Trash => write!(f, "trash"),
        }
    }
}

impl std::str::FromStr for ListFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "pinned" => Ok(Self::Pinned),
            "archived" => Ok(Self::Archived),
            "trash" | "deleted" => Ok(Self::Trash),
            other => Err(Error::InvalidInput(format!("Invalid filter: {}", other))),
        }
    }
}

/// Request for creating a new note.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_pinned: bool,
}

/// Request for partially updating a note. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_pinned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
}

impl UpdateNoteRequest {
    /// True if no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.tags.is_none()
            && self.is_pinned.is_none()
            && self.is_archived.is_none()
    }
}

/// Validate and trim a note title.
///
/// Both creation and edit paths go through here so the rules cannot diverge.
pub fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("Title is required".to_string()));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(Error::InvalidInput(format!(
            "Title must be at most {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate note content.
pub fn validate_content(content: &str) -> Result<()> {
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(Error::InvalidInput(format!(
            "Content must be at most {} characters",
            MAX_CONTENT_LEN
        )));
    }
    Ok(())
}

/// Build a fully validated `Note` from a create request.
///
/// Assigns a time-ordered UUIDv7 id and sets both timestamps to the same
/// instant, so `created_at == updated_at` holds at creation.
pub fn new_note(req: CreateNoteRequest) -> Result<Note> {
    let title = validate_title(&req.title)?;
    validate_content(&req.content)?;
    let now = Utc::now();
    Ok(Note {
        id: Uuid::now_v7(),
        title,
        content: req.content,
        tags: normalize_tags(&req.tags),
        is_pinned: req.is_pinned,
        is_archived: false,
        deleted_at: None,
        created_at: now,
        updated_at: now,
    })
}

/// Merge an update request onto an existing note, refreshing `updated_at`.
///
/// An empty request is accepted and leaves the note untouched, timestamp
/// included. Provided fields are re-validated and re-normalized with the
/// same helpers the creation path uses.
pub fn apply_update(note: &mut Note, req: UpdateNoteRequest) -> Result<()> {
    if req.is_empty() {
        return Ok(());
    }
    if let Some(title) = &req.title {
        note.title = validate_title(title)?;
    }
    if let Some(content) = req.content {
        validate_content(&content)?;
        note.content = content;
    }
    if let Some(tags) = &req.tags {
        note.tags = normalize_tags(tags);
    }
    if let Some(pinned) = req.is_pinned {
        note.is_pinned = pinned;
    }
    if let Some(archived) = req.is_archived {
        note.is_archived = archived;
    }
    note.updated_at = Utc::now();
    Ok(())
}
