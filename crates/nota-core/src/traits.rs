//! Core traits for nota abstractions.
//!
//! `NoteStore` is the persistence boundary: callers receive it injected
//! (typically as `Arc<dyn NoteStore>`) instead of reaching for ambient
//! state, which keeps backends pluggable and handlers testable.

use async_trait::async_trait;
use chrono::Duration;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{CreateNoteRequest, ListFilter, Note, UpdateNoteRequest};

/// Store for note records.
///
/// Every mutating call writes through to storage before returning; there is
/// no batching and no cross-note transaction. Deletion is flag-based:
/// `delete` moves a note to the trash, `restore` brings it back, and only
/// `purge` (or the retention reaper via `purge_expired`) removes a record
/// for good.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Validate, persist, and return a new note.
    ///
    /// Fails with `Error::InvalidInput` if the title is empty after
    /// trimming. The stored record has `created_at == updated_at`.
    async fn create(&self, req: CreateNoteRequest) -> Result<Note>;

    /// List notes in the given scope, in creation order.
    async fn list(&self, filter: ListFilter) -> Result<Vec<Note>>;

    /// Fetch a note by id. `Error::NoteNotFound` if absent.
    async fn get(&self, id: Uuid) -> Result<Note>;

    /// Merge the provided fields onto an existing note, refresh
    /// `updated_at`, persist, and return the merged record. An empty
    /// request is a no-op that returns the record unchanged.
    async fn update(&self, id: Uuid, req: UpdateNoteRequest) -> Result<Note>;

    /// Move a note to the trash (sets the `deleted_at` marker).
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Restore a trashed note. A note that is not trashed is left
    /// untouched.
    async fn restore(&self, id: Uuid) -> Result<()>;

    /// Permanently remove a note.
    async fn purge(&self, id: Uuid) -> Result<()>;

    /// Permanently remove trashed notes older than `retention`.
    ///
    /// Returns the number of records removed. Called periodically by the
    /// trash reaper.
    async fn purge_expired(&self, retention: Duration) -> Result<u64>;

    /// Check whether a note exists (trashed records count as existing).
    async fn exists(&self, id: Uuid) -> Result<bool>;
}
