//! # nota-client
//!
//! Client library for nota: fetches the full note collection once, mirrors
//! it in memory and in a local cache slot, and derives filtered/sorted/
//! grouped views locally. Mutations go to the server first; only confirmed
//! writes touch the mirror.
//!
//! Offline behavior: if the initial fetch fails the client falls back to
//! its cache (when present) and serves stale data read-only until the next
//! successful reload. Concurrent writers are last-write-wins; there is no
//! version token.

pub mod api;
pub mod cache;
pub mod view;

pub use api::ApiClient;
pub use cache::CacheSlot;
pub use view::{
    derive_view, preview_text, tag_vocabulary, NoteView, SortField, SortOrder, TagFilter,
    ViewState, TAG_FILTER_ALL,
};

use std::path::Path;

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use nota_core::{CreateNoteRequest, Error, ListFilter, Note, Result, UpdateNoteRequest};

/// Local mirror of the note collection.
pub struct NotesClient {
    api: ApiClient,
    cache: CacheSlot,
    notes: Vec<Note>,
    read_only: bool,
}

impl NotesClient {
    /// Create a client for the given server base URL, backed by a cache
    /// file at `cache_path`.
    pub fn new(base_url: impl Into<String>, cache_path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(base_url)?,
            cache: CacheSlot::new(cache_path),
            notes: Vec::new(),
            read_only: false,
        })
    }

    /// Fetch the full collection and mirror it.
    ///
    /// On a network failure the cached copy (if any) is served instead and
    /// the client becomes read-only; without a cache the fetch error
    /// propagates.
    pub async fn load(&mut self) -> Result<()> {
        match self.api.list(ListFilter::All).await {
            Ok(notes) => {
                self.notes = notes;
                self.read_only = false;
                self.persist_cache();
                Ok(())
            }
            Err(Error::Request(msg)) => {
                if !self.cache.exists() {
                    return Err(Error::Request(msg));
                }
                warn!(error = %msg, "Fetch failed; serving cached notes read-only");
                self.notes = self.cache.load()?;
                self.read_only = true;
                Ok(())
            }
            Err(other) => Err(other),
        }
    }

    /// The full mirrored collection, trash included.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// True while serving stale cached data after a failed fetch.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Notes for the main list view.
    pub fn active_notes(&self) -> Vec<Note> {
        self.scoped(ListFilter::Active)
    }

    /// Notes for the archive view.
    pub fn archived_notes(&self) -> Vec<Note> {
        self.scoped(ListFilter::Archived)
    }

    /// Notes for the trash view.
    pub fn trashed_notes(&self) -> Vec<Note> {
        self.scoped(ListFilter::Trash)
    }

    fn scoped(&self, filter: ListFilter) -> Vec<Note> {
        self.notes
            .iter()
            .filter(|n| n.matches_filter(filter))
            .cloned()
            .collect()
    }

    /// Create a note on the server, then mirror it.
    pub async fn create(&mut self, req: CreateNoteRequest) -> Result<Note> {
        self.ensure_writable()?;
        let note = self.api.create(&req).await?;
        self.notes.push(note.clone());
        self.persist_cache();
        Ok(note)
    }

    /// Update a note on the server, then replace the mirrored record.
    pub async fn update(&mut self, id: Uuid, req: UpdateNoteRequest) -> Result<Note> {
        self.ensure_writable()?;
        let note = self.api.update(id, &req).await?;
        self.replace(note.clone());
        self.persist_cache();
        Ok(note)
    }

    /// Flip a note's pin flag, server first.
    pub async fn toggle_pin(&mut self, id: Uuid) -> Result<Note> {
        let current = self
            .notes
            .iter()
            .find(|n| n.id == id)
            .ok_or(Error::NoteNotFound(id))?;
        let req = UpdateNoteRequest {
            is_pinned: Some(!current.is_pinned),
            ..Default::default()
        };
        self.update(id, req).await
    }

    /// Archive or unarchive a note, server first.
    pub async fn set_archived(&mut self, id: Uuid, archived: bool) -> Result<Note> {
        let req = UpdateNoteRequest {
            is_archived: Some(archived),
            ..Default::default()
        };
        self.update(id, req).await
    }

    /// Move a note to the trash, server first.
    ///
    /// The mirrored record keeps a locally stamped trash marker until the
    /// next reload replaces it with the server's.
    pub async fn delete(&mut self, id: Uuid) -> Result<()> {
        self.ensure_writable()?;
        self.api.delete(id).await?;
        if let Some(note) = self.notes.iter_mut().find(|n| n.id == id) {
            let now = Utc::now();
            note.deleted_at = Some(now);
            note.updated_at = now;
        }
        self.persist_cache();
        Ok(())
    }

    /// Restore a trashed note, server first.
    pub async fn restore(&mut self, id: Uuid) -> Result<()> {
        self.ensure_writable()?;
        self.api.restore(id).await?;
        if let Some(note) = self.notes.iter_mut().find(|n| n.id == id) {
            note.deleted_at = None;
            note.updated_at = Utc::now();
        }
        self.persist_cache();
        Ok(())
    }

    /// Permanently delete a note, server first.
    pub async fn purge(&mut self, id: Uuid) -> Result<()> {
        self.ensure_writable()?;
        self.api.purge(id).await?;
        self.notes.retain(|n| n.id != id);
        self.persist_cache();
        Ok(())
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(Error::Request(
                "Client is read-only while serving cached data; reload first".to_string(),
            ));
        }
        Ok(())
    }

    fn replace(&mut self, note: Note) {
        if let Some(slot) = self.notes.iter_mut().find(|n| n.id == note.id) {
            *slot = note;
        } else {
            self.notes.push(note);
        }
    }

    /// Best-effort cache rewrite. A failed write never undoes a confirmed
    /// server mutation.
    fn persist_cache(&self) {
        if let Err(e) = self.cache.store(&self.notes) {
            warn!(error = %e, "Failed to write note cache");
        }
    }
}
