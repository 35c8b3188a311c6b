//! In-memory note store.
//!
//! Keeps the whole collection in an `RwLock<Vec<Note>>`, preserving
//! insertion order. Used as the dev backend and by handler tests; persists
//! nothing across restarts.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use nota_core::{
    apply_update, new_note, CreateNoteRequest, Error, ListFilter, Note, NoteStore, Result,
    UpdateNoteRequest,
};

/// In-memory implementation of `NoteStore`.
#[derive(Default)]
pub struct MemNoteStore {
    notes: RwLock<Vec<Note>>,
}

impl MemNoteStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with notes (test fixtures).
    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self {
            notes: RwLock::new(notes),
        }
    }
}

#[async_trait]
impl NoteStore for MemNoteStore {
    async fn create(&self, req: CreateNoteRequest) -> Result<Note> {
        let note = new_note(req)?;
        self.notes.write().await.push(note.clone());
        Ok(note)
    }

    async fn list(&self, filter: ListFilter) -> Result<Vec<Note>> {
        let notes = self.notes.read().await;
        Ok(notes
            .iter()
            .filter(|n| n.matches_filter(filter))
            .cloned()
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<Note> {
        let notes = self.notes.read().await;
        notes
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(Error::NoteNotFound(id))
    }

    async fn update(&self, id: Uuid, req: UpdateNoteRequest) -> Result<Note> {
        let mut notes = self.notes.write().await;
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(Error::NoteNotFound(id))?;
        apply_update(note, req)?;
        Ok(note.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut notes = self.notes.write().await;
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(Error::NoteNotFound(id))?;
        if note.deleted_at.is_none() {
            let now = Utc::now();
            note.deleted_at = Some(now);
            note.updated_at = now;
        }
        Ok(())
    }

    async fn restore(&self, id: Uuid) -> Result<()> {
        let mut notes = self.notes.write().await;
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(Error::NoteNotFound(id))?;
        if note.deleted_at.is_some() {
            note.deleted_at = None;
            note.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn purge(&self, id: Uuid) -> Result<()> {
        let mut notes = self.notes.write().await;
        let before = notes.len();
        notes.retain(|n| n.id != id);
        if notes.len() == before {
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }

    async fn purge_expired(&self, retention: Duration) -> Result<u64> {
        let cutoff = Utc::now() - retention;
        let mut notes = self.notes.write().await;
        let before = notes.len();
        notes.retain(|n| match n.deleted_at {
            Some(deleted_at) => deleted_at >= cutoff,
            None => true,
        });
        Ok((before - notes.len()) as u64)
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        let notes = self.notes.read().await;
        Ok(notes.iter().any(|n| n.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(title: &str) -> CreateNoteRequest {
        CreateNoteRequest {
            title: title.to_string(),
            content: format!("{} content", title),
            tags: vec![],
            is_pinned: false,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemNoteStore::new();
        let created = store.create(req("first")).await.unwrap();
        assert_eq!(created.created_at, created.updated_at);

        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let store = MemNoteStore::new();
        let err = store.create(req("   ")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(store.list(ListFilter::All).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = MemNoteStore::new();
        let a = store.create(req("a")).await.unwrap();
        let b = store.create(req("b")).await.unwrap();
        let c = store.create(req("c")).await.unwrap();

        let ids: Vec<Uuid> = store
            .list(ListFilter::All)
            .await
            .unwrap()
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }

    #[tokio::test]
    async fn test_update_merges_and_bumps_updated_at() {
        let store = MemNoteStore::new();
        let note = store.create(req("original")).await.unwrap();

        let updated = store
            .update(
                note.id,
                UpdateNoteRequest {
                    content: Some("new content".to_string()),
                    is_pinned: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "original");
        assert_eq!(updated.content, "new content");
        assert!(updated.is_pinned);
        assert_eq!(updated.created_at, note.created_at);
        assert!(updated.updated_at >= note.updated_at);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let store = MemNoteStore::new();
        let err = store
            .update(Uuid::new_v4(), UpdateNoteRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoteNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_is_soft_and_restore_reverses() {
        let store = MemNoteStore::new();
        let note = store.create(req("trashable")).await.unwrap();

        store.delete(note.id).await.unwrap();
        let trashed = store.get(note.id).await.unwrap();
        assert!(trashed.is_trashed());
        assert!(store.list(ListFilter::Active).await.unwrap().is_empty());
        assert_eq!(store.list(ListFilter::Trash).await.unwrap().len(), 1);

        store.restore(note.id).await.unwrap();
        let restored = store.get(note.id).await.unwrap();
        assert!(!restored.is_trashed());
        assert_eq!(store.list(ListFilter::Active).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_restore_of_active_note_is_noop() {
        let store = MemNoteStore::new();
        let note = store.create(req("never trashed")).await.unwrap();

        store.restore(note.id).await.unwrap();
        let after = store.get(note.id).await.unwrap();
        assert!(!after.is_trashed());
        assert_eq!(after.updated_at, note.updated_at);

        let err = store.restore(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::NoteNotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_update_leaves_timestamps_alone() {
        let store = MemNoteStore::new();
        let note = store.create(req("settled")).await.unwrap();

        let after = store
            .update(note.id, UpdateNoteRequest::default())
            .await
            .unwrap();
        assert_eq!(after, note);
    }

    #[tokio::test]
    async fn test_purge_then_get_is_not_found() {
        let store = MemNoteStore::new();
        let note = store.create(req("gone")).await.unwrap();
        store.purge(note.id).await.unwrap();

        let err = store.get(note.id).await.unwrap_err();
        assert!(matches!(err, Error::NoteNotFound(_)));
        assert!(!store.exists(note.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_purge_expired_only_removes_old_trash() {
        let store = MemNoteStore::new();
        let fresh = store.create(req("fresh trash")).await.unwrap();
        store.delete(fresh.id).await.unwrap();

        let old = store.create(req("old trash")).await.unwrap();
        store.delete(old.id).await.unwrap();
        // Backdate the marker past the retention window
        {
            let mut notes = store.notes.write().await;
            let n = notes.iter_mut().find(|n| n.id == old.id).unwrap();
            n.deleted_at = Some(Utc::now() - Duration::days(40));
        }

        let kept = store.create(req("active")).await.unwrap();

        let purged = store.purge_expired(Duration::days(30)).await.unwrap();
        assert_eq!(purged, 1);
        assert!(!store.exists(old.id).await.unwrap());
        assert!(store.exists(fresh.id).await.unwrap());
        assert!(store.exists(kept.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_archive_flag_scopes_listing() {
        let store = MemNoteStore::new();
        let note = store.create(req("shelved")).await.unwrap();
        store
            .update(
                note.id,
                UpdateNoteRequest {
                    is_archived: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(store.list(ListFilter::Active).await.unwrap().is_empty());
        assert_eq!(store.list(ListFilter::Archived).await.unwrap().len(), 1);
        assert_eq!(store.list(ListFilter::All).await.unwrap().len(), 1);
    }
}
