//! PostgreSQL note store implementation.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use nota_core::{
    apply_update, new_note, CreateNoteRequest, Error, ListFilter, Note, NoteStore, Result,
    UpdateNoteRequest,
};

/// PostgreSQL implementation of `NoteStore`.
#[derive(Clone)]
pub struct PgNoteStore {
    pool: Pool<Postgres>,
}

impl PgNoteStore {
    /// Create a new PgNoteStore with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Build the WHERE clause for a list scope.
fn filter_clause(filter: ListFilter) -> &'static str {
    match filter {
        ListFilter::All => "TRUE",
        ListFilter::Active => "n.is_archived = FALSE AND n.deleted_at IS NULL",
        ListFilter::Pinned => {
            "n.is_pinned = TRUE AND n.is_archived = FALSE AND n.deleted_at IS NULL"
        }
        ListFilter::Archived => "n.is_archived = TRUE AND n.deleted_at IS NULL",
        ListFilter::Trash => "n.deleted_at IS NOT NULL",
    }
}

/// Map a database row to a `Note`.
fn map_row(row: sqlx::postgres::PgRow) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        tags: row.get("tags"),
        is_pinned: row.get("is_pinned"),
        is_archived: row.get("is_archived"),
        deleted_at: row.get::<Option<DateTime<Utc>>, _>("deleted_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const NOTE_COLUMNS: &str =
    "n.id, n.title, n.content, n.tags, n.is_pinned, n.is_archived, n.deleted_at, \
     n.created_at, n.updated_at";

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn create(&self, req: CreateNoteRequest) -> Result<Note> {
        let note = new_note(req)?;

        sqlx::query(
            "INSERT INTO note (id, title, content, tags, is_pinned, is_archived, deleted_at, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(note.id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(&note.tags)
        .bind(note.is_pinned)
        .bind(note.is_archived)
        .bind(note.deleted_at)
        .bind(note.created_at)
        .bind(note.updated_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(note_id = %note.id, op = "create", "Note stored");
        Ok(note)
    }

    async fn list(&self, filter: ListFilter) -> Result<Vec<Note>> {
        // UUIDv7 ids are time-ordered; created_at is the tie-break for
        // records inserted within the same millisecond.
        let query = format!(
            "SELECT {} FROM note n WHERE {} ORDER BY n.created_at, n.id",
            NOTE_COLUMNS,
            filter_clause(filter)
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows.into_iter().map(map_row).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Note> {
        let query = format!("SELECT {} FROM note n WHERE n.id = $1", NOTE_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.map(map_row).ok_or(Error::NoteNotFound(id))
    }

    async fn update(&self, id: Uuid, req: UpdateNoteRequest) -> Result<Note> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let query = format!(
            "SELECT {} FROM note n WHERE n.id = $1 FOR UPDATE",
            NOTE_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(Error::Database)?;

        let mut note = row.map(map_row).ok_or(Error::NoteNotFound(id))?;
        apply_update(&mut note, req)?;

        sqlx::query(
            "UPDATE note SET title = $1, content = $2, tags = $3, is_pinned = $4,
                    is_archived = $5, updated_at = $6
             WHERE id = $7",
        )
        .bind(&note.title)
        .bind(&note.content)
        .bind(&note.tags)
        .bind(note.is_pinned)
        .bind(note.is_archived)
        .bind(note.updated_at)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;
        Ok(note)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE note SET deleted_at = $1, updated_at = $1 WHERE id = $2 AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            // Either absent or already trashed; distinguish for the caller.
            if self.exists(id).await? {
                return Ok(());
            }
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }

    async fn restore(&self, id: Uuid) -> Result<()> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE note SET deleted_at = NULL, updated_at = $1 WHERE id = $2 AND deleted_at IS NOT NULL",
        )
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            // Either absent or not trashed; distinguish for the caller.
            if self.exists(id).await? {
                return Ok(());
            }
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }

    async fn purge(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM note WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }

    async fn purge_expired(&self, retention: Duration) -> Result<u64> {
        let cutoff = Utc::now() - retention;
        let result =
            sqlx::query("DELETE FROM note WHERE deleted_at IS NOT NULL AND deleted_at < $1")
                .bind(cutoff)
                .execute(&self.pool)
                .await
                .map_err(Error::Database)?;

        let purged = result.rows_affected();
        if purged > 0 {
            debug!(op = "purge_expired", purged, "Expired trash removed");
        }
        Ok(purged)
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM note WHERE id = $1) AS present")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.get("present"))
    }
}
