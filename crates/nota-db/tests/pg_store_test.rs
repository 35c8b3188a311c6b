//! Integration tests for `PgNoteStore`.
//!
//! These require a running PostgreSQL with the migrations applied and are
//! ignored by default. Run with:
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/nota_test cargo test -p nota-db -- --ignored
//! ```

use nota_core::{CreateNoteRequest, Error, ListFilter, NoteStore, UpdateNoteRequest};
use nota_db::Database;
use uuid::Uuid;

async fn connect() -> Database {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/nota_test".to_string());
    Database::connect(&url).await.expect("database connection")
}

fn req(title: &str) -> CreateNoteRequest {
    CreateNoteRequest {
        title: title.to_string(),
        content: "integration body".to_string(),
        tags: vec!["Test".to_string(), "test".to_string()],
        is_pinned: false,
    }
}

#[tokio::test]
#[ignore]
async fn test_create_fetch_round_trip() {
    let db = connect().await;
    let created = db.notes.create(req("pg round trip")).await.unwrap();

    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(created.tags, vec!["test".to_string()]);

    let fetched = db.notes.get(created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.title, created.title);
    assert_eq!(fetched.tags, created.tags);

    db.notes.purge(created.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_update_preserves_created_at() {
    let db = connect().await;
    let created = db.notes.create(req("pg update")).await.unwrap();

    let updated = db
        .notes
        .update(
            created.id,
            UpdateNoteRequest {
                content: Some("changed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.content, "changed");

    db.notes.purge(created.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_trash_lifecycle() {
    let db = connect().await;
    let created = db.notes.create(req("pg trash")).await.unwrap();

    db.notes.delete(created.id).await.unwrap();
    assert!(db.notes.get(created.id).await.unwrap().is_trashed());

    let trash = db.notes.list(ListFilter::Trash).await.unwrap();
    assert!(trash.iter().any(|n| n.id == created.id));

    db.notes.restore(created.id).await.unwrap();
    let restored = db.notes.get(created.id).await.unwrap();
    assert!(!restored.is_trashed());

    // Restoring an already-restored note is a no-op
    db.notes.restore(created.id).await.unwrap();
    let again = db.notes.get(created.id).await.unwrap();
    assert_eq!(again.updated_at, restored.updated_at);

    db.notes.purge(created.id).await.unwrap();
    let err = db.notes.get(created.id).await.unwrap_err();
    assert!(matches!(err, Error::NoteNotFound(_)));
}

#[tokio::test]
#[ignore]
async fn test_get_unknown_id_is_not_found() {
    let db = connect().await;
    let err = db.notes.get(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, Error::NoteNotFound(_)));
}
