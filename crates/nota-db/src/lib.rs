//! # nota-db
//!
//! Store backends for nota.
//!
//! This crate provides:
//! - Connection pool management
//! - `PgNoteStore`: durable PostgreSQL implementation of `NoteStore`
//! - `MemNoteStore`: in-memory implementation for development and tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use nota_db::Database;
//! use nota_core::{CreateNoteRequest, NoteStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/nota").await?;
//!
//!     let note = db.notes.create(CreateNoteRequest {
//!         title: "Hello".to_string(),
//!         content: "First note".to_string(),
//!         tags: vec!["greeting".to_string()],
//!         is_pinned: false,
//!     }).await?;
//!
//!     println!("Created note: {}", note.id);
//!     Ok(())
//! }
//! ```

pub mod memory;
pub mod notes;
pub mod pool;

// Re-export core types
pub use nota_core::*;

pub use memory::MemNoteStore;
pub use notes::PgNoteStore;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};

/// Connected PostgreSQL database with its note store.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Note store for CRUD operations.
    pub notes: PgNoteStore,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            notes: PgNoteStore::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
