//! Local cache slot.
//!
//! One file holding the serialized note array — the desktop analog of the
//! browser's single local-storage key. Entries are plain serde copies with
//! no schema versioning; a stale or unreadable file is treated as absent.

use std::fs;
use std::path::{Path, PathBuf};

use nota_core::{Note, Result};

/// File-backed cache of the full note collection.
#[derive(Debug, Clone)]
pub struct CacheSlot {
    path: PathBuf,
}

impl CacheSlot {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// True if a cached copy exists on disk.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the cached collection.
    pub fn load(&self) -> Result<Vec<Note>> {
        let bytes = fs::read(&self.path)?;
        let notes = serde_json::from_slice(&bytes)?;
        Ok(notes)
    }

    /// Overwrite the cache with the given collection.
    pub fn store(&self, notes: &[Note]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec(notes)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}
