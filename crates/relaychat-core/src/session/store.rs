//! Durable slot holding the serialized group snapshot.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::debug;

/// A single named slot that stores the whole snapshot as text.
pub trait SnapshotStore: Send {
    /// Read the stored snapshot, or `None` if the slot is empty.
    fn load(&self) -> std::io::Result<Option<String>>;

    /// Overwrite the slot.
    fn save(&self, snapshot: &str) -> std::io::Result<()>;

    /// Empty the slot. Erasing an empty slot is not an error.
    fn erase(&self) -> std::io::Result<()>;
}

// ─────────────────────────────────────────────
// File-backed store
// ─────────────────────────────────────────────

/// Snapshot stored in one JSON file, replaced atomically on save.
#[derive(Clone, Debug)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> std::io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, snapshot: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, snapshot)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), bytes = snapshot.len(), "snapshot saved");
        Ok(())
    }

    fn erase(&self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "snapshot erased");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

// ─────────────────────────────────────────────
// In-memory store
// ─────────────────────────────────────────────

/// Snapshot kept in memory. Clones share the same slot, so a test can keep
/// a handle and inspect what the session wrote.
#[derive(Clone, Debug, Default)]
pub struct MemorySnapshotStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `snapshot` already in the slot.
    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(snapshot.into()))),
        }
    }

    /// Current slot contents.
    pub fn contents(&self) -> Option<String> {
        self.slot.lock().map(|s| (*s).clone()).unwrap_or(None)
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> std::io::Result<Option<String>> {
        Ok(self.contents())
    }

    fn save(&self, snapshot: &str) -> std::io::Result<()> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(snapshot.to_string());
        }
        Ok(())
    }

    fn erase(&self) -> std::io::Result<()> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
        Ok(())
    }
}
