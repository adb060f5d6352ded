//! Most-recently-used file tracking.
//!
//! A best-effort cache, not a source of truth: persistence failures fall
//! back to an empty list and are never surfaced.

use std::path::{Path, PathBuf};

use kino_model::FileItem;
use tokio::sync::watch;
use tracing::warn;

/// Bounded, deduplicated, most-recent-first list of opened files, persisted
/// as one absolute path per line.
pub struct MruListService {
    path: PathBuf,
    capacity: usize,
    items_tx: watch::Sender<Vec<FileItem>>,
}

impl MruListService {
    pub const DEFAULT_CAPACITY: usize = 10;

    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = load_items(&path, Self::DEFAULT_CAPACITY);
        Self {
            path,
            capacity: Self::DEFAULT_CAPACITY,
            items_tx: watch::Sender::new(items),
        }
    }

    pub fn items(&self) -> watch::Receiver<Vec<FileItem>> {
        self.items_tx.subscribe()
    }

    /// Moves `file` to the front, deduplicating by path and truncating to
    /// capacity. Persists synchronously.
    pub fn add(&self, file: impl AsRef<Path>) {
        let file = file.as_ref();
        let mut items = self.items_tx.borrow().clone();
        items.retain(|item| !item.matches_path(file));
        items.insert(0, FileItem::new(file));
        items.truncate(self.capacity);
        self.items_tx.send_replace(items);
        self.save();
    }

    pub fn remove(&self, file: impl AsRef<Path>) {
        let file = file.as_ref();
        let mut items = self.items_tx.borrow().clone();
        let before = items.len();
        items.retain(|item| !item.matches_path(file));
        if items.len() != before {
            items.truncate(self.capacity);
            self.items_tx.send_replace(items);
        }
        self.save();
    }

    fn save(&self) {
        let mut contents = String::new();
        for item in self.items_tx.borrow().iter().take(self.capacity) {
            contents.push_str(&item.full_path().to_string_lossy());
            contents.push('\n');
        }
        if let Err(err) = std::fs::write(&self.path, contents) {
            warn!(path = %self.path.display(), %err, "failed to persist MRU list");
        }
    }
}

fn load_items(path: &Path, capacity: usize) -> Vec<FileItem> {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return Vec::new();
    };

    contents
        .lines()
        .filter(|line| !line.is_empty() && Path::new(line).is_file())
        .map(FileItem::new)
        .take(capacity)
        .collect()
}
