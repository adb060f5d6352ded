//! User preferences with debounced, crash-safe persistence.
//!
//! Setters publish immediately; disk writes are coalesced with a trailing
//! debounce and land via a write-temp/rename-with-backup sequence so a crash
//! mid-write never corrupts the store.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use kino_model::{Settings, Theme};
use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct SettingsOptions {
    /// Quiet period after the last change before the store hits the disk.
    pub write_debounce: Duration,
}

impl Default for SettingsOptions {
    fn default() -> Self {
        Self {
            write_debounce: Duration::from_secs(1),
        }
    }
}

/// In-memory preferences mirrored to a JSON file.
///
/// Loading never fails: a missing or malformed file yields the defaults.
pub struct SettingsService {
    path: PathBuf,
    theme_tx: watch::Sender<Theme>,
    remaining_time_tx: watch::Sender<bool>,
    dirty_tx: mpsc::UnboundedSender<()>,
    // True while the published values are ahead of the disk.
    dirty: Arc<AtomicBool>,
    writer: Mutex<Option<JoinHandle<()>>>,
}

impl SettingsService {
    /// Must run inside a tokio runtime; spawns the debounced writer task.
    pub fn new(path: impl Into<PathBuf>, opts: SettingsOptions) -> Self {
        let path = path.into();
        let settings = load(&path);

        let theme_tx = watch::Sender::new(settings.theme);
        let remaining_time_tx = watch::Sender::new(settings.remaining_time);
        let (dirty_tx, dirty_rx) = mpsc::unbounded_channel();
        let dirty = Arc::new(AtomicBool::new(false));

        let writer = tokio::spawn(write_loop(
            dirty_rx,
            path.clone(),
            theme_tx.subscribe(),
            remaining_time_tx.subscribe(),
            opts.write_debounce,
            Arc::clone(&dirty),
        ));

        Self {
            path,
            theme_tx,
            remaining_time_tx,
            dirty_tx,
            dirty,
            writer: Mutex::new(Some(writer)),
        }
    }

    pub fn theme(&self) -> watch::Receiver<Theme> {
        self.theme_tx.subscribe()
    }

    pub fn remaining_time(&self) -> watch::Receiver<bool> {
        self.remaining_time_tx.subscribe()
    }

    /// Publishes immediately; the disk write follows after the debounce
    /// window closes. A value equal to the current one neither notifies
    /// subscribers nor dirties the store.
    pub fn set_theme(&self, theme: Theme) {
        let modified = self.theme_tx.send_if_modified(|current| {
            let changed = *current != theme;
            if changed {
                *current = theme;
            }
            changed
        });
        if modified {
            self.mark_dirty();
        }
    }

    pub fn set_remaining_time(&self, value: bool) {
        let modified = self.remaining_time_tx.send_if_modified(|current| {
            let changed = *current != value;
            if changed {
                *current = value;
            }
            changed
        });
        if modified {
            self.mark_dirty();
        }
    }

    /// Writes any pending changes immediately, bypassing the debounce. A
    /// no-op when the disk already matches the published values. Used at
    /// shutdown.
    pub fn flush(&self) -> Result<()> {
        if !self.dirty.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        let result = write_atomic(&self.path, &self.snapshot());
        if result.is_err() {
            self.dirty.store(true, Ordering::SeqCst);
        }
        result
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
        let _ = self.dirty_tx.send(());
    }

    fn snapshot(&self) -> Settings {
        Settings {
            theme: *self.theme_tx.borrow(),
            remaining_time: *self.remaining_time_tx.borrow(),
        }
    }
}

impl Drop for SettingsService {
    fn drop(&mut self) {
        if let Some(handle) = self.writer.lock().take() {
            handle.abort();
        }
    }
}

async fn write_loop(
    mut signals: mpsc::UnboundedReceiver<()>,
    path: PathBuf,
    theme: watch::Receiver<Theme>,
    remaining_time: watch::Receiver<bool>,
    debounce: Duration,
    dirty: Arc<AtomicBool>,
) {
    while signals.recv().await.is_some() {
        // Trailing debounce: every further change within the window resets
        // the timer, so a burst becomes a single write.
        loop {
            match tokio::time::timeout(debounce, signals.recv()).await {
                Ok(Some(())) => continue,
                Ok(None) | Err(_) => break,
            }
        }

        // Clear before snapshotting: a change landing mid-write re-marks
        // the flag and queues another pass.
        dirty.store(false, Ordering::SeqCst);
        let snapshot = Settings {
            theme: *theme.borrow(),
            remaining_time: *remaining_time.borrow(),
        };
        match write_atomic(&path, &snapshot) {
            Ok(()) => debug!(path = %path.display(), "settings persisted"),
            Err(err) => {
                dirty.store(true, Ordering::SeqCst);
                warn!(path = %path.display(), %err, "failed to persist settings");
            }
        }
    }
}

fn load(path: &Path) -> Settings {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|contents| serde_json::from_str(&contents).ok())
        .unwrap_or_default()
}

fn write_atomic(path: &Path, settings: &Settings) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut temp, settings)?;

    // Keep the previous version as .backup before the rename lands.
    if path.exists() {
        std::fs::rename(path, backup_path(path))?;
    }
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

fn backup_path(path: &Path) -> PathBuf {
    let mut os: OsString = path.as_os_str().to_owned();
    os.push(".backup");
    PathBuf::from(os)
}
