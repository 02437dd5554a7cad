//! File-backed memory store.
//!
//! [`MemoryStore`] owns the path of one JSON document and serializes every
//! load-mutate-save sequence behind an in-process lock. Writes go to a sibling temp
//! file which is then renamed over the target, so readers never see a partial document.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Local, NaiveDate};

use super::types::{EventRecord, MemoryDocument, TaskRecord};
use crate::error::StoreError;

pub struct MemoryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl MemoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document, reporting why it could not be read.
    ///
    /// A missing file is not an error: it is an empty document that has not been
    /// written yet. Individual records that fail to decode are skipped with a warning
    /// so one bad entry cannot cost the rest of the history.
    pub fn try_load(&self) -> Result<MemoryDocument, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(MemoryDocument::default())
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if contents.trim().is_empty() {
            return Err(StoreError::Empty(self.path.clone()));
        }

        let value: serde_json::Value =
            serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        MemoryDocument::from_value(&value).ok_or_else(|| StoreError::NotAnObject(self.path.clone()))
    }

    /// Read the document, falling back to an empty one if the file is unreadable.
    pub fn load(&self) -> MemoryDocument {
        self.try_load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "memory file unreadable, starting from empty memory");
            MemoryDocument::default()
        })
    }

    /// Replace the whole file with `doc`.
    pub fn save(&self, doc: &MemoryDocument) -> Result<(), StoreError> {
        let _guard = self.guard()?;
        self.write(doc)
    }

    /// Append an event stamped with the current local time.
    pub fn log_event(&self, description: &str) -> Result<(), StoreError> {
        let event = EventRecord::new(description, &Local::now());
        self.update(|doc| doc.events.push(event))?;
        tracing::debug!(event = %description, "event logged");
        Ok(())
    }

    /// Append a new, not-done task stamped with the current local time.
    pub fn add_task(&self, text: &str) -> Result<(), StoreError> {
        let task = TaskRecord::new(text, &Local::now());
        self.update(|doc| doc.tasks.push(task))?;
        tracing::info!(task = %text, "task added");
        Ok(())
    }

    pub fn pending_tasks(&self) -> Vec<TaskRecord> {
        self.load().pending_tasks()
    }

    /// Descriptions of every event logged on `date`.
    pub fn events_on(&self, date: NaiveDate) -> Vec<String> {
        self.load().events_on(date)
    }

    pub fn recent_events(&self, n: usize) -> Vec<EventRecord> {
        self.load().recent_events(n).to_vec()
    }

    /// Overwrite the file with an empty document.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.save(&MemoryDocument::default())?;
        tracing::info!(path = %self.path.display(), "memory cleared");
        Ok(())
    }

    /// Run `f` against the store on tokio's blocking pool so file I/O and the store
    /// lock stay off the async workers.
    pub async fn blocking<T, F>(self: &Arc<Self>, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&MemoryStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(self);
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }

    /// Load, apply `mutate`, and save while holding the store lock.
    fn update(&self, mutate: impl FnOnce(&mut MemoryDocument)) -> Result<(), StoreError> {
        let _guard = self.guard()?;
        let mut doc = self.load();
        mutate(&mut doc);
        self.write(&doc)
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.lock.lock().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self, doc: &MemoryDocument) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(doc)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json).map_err(io_err)?;
        std::fs::rename(&tmp_path, &self.path).map_err(io_err)?;
        Ok(())
    }
}
