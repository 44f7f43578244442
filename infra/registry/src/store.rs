//! The persisted key/value store behind a configuration namespace.

use crate::error::ExternalError;
use decl_domain::value::PropertyValue;
use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// A persisted store organised by (category, name).
///
/// The file format is up to the implementation; the engine only loads, stores and flushes.
pub trait ConfigStore: Send + Sync {
    /// Returns the stored value, inserting `default` (and `comment`) first if absent.
    fn load(
        &mut self,
        category: &str,
        name: &str,
        default: &PropertyValue,
        comment: &str,
    ) -> PropertyValue;

    fn store(&mut self, category: &str, name: &str, value: PropertyValue);

    fn has_unsaved_changes(&self) -> bool;

    /// Persists pending changes.
    ///
    /// # Errors
    /// Whatever the backing medium fails with.
    fn flush(&mut self) -> Result<(), ExternalError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredValue {
    pub value: PropertyValue,
    pub comment: String,
}

#[derive(Debug, Default)]
struct MemoryState {
    entries: FxHashMap<(String, String), StoredValue>,
    dirty: bool,
    flushes: usize,
}

/// An in-memory [`ConfigStore`].
///
/// Clones share the same state, so a test or host can keep a handle after handing the store to
/// a namespace.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds or edits a value the way an external editor of the backing file would: the store
    /// is not marked dirty.
    pub fn insert(&self, category: &str, name: &str, value: PropertyValue) {
        let mut state = self.state.lock();
        state
            .entries
            .entry((category.to_owned(), name.to_owned()))
            .and_modify(|stored| stored.value = value.clone())
            .or_insert_with(|| StoredValue { value, comment: String::new() });
    }

    #[must_use]
    pub fn get(&self, category: &str, name: &str) -> Option<StoredValue> {
        self.state.lock().entries.get(&(category.to_owned(), name.to_owned())).cloned()
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state.lock().dirty
    }

    /// How many times [`ConfigStore::flush`] actually ran.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        self.state.lock().flushes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ConfigStore for MemoryStore {
    fn load(
        &mut self,
        category: &str,
        name: &str,
        default: &PropertyValue,
        comment: &str,
    ) -> PropertyValue {
        let mut state = self.state.lock();
        let key = (category.to_owned(), name.to_owned());
        if let Some(stored) = state.entries.get(&key) {
            return stored.value.clone();
        }

        state
            .entries
            .insert(key, StoredValue { value: default.clone(), comment: comment.to_owned() });
        state.dirty = true;
        default.clone()
    }

    fn store(&mut self, category: &str, name: &str, value: PropertyValue) {
        let mut state = self.state.lock();
        let key = (category.to_owned(), name.to_owned());
        match state.entries.get_mut(&key) {
            Some(stored) if stored.value == value => return,
            Some(stored) => stored.value = value,
            None => {
                state.entries.insert(key, StoredValue { value, comment: String::new() });
            },
        }
        state.dirty = true;
    }

    fn has_unsaved_changes(&self) -> bool {
        self.state.lock().dirty
    }

    fn flush(&mut self) -> Result<(), ExternalError> {
        let mut state = self.state.lock();
        state.dirty = false;
        state.flushes += 1;
        debug!(entries = state.entries.len(), "Memory store flushed");
        Ok(())
    }
}
