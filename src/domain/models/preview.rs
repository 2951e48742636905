use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use tracing::debug;
use uuid::Uuid;

const PREVIEW_URI_PREFIX: &str = "blob:pii-mask/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewEntry {
    pub content: Bytes,
    pub mime_type: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviewStats {
    pub created: u64,
    pub released: u64,
}

impl PreviewStats {
    pub fn live(&self) -> u64 {
        self.created - self.released
    }
}

#[derive(Default)]
struct PreviewStore {
    entries: HashMap<Uuid, PreviewEntry>,
    stats: PreviewStats,
}

impl PreviewStore {
    fn remove(&mut self, id: &Uuid) -> bool {
        if self.entries.remove(id).is_some() {
            self.stats.released += 1;
            true
        } else {
            false
        }
    }
}

/// Hands out ephemeral `blob:` references for in-memory image bytes.
///
/// Cloning is cheap and every clone shares the same store, so the upload
/// client can create result references that the controller later releases.
#[derive(Clone, Default)]
pub struct PreviewManager {
    store: Arc<Mutex<PreviewStore>>,
}

impl PreviewManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_preview(&self, content: Bytes, mime_type: &str) -> PreviewReference {
        let id = Uuid::new_v4();
        let size = content.len();

        let mut store = self.lock();
        store.entries.insert(
            id,
            PreviewEntry {
                content,
                mime_type: mime_type.to_string(),
            },
        );
        store.stats.created += 1;
        drop(store);

        let reference = PreviewReference {
            id,
            uri: format!("{}{}", PREVIEW_URI_PREFIX, id),
            store: Arc::clone(&self.store),
            released: false,
        };
        debug!("Created preview {} ({} bytes)", reference.uri, size);
        reference
    }

    /// Releases a reference. Safe to call on an already released reference.
    pub fn release(&self, reference: &mut PreviewReference) {
        reference.release();
    }

    pub fn resolve(&self, uri: &str) -> Option<PreviewEntry> {
        let id = uri
            .strip_prefix(PREVIEW_URI_PREFIX)
            .and_then(|raw| Uuid::parse_str(raw).ok())?;
        self.lock().entries.get(&id).cloned()
    }

    pub fn live_count(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn stats(&self) -> PreviewStats {
        self.lock().stats
    }

    fn lock(&self) -> MutexGuard<'_, PreviewStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for PreviewManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewManager")
            .field("stats", &self.stats())
            .finish()
    }
}

/// A live `blob:` reference. Released exactly once, either explicitly or when
/// the handle is dropped.
pub struct PreviewReference {
    id: Uuid,
    uri: String,
    store: Arc<Mutex<PreviewStore>>,
    released: bool,
}

impl PreviewReference {
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        if store.remove(&self.id) {
            debug!("Released preview {}", self.uri);
        }
    }
}

impl Drop for PreviewReference {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for PreviewReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewReference")
            .field("uri", &self.uri)
            .field("released", &self.released)
            .finish()
    }
}
