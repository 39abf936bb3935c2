//! Slot store implementations

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fs2::FileExt;
use tracing::{debug, info};

use crate::SLOT_EXTENSION;
use crate::error::StoreError;

/// Last-write-wins byte store addressed by slot name
///
/// There is no transactionality beyond a single `save` replacing the whole slot.
pub trait SlotStore: Send + Sync {
    /// Read a slot; `None` if it has never been written
    fn load(&self, slot: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace a slot's contents
    fn save(&self, slot: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Names of all slots, sorted
    fn list(&self) -> Result<Vec<String>, StoreError>;
}

/// Reject slot names that could escape the store directory
pub fn validate_slot(slot: &str) -> Result<(), StoreError> {
    let valid = !slot.is_empty()
        && !slot.starts_with('.')
        && slot
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidSlot(slot.to_string()))
    }
}

/// Copy one slot's bytes into another
pub fn copy_slot(store: &dyn SlotStore, from: &str, to: &str) -> Result<usize, StoreError> {
    debug!(%from, %to, "copy_slot: called");
    let bytes = store.load(from)?.ok_or_else(|| StoreError::NotFound(from.to_string()))?;
    store.save(to, &bytes)?;
    Ok(bytes.len())
}

/// Directory-backed store: one file per slot
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Open or create a store at the given directory
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).map_err(|e| StoreError::io(&base_path, e))?;
        debug!(?base_path, "Opened slot store");
        Ok(Self { base_path })
    }

    /// Directory holding the slot files
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.base_path.join(format!("{}.{}", slot, SLOT_EXTENSION))
    }

    fn lock(&self) -> Result<fs::File, StoreError> {
        let lock_path = self.base_path.join(".lock");
        let file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| StoreError::io(&lock_path, e))?;
        FileExt::lock_exclusive(&file).map_err(|e| StoreError::io(&lock_path, e))?;
        Ok(file)
    }
}

impl SlotStore for FileStore {
    fn load(&self, slot: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_slot(slot)?;
        let path = self.slot_path(slot);
        match fs::read(&path) {
            Ok(bytes) => {
                debug!(%slot, len = bytes.len(), "load: slot read");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(%slot, "load: slot absent");
                Ok(None)
            }
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    fn save(&self, slot: &str, bytes: &[u8]) -> Result<(), StoreError> {
        validate_slot(slot)?;
        let path = self.slot_path(slot);
        let tmp_path = self.base_path.join(format!(".{}.tmp", slot));

        // Held until the rename lands; dropping the handle releases the lock
        let _lock = self.lock()?;

        let mut tmp = fs::File::create(&tmp_path).map_err(|e| StoreError::io(&tmp_path, e))?;
        tmp.write_all(bytes).map_err(|e| StoreError::io(&tmp_path, e))?;
        tmp.sync_all().map_err(|e| StoreError::io(&tmp_path, e))?;
        drop(tmp);

        fs::rename(&tmp_path, &path).map_err(|e| StoreError::io(&path, e))?;
        info!(%slot, len = bytes.len(), "Saved slot");
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut slots = Vec::new();
        for entry in fs::read_dir(&self.base_path).map_err(|e| StoreError::io(&self.base_path, e))? {
            let entry = entry.map_err(|e| StoreError::io(&self.base_path, e))?;
            let path = entry.path();
            if path.extension().map(|e| e == SLOT_EXTENSION).unwrap_or(false)
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && validate_slot(stem).is_ok()
            {
                slots.push(stem.to_string());
            }
        }
        slots.sort();
        Ok(slots)
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot without going through validation
    pub fn with_slot(self, slot: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.slots
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(slot.into(), bytes.into());
        self
    }
}

impl SlotStore for MemoryStore {
    fn load(&self, slot: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_slot(slot)?;
        Ok(self.slots.lock().unwrap_or_else(|e| e.into_inner()).get(slot).cloned())
    }

    fn save(&self, slot: &str, bytes: &[u8]) -> Result<(), StoreError> {
        validate_slot(slot)?;
        self.slots
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(slot.to_string(), bytes.to_vec());
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.slots.lock().unwrap_or_else(|e| e.into_inner()).keys().cloned().collect())
    }
}
