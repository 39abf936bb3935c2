//! Trip history
//!
//! Most-recent-first trips backed by one slot of a [`SlotStore`]. Loaded once,
//! written back after every mutation. A slot that fails to parse is never
//! overwritten blindly: its bytes are copied to a backup slot first.

use std::sync::Arc;

use chrono::Utc;
use kvstore::{SlotStore, StoreError};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::domain::{IdResolver, PackingList, Trip};
use crate::reconcile;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Trip not found: {0}")]
    TripNotFound(String),

    #[error("Ambiguous trip reference '{reference}', matches: {}", .candidates.join(", "))]
    Ambiguous { reference: String, candidates: Vec<String> },

    #[error("No item at category {category_index}, item {item_index}")]
    OutOfRange { category_index: usize, item_index: usize },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Could not serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Ordered trips plus the slot they persist to
pub struct TripHistory {
    store: Arc<dyn SlotStore>,
    slot: String,
    trips: Vec<Trip>,
    backup_slot: Option<String>,
}

impl TripHistory {
    /// Load history from `slot`, best effort
    ///
    /// Never fails. A missing slot is an empty history. Unparseable contents
    /// (including JSON that is not an array) are copied to
    /// `{slot}.corrupt-{unix-ms}`, left in place, and history starts empty.
    pub fn load(store: Arc<dyn SlotStore>, slot: impl Into<String>) -> Self {
        let slot = slot.into();
        debug!(%slot, "TripHistory::load: called");
        let mut history = Self {
            store,
            slot,
            trips: Vec::new(),
            backup_slot: None,
        };

        let bytes = match history.store.load(&history.slot) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                info!(slot = %history.slot, "TripHistory::load: no saved history");
                return history;
            }
            Err(e) => {
                error!(slot = %history.slot, error = %e, "TripHistory::load: failed to read history");
                return history;
            }
        };

        match serde_json::from_slice::<Vec<Trip>>(&bytes) {
            Ok(trips) => {
                info!(slot = %history.slot, count = trips.len(), "TripHistory::load: loaded");
                history.trips = trips;
            }
            Err(e) => {
                warn!(slot = %history.slot, error = %e, bytes = bytes.len(), "TripHistory::load: history is corrupted");
                history.backup_slot = history.back_up(&bytes);
            }
        }

        history
    }

    fn back_up(&self, bytes: &[u8]) -> Option<String> {
        let backup = format!("{}.corrupt-{}", self.slot, Utc::now().timestamp_millis());
        match self.store.save(&backup, bytes) {
            Ok(()) => {
                warn!(%backup, "back_up: corrupted history copied");
                Some(backup)
            }
            Err(e) => {
                error!(%backup, error = %e, "back_up: could not copy corrupted history");
                None
            }
        }
    }

    /// Slot the history persists to
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Backup slot written at load time, if the history was corrupted
    pub fn backup_slot(&self) -> Option<&str> {
        self.backup_slot.as_deref()
    }

    /// Trips, most recent first
    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Trip with exactly this id
    pub fn get(&self, trip_id: &str) -> Option<&Trip> {
        self.trips.iter().find(|t| t.id == trip_id)
    }

    /// Trip by exact id or unique id prefix
    pub fn resolve(&self, reference: &str) -> Result<&Trip, HistoryError> {
        let resolver = IdResolver::new(self.trips.iter().map(|t| t.id.as_str()));
        match resolver.resolve(reference) {
            Ok(Some(id)) => self.get(&id).ok_or(HistoryError::TripNotFound(id)),
            Ok(None) => Err(HistoryError::TripNotFound(reference.to_string())),
            Err(candidates) => Err(HistoryError::Ambiguous {
                reference: reference.to_string(),
                candidates,
            }),
        }
    }

    /// Write the history to its slot
    ///
    /// An empty history is not written; only [`clear`](Self::clear) persists one.
    pub fn flush(&self) -> Result<(), HistoryError> {
        if self.trips.is_empty() {
            debug!("flush: empty history, not writing");
            return Ok(());
        }
        let bytes = serde_json::to_vec(&self.trips)?;
        self.store.save(&self.slot, &bytes)?;
        debug!(slot = %self.slot, bytes = bytes.len(), "flush: written");
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.flush() {
            error!(slot = %self.slot, error = %e, "persist: failed to save history");
        }
    }

    /// Add a trip at the front and persist
    pub fn prepend(&mut self, trip: Trip) -> &Trip {
        info!(trip_id = %trip.id, "prepend: adding trip");
        self.trips.insert(0, trip);
        self.persist();
        &self.trips[0]
    }

    /// Replace a trip's list in place and persist
    pub fn replace_list(&mut self, trip_id: &str, list: PackingList) -> Result<&Trip, HistoryError> {
        let pos = self.position(trip_id)?;
        self.trips[pos].packing_list = list;
        info!(%trip_id, "replace_list: list replaced");
        self.persist();
        Ok(&self.trips[pos])
    }

    /// Flip one item's packed flag and persist; returns the new flag
    pub fn toggle(&mut self, trip_id: &str, category_index: usize, item_index: usize) -> Result<bool, HistoryError> {
        let pos = self.position(trip_id)?;
        let packed = reconcile::toggle(&mut self.trips[pos].packing_list, category_index, item_index).ok_or(
            HistoryError::OutOfRange {
                category_index,
                item_index,
            },
        )?;
        self.persist();
        Ok(packed)
    }

    /// Remove every trip and persist an empty history
    pub fn clear(&mut self) -> Result<(), HistoryError> {
        info!(count = self.trips.len(), "clear: removing all trips");
        self.trips.clear();
        self.store.save(&self.slot, b"[]")?;
        Ok(())
    }

    fn position(&self, trip_id: &str) -> Result<usize, HistoryError> {
        self.trips
            .iter()
            .position(|t| t.id == trip_id)
            .ok_or_else(|| HistoryError::TripNotFound(trip_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawCategory;
    use crate::domain::RawItem;
    use kvstore::{FileStore, MemoryStore};
    use tempfile::TempDir;

    const SLOT: &str = "smartTripPackerHistory";

    fn trip(description: &str) -> Trip {
        let list = reconcile::mint_list(vec![RawCategory::new(
            "ציוד חיוני",
            vec![RawItem::user("אולר"), RawItem::oracle("מפה")],
        )]);
        Trip::new(description, list)
    }

    #[test]
    fn test_missing_slot_is_empty() {
        let history = TripHistory::load(Arc::new(MemoryStore::new()), SLOT);
        assert!(history.is_empty());
        assert!(history.backup_slot().is_none());
    }

    #[test]
    fn test_round_trip_through_file_store() {
        let temp = TempDir::new().unwrap();
        let store: Arc<dyn SlotStore> = Arc::new(FileStore::open(temp.path()).unwrap());

        let mut history = TripHistory::load(store.clone(), SLOT);
        history.prepend(trip("first"));
        let second_id = history.prepend(trip("second")).id.clone();
        history.toggle(&second_id, 0, 1).unwrap();

        let reloaded = TripHistory::load(store, SLOT);
        assert_eq!(reloaded.trips(), history.trips());
        assert_eq!(reloaded.trips()[0].description, "second");
        assert!(reloaded.trips()[0].packing_list[0].items[1].packed);
    }

    #[test]
    fn test_corrupted_history_is_backed_up_and_kept() {
        let store = Arc::new(MemoryStore::new().with_slot(SLOT, "{not json"));

        let history = TripHistory::load(store.clone(), SLOT);
        assert!(history.is_empty());

        let backup = history.backup_slot().unwrap().to_string();
        assert!(backup.starts_with("smartTripPackerHistory.corrupt-"));
        assert_eq!(store.load(&backup).unwrap().unwrap(), b"{not json");
        assert_eq!(store.load(SLOT).unwrap().unwrap(), b"{not json");
    }

    #[test]
    fn test_non_array_json_is_corrupt() {
        let store = Arc::new(MemoryStore::new().with_slot(SLOT, r#"{"trips": []}"#));
        let history = TripHistory::load(store, SLOT);
        assert!(history.is_empty());
        assert!(history.backup_slot().is_some());
    }

    #[test]
    fn test_empty_history_never_written() {
        let store = Arc::new(MemoryStore::new());
        let history = TripHistory::load(store.clone(), SLOT);
        history.flush().unwrap();
        assert!(store.load(SLOT).unwrap().is_none());
    }

    #[test]
    fn test_clear_persists_empty_array() {
        let store = Arc::new(MemoryStore::new());
        let mut history = TripHistory::load(store.clone(), SLOT);
        history.prepend(trip("x"));

        history.clear().unwrap();
        assert!(history.is_empty());
        assert_eq!(store.load(SLOT).unwrap().unwrap(), b"[]");

        let reloaded = TripHistory::load(store, SLOT);
        assert!(reloaded.is_empty());
        assert!(reloaded.backup_slot().is_none());
    }

    #[test]
    fn test_replace_list_and_unknown_trip() {
        let mut history = TripHistory::load(Arc::new(MemoryStore::new()), SLOT);
        let id = history.prepend(trip("x")).id.clone();

        let updated = history.replace_list(&id, Vec::new()).unwrap();
        assert!(updated.packing_list.is_empty());
        assert_eq!(updated.description, "x");

        assert!(matches!(
            history.replace_list("trip-nope", Vec::new()),
            Err(HistoryError::TripNotFound(_))
        ));
    }

    #[test]
    fn test_toggle_out_of_range() {
        let mut history = TripHistory::load(Arc::new(MemoryStore::new()), SLOT);
        let id = history.prepend(trip("x")).id.clone();

        assert!(matches!(
            history.toggle(&id, 0, 7),
            Err(HistoryError::OutOfRange {
                category_index: 0,
                item_index: 7
            })
        ));
        assert_eq!(history.toggle(&id, 0, 0).unwrap(), true);
        assert_eq!(history.toggle(&id, 0, 0).unwrap(), false);
    }

    #[test]
    fn test_resolve_by_prefix() {
        let mut history = TripHistory::load(Arc::new(MemoryStore::new()), SLOT);
        let id = history.prepend(trip("x")).id.clone();

        assert_eq!(history.resolve(&id).unwrap().id, id);
        assert_eq!(history.resolve(&id[..12]).unwrap().id, id);
        assert!(matches!(history.resolve("zzz"), Err(HistoryError::TripNotFound(_))));
    }

    #[test]
    fn test_reads_browser_history_format() {
        let stored = r#"[{
            "id": "trip-1718000000000",
            "tripDescription": "טיול לנגב",
            "packingList": [{
                "id": "cat-0-1718000000000",
                "category": "ציוד חיוני",
                "items": [{"id": "item-0-0-1718000000000", "name": "אולר", "source": "user", "packed": false}]
            }],
            "createdAt": "2024-06-10T06:13:20.000Z"
        }]"#;
        let store = Arc::new(MemoryStore::new().with_slot(SLOT, stored));

        let history = TripHistory::load(store, SLOT);
        assert_eq!(history.len(), 1);
        assert_eq!(history.resolve("1718").unwrap().description, "טיול לנגב");
    }
}
