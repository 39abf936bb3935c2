//! KvStore - named-slot byte store
//!
//! Holds opaque byte snapshots under short slot names. The store never
//! interprets what it holds; callers own the serialization format.
//!
//! # Layout
//!
//! ```text
//! store/
//! ├── .lock                           # exclusive while a slot is replaced
//! ├── smartTripPackerHistory.slot
//! └── smartTripPackerHistory.corrupt-1718000000000.slot
//! ```
//!
//! # Example
//!
//! ```ignore
//! use kvstore::{FileStore, SlotStore};
//!
//! let store = FileStore::open("/tmp/store")?;
//! store.save("history", b"[]")?;
//! assert_eq!(store.load("history")?, Some(b"[]".to_vec()));
//! ```

pub mod cli;
pub mod config;
mod error;
mod store;

pub use error::StoreError;
pub use store::{FileStore, MemoryStore, SlotStore, copy_slot, validate_slot};

/// File extension used for slot files
pub const SLOT_EXTENSION: &str = "slot";
