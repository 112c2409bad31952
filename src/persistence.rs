//! Full-collection persistence into a single durable slot.
//!
//! A log is small (one user, months of entries), so every mutation rewrites
//! the whole collection under the log's key. Failures here are never fatal:
//! the in-memory collection stays authoritative for the session and the next
//! mutation writes everything again.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreResult;

/// A byte-oriented key-value area holding one value per key.
pub trait KeyValueSlots: Send + Sync {
    /// Returns the bytes stored under `key`, or `None` if the slot is empty.
    fn read(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Replaces the value stored under `key`.
    fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()>;
}

/// In-process slots for hosts that don't need durability.
#[derive(Debug, Default)]
pub struct MemorySlots {
    slots: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueSlots for MemorySlots {
    fn read(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.slots.lock().get(key).cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        self.slots.lock().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Encodes a whole collection of type `T` as JSON into one slot.
pub struct SlotPersistence<T> {
    slots: Arc<dyn KeyValueSlots>,
    key: String,
    _collection: PhantomData<fn() -> T>,
}

impl<T> SlotPersistence<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(slots: Arc<dyn KeyValueSlots>, key: impl Into<String>) -> Self {
        Self {
            slots,
            key: key.into(),
            _collection: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Writes `collection` to the slot. Encode and write failures are
    /// logged and dropped; the slot keeps its previous value.
    pub fn save(&self, collection: &T) {
        let bytes = match serde_json::to_vec(collection) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to encode collection for slot '{}': {e}", self.key);
                return;
            }
        };

        match self.slots.write(&self.key, &bytes) {
            Ok(()) => debug!("Saved slot '{}' ({} bytes)", self.key, bytes.len()),
            Err(e) => warn!("Failed to write slot '{}': {e}", self.key),
        }
    }

    /// Reads the collection back. An empty slot, a read error or undecodable
    /// bytes all yield an empty collection.
    pub fn load(&self) -> T {
        let bytes = match self.slots.read(&self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                info!("Slot '{}' is empty; starting with no data", self.key);
                return T::default();
            }
            Err(e) => {
                warn!("Failed to read slot '{}': {e}", self.key);
                return T::default();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(collection) => collection,
            Err(e) => {
                warn!("Discarding undecodable data in slot '{}': {e}", self.key);
                T::default()
            }
        }
    }
}
