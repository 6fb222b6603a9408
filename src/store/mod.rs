//! Persistence for the activated license.
//!
//! Only the license key and activation metadata are stored. Claims are
//! never trusted from disk; they are re-derived by verifying the stored key
//! on every load.

pub mod file;
pub mod record;

use crate::DeskwardenError;
use record::ActivationRecord;
use std::sync::Mutex;

/// Storage backend for the activation record.
pub trait LicenseStore: Send + Sync {
    /// Load the stored record, if any.
    fn load(&self) -> Result<Option<ActivationRecord>, DeskwardenError>;

    /// Replace the stored record.
    fn save(&self, record: &ActivationRecord) -> Result<(), DeskwardenError>;

    /// Remove the stored record. Missing records are not an error.
    fn clear(&self) -> Result<(), DeskwardenError>;
}

/// In-process store, for tests and embedders with their own persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Mutex<Option<ActivationRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LicenseStore for MemoryStore {
    fn load(&self) -> Result<Option<ActivationRecord>, DeskwardenError> {
        let guard = self
            .record
            .lock()
            .map_err(|_| DeskwardenError::StoreIO("memory store lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, record: &ActivationRecord) -> Result<(), DeskwardenError> {
        let mut guard = self
            .record
            .lock()
            .map_err(|_| DeskwardenError::StoreIO("memory store lock poisoned".to_string()))?;
        *guard = Some(record.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), DeskwardenError> {
        let mut guard = self
            .record
            .lock()
            .map_err(|_| DeskwardenError::StoreIO("memory store lock poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;

    #[test]
    fn test_memory_store_save_load_clear() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());

        let clock = MockClock::from_rfc3339("2026-05-01T12:00:00Z");
        let record = ActivationRecord::new("AAAA-BBBB", &clock);
        store.save(&record).unwrap();
        assert_eq!(store.load().unwrap(), Some(record));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
