//! File-based activation store with atomic writes.
//!
//! Stores the record at `dirs::data_dir()/<namespace>/license.json`.
//! Each save writes its own temp file in the same directory and renames it
//! into place, so concurrent saves never share a partial file.

use crate::store::record::ActivationRecord;
use crate::store::LicenseStore;
use crate::DeskwardenError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

const RECORD_FILE: &str = "license.json";

/// File-based activation store.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory holding the record.
    dir: PathBuf,
}

impl FileStore {
    /// Create a store under the platform data directory.
    pub fn new(namespace: &str) -> Result<Self, DeskwardenError> {
        let base_dir = dirs::data_dir()
            .ok_or_else(|| DeskwardenError::StoreIO("Could not find data directory".to_string()))?;
        Self::with_path(base_dir.join(namespace))
    }

    /// Create a store at a specific directory.
    pub fn with_path(dir: PathBuf) -> Result<Self, DeskwardenError> {
        fs::create_dir_all(&dir)
            .map_err(|e| DeskwardenError::StoreIO(format!("Failed to create store dir: {}", e)))?;
        Ok(Self { dir })
    }

    /// Directory holding the record.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self) -> PathBuf {
        self.dir.join(RECORD_FILE)
    }
}

impl LicenseStore for FileStore {
    fn load(&self) -> Result<Option<ActivationRecord>, DeskwardenError> {
        let path = self.record_path();

        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)
            .map_err(|e| DeskwardenError::StoreIO(format!("Failed to read record: {}", e)))?;

        ActivationRecord::from_json(&json).map(Some)
    }

    fn save(&self, record: &ActivationRecord) -> Result<(), DeskwardenError> {
        let target_path = self.record_path();
        let json = record.to_json()?;

        let mut temp = NamedTempFile::new_in(&self.dir)
            .map_err(|e| DeskwardenError::StoreIO(format!("Failed to create temp file: {}", e)))?;
        temp.write_all(json.as_bytes())
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| DeskwardenError::StoreIO(format!("Failed to write temp file: {}", e)))?;

        // A failed persist hands the temp file back; dropping it deletes it.
        temp.persist(&target_path)
            .map_err(|e| DeskwardenError::StoreIO(format!("Failed to rename record file: {}", e.error)))?;

        debug!(path = %target_path.display(), "activation record saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), DeskwardenError> {
        let path = self.record_path();

        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| DeskwardenError::StoreIO(format!("Failed to delete record: {}", e)))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileStore) {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::with_path(tmp.path().join("desk")).unwrap();
        (tmp, store)
    }

    #[test]
    fn test_load_missing_is_none() {
        let (_tmp, store) = store();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let (_tmp, store) = store();
        let clock = MockClock::from_rfc3339("2026-02-01T09:00:00Z");
        let record = ActivationRecord::new("QUJD-REVG", &clock);

        store.save(&record).unwrap();
        assert_eq!(store.load().unwrap(), Some(record));
        assert_eq!(fs::read_dir(store.dir()).unwrap().count(), 1);
    }

    #[test]
    fn test_concurrent_saves_leave_a_readable_record() {
        let (_tmp, store) = store();
        let clock = MockClock::from_rfc3339("2026-02-01T09:00:00Z");
        let keys = ["QUJD", "REVG", "R0hJ", "SktM", "TU5P", "UFFS", "U1RV", "VldY"];

        for _ in 0..25 {
            std::thread::scope(|s| {
                for key in keys {
                    let store = &store;
                    let clock = &clock;
                    s.spawn(move || store.save(&ActivationRecord::new(key, clock)).unwrap());
                }
            });

            let loaded = store.load().unwrap().unwrap();
            assert!(keys.contains(&loaded.license_key.as_str()));
            assert_eq!(loaded.key_fingerprint, crate::store::record::hash_license_key(&loaded.license_key));
        }

        let leftover: Vec<_> = fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftover, vec![std::ffi::OsString::from(RECORD_FILE)]);
    }

    #[test]
    fn test_save_overwrites() {
        let (_tmp, store) = store();
        let clock = MockClock::from_rfc3339("2026-02-01T09:00:00Z");
        store.save(&ActivationRecord::new("QUJD", &clock)).unwrap();
        let second = ActivationRecord::new("REVG", &clock);
        store.save(&second).unwrap();
        assert_eq!(store.load().unwrap(), Some(second));
    }

    #[test]
    fn test_clear() {
        let (_tmp, store) = store();
        let clock = MockClock::from_rfc3339("2026-02-01T09:00:00Z");
        store.save(&ActivationRecord::new("QUJD", &clock)).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_io_error() {
        let (_tmp, store) = store();
        fs::write(store.dir().join(RECORD_FILE), "{ not json").unwrap();
        assert!(matches!(store.load(), Err(DeskwardenError::StoreIO(_))));
    }
}
