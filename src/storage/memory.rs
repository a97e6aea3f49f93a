//! In-memory store.

use rustc_hash::FxHashMap;

use super::{StorageError, Store};

/// Ephemeral store used by tests and profile-less runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: FxHashMap<String, String>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value);

        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn write_read_delete() -> TestResult {
        let mut store = MemoryStore::new();

        store.write("k", "v".to_owned())?;

        assert_eq!(store.read("k").as_deref(), Some("v"));

        store.delete("k")?;

        assert!(store.read("k").is_none());

        Ok(())
    }
}
