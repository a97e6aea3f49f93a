//! File-backed store.

use std::{
    collections::BTreeMap,
    fs, io,
    path::PathBuf,
};

use super::{StorageError, Store};

/// Store persisted as a single JSON object on disk.
///
/// The whole object is loaded at open and rewritten after every mutation,
/// mirroring the synchronous per-key semantics of the browser-local storage
/// it stands in for.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open a store file.
    ///
    /// A missing file yields an empty store; a corrupt one decays to empty
    /// and is logged at `warn`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when an existing file cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "store file failed to parse; starting empty");
                    BTreeMap::new()
                }
            },
            Err(error) if error.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => return Err(StorageError::Io(error)),
        };

        Ok(Self { path, entries })
    }

    fn persist(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let raw = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, raw)?;

        Ok(())
    }
}

impl Store for FileStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value);

        self.persist()
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn survives_reopen() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("store.json");

        {
            let mut store = FileStore::open(&path)?;
            store.write("sp_cart", "3".to_owned())?;
        }

        let store = FileStore::open(&path)?;

        assert_eq!(store.read("sp_cart").as_deref(), Some("3"));

        Ok(())
    }

    #[test]
    fn missing_file_starts_empty() -> TestResult {
        let dir = tempfile::tempdir()?;

        let store = FileStore::open(dir.path().join("absent.json"))?;

        assert!(store.read("sp_cart").is_none());

        Ok(())
    }

    #[test]
    fn corrupt_file_starts_empty() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("store.json");
        fs::write(&path, "{{{{")?;

        let store = FileStore::open(&path)?;

        assert!(store.read("sp_cart").is_none());

        Ok(())
    }

    #[test]
    fn delete_removes_key_from_disk() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("store.json");

        let mut store = FileStore::open(&path)?;
        store.write("sp_cart", "3".to_owned())?;
        store.delete("sp_cart")?;

        let reopened = FileStore::open(&path)?;

        assert!(reopened.read("sp_cart").is_none());

        Ok(())
    }
}
