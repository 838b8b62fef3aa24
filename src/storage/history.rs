//! Persistence for the console's command history.
use anyhow::Result;
use sled::Db;
use std::sync::{Arc, Mutex};

/// Tree holding console state inside the sled database.
const CONSOLE_TREE: &str = "console";
/// Key under which the history list is stored.
const HISTORY_KEY: &str = "CommandHistory";

/// A trait for loading and saving the command history.
pub trait HistoryStore: Send {
    /// Loads the stored history, oldest first.
    ///
    /// Returns an empty list when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// This function will return an error if the stored value cannot be read
    /// or decoded.
    fn load(&self) -> Result<Vec<String>>;

    /// Overwrites the stored history with `history`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the history cannot be written.
    fn save(&self, history: &[String]) -> Result<()>;
}

/// A `HistoryStore` implementation using `sled` for storage.
pub struct SledHistoryStore {
    tree: sled::Tree,
}

impl SledHistoryStore {
    /// Creates a new `SledHistoryStore`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the `console` tree cannot be opened.
    pub fn new(db: &Db) -> Result<Self> {
        let tree = db.open_tree(CONSOLE_TREE)?;
        Ok(Self { tree })
    }
}

impl HistoryStore for SledHistoryStore {
    fn load(&self) -> Result<Vec<String>> {
        match self.tree.get(HISTORY_KEY)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, history: &[String]) -> Result<()> {
        let serialized = serde_json::to_vec(history)?;
        self.tree.insert(HISTORY_KEY, serialized)?;
        self.tree.flush()?;
        Ok(())
    }
}

/// A `HistoryStore` that lives only as long as the process.
///
/// Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistoryStore {
    entries: Arc<Mutex<Vec<String>>>,
    failing: bool,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_entries(entries: impl IntoIterator<Item = String>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries.into_iter().collect())),
            failing: false,
        }
    }

    /// A store whose every operation fails.
    #[cfg(test)]
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Returns a copy of the stored entries.
    pub fn snapshot(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Result<Vec<String>> {
        if self.failing {
            anyhow::bail!("history store unavailable");
        }
        Ok(self.snapshot())
    }

    fn save(&self, history: &[String]) -> Result<()> {
        if self.failing {
            anyhow::bail!("history store unavailable");
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("history store lock poisoned"))?;
        *entries = history.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sled_store_starts_empty() {
        let dir = tempdir().unwrap();
        let db = sled::open(dir.path()).unwrap();
        let store = SledHistoryStore::new(&db).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn sled_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let history = vec!["help".to_string(), "reload \"shaders\"".to_string()];

        {
            let db = sled::open(dir.path()).unwrap();
            let store = SledHistoryStore::new(&db).unwrap();
            store.save(&history).unwrap();
        }

        let db = sled::open(dir.path()).unwrap();
        let store = SledHistoryStore::new(&db).unwrap();
        assert_eq!(store.load().unwrap(), history);
    }

    #[test]
    fn save_overwrites_previous_list() {
        let dir = tempdir().unwrap();
        let db = sled::open(dir.path()).unwrap();
        let store = SledHistoryStore::new(&db).unwrap();

        store.save(&["a".to_string(), "b".to_string()]).unwrap();
        store.save(&["b".to_string()]).unwrap();
        assert_eq!(store.load().unwrap(), vec!["b".to_string()]);
    }

    #[test]
    fn corrupt_value_is_an_error() {
        let dir = tempdir().unwrap();
        let db = sled::open(dir.path()).unwrap();
        db.open_tree(CONSOLE_TREE)
            .unwrap()
            .insert(HISTORY_KEY, &b"not json"[..])
            .unwrap();

        let store = SledHistoryStore::new(&db).unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn memory_store_clones_share_entries() {
        let store = MemoryHistoryStore::new();
        let other = store.clone();
        store.save(&["x".to_string()]).unwrap();
        assert_eq!(other.load().unwrap(), vec!["x".to_string()]);
    }
}
