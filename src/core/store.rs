//! Item persistence
//!
//! The orchestrator does not know or care whether items live in a file,
//! a database, or a remote service; it only talks to the `ItemStore`
//! trait. `JsonFileStore` keeps the whole catalog in a single JSON file
//! with atomic writes. `MemoryStore` backs tests and ephemeral runs.

use crate::core::item::Item;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;

/// Storage boundary for catalog items
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Load the full catalog
    async fn load_all(&self) -> io::Result<Vec<Item>>;

    /// Replace the full catalog
    async fn save_all(&self, items: Vec<Item>) -> io::Result<()>;

    /// Load a single item by id
    async fn load_by_id(&self, item_id: &str) -> io::Result<Option<Item>> {
        let items = self.load_all().await?;
        Ok(items.into_iter().find(|item| item.id == item_id))
    }
}

/// Whole-file JSON store
///
/// Writes go to a temp file first and are renamed into place, so readers
/// never observe a partially written catalog.
pub struct JsonFileStore {
    data_file: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(data_file: P) -> Self {
        Self {
            data_file: data_file.as_ref().to_path_buf(),
        }
    }

    async fn ensure_parent_dir(&self) -> io::Result<()> {
        if let Some(parent) = self.data_file.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ItemStore for JsonFileStore {
    async fn load_all(&self) -> io::Result<Vec<Item>> {
        if fs::metadata(&self.data_file).await.is_err() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.data_file).await?;
        serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    async fn save_all(&self, items: Vec<Item>) -> io::Result<()> {
        self.ensure_parent_dir().await?;

        let json = serde_json::to_string_pretty(&items)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        // Atomic write: write to temp file, then rename
        let temp_file = self.data_file.with_extension("json.tmp");
        fs::write(&temp_file, json).await?;
        fs::rename(&temp_file, &self.data_file).await?;

        Ok(())
    }
}

/// In-memory store for tests and ephemeral runs
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<Vec<Item>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn load_all(&self) -> io::Result<Vec<Item>> {
        Ok(self.items.lock().expect("store lock poisoned").clone())
    }

    async fn save_all(&self, items: Vec<Item>) -> io::Result<()> {
        *self.items.lock().expect("store lock poisoned") = items;
        Ok(())
    }
}
