//! Status ledger - durable per-(item, platform) publish state
//!
//! All publication state flows through here. Updates are scoped
//! read-modify-writes: the current catalog is re-read under the write
//! lock, the one changed platform entry is merged in, and the catalog is
//! written back. The store holds the whole catalog in one unit, so the
//! write lock covers the catalog rather than a single item; a narrower
//! lock would let two writers interleave stale whole-catalog writes and
//! silently drop one of them.
//!
//! The ledger also hands out per-(item, platform) locks so the
//! orchestrator can serialize publish attempts for the same pair across
//! the adapter call. The write lock is never held over adapter I/O; it
//! scopes only the final read-merge-write.

use crate::core::error::PublishError;
use crate::core::item::{Item, PublicationRecord};
use crate::core::store::ItemStore;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Table of async locks keyed by (item, platform) pair
///
/// Lock entries are created on first use and kept for the process
/// lifetime; the key space (item ids x platforms) is small enough that
/// eviction is not worth the complexity.
struct KeyedLocks {
    inner: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl KeyedLocks {
    fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    fn acquire(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut table = self.inner.lock().expect("lock table poisoned");
        table
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

/// Durable record of publish state per item per platform
///
/// Read and written by the orchestrator only; adapters never touch it.
pub struct StatusLedger {
    store: Arc<dyn ItemStore>,
    // Serializes every catalog read-modify-write; the backing store
    // loads and saves the catalog whole, so concurrent writers to
    // different items would otherwise overwrite each other with stale
    // copies
    write_lock: tokio::sync::Mutex<()>,
    pair_locks: KeyedLocks,
}

impl StatusLedger {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self {
            store,
            write_lock: tokio::sync::Mutex::new(()),
            pair_locks: KeyedLocks::new(),
        }
    }

    /// Load an item, failing with `ItemNotFound` if the id is unknown
    pub async fn load_item(&self, item_id: &str) -> Result<Item, PublishError> {
        self.store
            .load_by_id(item_id)
            .await?
            .ok_or_else(|| PublishError::ItemNotFound {
                item_id: item_id.to_string(),
            })
    }

    /// Lock serializing publish attempts for one (item, platform) pair
    ///
    /// The caller holds the returned guard across the adapter call; two
    /// attempts for the same pair must never interleave their writes.
    pub async fn lock_pair(&self, item_id: &str, platform: &str) -> tokio::sync::OwnedMutexGuard<()> {
        let key = format!("{item_id}\x1f{platform}");
        self.pair_locks.acquire(&key).lock_owned().await
    }

    /// Write one platform's publication record for an item
    ///
    /// Scoped read-modify-write under the catalog write lock: re-reads
    /// the current catalog, merges the single changed entry, writes
    /// back. Returns the record as persisted.
    pub async fn record_outcome(
        &self,
        item_id: &str,
        platform: &str,
        record: PublicationRecord,
    ) -> Result<PublicationRecord, PublishError> {
        let _guard = self.write_lock.lock().await;

        let mut items = self.store.load_all().await?;
        let item = items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| PublishError::ItemNotFound {
                item_id: item_id.to_string(),
            })?;

        item.platform_status
            .insert(platform.to_string(), record.clone());
        item.updated_at = Utc::now();

        self.store.save_all(items).await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::item::{Outcome, PublishState};
    use crate::core::store::{JsonFileStore, MemoryStore};
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn ledger_with_item() -> (StatusLedger, String) {
        let mut platforms = HashMap::new();
        platforms.insert("ebay".to_string(), true);
        platforms.insert("shopify".to_string(), true);
        let item = Item::new("Lamp".to_string(), "desk lamp".to_string(), 9.99, 1, platforms);
        let id = item.id.clone();
        let store = Arc::new(MemoryStore::with_items(vec![item]));
        (StatusLedger::new(store), id)
    }

    #[tokio::test]
    async fn test_load_item_not_found() {
        let (ledger, _) = ledger_with_item();
        let err = ledger.load_item("nope").await.unwrap_err();
        assert_eq!(err.code(), "ITEM_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_record_outcome_persists() {
        let (ledger, id) = ledger_with_item();

        let outcome = Outcome::success("ebay_1", "https://www.ebay.com/itm/ebay_1", "listed");
        let record = PublicationRecord::published(&outcome, Utc::now());
        ledger.record_outcome(&id, "ebay", record).await.unwrap();

        let item = ledger.load_item(&id).await.unwrap();
        let stored = item.record_for("ebay").unwrap();
        assert_eq!(stored.state, PublishState::Published);
        assert_eq!(stored.external_id.as_deref(), Some("ebay_1"));
    }

    #[tokio::test]
    async fn test_record_outcome_unknown_item() {
        let (ledger, _) = ledger_with_item();
        let err = ledger
            .record_outcome("nope", "ebay", PublicationRecord::failed("x"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "ITEM_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_second_write_overwrites_first() {
        let (ledger, id) = ledger_with_item();

        let outcome = Outcome::success("ebay_1", "https://www.ebay.com/itm/ebay_1", "listed");
        ledger
            .record_outcome(&id, "ebay", PublicationRecord::published(&outcome, Utc::now()))
            .await
            .unwrap();
        ledger
            .record_outcome(&id, "ebay", PublicationRecord::failed("gone away"))
            .await
            .unwrap();

        let item = ledger.load_item(&id).await.unwrap();
        let stored = item.record_for("ebay").unwrap();
        // The second call's outcome wins entirely, never a merge of both
        assert_eq!(stored.state, PublishState::Failed);
        assert!(stored.external_id.is_none());
        assert_eq!(stored.message.as_deref(), Some("gone away"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_to_different_platforms_both_survive() {
        let (ledger, id) = ledger_with_item();
        let ledger = Arc::new(ledger);

        let mut handles = Vec::new();
        for platform in ["ebay", "shopify"] {
            let ledger = Arc::clone(&ledger);
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                for round in 0..20 {
                    let outcome = Outcome::success(
                        format!("{platform}_{round}"),
                        format!("https://example.com/{platform}/{round}"),
                        "listed".to_string(),
                    );
                    ledger
                        .record_outcome(
                            &id,
                            platform,
                            PublicationRecord::published(&outcome, Utc::now()),
                        )
                        .await
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let item = ledger.load_item(&id).await.unwrap();
        // Neither platform's final update may be lost
        assert_eq!(
            item.record_for("ebay").unwrap().external_id.as_deref(),
            Some("ebay_19")
        );
        assert_eq!(
            item.record_for("shopify").unwrap().external_id.as_deref(),
            Some("shopify_19")
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_to_different_items_both_survive() {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(JsonFileStore::new(temp_dir.path().join("items.json")));

        let mut platforms = HashMap::new();
        platforms.insert("ebay".to_string(), true);
        let item_a = Item::new("A".to_string(), "first".to_string(), 1.0, 1, platforms.clone());
        let item_b = Item::new("B".to_string(), "second".to_string(), 2.0, 1, platforms);
        let id_a = item_a.id.clone();
        let id_b = item_b.id.clone();

        use crate::core::store::ItemStore;
        store.save_all(vec![item_a, item_b]).await.unwrap();
        let ledger = Arc::new(StatusLedger::new(store));

        let mut handles = Vec::new();
        for (id, tag) in [(id_a.clone(), "a"), (id_b.clone(), "b")] {
            let ledger = Arc::clone(&ledger);
            handles.push(tokio::spawn(async move {
                for round in 0..50 {
                    let outcome = Outcome::success(
                        format!("{tag}_{round}"),
                        format!("https://example.com/{tag}/{round}"),
                        "listed".to_string(),
                    );
                    ledger
                        .record_outcome(
                            &id,
                            "ebay",
                            PublicationRecord::published(&outcome, Utc::now()),
                        )
                        .await
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Writers to different items share one catalog file; neither
        // item's final update may be lost to a stale whole-catalog write
        let item_a = ledger.load_item(&id_a).await.unwrap();
        let item_b = ledger.load_item(&id_b).await.unwrap();
        assert_eq!(
            item_a.record_for("ebay").unwrap().external_id.as_deref(),
            Some("a_49")
        );
        assert_eq!(
            item_b.record_for("ebay").unwrap().external_id.as_deref(),
            Some("b_49")
        );
    }

    #[tokio::test]
    async fn test_pair_lock_is_exclusive() {
        let (ledger, id) = ledger_with_item();

        let first = ledger.lock_pair(&id, "ebay").await;
        // A second acquisition for the same pair must block
        let second = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            ledger.lock_pair(&id, "ebay"),
        )
        .await;
        assert!(second.is_err());

        // A different platform for the same item is independent
        let other = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            ledger.lock_pair(&id, "shopify"),
        )
        .await;
        assert!(other.is_ok());

        drop(first);
        let retry = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            ledger.lock_pair(&id, "ebay"),
        )
        .await;
        assert!(retry.is_ok());
    }
}
