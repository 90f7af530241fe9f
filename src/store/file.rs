//! JSON file-backed order store

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{HISTORY_FILE, OrderStore, SUMMARY_FILE, SaveOutcome};
use crate::order::{OrderDetails, OrderIdGenerator, OrderRecord};
use crate::{Error, Result};

/// Order store writing two pretty-printed JSON documents
///
/// Saves are serialized per store instance, so conversations sharing one
/// store never drop each other's history entries or interleave snapshot
/// writes. Reads wait for an in-flight save, so they never see a partly
/// written document. Another process writing the same files is not
/// coordinated with.
#[derive(Debug)]
pub struct JsonFileStore {
    history_path: PathBuf,
    summary_path: PathBuf,
    ids: OrderIdGenerator,
    doc_lock: RwLock<()>,
}

impl JsonFileStore {
    /// Create a store writing to explicit document paths
    #[must_use]
    pub fn new(history_path: impl Into<PathBuf>, summary_path: impl Into<PathBuf>) -> Self {
        Self {
            history_path: history_path.into(),
            summary_path: summary_path.into(),
            ids: OrderIdGenerator::new(),
            doc_lock: RwLock::new(()),
        }
    }

    /// Create a store using the default file names inside `dir`
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(HISTORY_FILE), dir.join(SUMMARY_FILE))
    }

    /// Path of the history document
    #[must_use]
    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    /// Path of the snapshot document
    #[must_use]
    pub fn summary_path(&self) -> &Path {
        &self.summary_path
    }

    /// Append `record` to the history document, returning the new length
    async fn append_history(&self, record: &OrderRecord) -> Result<usize> {
        let mut orders = self.read_history_values().await?;
        orders.push(serde_json::to_value(record)?);

        let json = serde_json::to_string_pretty(&orders)?;
        tokio::fs::write(&self.history_path, json).await?;

        Ok(orders.len())
    }

    /// Raw history entries; missing or malformed documents read as empty
    async fn read_history_values(&self) -> Result<Vec<Value>> {
        let bytes = match tokio::fs::read(&self.history_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Array(orders)) => Ok(orders),
            Ok(_) => {
                tracing::debug!(
                    path = %self.history_path.display(),
                    "history document is not a list, treating as empty"
                );
                Ok(Vec::new())
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.history_path.display(),
                    error = %e,
                    "history document is not valid JSON, treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn write_summary(&self, record: &OrderRecord) -> Result<()> {
        let json = serde_json::to_string_pretty(record)?;
        tokio::fs::write(&self.summary_path, json).await?;
        Ok(())
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(HISTORY_FILE, SUMMARY_FILE)
    }
}

#[async_trait]
impl OrderStore for JsonFileStore {
    async fn save(&self, details: &OrderDetails) -> Result<SaveOutcome> {
        let _guard = self.doc_lock.write().await;
        let record = self.ids.stamp(details);

        let history_written = match self.append_history(&record).await {
            Ok(count) => {
                tracing::info!(
                    path = %self.history_path.display(),
                    id = record.id,
                    count,
                    "order added to history"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    path = %self.history_path.display(),
                    error = %e,
                    "failed to save order history"
                );
                false
            }
        };

        if let Err(e) = self.write_summary(&record).await {
            tracing::error!(
                path = %self.summary_path.display(),
                error = %e,
                "failed to save latest order"
            );
            return Err(Error::Store(format!(
                "failed to write {}: {e}",
                self.summary_path.display()
            )));
        }

        tracing::info!(
            path = %self.summary_path.display(),
            id = record.id,
            "latest order saved"
        );

        Ok(SaveOutcome {
            record,
            history_written,
        })
    }

    async fn latest(&self) -> Result<Option<OrderRecord>> {
        let _guard = self.doc_lock.read().await;
        match tokio::fs::read(&self.summary_path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn history(&self) -> Result<Vec<OrderRecord>> {
        let _guard = self.doc_lock.read().await;
        let values = self.read_history_values().await?;
        let orders = values
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable history entry");
                    None
                }
            })
            .collect();
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn latte() -> OrderDetails {
        OrderDetails::new("Latte", "Medium", "Oat", "None", "Alex")
    }

    fn read_json(path: &Path) -> Value {
        let content = std::fs::read_to_string(path).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    #[tokio::test]
    async fn save_writes_snapshot_and_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());

        let outcome = store.save(&latte()).await.unwrap();
        assert!(outcome.history_written);
        assert!(outcome.record.matches(&latte()));

        let summary = read_json(store.summary_path());
        assert_eq!(summary["drinkType"], "Latte");
        assert_eq!(summary["size"], "Medium");
        assert_eq!(summary["milk"], "Oat");
        assert_eq!(summary["extras"], "None");
        assert_eq!(summary["name"], "Alex");
        assert_eq!(summary["id"], outcome.record.id);

        let history = read_json(store.history_path());
        let entries = history.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0], summary);
    }

    #[tokio::test]
    async fn documents_are_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        store.save(&latte()).await.unwrap();

        let summary = std::fs::read_to_string(store.summary_path()).unwrap();
        assert!(summary.starts_with("{\n  \"id\": "), "summary: {summary}");

        let history = std::fs::read_to_string(store.history_path()).unwrap();
        assert!(history.starts_with("[\n  {\n    \"id\": "), "history: {history}");
    }

    #[tokio::test]
    async fn history_appends_in_call_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        let orders = [
            OrderDetails::new("Latte", "Medium", "Oat", "None", "Alex"),
            OrderDetails::new("Espresso", "Small", "Whole", "Sugar", "Bo"),
            OrderDetails::new("Mocha", "Large", "Almond", "Whipped Cream", "Cy"),
        ];

        for order in &orders {
            store.save(order).await.unwrap();
        }

        let history = store.history().await.unwrap();
        assert_eq!(history.len(), orders.len());
        for (record, order) in history.iter().zip(&orders) {
            assert!(record.matches(order));
        }
        assert!(history.windows(2).all(|w| w[0].id < w[1].id));

        let latest = store.latest().await.unwrap().unwrap();
        assert_eq!(&latest, history.last().unwrap());
    }

    #[tokio::test]
    async fn non_list_history_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        std::fs::write(store.history_path(), r#"{"not": "a list"}"#).unwrap();

        let outcome = store.save(&latte()).await.unwrap();
        assert!(outcome.history_written);

        let history = store.history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].matches(&latte()));
    }

    #[tokio::test]
    async fn invalid_json_history_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        std::fs::write(store.history_path(), "[{ truncated").unwrap();

        store.save(&latte()).await.unwrap();

        assert_eq!(store.history().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn foreign_history_entries_are_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        std::fs::write(store.history_path(), r#"[{"legacy": true}]"#).unwrap();

        store.save(&latte()).await.unwrap();

        let raw = read_json(store.history_path());
        let entries = raw.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["legacy"], true);

        // Decoding skips the entry that is not an order
        let history = store.history().await.unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn history_failure_does_not_fail_save() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the history file should be makes both read and write fail
        let history_path = dir.path().join("history");
        std::fs::create_dir(&history_path).unwrap();
        let store = JsonFileStore::new(&history_path, dir.path().join(SUMMARY_FILE));

        let outcome = store.save(&latte()).await.unwrap();
        assert!(!outcome.history_written);

        let latest = store.latest().await.unwrap().unwrap();
        assert!(latest.matches(&latte()));
    }

    #[tokio::test]
    async fn snapshot_failure_fails_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(
            dir.path().join(HISTORY_FILE),
            dir.path().join("missing").join(SUMMARY_FILE),
        );

        let err = store.save(&latte()).await.unwrap_err();
        assert!(matches!(err, Error::Store(_)), "err: {err}");

        // The history step runs first and is kept even though the save failed
        assert_eq!(store.history().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_documents_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());

        assert!(store.latest().await.unwrap().is_none());
        assert!(store.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        std::fs::write(store.summary_path(), "not json").unwrap();

        assert!(store.latest().await.is_err());
    }

    #[tokio::test]
    async fn concurrent_saves_keep_every_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonFileStore::in_dir(dir.path()));

        let saves = (0..16).map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let details = OrderDetails::new("Latte", "Small", "Oat", "None", format!("guest-{i}"));
                store.save(&details).await
            })
        });
        for result in futures::future::join_all(saves).await {
            result.unwrap().unwrap();
        }

        let history = store.history().await.unwrap();
        assert_eq!(history.len(), 16);
        for i in 0..16 {
            let name = format!("guest-{i}");
            assert!(history.iter().any(|r| r.name == name), "missing {name}");
        }

        let latest = store.latest().await.unwrap().unwrap();
        assert!(latest.name.starts_with("guest-"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn reads_during_saves_see_whole_documents() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonFileStore::in_dir(dir.path()));
        for _ in 0..20 {
            store.save(&latte()).await.unwrap();
        }

        let writer = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                for i in 0..100 {
                    let details = OrderDetails::new("Mocha", "Large", "Soy", "None", format!("late-{i}"));
                    store.save(&details).await.unwrap();
                }
            })
        };

        let mut seen = 20;
        while !writer.is_finished() {
            let latest = store.latest().await.unwrap();
            assert!(latest.is_some());

            let count = store.history().await.unwrap().len();
            assert!(count >= seen, "history shrank from {seen} to {count}");
            seen = count;
            tokio::task::yield_now().await;
        }
        writer.await.unwrap();

        assert_eq!(store.history().await.unwrap().len(), 120);
    }
}
