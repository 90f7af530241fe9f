//! In-memory order store

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{OrderStore, SaveOutcome};
use crate::order::{OrderDetails, OrderIdGenerator, OrderRecord};
use crate::{Error, Result};

#[derive(Debug, Default)]
struct Documents {
    history: Vec<OrderRecord>,
    latest: Option<OrderRecord>,
}

/// Order store that keeps both documents in memory
///
/// Failures can be injected per document to exercise partial-write paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<Documents>,
    ids: OrderIdGenerator,
    fail_history: AtomicBool,
    fail_snapshot: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent history appends fail (or succeed again)
    pub fn set_history_failure(&self, fail: bool) {
        self.fail_history.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent snapshot writes fail (or succeed again)
    pub fn set_snapshot_failure(&self, fail: bool) {
        self.fail_snapshot.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn save(&self, details: &OrderDetails) -> Result<SaveOutcome> {
        let mut docs = self.documents.lock().await;
        let record = self.ids.stamp(details);

        let history_written = if self.fail_history.load(Ordering::SeqCst) {
            tracing::error!(id = record.id, "failed to save order history (injected)");
            false
        } else {
            docs.history.push(record.clone());
            true
        };

        if self.fail_snapshot.load(Ordering::SeqCst) {
            tracing::error!(id = record.id, "failed to save latest order (injected)");
            return Err(Error::Store("snapshot write failed".to_string()));
        }
        docs.latest = Some(record.clone());

        Ok(SaveOutcome {
            record,
            history_written,
        })
    }

    async fn latest(&self) -> Result<Option<OrderRecord>> {
        Ok(self.documents.lock().await.latest.clone())
    }

    async fn history(&self) -> Result<Vec<OrderRecord>> {
        Ok(self.documents.lock().await.history.clone())
    }
}
