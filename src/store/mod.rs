//! Order persistence
//!
//! Every finalized order lands in two documents:
//! - a history document, an append-only JSON array of every order
//! - a snapshot document holding only the most recent order, read by the UI
//!
//! The two are written independently. A failed history write is logged and
//! tolerated; only the snapshot write decides whether a save succeeded.

mod file;
mod memory;

use std::fmt;

use async_trait::async_trait;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::order::{OrderDetails, OrderRecord};
use crate::Result;

/// Default file name of the history document
pub const HISTORY_FILE: &str = "orders_history.json";

/// Default file name of the snapshot document
pub const SUMMARY_FILE: &str = "order_summary.json";

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// The record that was written to the snapshot
    pub record: OrderRecord,
    /// Whether the history append also succeeded
    pub history_written: bool,
}

impl fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Order saved successfully.")
    }
}

/// Storage for finalized orders
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Record a finalized order in the history and snapshot documents
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Store`] if the snapshot could not be written.
    /// History failures never surface here.
    async fn save(&self, details: &OrderDetails) -> Result<SaveOutcome>;

    /// The most recently saved order, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read or decoded
    async fn latest(&self) -> Result<Option<OrderRecord>>;

    /// All recorded orders in insertion order
    ///
    /// # Errors
    ///
    /// Returns an error if the history document cannot be read
    async fn history(&self) -> Result<Vec<OrderRecord>>;
}
