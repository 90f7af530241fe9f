//! Shared test utilities

#![allow(dead_code)]

use std::sync::Arc;

use barista_gateway::api::{self, ApiState};
use barista_gateway::prompt::{DEFAULT_SHOP_NAME, build_instructions};
use barista_gateway::{JsonFileStore, OrderDetails, OrderStore, OrderTools};
use tempfile::TempDir;

/// A file store rooted in a fresh temporary directory
pub fn setup_test_store() -> (TempDir, Arc<JsonFileStore>) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let store = Arc::new(JsonFileStore::in_dir(dir.path()));
    (dir, store)
}

/// Build the full API router over `store`
pub fn build_test_router(store: Arc<dyn OrderStore>) -> axum::Router {
    let state = ApiState {
        tools: OrderTools::new(store),
        instructions: build_instructions(DEFAULT_SHOP_NAME, 5),
    };
    api::build_router(Arc::new(state))
}

/// The example order used throughout the tests
pub fn latte_for_alex() -> OrderDetails {
    OrderDetails::new("Latte", "Medium", "Oat", "None", "Alex")
}

/// Read a JSON document from disk
pub fn read_json(path: &std::path::Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path).expect("failed to read document");
    serde_json::from_str(&content).expect("document is not JSON")
}
