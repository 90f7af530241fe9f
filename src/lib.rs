//! Barista Gateway - order-taking backend for voice coffee-shop assistants
//!
//! An external voice-agent runtime handles audio, speech recognition, the
//! language model and speech synthesis. This crate provides what it calls
//! into once an order is complete:
//! - the `finalize_order` tool and its spoken reply
//! - order persistence (history and latest-order documents)
//! - an HTTP API for the runtime and the shop UI
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────┐     ┌──────────────────┐
//! │   Voice agent runtime      │     │     Shop UI      │
//! └─────────────┬──────────────┘     └────────┬─────────┘
//!               │ finalize_order              │ GET /api/order-summary
//! ┌─────────────▼─────────────────────────────▼─────────┐
//! │                  Barista Gateway                     │
//! │     OrderTools  ──►  OrderStore (history, summary)   │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod order;
pub mod prompt;
pub mod store;
pub mod tools;

pub use config::Config;
pub use error::{Error, Result};
pub use order::{OrderDetails, OrderIdGenerator, OrderRecord};
pub use store::{JsonFileStore, MemoryStore, OrderStore, SaveOutcome};
pub use tools::{OrderTools, ToolDefinition, ToolReply};
