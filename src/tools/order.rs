//! Order tools exposed to the voice agent
//!
//! `finalize_order` is the point where a conversation turns into a stored
//! order. Its reply is spoken back to the customer, so it always produces a
//! sentence: store errors become an apology instead of propagating into the
//! agent runtime.

use std::fmt;
use std::sync::Arc;

use super::ToolDefinition;
use crate::order::OrderDetails;
use crate::store::{OrderStore, SaveOutcome};
use crate::{Error, Result};

/// Name of the finalize tool as the agent calls it
pub const FINALIZE_ORDER: &str = "finalize_order";

/// Default minutes quoted to the customer
pub const DEFAULT_READY_MINUTES: u32 = 5;

/// Reply returned when an order could not be saved
pub const APOLOGY: &str = "Sorry, there was an error. Please try again.";

/// What the agent is told after a finalize call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolReply {
    /// The order was saved; quote the ready time
    Confirmed { ready_minutes: u32 },
    /// Something failed; apologize without detail
    Apology,
}

impl ToolReply {
    /// Map a save result to a reply; every error kind apologizes the same way
    #[must_use]
    pub fn from_outcome(outcome: &Result<SaveOutcome>, ready_minutes: u32) -> Self {
        match outcome {
            Ok(_) => Self::Confirmed { ready_minutes },
            Err(_) => Self::Apology,
        }
    }
}

impl fmt::Display for ToolReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed { ready_minutes: 1 } => f.write_str(
                "Order placed successfully! Tell the customer their coffee will be ready in 1 minute.",
            ),
            Self::Confirmed { ready_minutes } => write!(
                f,
                "Order placed successfully! Tell the customer their coffee will be ready in {ready_minutes} minutes."
            ),
            Self::Apology => f.write_str(APOLOGY),
        }
    }
}

/// Order tools bound to a store
#[derive(Clone)]
pub struct OrderTools {
    store: Arc<dyn OrderStore>,
    ready_minutes: u32,
}

impl OrderTools {
    /// Create order tools saving into `store`
    #[must_use]
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self {
            store,
            ready_minutes: DEFAULT_READY_MINUTES,
        }
    }

    /// Override the ready time quoted after a successful order
    #[must_use]
    pub fn with_ready_minutes(mut self, minutes: u32) -> Self {
        self.ready_minutes = minutes;
        self
    }

    /// The store orders are saved into
    #[must_use]
    pub fn store(&self) -> &Arc<dyn OrderStore> {
        &self.store
    }

    /// Return tool definitions for all order tools
    #[must_use]
    pub fn tool_definitions() -> Vec<ToolDefinition> {
        vec![ToolDefinition::function(
            FINALIZE_ORDER,
            "Finalize and save the customer's coffee order. Call this ONLY after collecting all 5 required details.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "drink_type": {
                        "type": "string",
                        "description": "Type of coffee (Latte, Cappuccino, etc.)"
                    },
                    "size": {
                        "type": "string",
                        "description": "Size of drink (Small, Medium, Large)"
                    },
                    "milk": {
                        "type": "string",
                        "description": "Milk preference (Whole, Oat, Almond, Soy, etc.)"
                    },
                    "extras": {
                        "type": "string",
                        "description": "Extra items (Sugar, Whipped Cream, etc. or \"None\")"
                    },
                    "name": {
                        "type": "string",
                        "description": "Customer's name"
                    }
                },
                "required": ["drink_type", "size", "milk", "extras", "name"]
            }),
        )]
    }

    /// Execute a named order tool with JSON-encoded arguments
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown tool and [`Error::Tool`] if
    /// the arguments do not decode. Save failures are not errors; they come
    /// back as the apology reply.
    pub async fn execute(&self, name: &str, arguments: &str) -> Result<String> {
        match name {
            FINALIZE_ORDER => {
                let details: OrderDetails = serde_json::from_str(arguments).map_err(|e| {
                    Error::Tool(format!("{FINALIZE_ORDER}: invalid arguments: {e}"))
                })?;
                Ok(self.finalize_order(&details).await)
            }
            _ => Err(Error::NotFound(format!("unknown order tool: {name}"))),
        }
    }

    /// Save a finalized order and return the sentence for the agent to relay
    pub async fn finalize_order(&self, details: &OrderDetails) -> String {
        tracing::info!(
            customer = %details.name,
            drink_type = %details.drink_type,
            size = %details.size,
            milk = %details.milk,
            extras = %details.extras,
            "finalizing order for {}: {}",
            details.name,
            details
        );

        let outcome = self.store.save(details).await;
        match &outcome {
            Ok(saved) => tracing::info!(
                id = saved.record.id,
                history_written = saved.history_written,
                "order result: {saved}"
            ),
            Err(e) => tracing::error!(error = %e, "error saving order"),
        }

        ToolReply::from_outcome(&outcome, self.ready_minutes).to_string()
    }
}
