//! Tools the voice agent can call

mod definition;
mod order;

pub use definition::{FunctionDefinition, ToolDefinition};
pub use order::{APOLOGY, DEFAULT_READY_MINUTES, FINALIZE_ORDER, OrderTools, ToolReply};
