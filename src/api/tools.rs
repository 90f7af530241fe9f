//! Tool invocation endpoints for the agent runtime

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::{ApiState, ErrorBody};
use crate::tools::{OrderTools, ToolDefinition};
use crate::Error;

/// Spoken result of a tool call
#[derive(Debug, Serialize)]
pub struct ToolCallResponse {
    pub result: String,
}

/// Agent instructions response
#[derive(Debug, Serialize)]
pub struct InstructionsResponse {
    pub instructions: String,
}

async fn list_tools() -> Json<Vec<ToolDefinition>> {
    Json(OrderTools::tool_definitions())
}

/// Run a tool with the raw JSON request body as its arguments
async fn call_tool(
    State(state): State<Arc<ApiState>>,
    Path(name): Path<String>,
    body: String,
) -> Response {
    match state.tools.execute(&name, &body).await {
        Ok(result) => Json(ToolCallResponse { result }).into_response(),
        Err(e @ Error::NotFound(_)) => {
            tracing::warn!(tool = %name, error = %e, "unknown tool requested");
            (StatusCode::NOT_FOUND, Json(ErrorBody::new(e.to_string()))).into_response()
        }
        Err(e) => {
            tracing::warn!(tool = %name, error = %e, "rejected tool call");
            (StatusCode::BAD_REQUEST, Json(ErrorBody::new(e.to_string()))).into_response()
        }
    }
}

async fn instructions(State(state): State<Arc<ApiState>>) -> Json<InstructionsResponse> {
    Json(InstructionsResponse {
        instructions: state.instructions.clone(),
    })
}

/// Build tool router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/tools", get(list_tools))
        .route("/tools/{name}", post(call_tool))
        .route("/instructions", get(instructions))
        .with_state(state)
}
