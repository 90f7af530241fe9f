//! HTTP API server for the barista gateway
//!
//! Serves the order documents to the shop UI and exposes the order tools to
//! an external voice-agent runtime.

pub mod health;
pub mod orders;
pub mod tools;

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::prompt::build_instructions;
use crate::tools::OrderTools;
use crate::Result;

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Order tools bound to the active store
    pub tools: OrderTools,
    /// Agent instructions served to the runtime
    pub instructions: String,
}

impl ApiState {
    /// Build API state from configuration, opening the configured file store
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let store = Arc::new(config.store.open());
        Self {
            tools: OrderTools::new(store).with_ready_minutes(config.shop.ready_minutes),
            instructions: build_instructions(&config.shop.name, config.shop.ready_minutes),
        }
    }
}

/// JSON error body shared by handlers
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    /// Create a new API server
    #[must_use]
    pub fn new(state: ApiState, port: u16) -> Self {
        Self {
            state: Arc::new(state),
            port,
        }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Run the API server until Ctrl-C
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run the API server until `shutdown` resolves
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run_until(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        tracing::info!("API server stopped");
        Ok(())
    }
}

/// Assemble every route over shared state
pub fn build_router(state: Arc<ApiState>) -> Router {
    let api = orders::router(state.clone()).merge(tools::router(state));

    // CORS layer for cross-origin requests from the order UI
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api)
        .merge(health::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
