//! ServerBuilder for fluent API to build HTTP servers

use super::handlers::AppState;
use super::router::build_router;
use crate::config::AppConfig;
use crate::core::auth::TokenValidator;
use crate::core::service::CinemaService;
use crate::core::store::CinemaStore;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder wiring a store and a token validator into an HTTP router
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(InMemoryCinemaStore::new())
///     .with_validator(StaticTokenValidator::new().allow("dev"))
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn CinemaStore>>,
    validator: Option<Arc<dyn TokenValidator>>,
    allow_scan: bool,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            store: None,
            validator: None,
            allow_scan: true,
            custom_routes: Vec::new(),
        }
    }

    /// Set the record store (required)
    pub fn with_store(self, store: impl CinemaStore + 'static) -> Self {
        self.with_store_arc(Arc::new(store))
    }

    pub fn with_store_arc(mut self, store: Arc<dyn CinemaStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the token validator (required)
    pub fn with_validator(self, validator: impl TokenValidator + 'static) -> Self {
        self.with_validator_arc(Arc::new(validator))
    }

    pub fn with_validator_arc(mut self, validator: Arc<dyn TokenValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Allow or refuse searches without a tenant
    pub fn with_scan(mut self, allow_scan: bool) -> Self {
        self.allow_scan = allow_scan;
        self
    }

    /// Apply the settings of a loaded configuration
    pub fn with_config(self, config: &AppConfig) -> Self {
        self.with_scan(config.allow_scan)
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the operation layer without any HTTP routing
    pub fn build_service(&mut self) -> Result<CinemaService> {
        let store = self
            .store
            .take()
            .ok_or_else(|| anyhow::anyhow!("CinemaStore is required. Call .with_store()"))?;
        let validator = self.validator.take().ok_or_else(|| {
            anyhow::anyhow!("TokenValidator is required. Call .with_validator()")
        })?;

        Ok(CinemaService::new(store, validator).with_scan(self.allow_scan))
    }

    /// Build the final router
    pub fn build(mut self) -> Result<Router> {
        let service = self.build_service()?;
        let custom_routes = std::mem::take(&mut self.custom_routes);
        Ok(build_router(AppState::new(service), custom_routes))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Handles SIGTERM and SIGINT (Ctrl+C).
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for a shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
