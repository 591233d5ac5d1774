//! Application startup and lifecycle management.

use crate::config::{LedgerConfig, StoreBackend};
use crate::handlers;
use crate::services::{InMemoryLedgerStore, LedgerStore, MongoDb, MongoLedgerStore};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: LedgerConfig,
    pub store: Arc<dyn LedgerStore>,
}

/// Every HTTP route of the service.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/dashboard", get(handlers::dashboard))
        .route("/reports/:month", get(handlers::report))
        .route(
            "/records",
            get(handlers::list_records).post(handlers::create_record),
        )
        .route("/records/search", get(handlers::search_records))
        .route(
            "/records/:id",
            get(handlers::get_record)
                .patch(handlers::update_record)
                .delete(handlers::delete_record),
        )
        .route("/meta", get(handlers::meta))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

async fn connect_store(config: &LedgerConfig) -> Result<Arc<dyn LedgerStore>, AppError> {
    match config.store.backend {
        StoreBackend::MongoDb => {
            let uri = config.mongodb.uri.as_deref().ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!("MONGODB_URI is required for the mongodb backend"))
            })?;
            let db = MongoDb::connect(uri, &config.mongodb.database, &config.mongodb.collection)
                .await?;
            db.initialize_indexes().await.map_err(|e| {
                tracing::error!(error = %e, "Failed to initialize database indexes");
                e
            })?;
            Ok(Arc::new(MongoLedgerStore::new(db)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory ledger store; records are lost on restart");
            Ok(Arc::new(InMemoryLedgerStore::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application, connecting the store the configuration selects.
    pub async fn build(config: LedgerConfig) -> Result<Self, AppError> {
        let store = connect_store(&config).await?;
        Self::build_with_store(config, store).await
    }

    /// Build the application around an already constructed store.
    /// Tests use this with the in-memory backend.
    pub async fn build_with_store(
        config: LedgerConfig,
        store: Arc<dyn LedgerStore>,
    ) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, "Rent ledger listener bound");

        Ok(Self {
            port,
            listener,
            state: AppState { config, store },
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn store(&self) -> Arc<dyn LedgerStore> {
        self.state.store.clone()
    }

    /// Serve until SIGINT or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!(
            service = "rent-ledger-service",
            version = env!("CARGO_PKG_VERSION"),
            port = self.port,
            "Service ready to accept connections"
        );

        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}
