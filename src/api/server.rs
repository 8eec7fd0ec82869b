//! ProfitView HTTP server
//!
//! Axum router for the upload page and the JSON endpoints.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::chart::ChartOptions;
use crate::storage::{UploadStore, DEFAULT_UPLOAD_DIR};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub chart: ChartOptions,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            chart: ChartOptions::default(),
        }
    }
}

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub version: String,
    pub uploads: UploadStore,
    pub chart: ChartOptions,
}

impl AppState {
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            uploads: UploadStore::new(config.upload_dir.clone()),
            chart: config.chart,
        }
    }
}

/// Routes and middleware, without binding a socket
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::upload))
        .route("/api/v1/summary", post(handlers::summary))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        .with_state(state)
        // uploads are not size-limited
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until Ctrl+C / SIGTERM
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "profitview_server=info,royalbit_profitview=info,tower_http=info".into()
            }),
        )
        .init();

    let state = AppState::from_config(&config);
    state.uploads.ensure_dir()?;
    let upload_dir = state.uploads.dir().display().to_string();

    let app = build_router(Arc::new(state));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("ProfitView server starting on http://{}", addr);
    info!("   Upload form: /, JSON: /api/v1/summary");
    info!("   Uploads stored in {}", upload_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("ProfitView server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
