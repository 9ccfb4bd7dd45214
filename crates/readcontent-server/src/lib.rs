//! readcontent-server
//!
//! HTTP front for the ranking read path: `/posts`, `/comments`,
//! `/contributor-id` and `/health`.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use readcontent_core::app::{AppBuilder, ReadService};
use readcontent_pg::PgStore;
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod routes;

use config::Config;
use error::StartupError;
use routes::{comments_handler, contributor_id_handler, health_handler, posts_handler};

pub fn router(service: Arc<ReadService>) -> Router {
    Router::new()
        .route("/posts", get(posts_handler))
        .route("/comments", get(comments_handler))
        .route("/contributor-id", post(contributor_id_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

pub async fn start_server() -> Result<(), StartupError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading configuration...");
    let config = Config::load()?;

    info!("Connecting to storage...");
    let store = Arc::new(PgStore::connect(&config.database_url, config.max_connections).await?);
    let service = AppBuilder::new().with_store(store).build()?;

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, router(Arc::new(service)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(err) => {
                error!(%err, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                error!(%err, "Failed to install signal handler");
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
}
