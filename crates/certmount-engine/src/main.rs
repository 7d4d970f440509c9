//! certmount server binary
//!
//! Runs the engine's HTTP surface over the in-memory storage backend.

use std::env;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use certmount_engine::{create_router, Backend, ClusterRole, MemoryStorage};

#[tokio::main]
async fn main() {
    // Initialize logging
    let log_level = env::var("CERTMOUNT_LOG_LEVEL")
        .unwrap_or_else(|_| "info".into())
        .parse()
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    // Configuration
    let port: u16 = env::var("CERTMOUNT_PORT")
        .unwrap_or_else(|_| "8200".into())
        .parse()
        .expect("CERTMOUNT_PORT must be a valid port number");

    let role: ClusterRole = env::var("CERTMOUNT_CLUSTER_ROLE")
        .unwrap_or_else(|_| "active".into())
        .parse()
        .expect("CERTMOUNT_CLUSTER_ROLE must be active, standby, or performance-secondary");

    // Initialize storage
    // TODO: wire a persistent Storage backend behind a feature flag
    let storage = Arc::new(MemoryStorage::new());

    let backend = Arc::new(Backend::new(storage, role));

    // A fresh in-memory mount has no legacy bundle to carry over, so
    // the migration is trivially complete.
    backend
        .complete_migration()
        .await
        .expect("Failed to record migration state");

    info!(role = %backend.role(), port = port, "Starting certmount server");

    // Build router
    let app = create_router(backend);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    info!(addr = %addr, "certmount listening");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
