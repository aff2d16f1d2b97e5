//! # Kaimono Server
//!
//! Dev server for the cart service: session routes under `/cart`, admin
//! routes under `/admin/cart`, backed by the in-memory backend.
//!
//! ## Startup Flow
//! ```text
//! tracing init ──► config ──► seed MemoryBackend ──► axum serve
//!                                                       │
//!                                   graceful shutdown ◄─┘ (ctrl-c / SIGTERM)
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `KAIMONO_PORT` - HTTP listen port (default: 8080)
//! - `KAIMONO_BIND_ADDR` - bind address (default: 0.0.0.0)
//! - `RUST_LOG` - tracing filter (default: info)

mod config;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kaimono_core::UserContext;
use kaimono_service::{CartService, MemoryBackend};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(true)
        .init();

    info!("Starting Kaimono server...");

    // Load configuration
    let config = ServerConfig::load()?;
    info!(port = config.port, bind = %config.bind_addr, "Configuration loaded");

    // The dev backend has no session issuance of its own, so seed a couple
    // of well-known sessions to poke the API with.
    let backend = Arc::new(MemoryBackend::new());
    backend.register_session("demo-session").await;
    backend
        .register_user(UserContext {
            user_id: "demo-admin".to_string(),
            session_token: "demo-admin-session".to_string(),
        })
        .await;
    backend.grant_admin("demo-admin").await;
    info!("Seeded demo sessions: demo-session (anonymous), demo-admin-session (admin)");

    // Build the service
    let service = CartService::new(backend.clone(), backend.clone(), backend);
    let app = service.router();

    // Bind and serve
    let bind_addr = config.bind_address();
    let listener = TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
