//! reCAPTCHA verification function host.
//!
//! Serves the verification handler over HTTP:
//! - `/` and `/verify` for browsers (CORS preflight included)
//! - `/invoke` for platform-style JSON events
//! - `/health` for liveness checks

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use captcha_verify::verify::HttpVerifier;
use captcha_verify::web::{router, AppState};
use captcha_verify::{Config, Handler};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("verify_function_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        secret_configured = config.recaptcha_secret.is_some(),
        relay_verified_as_success = config.relay_verified_as_success,
        "config_loaded"
    );

    if config.recaptcha_secret.is_none() {
        warn!("recaptcha_secret_not_configured");
    }

    let client = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;
    let verifier = HttpVerifier::new(client);
    info!(url = verifier.url(), "verifier_created");

    let handler = Handler::from_config(&config, Arc::new(verifier));
    let app = router(AppState::new(handler));

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "verify_function_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("verify_function_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("verify_function_shutting_down");
}
