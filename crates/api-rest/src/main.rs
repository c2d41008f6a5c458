//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful during development when only the HTTP surface is needed. The workspace's main
//! `emis-run` binary serves the same router.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the EMIS REST API server
///
/// # Environment Variables
/// - `EMIS_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `EMIS_API_KEY`: Key for admin endpoints (unset disables them)
/// - `EMIS_*`: Core configuration, see `emis_core::resolve_config`
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid or the store cannot be prepared,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("emis_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var(api_rest::ENV_REST_ADDR)
        .unwrap_or_else(|_| api_rest::DEFAULT_REST_ADDR.into());

    tracing::info!("-- Starting EMIS REST API on {}", addr);

    let app = api_rest::router(api_rest::state_from_env()?);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
