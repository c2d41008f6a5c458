use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the EMIS application
///
/// Serves the registration form, the scan lookup page and the JSON API on one address.
///
/// # Environment Variables
/// - `EMIS_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `EMIS_DATABASE_PATH`: SQLite file (default: "patients.db")
/// - `EMIS_BASE_URL`: Public origin embedded in patient links (default: "http://localhost:3000")
/// - `EMIS_QR_DIR`: Directory for generated codes (default: "qr_codes")
/// - `EMIS_SHEET_ID`: Spreadsheet to mirror into; unset disables the mirror
/// - `EMIS_CREDENTIALS_PATH`: Service-account key file (default: "mainCredentials.json")
/// - `EMIS_API_KEY`: Key for admin endpoints; unset disables them
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("emis_run=info".parse()?)
                .add_directive("emis_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var(api_rest::ENV_REST_ADDR)
        .unwrap_or_else(|_| api_rest::DEFAULT_REST_ADDR.into());

    tracing::info!("++ Starting EMIS on {}", rest_addr);

    let rest_app = api_rest::router(api_rest::state_from_env()?);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, rest_app).await?;

    Ok(())
}
