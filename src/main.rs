use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ward_core::config::{
    backend_from_env_value, credentials_from_env_values, request_timeout_from_env_value,
};
use ward_core::{constants::DEFAULT_REST_ADDR, CoreConfig, Services};

/// Main entry point for the ward front office
///
/// Resolves configuration from the environment (and a `.env` file, if present), connects to
/// the data backend and serves the REST API with its Swagger UI.
///
/// # Environment Variables
/// - `WARD_DATA_BACKEND`: `http` (default) or `memory`
/// - `WARD_DATA_URL`, `WARD_PROJECT_ID`, `WARD_PUBLIC_KEY`: platform credentials, set together
/// - `WARD_REQUEST_TIMEOUT_SECS`: platform request timeout (default: 30)
/// - `WARD_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is incomplete or malformed,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("ward=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let backend = backend_from_env_value(std::env::var("WARD_DATA_BACKEND").ok())?;
    let credentials = credentials_from_env_values(
        std::env::var("WARD_DATA_URL").ok(),
        std::env::var("WARD_PROJECT_ID").ok(),
        std::env::var("WARD_PUBLIC_KEY").ok(),
    )?;
    let timeout = request_timeout_from_env_value(std::env::var("WARD_REQUEST_TIMEOUT_SECS").ok())?;
    let cfg = CoreConfig::new(backend, credentials, timeout)?;

    let rest_addr = std::env::var("WARD_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    tracing::info!("++ Starting ward on {} ({} backend)", rest_addr, cfg.backend());

    let services = Services::connect(&cfg)?;
    api_rest::serve(&rest_addr, services).await?;

    Ok(())
}
