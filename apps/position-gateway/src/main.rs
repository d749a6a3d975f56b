//! Position Gateway Binary
//!
//! Starts the position webhook gateway.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin position-gateway
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `GATEWAY_API_KEY`: Shared webhook secret
//! - `PARTNER_BASE_URL`: Base URL of the partner position API
//!
//! ## Optional
//! - `GATEWAY_HTTP_PORT`: HTTP server port (default: 8000)
//! - `GATEWAY_DATA_DIR`: Archive directory (default: data)
//! - `GATEWAY_DB_PATH`: Database file (default: data/positions.db)
//! - `PARTNER_TIMEOUT_SECS`: Outbound request timeout (default: 30)
//! - `PARTNER_SETTLE_DELAY_SECS`: Refresh settling delay (default: 2)
//! - `RUST_LOG`: Log level (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use position_gateway::application::use_cases::{FetchPositionsUseCase, ReceiveWebhookUseCase};
use position_gateway::infrastructure::config::GatewayConfig;
use position_gateway::infrastructure::http::{AppState, create_router};
use position_gateway::infrastructure::partner::PartnerHttpClient;
use position_gateway::infrastructure::persistence::{JsonArchive, PositionDatabase, PositionStore};
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    init_tracing();

    tracing::info!("Starting position gateway");

    let config = GatewayConfig::from_env()?;
    log_config(&config);

    let archive = JsonArchive::open(&config.storage.data_dir)?;
    let database = PositionDatabase::open(&config.storage.db_path.to_string_lossy()).await?;
    let store = Arc::new(PositionStore::new(archive, database));
    let partner = Arc::new(PartnerHttpClient::new(&config.partner)?);

    let state = AppState {
        receive_webhook: Arc::new(ReceiveWebhookUseCase::new(Arc::clone(&store))),
        fetch_positions: Arc::new(FetchPositionsUseCase::new(
            partner,
            store,
            config.partner.settle_delay,
        )),
        api_key: config.api_key.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    let app = create_router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.server.http_port).parse()?;
    tracing::info!(%addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  POST /webhook/positions");
    tracing::info!("  GET  /positions/partner");
    tracing::info!("  POST /positions/partner/refresh");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Position gateway stopped");
    Ok(())
}

/// Load .env file from the current directory, if present.
fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Initialize the tracing subscriber with environment filter.
///
/// Uses static directive strings that are compile-time constants guaranteed to parse.
#[allow(clippy::expect_used)]
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "position_gateway=info"
                    .parse()
                    .expect("static directive 'position_gateway=info' is valid"),
            ),
        )
        .init();
}

/// Log the parsed configuration. Secrets stay out of the log.
fn log_config(config: &GatewayConfig) {
    tracing::info!(
        http_port = config.server.http_port,
        partner_base_url = %config.partner.base_url,
        data_dir = %config.storage.data_dir.display(),
        db_path = %config.storage.db_path.display(),
        settle_delay_secs = config.partner.settle_delay.as_secs(),
        "Configuration loaded"
    );
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed; it is better to fail fast
/// during startup than to have a process that cannot respond to termination.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
