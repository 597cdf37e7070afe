//! osbmuxd - Open Service Broker multiplexer daemon
//!
//! Registers one backend broker with a platform many times over. Each
//! registration points at `http://<host>:<port>/<suffix>` and sees the
//! backend catalog with `-<suffix>` appended to every identifier.
//!
//! Usage:
//!   osbmuxd --backend-url http://localhost:8080
//!   BACKEND_BROKER=http://localhost:8080 PORT=3000 osbmuxd
//!   osbmuxd --config osbmux.toml

use anyhow::Context;
use clap::Parser;
use osbmux_api::{create_router, AppState};
use osbmux_client::BrokerClient;
use osbmuxd::config::{Args, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    osbmuxd::init_logging(args.log_json);

    tracing::info!("Starting osbmuxd (Open Service Broker multiplexer)");

    // Resolve configuration; a missing backend URL stops here
    let config = Config::resolve(&args).context("invalid configuration")?;
    tracing::info!(
        backend = %config.backend.url(),
        timeout_secs = config.timeout.as_secs(),
        strip_query_suffix = config.relay.strip_query_suffix,
        "Relaying to backend broker"
    );

    let client = BrokerClient::with_config(
        config.backend.clone(),
        config.timeout,
        config.connect_timeout,
    )
    .context("failed to build backend broker client")?;

    let state = AppState::with_options(client, config.relay);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    tracing::info!("Listening on http://{}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(osbmuxd::shutdown_signal())
        .await?;

    tracing::info!("osbmuxd stopped");
    Ok(())
}
