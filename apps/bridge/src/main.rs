//! Bridge entry point.
//!
//! Startup order matters: the broker connection and the retained
//! discovery publish must succeed before the HTTP listener accepts the
//! first snapshot, so a misconfigured process never reports ready.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gsibridge_ingest::{AppState, create_router};
use gsibridge_mqtt::{MqttPublisher, SensorCatalog, publish_discovery};

use crate::config::BridgeConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = BridgeConfig::from_env()?;
    info!(
        broker = %config.mqtt.broker,
        port = config.mqtt.port,
        base_topic = %config.mqtt.base_topic,
        discovery_prefix = %config.discovery_prefix,
        http_port = config.http_port,
        catalog = %config.catalog_path.display(),
        "starting gsibridge"
    );

    let catalog = SensorCatalog::load(&config.catalog_path)?;
    info!(sensors = catalog.len(), "sensor catalog loaded");

    let publisher = MqttPublisher::connect(&config.mqtt)
        .await
        .context("broker unreachable")?;
    info!("connected to MQTT broker");

    publish_discovery(&publisher, &catalog, &config.discovery_prefix).await?;

    let state = Arc::new(AppState { publisher });
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind HTTP listener")?;
    info!("listening for snapshots on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gsibridge stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
