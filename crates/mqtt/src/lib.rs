//! MQTT fan-out for validated game snapshots.
//!
//! Owns the single broker connection, the per-section topic fan-out,
//! and the one-time Home Assistant discovery publish driven by the
//! static sensor catalog. Snapshot publishes are best-effort: a failed
//! write is logged and swallowed, never surfaced to the ingest caller.

mod catalog;
mod discovery;
mod publisher;

pub use catalog::{SensorCatalog, SensorSpec};
pub use discovery::publish_discovery;
pub use publisher::{MqttConfig, MqttPublisher, OutboundMessage, outbound_messages};

/// Errors that prevent the bridge from becoming ready.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to read sensor catalog {path}: {source}")]
    CatalogRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("sensor catalog {path} is malformed: {source}")]
    CatalogParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("MQTT connection failed: {0}")]
    Connect(#[from] rumqttc::ConnectionError),

    #[error("discovery publish failed: {0}")]
    Discovery(#[from] PublishError),
}

/// A failed broker write.
///
/// On the snapshot path these are degraded-service events (logged,
/// swallowed); only the startup discovery pass treats them as fatal.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("MQTT publish failed: {0}")]
    Client(#[from] rumqttc::ClientError),

    #[error("payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
