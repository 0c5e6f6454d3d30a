//! Process configuration, read once from the environment.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use gsibridge_mqtt::MqttConfig;

/// Immutable bridge configuration assembled at startup and passed
/// explicitly to the components that need it.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub mqtt: MqttConfig,
    pub discovery_prefix: String,
    pub http_port: u16,
    pub catalog_path: PathBuf,
}

impl BridgeConfig {
    /// Reads configuration from the environment. `MQTT_BROKER` is the
    /// only required variable; everything else has a default.
    pub fn from_env() -> Result<Self> {
        let broker = env::var("MQTT_BROKER").context("MQTT_BROKER must be set")?;
        let port = env_or("MQTT_PORT", "1883")
            .parse()
            .context("MQTT_PORT must be a port number")?;
        let base_topic = env_or("MQTT_BASE_TOPIC", "dota2");
        let discovery_prefix = env_or("HASS_DISCOVERY_PREFIX", "homeassistant");
        let http_port = env_or("HTTP_PORT", "8000")
            .parse()
            .context("HTTP_PORT must be a port number")?;
        let catalog_path = PathBuf::from(env_or("SENSOR_CATALOG", "sensors.json"));

        Ok(Self {
            mqtt: MqttConfig {
                broker,
                port,
                client_id: "gsibridge".into(),
                base_topic,
            },
            discovery_prefix,
            http_port,
            catalog_path,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
