//! Home Assistant MQTT discovery.
//!
//! Publishes one retained config message per catalog sensor at startup
//! so the hub auto-registers every sensor before the first snapshot
//! arrives, and keeps it registered across broker restarts.

use serde::Serialize;

use crate::catalog::{SensorCatalog, SensorSpec};
use crate::publisher::{MqttPublisher, OutboundMessage};
use crate::{PublishError, StartupError};

/// Fixed device block grouping every sensor under one hub device.
#[derive(Debug, Serialize)]
struct DeviceInfo {
    identifiers: [&'static str; 1],
    name: &'static str,
    model: &'static str,
    manufacturer: &'static str,
}

const DEVICE: DeviceInfo = DeviceInfo {
    identifiers: ["dota2_gsi"],
    name: "Dota 2",
    model: "Game State Integration",
    manufacturer: "Valve",
};

/// Discovery payload for one sensor, shaped to Home Assistant's MQTT
/// discovery schema.
#[derive(Debug, Serialize)]
struct SensorDiscovery<'a> {
    name: &'a str,
    unique_id: String,
    state_topic: String,
    value_template: &'a str,
    icon: &'a str,
    device: DeviceInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit_of_measurement: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_class: Option<&'a str>,
}

/// Topic a sensor's discovery config is published to.
fn discovery_topic(prefix: &str, sensor_id: &str) -> String {
    format!("{prefix}/sensor/dota2/{sensor_id}/config")
}

/// Section whose runtime topic feeds the sensor: the id's first
/// underscore-delimited segment (`hero_level` → `hero`).
fn sensor_section(sensor_id: &str) -> &str {
    sensor_id.split('_').next().unwrap_or(sensor_id)
}

fn sensor_payload<'a>(
    sensor_id: &str,
    spec: &'a SensorSpec,
    base_topic: &str,
) -> SensorDiscovery<'a> {
    SensorDiscovery {
        name: &spec.name,
        unique_id: format!("dota2_{sensor_id}"),
        state_topic: format!("{base_topic}/{}", sensor_section(sensor_id)),
        value_template: &spec.value_template,
        icon: &spec.icon,
        device: DEVICE,
        unit_of_measurement: spec.unit(),
        device_class: spec.device_class(),
    }
}

/// Builds the retained discovery config message for every catalog
/// sensor. One message per entry, in catalog order.
fn discovery_messages(
    catalog: &SensorCatalog,
    prefix: &str,
    base_topic: &str,
) -> Result<Vec<OutboundMessage>, PublishError> {
    catalog
        .iter()
        .map(|(sensor_id, spec)| {
            Ok(OutboundMessage {
                topic: discovery_topic(prefix, sensor_id),
                payload: serde_json::to_vec(&sensor_payload(sensor_id, spec, base_topic))?,
                retain: true,
            })
        })
        .collect()
}

/// Publishes the retained discovery config for every catalog sensor.
///
/// Runs once per process lifetime, before the ingest endpoint opens. A
/// failed publish here is fatal: the hub would silently miss sensors
/// for as long as the process lives.
pub async fn publish_discovery(
    publisher: &MqttPublisher,
    catalog: &SensorCatalog,
    discovery_prefix: &str,
) -> Result<(), StartupError> {
    let messages = discovery_messages(catalog, discovery_prefix, publisher.base_topic())
        .map_err(StartupError::Discovery)?;
    for message in messages {
        let topic = message.topic.clone();
        publisher
            .publish(message)
            .await
            .map_err(StartupError::Discovery)?;
        tracing::debug!(%topic, "published discovery config");
    }
    tracing::info!(sensors = catalog.len(), "Home Assistant discovery configured");
    Ok(())
}
