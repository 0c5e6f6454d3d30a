//! Broker connection and per-snapshot topic fan-out.

use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use serde::Serialize;

use gsibridge_gamestate::GameState;

use crate::{PublishError, StartupError};

/// Outstanding-request queue between client handles and the event loop.
const EVENT_QUEUE_CAPACITY: usize = 64;

/// Pause between reconnect attempts after a connection error.
const RECONNECT_PAUSE: Duration = Duration::from_secs(3);

/// Broker connection settings.
#[derive(Debug, Clone)]
pub struct MqttConfig {
    pub broker: String,
    pub port: u16,
    pub client_id: String,
    /// Root topic segment under which per-section topics are nested.
    pub base_topic: String,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker: "localhost".into(),
            port: 1883,
            client_id: "gsibridge".into(),
            base_topic: "dota2".into(),
        }
    }
}

/// One serialized message ready for the broker.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
    /// Set only on discovery configs, which must survive broker
    /// restarts and late hub subscriptions.
    pub retain: bool,
}

/// Maps the publishable sections of a snapshot to their topics.
///
/// Only `player`, `hero` and `map` have downstream consumers; provider
/// and the opaque pass-through sections stay internal. Sections the
/// snapshot does not carry produce no message. Cross-section order
/// carries no meaning.
pub fn outbound_messages(state: &GameState, base_topic: &str) -> Vec<OutboundMessage> {
    let mut messages = Vec::with_capacity(3);
    if let Some(player) = &state.player {
        messages.extend(section_message(base_topic, "player", player));
    }
    if let Some(hero) = &state.hero {
        messages.extend(section_message(base_topic, "hero", hero));
    }
    if let Some(map) = &state.map {
        messages.extend(section_message(base_topic, "map", map));
    }
    messages
}

fn section_message<T: Serialize>(
    base_topic: &str,
    section: &str,
    record: &T,
) -> Option<OutboundMessage> {
    match serde_json::to_vec(record) {
        Ok(payload) => Some(OutboundMessage {
            topic: format!("{base_topic}/{section}"),
            payload,
            retain: false,
        }),
        Err(e) => {
            tracing::error!(section, "failed to serialize section: {e}");
            None
        }
    }
}

/// Shared handle to the broker connection.
///
/// Cheap to clone: publishes go through the channel behind the rumqttc
/// [`AsyncClient`], so all in-flight requests share one connection
/// without extra locking.
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
    base_topic: String,
}

impl MqttPublisher {
    /// Connects to the broker and spawns the connection event loop.
    ///
    /// Waits for the broker's CONNACK so an unreachable broker fails
    /// startup instead of surfacing later as dropped publishes.
    pub async fn connect(config: &MqttConfig) -> Result<Self, StartupError> {
        let mut options = MqttOptions::new(&config.client_id, &config.broker, config.port);
        options.set_keep_alive(Duration::from_secs(30));

        let (client, mut event_loop) = AsyncClient::new(options, EVENT_QUEUE_CAPACITY);
        wait_for_connack(&mut event_loop).await?;
        tokio::spawn(drive_connection(event_loop));

        Ok(Self::from_client(client, &config.base_topic))
    }

    /// Wraps an already-created client handle.
    ///
    /// Used by [`MqttPublisher::connect`] and by tests that need a
    /// publisher without a live broker.
    pub fn from_client(client: AsyncClient, base_topic: &str) -> Self {
        Self {
            client,
            base_topic: base_topic.to_string(),
        }
    }

    pub fn base_topic(&self) -> &str {
        &self.base_topic
    }

    /// Publishes every present publishable section of a snapshot.
    ///
    /// Each section is independent and best-effort at QoS 1: a failure
    /// is logged and the remaining sections are still attempted. The
    /// ingest caller never sees publish failures.
    pub async fn publish_state(&self, state: &GameState) {
        for message in outbound_messages(state, &self.base_topic) {
            let topic = message.topic.clone();
            if let Err(e) = self.publish(message).await {
                tracing::error!(%topic, "section publish failed: {e}");
            }
        }
    }

    /// Publishes one prepared message at QoS 1.
    pub(crate) async fn publish(&self, message: OutboundMessage) -> Result<(), PublishError> {
        self.client
            .publish(
                message.topic,
                QoS::AtLeastOnce,
                message.retain,
                message.payload,
            )
            .await?;
        Ok(())
    }
}

async fn wait_for_connack(event_loop: &mut EventLoop) -> Result<(), rumqttc::ConnectionError> {
    loop {
        if let Event::Incoming(Packet::ConnAck(_)) = event_loop.poll().await? {
            return Ok(());
        }
    }
}

/// Keeps the connection alive after startup.
///
/// rumqttc reconnects on the poll after an error; the pause keeps a
/// downed broker from turning this into a busy loop.
async fn drive_connection(mut event_loop: EventLoop) {
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::Disconnect)) => {
                tracing::warn!("broker requested disconnect");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("MQTT connection error: {e}");
                tokio::time::sleep(RECONNECT_PAUSE).await;
            }
        }
    }
}
