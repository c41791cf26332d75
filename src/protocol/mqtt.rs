// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT session feeding set requests into a [`Bridge`].
//!
//! The session announces itself on `<prefix>connected`: `2` while connected,
//! and a retained last will of `0` published by the broker when the bridge
//! goes away. Set topics are subscribed again on every (re)connect.

use std::io::Write;

use rumqttc::{AsyncClient, Event, EventLoop, LastWill, MqttOptions, Packet, Publish, QoS};

use crate::bridge::Bridge;
use crate::config::BridgeConfig;
use crate::error::ProtocolError;
use crate::protocol::topic_router::TopicRouter;
use crate::types::DeviceAddress;

/// Status payload while the bridge is connected.
pub const STATUS_CONNECTED: &str = "2";

/// Status payload left behind as last will.
pub const STATUS_DISCONNECTED: &str = "0";

/// Outcome of one polled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The broker acknowledged a (re)connect.
    Connected,
    /// A set request was applied to the device.
    Applied(DeviceAddress),
    /// A set message could not be routed or applied.
    Rejected,
    /// Anything else, including retained messages.
    Ignored,
}

/// A connection to the broker plus the router for its set topics.
///
/// # Examples
///
/// ```no_run
/// use chromobridge::Bridge;
/// use chromobridge::config::BridgeConfig;
/// use chromobridge::protocol::MqttSession;
///
/// # async fn example() -> chromobridge::Result<()> {
/// let config = BridgeConfig::builder()
///     .serial_device("/dev/ttyUSB0")
///     .build()?;
/// let port = std::fs::OpenOptions::new()
///     .write(true)
///     .open(config.serial_device())?;
///
/// let mut bridge = Bridge::new(port);
/// MqttSession::new(&config).run(&mut bridge).await;
/// # Ok(())
/// # }
/// ```
pub struct MqttSession {
    client: AsyncClient,
    event_loop: EventLoop,
    router: TopicRouter,
    retry_delay: std::time::Duration,
}

impl MqttSession {
    /// Prepares a session for `config`.
    ///
    /// Nothing is sent until the session is polled.
    #[must_use]
    pub fn new(config: &BridgeConfig) -> Self {
        let router = TopicRouter::new(config.topic_prefix(), config.default_address());
        let client_id = format!("chromobridge_{}", std::process::id());

        let mut options = MqttOptions::new(client_id, config.mqtt_host(), config.mqtt_port());
        options.set_keep_alive(config.keep_alive());
        options.set_last_will(LastWill::new(
            router.status_topic(),
            STATUS_DISCONNECTED,
            QoS::ExactlyOnce,
            true,
        ));

        let (client, event_loop) = AsyncClient::new(options, 10);

        Self {
            client,
            event_loop,
            router,
            retry_delay: config.retry_delay(),
        }
    }

    /// Returns the router used for incoming messages.
    #[must_use]
    pub fn router(&self) -> &TopicRouter {
        &self.router
    }

    /// Processes the next event from the broker.
    ///
    /// # Errors
    ///
    /// Returns the connection error reported by the event loop. Polling
    /// again reconnects.
    pub async fn poll<W: Write>(
        &mut self,
        bridge: &mut Bridge<W>,
    ) -> Result<SessionEvent, rumqttc::ConnectionError> {
        let event = match self.event_loop.poll().await? {
            Event::Incoming(Packet::ConnAck(connack)) => {
                tracing::info!(?connack, "Connected to MQTT broker");
                if let Err(e) = self.announce() {
                    tracing::warn!(error = %e, "Failed to queue subscription");
                }
                SessionEvent::Connected
            }
            Event::Incoming(Packet::SubAck(suback)) => {
                tracing::debug!(?suback, "MQTT subscription acknowledged");
                SessionEvent::Ignored
            }
            Event::Incoming(Packet::Publish(publish)) => self.handle_publish(bridge, &publish),
            _ => SessionEvent::Ignored,
        };
        Ok(event)
    }

    /// Polls forever, waiting out broker errors.
    pub async fn run<W: Write>(mut self, bridge: &mut Bridge<W>) {
        loop {
            if let Err(e) = self.poll(bridge).await {
                tracing::warn!(
                    error = %e,
                    retry_in = ?self.retry_delay,
                    "MQTT connection error"
                );
                tokio::time::sleep(self.retry_delay).await;
            }
        }
    }

    /// Subscribes to the set topics and publishes the connected status.
    ///
    /// Uses the non-blocking client calls: the request queue is drained by
    /// the same task that calls this.
    fn announce(&self) -> Result<(), ProtocolError> {
        let subscription = self.router.subscription();
        tracing::debug!(topic = %subscription, "Subscribing");
        self.client.try_subscribe(subscription, QoS::AtMostOnce)?;
        self.client.try_publish(
            self.router.status_topic(),
            QoS::AtLeastOnce,
            true,
            STATUS_CONNECTED,
        )?;
        Ok(())
    }

    /// Routes and applies one incoming message.
    fn handle_publish<W: Write>(&self, bridge: &mut Bridge<W>, publish: &Publish) -> SessionEvent {
        if publish.retain {
            tracing::debug!(topic = %publish.topic, "Ignoring retained message");
            return SessionEvent::Ignored;
        }

        tracing::debug!(
            topic = %publish.topic,
            payload = %String::from_utf8_lossy(&publish.payload),
            "MQTT message received"
        );

        let request = match self.router.parse(&publish.topic, &publish.payload) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(topic = %publish.topic, error = %e, "Unparsable message");
                return SessionEvent::Rejected;
            }
        };

        match bridge.handle(&request) {
            Ok(()) => SessionEvent::Applied(request.address),
            Err(e) => {
                tracing::warn!(
                    topic = %publish.topic,
                    address = %request.address,
                    error = %e,
                    "Failed to apply set request"
                );
                SessionEvent::Rejected
            }
        }
    }
}

impl std::fmt::Debug for MqttSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MqttSession")
            .field("router", &self.router)
            .field("retry_delay", &self.retry_delay)
            .finish_non_exhaustive()
    }
}
