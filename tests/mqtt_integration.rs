// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the MQTT session using mockforge-mqtt.

#![cfg(feature = "mqtt")]

use std::time::Duration;

use chromobridge::protocol::{MqttSession, SessionEvent};
use chromobridge::{Bridge, BridgeConfig};
use mockforge_mqtt::broker::MqttConfig;
use mockforge_mqtt::start_mqtt_server;
use tokio::time::{sleep, timeout};

/// Helper to find an available port for testing.
fn get_test_port() -> u16 {
    use std::sync::atomic::{AtomicU16, Ordering};
    static PORT_COUNTER: AtomicU16 = AtomicU16::new(18950);
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Starts a mock MQTT broker on the given port.
async fn start_mock_broker(port: u16) {
    let config = MqttConfig {
        port,
        host: "127.0.0.1".to_string(),
        ..Default::default()
    };

    tokio::spawn(async move {
        let _ = start_mqtt_server(config).await;
    });

    // Give the broker time to bind before clients connect
    sleep(Duration::from_millis(500)).await;
}

fn config(port: u16) -> BridgeConfig {
    BridgeConfig::builder()
        .mqtt_host("127.0.0.1")
        .mqtt_port(port)
        .topic_prefix("chromo")
        .serial_device("/dev/null")
        .retry_delay(Duration::from_millis(50))
        .build()
        .unwrap()
}

/// Polls until the broker acknowledges the connection.
async fn poll_until_connected(session: &mut MqttSession, bridge: &mut Bridge<Vec<u8>>) {
    let result = timeout(Duration::from_secs(5), async {
        loop {
            match session.poll(bridge).await {
                Ok(SessionEvent::Connected) => return,
                Ok(_) => {}
                Err(e) => panic!("connection failed: {e}"),
            }
        }
    })
    .await;
    assert!(result.is_ok(), "no ConnAck within 5s");
}

mod session_connection {
    use super::*;

    #[tokio::test]
    async fn connects_to_broker() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let mut session = MqttSession::new(&config(port));
        let mut bridge = Bridge::new(Vec::new());
        poll_until_connected(&mut session, &mut bridge).await;

        assert_eq!(session.router().subscription(), "chromo/set/#");
        assert_eq!(bridge.synchronizer().writer().frames_sent(), 0);
    }

    #[tokio::test]
    async fn keeps_polling_after_announce() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let mut session = MqttSession::new(&config(port));
        let mut bridge = Bridge::new(Vec::new());
        poll_until_connected(&mut session, &mut bridge).await;

        // subscribe and status publish go out on the next polls
        for _ in 0..2 {
            let event = timeout(Duration::from_secs(5), session.poll(&mut bridge)).await;
            assert!(matches!(event, Ok(Ok(_))));
        }
    }

    #[tokio::test]
    async fn missing_broker_reports_error() {
        let port = get_test_port();

        let mut session = MqttSession::new(&config(port));
        let mut bridge = Bridge::new(Vec::new());
        let result = timeout(Duration::from_secs(5), session.poll(&mut bridge)).await;

        assert!(matches!(result, Ok(Err(_))));
    }
}
