// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge configuration.
//!
//! # Examples
//!
//! ```
//! use chromobridge::config::BridgeConfig;
//! use chromobridge::types::DeviceAddress;
//!
//! let config = BridgeConfig::builder()
//!     .mqtt_host("broker.local")
//!     .topic_prefix("lights")
//!     .serial_device("/dev/ttyUSB0")
//!     .default_address(DeviceAddress::new(0x42).unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.topic_prefix(), "lights/");
//! assert_eq!(config.mqtt_port(), 1883);
//! ```

use std::time::Duration;

use crate::error::ProtocolError;
use crate::types::DeviceAddress;

/// Runtime settings of the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    mqtt_host: String,
    mqtt_port: u16,
    topic_prefix: String,
    serial_device: String,
    default_address: DeviceAddress,
    keep_alive: Duration,
    retry_delay: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            mqtt_host: "localhost".to_string(),
            mqtt_port: 1883,
            topic_prefix: "chromo/".to_string(),
            serial_device: String::new(),
            default_address: DeviceAddress::BROADCAST,
            keep_alive: Duration::from_secs(60),
            retry_delay: Duration::from_secs(5),
        }
    }
}

impl BridgeConfig {
    /// Creates a builder starting from the defaults.
    #[must_use]
    pub fn builder() -> BridgeConfigBuilder {
        BridgeConfigBuilder::default()
    }

    /// Broker host name.
    #[must_use]
    pub fn mqtt_host(&self) -> &str {
        &self.mqtt_host
    }

    /// Broker port.
    #[must_use]
    pub fn mqtt_port(&self) -> u16 {
        self.mqtt_port
    }

    /// Topic prefix, always ending with `/`.
    #[must_use]
    pub fn topic_prefix(&self) -> &str {
        &self.topic_prefix
    }

    /// Path of the serial device.
    #[must_use]
    pub fn serial_device(&self) -> &str {
        &self.serial_device
    }

    /// Address used by topics that don't name one.
    #[must_use]
    pub fn default_address(&self) -> DeviceAddress {
        self.default_address
    }

    /// MQTT keep-alive interval.
    #[must_use]
    pub fn keep_alive(&self) -> Duration {
        self.keep_alive
    }

    /// Delay before polling again after a broker error.
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }
}

/// Builder for [`BridgeConfig`].
#[derive(Debug, Default)]
pub struct BridgeConfigBuilder {
    config: BridgeConfig,
}

impl BridgeConfigBuilder {
    /// Sets the broker host (default: `localhost`).
    #[must_use]
    pub fn mqtt_host(mut self, host: impl Into<String>) -> Self {
        self.config.mqtt_host = host.into();
        self
    }

    /// Sets the broker port (default: 1883).
    #[must_use]
    pub fn mqtt_port(mut self, port: u16) -> Self {
        self.config.mqtt_port = port;
        self
    }

    /// Sets the topic prefix (default: `chromo/`).
    ///
    /// A trailing `/` is added when missing.
    #[must_use]
    pub fn topic_prefix(mut self, prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        self.config.topic_prefix = prefix;
        self
    }

    /// Sets the serial device path. Required.
    #[must_use]
    pub fn serial_device(mut self, path: impl Into<String>) -> Self {
        self.config.serial_device = path.into();
        self
    }

    /// Sets the default device address (default: broadcast).
    #[must_use]
    pub fn default_address(mut self, address: DeviceAddress) -> Self {
        self.config.default_address = address;
        self
    }

    /// Sets the keep-alive interval (default: 60 seconds).
    #[must_use]
    pub fn keep_alive(mut self, duration: Duration) -> Self {
        self.config.keep_alive = duration;
        self
    }

    /// Sets the retry delay after broker errors (default: 5 seconds).
    #[must_use]
    pub fn retry_delay(mut self, duration: Duration) -> Self {
        self.config.retry_delay = duration;
        self
    }

    /// Finishes the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` if the broker host or the
    /// serial device is empty.
    pub fn build(self) -> Result<BridgeConfig, ProtocolError> {
        if self.config.mqtt_host.is_empty() {
            return Err(ProtocolError::InvalidAddress(
                "MQTT broker host is required".to_string(),
            ));
        }
        if self.config.serial_device.is_empty() {
            return Err(ProtocolError::InvalidAddress(
                "serial device is required".to_string(),
            ));
        }
        Ok(self.config)
    }
}
