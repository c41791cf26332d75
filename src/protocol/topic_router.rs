// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT topic routing for set requests.
//!
//! The [`TopicRouter`] turns an incoming message into a [`SetRequest`] that
//! names an already validated device address and what to set on it.
//!
//! # Topic layout
//!
//! ```text
//! chromo/set                    {"hue":100,"sat":254}  → default device, batch
//! chromo/set                    127.5                  → default device, brightness/toggle
//! chromo/set/0x42               {"on":0}               → device 0x42, batch
//! chromo/set/hue                1000                   → default device, one property
//! chromo/set/0x42/hue           0x3E8                  → device 0x42, one property
//! ```
//!
//! Address segments and single property payloads accept integers with an
//! automatic base (`0x`, `0o`, `0b` or decimal).

use serde::Deserialize;

use crate::error::{Error, RouteError};
use crate::types::DeviceAddress;

/// The JSON payload of a device topic.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SetPayload {
    /// A bare number: below 1 switches off, otherwise sets the brightness.
    SingleBrightnessValue(f64),
    /// An object of property names to values, applied as one batch.
    PropertyMap(serde_json::Map<String, serde_json::Value>),
}

/// What a set request changes.
#[derive(Debug, Clone, PartialEq)]
pub enum SetTarget {
    /// One named property from a `.../set/<name>` topic.
    Property {
        /// Property name, not yet validated.
        name: String,
        /// Parsed integer payload.
        value: i64,
    },
    /// A JSON payload sent to the device topic itself.
    Payload(SetPayload),
}

/// A routed set request.
#[derive(Debug, Clone, PartialEq)]
pub struct SetRequest {
    /// Device the request is for.
    pub address: DeviceAddress,
    /// What to change.
    pub target: SetTarget,
}

/// Parses `<prefix>set/...` topics into [`SetRequest`]s.
#[derive(Debug, Clone)]
pub struct TopicRouter {
    prefix: String,
    default_address: DeviceAddress,
}

impl TopicRouter {
    /// Creates a router for `prefix`.
    ///
    /// A trailing `/` is added to the prefix when missing.
    #[must_use]
    pub fn new(prefix: impl Into<String>, default_address: DeviceAddress) -> Self {
        let mut prefix = prefix.into();
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        Self {
            prefix,
            default_address,
        }
    }

    /// Returns the normalized topic prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the address used when a topic names none.
    #[must_use]
    pub fn default_address(&self) -> DeviceAddress {
        self.default_address
    }

    /// Returns the subscription filter covering all set topics.
    #[must_use]
    pub fn subscription(&self) -> String {
        format!("{}set/#", self.prefix)
    }

    /// Returns the topic carrying the bridge's connection status.
    #[must_use]
    pub fn status_topic(&self) -> String {
        format!("{}connected", self.prefix)
    }

    /// Parses a message into a set request.
    ///
    /// # Errors
    ///
    /// Returns `Error::Route` if the topic is not a set topic or the payload
    /// is malformed, and `Error::Value` if the topic names an address outside
    /// the 24-bit range.
    ///
    /// # Examples
    ///
    /// ```
    /// use chromobridge::protocol::{SetTarget, TopicRouter};
    /// use chromobridge::types::DeviceAddress;
    ///
    /// let router = TopicRouter::new("chromo", DeviceAddress::BROADCAST);
    /// let request = router.parse("chromo/set/0x10/hue", b"1000").unwrap();
    ///
    /// assert_eq!(request.address.value(), 0x10);
    /// assert_eq!(
    ///     request.target,
    ///     SetTarget::Property { name: "hue".into(), value: 1000 }
    /// );
    /// ```
    pub fn parse(&self, topic: &str, payload: &[u8]) -> Result<SetRequest, Error> {
        let unknown = || RouteError::UnknownTopic(topic.to_string());

        let rest = topic.strip_prefix(&self.prefix).ok_or_else(unknown)?;
        let mut segments = rest.split('/');
        if segments.next() != Some("set") {
            return Err(unknown().into());
        }

        let mut next = segments.next();
        let mut address = self.default_address;
        if let Some(value) = next.and_then(parse_int) {
            address = DeviceAddress::try_from(value)?;
            next = segments.next();
        }

        let target = match next {
            Some(name) if !name.is_empty() => {
                let text = String::from_utf8_lossy(payload);
                let value =
                    parse_int(&text).ok_or_else(|| RouteError::InvalidInteger(text.to_string()))?;
                SetTarget::Property {
                    name: name.to_string(),
                    value,
                }
            }
            _ => {
                let parsed = serde_json::from_slice(payload)
                    .map_err(|e| RouteError::InvalidJson(e.to_string()))?;
                SetTarget::Payload(parsed)
            }
        };

        tracing::trace!(topic = %topic, address = %address, "Routed set request");
        Ok(SetRequest { address, target })
    }
}

/// Parses an integer literal with an automatic base.
///
/// Accepts an optional sign followed by `0x`, `0o` or `0b` prefixed digits,
/// or plain decimal. Decimal literals may not carry leading zeros, so `010`
/// is rejected rather than read as octal. Surrounding whitespace is ignored.
#[must_use]
pub fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, unsigned) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let lower = unsigned.get(..2).map(str::to_ascii_lowercase);
    let (radix, digits) = match lower.as_deref() {
        Some("0x") => (16, &unsigned[2..]),
        Some("0o") => (8, &unsigned[2..]),
        Some("0b") => (2, &unsigned[2..]),
        _ => {
            if unsigned.len() > 1 && unsigned.starts_with('0') && unsigned.bytes().any(|b| b != b'0')
            {
                return None;
            }
            (10, unsigned)
        }
    };

    // from_str_radix would accept a second sign here
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
