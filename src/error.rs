// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the bridge.
//!
//! Validation failures ([`ValueError`], unknown property names) are raised
//! before any device state is touched. Transport failures are propagated from
//! the byte sink unchanged. Routing and session setup have their own error
//! enums so the MQTT loop can log and carry on.

use thiserror::Error;

/// The main error type for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A property or address value failed validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The property name is not one the bridge understands.
    #[error("unknown property: {0}")]
    UnknownProperty(String),

    /// The byte sink refused a write or flush.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// A bus message could not be turned into a set request.
    #[error("route error: {0}")]
    Route(#[from] RouteError),

    /// A frame could not be built.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// Setting up the MQTT session or the serial port failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("{name} must be {min}..{max}, got {actual}")]
    OutOfRange {
        /// Name of the validated quantity.
        name: &'static str,
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The value that was provided.
        actual: i64,
    },

    /// A property value was not an integer.
    #[error("{name} must be an integer, got {value}")]
    NotAnInteger {
        /// Property name.
        name: String,
        /// Textual form of the offending value.
        value: String,
    },
}

impl ValueError {
    /// Checks `actual` against the inclusive range `min..=max`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` when `actual` is outside the range.
    pub fn check_range(name: &'static str, actual: i64, min: i64, max: i64) -> std::result::Result<i64, Self> {
        if (min..=max).contains(&actual) {
            Ok(actual)
        } else {
            Err(Self::OutOfRange {
                name,
                min,
                max,
                actual,
            })
        }
    }
}

/// Errors raised while encoding or decoding a USP3 frame.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The input does not begin with the start marker.
    #[error("frame does not start with 0xCA")]
    MissingStartMarker,

    /// An unescaped marker byte appeared inside the frame body.
    #[error("unescaped marker 0x{0:02X} inside frame")]
    StrayMarker(u8),

    /// The escape marker was followed by something other than 0 or 1.
    #[error("invalid escape sequence 0xCB 0x{0:02X}")]
    InvalidEscape(u8),

    /// The frame ended in the middle of an escape sequence or header.
    #[error("frame truncated")]
    Truncated,

    /// The length field does not match the bytes received.
    #[error("length field says {declared} bytes, frame carries {actual}")]
    LengthMismatch {
        /// Value of the length field.
        declared: usize,
        /// Number of command + payload bytes present.
        actual: usize,
    },

    /// The payload does not fit the 16-bit length field.
    #[error("payload of {len} bytes exceeds the {max} byte limit")]
    PayloadTooLong {
        /// Payload length in bytes.
        len: usize,
        /// Largest payload the length field can describe.
        max: usize,
    },

    /// The checksum did not match the frame contents.
    #[error("crc mismatch: expected 0x{expected:04X}, got 0x{actual:04X}")]
    CrcMismatch {
        /// CRC computed over the received bytes.
        expected: u16,
        /// CRC carried by the frame.
        actual: u16,
    },
}

/// Errors raised while routing a bus message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The topic is not a `set` topic under the configured prefix.
    #[error("unparsable topic {0}")]
    UnknownTopic(String),

    /// The payload of a property topic is not an integer.
    #[error("invalid integer payload {0:?}")]
    InvalidInteger(String),

    /// The payload of a device topic is neither a number nor an object.
    #[error("invalid JSON payload: {0}")]
    InvalidJson(String),
}

/// Errors related to the MQTT session and the serial port.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// MQTT client request failed.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Opening or configuring the serial port failed.
    #[cfg(feature = "serial")]
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Invalid host or device path.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            name: "hue",
            min: 0,
            max: 65535,
            actual: 65536,
        };
        assert_eq!(err.to_string(), "hue must be 0..65535, got 65536");
    }

    #[test]
    fn check_range_bounds_are_inclusive() {
        assert_eq!(ValueError::check_range("sat", 0, 0, 254), Ok(0));
        assert_eq!(ValueError::check_range("sat", 254, 0, 254), Ok(254));
        assert!(ValueError::check_range("sat", 255, 0, 254).is_err());
        assert!(ValueError::check_range("sat", -1, 0, 254).is_err());
    }

    #[test]
    fn error_from_value_error() {
        let value_err = ValueError::check_range("effect", 10, 1, 9).unwrap_err();
        let err: Error = value_err.into();
        assert!(matches!(
            err,
            Error::Value(ValueError::OutOfRange { name: "effect", .. })
        ));
    }

    #[test]
    fn frame_error_display() {
        let err = FrameError::CrcMismatch {
            expected: 0x1234,
            actual: 0xABCD,
        };
        assert_eq!(
            err.to_string(),
            "crc mismatch: expected 0x1234, got 0xABCD"
        );
    }

    #[test]
    fn protocol_error_display() {
        let err = ProtocolError::InvalidAddress("serial device must not be empty".into());
        assert_eq!(
            err.to_string(),
            "invalid address: serial device must not be empty"
        );
        let err: Error = err.into();
        assert!(matches!(err, Error::Protocol(ProtocolError::InvalidAddress(_))));
    }

    #[test]
    fn transport_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Transport(_)));
    }
}
