// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The bridge entry points.
//!
//! A [`Bridge`] accepts property updates by name, validates them, applies
//! them to the device state and requests exactly one sync per call.
//!
//! # Examples
//!
//! ```
//! use chromobridge::Bridge;
//! use chromobridge::types::DeviceAddress;
//!
//! let mut bridge = Bridge::new(Vec::new());
//! let addr = DeviceAddress::new(0x10).unwrap();
//!
//! bridge.set_batch(addr, [("hue", 0), ("sat", 0), ("bri", 254)]).unwrap();
//!
//! let state = bridge.state(addr).unwrap();
//! assert_eq!(state.calc_rgb().to_bytes(), [255, 0, 0]);
//! ```

use std::io::Write;

use crate::error::{Error, Result, ValueError};
use crate::protocol::topic_router::{SetPayload, SetRequest, SetTarget};
use crate::state::{DeviceState, Property, StateRegistry};
use crate::sync::StateSynchronizer;
use crate::types::{DeviceAddress, HsvColor};

/// Front end taking named property updates for any device address.
#[derive(Debug)]
pub struct Bridge<W> {
    sync: StateSynchronizer<W>,
}

impl<W: Write> Bridge<W> {
    /// Creates a bridge writing frames to `sink`.
    pub fn new(sink: W) -> Self {
        Self {
            sync: StateSynchronizer::new(sink),
        }
    }

    /// Creates a bridge around an existing registry.
    pub fn with_registry(sink: W, registry: StateRegistry) -> Self {
        Self {
            sync: StateSynchronizer::with_registry(sink, registry),
        }
    }

    /// Returns the state of `address`, if it has been referenced.
    #[must_use]
    pub fn state(&self, address: DeviceAddress) -> Option<&DeviceState> {
        self.sync.state(address)
    }

    /// Returns the synchronizer.
    #[must_use]
    pub fn synchronizer(&self) -> &StateSynchronizer<W> {
        &self.sync
    }

    /// Returns the synchronizer mutably.
    pub fn synchronizer_mut(&mut self) -> &mut StateSynchronizer<W> {
        &mut self.sync
    }

    /// Consumes the bridge, returning the registry and the sink.
    pub fn into_parts(self) -> (StateRegistry, W) {
        self.sync.into_parts()
    }

    /// Sets one property on `address` and requests a sync.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownProperty` or `Error::Value` before anything is
    /// changed, and `Error::Transport` if a write fails.
    pub fn set_property(&mut self, address: DeviceAddress, name: &str, value: i64) -> Result<()> {
        let property = Property::parse(name, value)?;
        tracing::debug!(address = %address, property = %property, "Setting property");
        self.sync.apply(address, &property)?;
        self.sync.request_sync(address)
    }

    /// Sets several properties on `address` with a single sync.
    ///
    /// Every entry is validated before the first one is applied, so a bad
    /// entry leaves the device untouched. Entries are applied in order.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownProperty` or `Error::Value` if any entry is
    /// invalid, and `Error::Transport` if a write fails.
    pub fn set_batch<I, K>(&mut self, address: DeviceAddress, properties: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, i64)>,
        K: AsRef<str>,
    {
        let properties = properties
            .into_iter()
            .map(|(name, value)| Property::parse(name.as_ref(), value))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(address = %address, count = properties.len(), "Setting batch");
        for property in &properties {
            self.sync.apply(address, property)?;
        }
        self.sync.request_sync(address)
    }

    /// Switches `address` off for values below 1, otherwise switches it on
    /// at brightness `value`.
    ///
    /// Fractional brightness is truncated.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if `value` is above 254 or not a number, and
    /// `Error::Transport` if a write fails.
    pub fn set_brightness_or_toggle(&mut self, address: DeviceAddress, value: f64) -> Result<()> {
        if value < 1.0 {
            tracing::debug!(address = %address, "Switching off");
            self.sync.apply(address, &Property::Power(false))?;
            return self.sync.request_sync(address);
        }

        if !(1.0..=f64::from(HsvColor::MAX_BRIGHTNESS)).contains(&value) {
            #[allow(clippy::cast_possible_truncation)]
            let actual = value as i64;
            return Err(ValueError::OutOfRange {
                name: "bri",
                min: 0,
                max: i64::from(HsvColor::MAX_BRIGHTNESS),
                actual,
            }
            .into());
        }

        // Safe: value is within 1..=254 here
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let level = value as u8;
        tracing::debug!(address = %address, brightness = level, "Switching on");
        self.sync.apply(address, &Property::Power(true))?;
        self.sync.apply(address, &Property::Brightness(level))?;
        self.sync.request_sync(address)
    }

    /// Executes a routed set request.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying operation. JSON map values must
    /// be integral: integers, floats without a fractional part (`1e3`,
    /// `100.0`) and booleans (as 0 or 1) are accepted. Anything else is
    /// rejected with `ValueError::NotAnInteger` before any entry of the map
    /// is applied. Integers beyond the `i64` range are clamped, so they fail
    /// the range check of their property like any other oversized value.
    pub fn handle(&mut self, request: &SetRequest) -> Result<()> {
        let address = request.address;
        match &request.target {
            SetTarget::Property { name, value } => self.set_property(address, name, *value),
            SetTarget::Payload(SetPayload::SingleBrightnessValue(value)) => {
                self.set_brightness_or_toggle(address, *value)
            }
            SetTarget::Payload(SetPayload::PropertyMap(map)) => {
                let entries = map
                    .iter()
                    .map(|(name, value)| Ok((name.as_str(), json_integer(name, value)?)))
                    .collect::<Result<Vec<_>>>()?;
                self.set_batch(address, entries)
            }
        }
    }
}

/// Reads a JSON value as a property integer.
fn json_integer(name: &str, value: &serde_json::Value) -> Result<i64> {
    let serde_json::Value::Number(number) = value else {
        return match value {
            serde_json::Value::Bool(flag) => Ok(i64::from(*flag)),
            _ => Err(not_an_integer(name, value)),
        };
    };
    if let Some(integer) = number.as_i64() {
        return Ok(integer);
    }
    if number.as_u64().is_some() {
        return Ok(i64::MAX);
    }
    match number.as_f64() {
        Some(float) if float.is_finite() && float.fract() == 0.0 => {
            // Saturating cast; the property range check rejects the extremes
            #[allow(clippy::cast_possible_truncation)]
            let integer = float as i64;
            Ok(integer)
        }
        _ => Err(not_an_integer(name, value)),
    }
}

fn not_an_integer(name: &str, value: &serde_json::Value) -> Error {
    ValueError::NotAnInteger {
        name: name.to_string(),
        value: value.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::usp3::{decode_frame, split_frames};
    use crate::state::ColorMode;

    fn addr() -> DeviceAddress {
        DeviceAddress::new(0x0A).unwrap()
    }

    fn payloads(bridge: &Bridge<Vec<u8>>) -> Vec<Vec<u8>> {
        split_frames(bridge.synchronizer().writer().get_ref())
            .into_iter()
            .map(|f| decode_frame(f).unwrap().payload)
            .collect()
    }

    #[test]
    fn unknown_property_changes_nothing() {
        let mut bridge = Bridge::new(Vec::new());
        let err = bridge.set_property(addr(), "warmth", 3).unwrap_err();
        assert!(matches!(err, Error::UnknownProperty(ref name) if name == "warmth"));
        assert!(payloads(&bridge).is_empty());
    }

    #[test]
    fn out_of_range_changes_nothing() {
        let mut bridge = Bridge::new(Vec::new());
        bridge.set_property(addr(), "hue", 100).unwrap();
        let before = *bridge.state(addr()).unwrap();
        let sent = payloads(&bridge).len();

        assert!(bridge.set_property(addr(), "sat", 255).is_err());
        assert!(bridge.set_property(addr(), "effect", 0).is_err());
        assert!(bridge.set_property(addr(), "red", -1).is_err());

        assert_eq!(*bridge.state(addr()).unwrap(), before);
        assert_eq!(payloads(&bridge).len(), sent);
    }

    #[test]
    fn batch_is_atomic() {
        let mut bridge = Bridge::new(Vec::new());
        let result = bridge.set_batch(addr(), [("hue", 100), ("sat", 9999), ("bri", 50)]);
        assert!(result.is_err());
        assert!(bridge.state(addr()).is_none());
        assert!(payloads(&bridge).is_empty());
    }

    #[test]
    fn batch_requests_one_sync() {
        let mut bridge = Bridge::new(Vec::new());
        bridge
            .set_batch(addr(), [("hue", 0), ("sat", 0), ("bri", 254)])
            .unwrap();
        assert_eq!(payloads(&bridge), vec![vec![18, 1], vec![4, 255, 0, 0]]);
    }

    #[test]
    fn batch_applies_in_order() {
        let mut bridge = Bridge::new(Vec::new());
        bridge.set_batch(addr(), [("red", 10), ("hue", 5)]).unwrap();
        assert_eq!(bridge.state(addr()).unwrap().mode(), ColorMode::Hsv);

        bridge.set_batch(addr(), [("hue", 5), ("red", 10)]).unwrap();
        assert_eq!(bridge.state(addr()).unwrap().mode(), ColorMode::Rgb);
    }

    #[test]
    fn effect_property_suppresses_its_own_sync() {
        let mut bridge = Bridge::new(Vec::new());
        bridge.set_property(addr(), "effect", 3).unwrap();
        assert_eq!(payloads(&bridge), vec![vec![18, 0], vec![21, 0, 206]]);
        let state = bridge.state(addr()).unwrap();
        assert!(state.program_mode());
        assert!(!state.suppress_next_sync());

        bridge.set_property(addr(), "bri", 254).unwrap();
        assert_eq!(payloads(&bridge).len(), 4);
    }

    #[test]
    fn increments_still_sync() {
        let mut bridge = Bridge::new(Vec::new());
        bridge.set_property(addr(), "incrementg", 3).unwrap();
        assert_eq!(
            payloads(&bridge),
            vec![vec![9, 3], vec![18, 1], vec![4, 0, 0, 0]]
        );
    }

    #[test]
    fn toggle_below_one_switches_off() {
        let mut bridge = Bridge::new(Vec::new());
        bridge.set_brightness_or_toggle(addr(), 0.5).unwrap();
        assert!(!bridge.state(addr()).unwrap().is_on());
        assert_eq!(payloads(&bridge), vec![vec![4, 0, 0, 0]]);
    }

    #[test]
    fn toggle_sets_truncated_brightness() {
        let mut bridge = Bridge::new(Vec::new());
        bridge.set_property(addr(), "on", 0).unwrap();
        bridge.set_brightness_or_toggle(addr(), 127.9).unwrap();

        let state = bridge.state(addr()).unwrap();
        assert!(state.is_on());
        assert_eq!(state.hsv().brightness(), 127);
    }

    #[test]
    fn toggle_after_rgb_switches_to_hsv() {
        let mut bridge = Bridge::new(Vec::new());
        bridge.set_property(addr(), "red", 255).unwrap();
        assert_eq!(bridge.state(addr()).unwrap().mode(), ColorMode::Rgb);

        bridge.set_brightness_or_toggle(addr(), 200.0).unwrap();

        let state = bridge.state(addr()).unwrap();
        assert_eq!(state.mode(), ColorMode::Hsv);
        assert!(state.is_on());
        assert_eq!(state.hsv().brightness(), 200);
    }

    #[test]
    fn toggle_rejects_too_bright() {
        let mut bridge = Bridge::new(Vec::new());
        let err = bridge.set_brightness_or_toggle(addr(), 300.0).unwrap_err();
        assert!(matches!(
            err,
            Error::Value(ValueError::OutOfRange { actual: 300, .. })
        ));
        assert!(bridge.set_brightness_or_toggle(addr(), f64::NAN).is_err());
        assert!(payloads(&bridge).is_empty());
    }

    #[test]
    fn handle_map_with_booleans() {
        let mut bridge = Bridge::new(Vec::new());
        let map = serde_json::json!({ "red": 9, "on": false });
        let serde_json::Value::Object(map) = map else {
            unreachable!()
        };
        let request = SetRequest {
            address: addr(),
            target: SetTarget::Payload(SetPayload::PropertyMap(map)),
        };
        bridge.handle(&request).unwrap();
        let state = bridge.state(addr()).unwrap();
        assert!(!state.is_on());
        assert_eq!(state.rgb().red(), 9);
    }

    #[test]
    fn handle_map_rejects_non_integers() {
        let mut bridge = Bridge::new(Vec::new());
        let serde_json::Value::Object(map) = serde_json::json!({ "hue": 1, "sat": "full" }) else {
            unreachable!()
        };
        let request = SetRequest {
            address: addr(),
            target: SetTarget::Payload(SetPayload::PropertyMap(map)),
        };
        let err = bridge.handle(&request).unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::NotAnInteger { .. })));
        assert!(bridge.state(addr()).is_none());
    }

    fn map_request(json: &str) -> SetRequest {
        let serde_json::Value::Object(map) = serde_json::from_str(json).unwrap() else {
            unreachable!()
        };
        SetRequest {
            address: addr(),
            target: SetTarget::Payload(SetPayload::PropertyMap(map)),
        }
    }

    #[test]
    fn handle_map_accepts_integral_floats() {
        let mut bridge = Bridge::new(Vec::new());
        bridge
            .handle(&map_request(r#"{"hue":1e3,"bri":100.0}"#))
            .unwrap();
        let state = bridge.state(addr()).unwrap();
        assert_eq!(state.hsv().hue(), 1000);
        assert_eq!(state.hsv().brightness(), 100);
    }

    #[test]
    fn handle_map_rejects_fractional_floats() {
        let mut bridge = Bridge::new(Vec::new());
        let err = bridge
            .handle(&map_request(r#"{"hue":1,"bri":100.5}"#))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Value(ValueError::NotAnInteger { ref name, .. }) if name == "bri"
        ));
        assert!(bridge.state(addr()).is_none());
    }

    #[test]
    fn handle_map_reports_huge_integers_as_out_of_range() {
        let mut bridge = Bridge::new(Vec::new());
        let err = bridge
            .handle(&map_request(r#"{"red":18446744073709551615}"#))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Value(ValueError::OutOfRange {
                name: "red",
                actual: i64::MAX,
                ..
            })
        ));

        let err = bridge
            .handle(&map_request(r#"{"hue":1e30}"#))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Value(ValueError::OutOfRange { name: "hue", .. })
        ));
        assert!(bridge.state(addr()).is_none());
    }
}
