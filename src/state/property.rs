// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Validated property updates.
//!
//! A [`Property`] is what a `set` request turns into once its name is known
//! and its value has passed the range check. Parsing never touches device
//! state, which is what lets a batch be rejected as a whole.
//!
//! # Properties
//!
//! | Name | Range | Effect |
//! |------|-------|--------|
//! | `hue` | 0-65535 | HSV hue, switches to HSV mode |
//! | `sat` | 0-254 | HSV saturation, switches to HSV mode |
//! | `bri` | 0-254 | HSV brightness, switches to HSV mode |
//! | `red`, `green`, `blue` | 0-255 | RGB channel, switches to RGB mode |
//! | `ct` | any | Forces HSV mode with full desaturation |
//! | `on` | any | Nonzero powers on |
//! | `effect` | 1-9 | Starts a built-in program |
//! | `increment` | 0-255 | Increments all channels on the device |
//! | `incrementr`, `incrementg`, `incrementb` | 0-255 | Increments one channel |

use std::fmt;

use crate::error::{Error, ValueError};
use crate::types::{Effect, HsvColor};

/// A single validated property update.
///
/// # Examples
///
/// ```
/// use chromobridge::state::Property;
///
/// assert_eq!(Property::parse("hue", 1000).unwrap(), Property::Hue(1000));
/// assert!(Property::parse("hue", 65536).is_err());
/// assert!(Property::parse("flicker", 1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    /// HSV hue.
    Hue(u16),
    /// HSV saturation (inverted, 254 is white).
    Saturation(u8),
    /// HSV brightness.
    Brightness(u8),
    /// RGB red channel.
    Red(u8),
    /// RGB green channel.
    Green(u8),
    /// RGB blue channel.
    Blue(u8),
    /// Color temperature. The controller has no white channel, so any
    /// temperature is shown as plain white.
    ColorTemperature,
    /// Power state.
    Power(bool),
    /// Built-in program.
    Effect(Effect),
    /// Increment on all channels.
    Increment(u8),
    /// Increment on the red channel.
    IncrementRed(u8),
    /// Increment on the green channel.
    IncrementGreen(u8),
    /// Increment on the blue channel.
    IncrementBlue(u8),
}

impl Property {
    /// Every property name the bridge accepts.
    pub const NAMES: [&'static str; 13] = [
        "hue",
        "sat",
        "bri",
        "red",
        "green",
        "blue",
        "ct",
        "on",
        "effect",
        "increment",
        "incrementr",
        "incrementg",
        "incrementb",
    ];

    /// Parses and validates a named property value.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownProperty` for an unrecognized name and
    /// `Error::Value` when the value is out of range.
    pub fn parse(name: &str, value: i64) -> Result<Self, Error> {
        let property = match name {
            "hue" => Self::Hue(narrow("hue", value, u16::MAX)?),
            "sat" => Self::Saturation(narrow("sat", value, HsvColor::MAX_SATURATION)?),
            "bri" => Self::Brightness(narrow("bri", value, HsvColor::MAX_BRIGHTNESS)?),
            "red" => Self::Red(narrow("red", value, u8::MAX)?),
            "green" => Self::Green(narrow("green", value, u8::MAX)?),
            "blue" => Self::Blue(narrow("blue", value, u8::MAX)?),
            "ct" => Self::ColorTemperature,
            "on" => Self::Power(value != 0),
            "effect" => Self::Effect(Effect::try_from(value)?),
            "increment" => Self::Increment(narrow("increment", value, u8::MAX)?),
            "incrementr" => Self::IncrementRed(narrow("incrementr", value, u8::MAX)?),
            "incrementg" => Self::IncrementGreen(narrow("incrementg", value, u8::MAX)?),
            "incrementb" => Self::IncrementBlue(narrow("incrementb", value, u8::MAX)?),
            other => return Err(Error::UnknownProperty(other.to_string())),
        };
        Ok(property)
    }

    /// Returns the wire name of this property.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Hue(_) => "hue",
            Self::Saturation(_) => "sat",
            Self::Brightness(_) => "bri",
            Self::Red(_) => "red",
            Self::Green(_) => "green",
            Self::Blue(_) => "blue",
            Self::ColorTemperature => "ct",
            Self::Power(_) => "on",
            Self::Effect(_) => "effect",
            Self::Increment(_) => "increment",
            Self::IncrementRed(_) => "incrementr",
            Self::IncrementGreen(_) => "incrementg",
            Self::IncrementBlue(_) => "incrementb",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hue(v) => write!(f, "hue={v}"),
            Self::Saturation(v)
            | Self::Brightness(v)
            | Self::Red(v)
            | Self::Green(v)
            | Self::Blue(v)
            | Self::Increment(v)
            | Self::IncrementRed(v)
            | Self::IncrementGreen(v)
            | Self::IncrementBlue(v) => write!(f, "{}={v}", self.name()),
            Self::ColorTemperature => f.write_str("ct"),
            Self::Power(on) => write!(f, "on={}", u8::from(*on)),
            Self::Effect(e) => write!(f, "effect={}", e.index()),
        }
    }
}

/// Range checks `value` against `0..=max` and narrows it.
fn narrow<T>(name: &'static str, value: i64, max: T) -> Result<T, ValueError>
where
    T: Into<i64> + TryFrom<i64>,
{
    let max = max.into();
    let value = ValueError::check_range(name, value, 0, max)?;
    T::try_from(value).map_err(|_| ValueError::OutOfRange {
        name,
        min: 0,
        max,
        actual: value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn out_of_range(name: &str, value: i64) -> bool {
        matches!(
            Property::parse(name, value),
            Err(Error::Value(ValueError::OutOfRange { .. }))
        )
    }

    #[test]
    fn parses_every_name() {
        for name in Property::NAMES {
            let value = if name == "effect" { 1 } else { 0 };
            let property = Property::parse(name, value).unwrap();
            assert_eq!(property.name(), name);
        }
    }

    #[test]
    fn hsv_ranges() {
        assert_eq!(Property::parse("hue", 65535).unwrap(), Property::Hue(65535));
        assert!(out_of_range("hue", 65536));
        assert!(out_of_range("hue", -1));
        assert_eq!(
            Property::parse("sat", 254).unwrap(),
            Property::Saturation(254)
        );
        assert!(out_of_range("sat", 255));
        assert!(out_of_range("bri", 255));
    }

    #[test]
    fn rgb_ranges() {
        assert_eq!(Property::parse("blue", 255).unwrap(), Property::Blue(255));
        assert!(out_of_range("red", 256));
        assert!(out_of_range("green", -5));
    }

    #[test]
    fn effect_range() {
        assert!(out_of_range("effect", 0));
        assert!(out_of_range("effect", 10));
        assert!(matches!(
            Property::parse("effect", 9).unwrap(),
            Property::Effect(e) if e.index() == 9
        ));
    }

    #[test]
    fn increment_ranges() {
        assert_eq!(
            Property::parse("incrementg", 255).unwrap(),
            Property::IncrementGreen(255)
        );
        assert!(out_of_range("increment", 256));
        assert!(out_of_range("incrementb", -1));
    }

    #[test]
    fn on_is_nonzero() {
        assert_eq!(Property::parse("on", 0).unwrap(), Property::Power(false));
        assert_eq!(Property::parse("on", 1).unwrap(), Property::Power(true));
        assert_eq!(Property::parse("on", -3).unwrap(), Property::Power(true));
    }

    #[test]
    fn ct_accepts_any_value() {
        assert_eq!(
            Property::parse("ct", 100_000).unwrap(),
            Property::ColorTemperature
        );
    }

    #[test]
    fn unknown_name() {
        assert!(matches!(
            Property::parse("HUE", 1),
            Err(Error::UnknownProperty(name)) if name == "HUE"
        ));
    }

    #[test]
    fn property_display() {
        assert_eq!(Property::Hue(7).to_string(), "hue=7");
        assert_eq!(Property::IncrementRed(2).to_string(), "incrementr=2");
        assert_eq!(Property::Power(true).to_string(), "on=1");
    }
}
