// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HSV color as reported by lighting front-ends.
//!
//! Hue uses the full 16-bit range, saturation and brightness use 0-254
//! (the Hue/deCONZ convention). Note that saturation here is *inverted*
//! with respect to the textbook HSV model: 0 is fully saturated and 254 is
//! white.

use std::fmt;

use crate::error::ValueError;

use super::RgbColor;

/// HSV color (hue 0-65535, saturation 0-254, brightness 0-254).
///
/// # Examples
///
/// ```
/// use chromobridge::types::{HsvColor, RgbColor};
///
/// let red = HsvColor::new(0, 0, 254).unwrap();
/// assert_eq!(red.to_rgb(), RgbColor::new(255, 0, 0));
///
/// let white = HsvColor::new(0, 254, 254).unwrap();
/// assert_eq!(white.to_rgb(), RgbColor::new(255, 255, 255));
///
/// assert!(HsvColor::new(0, 255, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HsvColor {
    hue: u16,
    saturation: u8,
    brightness: u8,
}

impl HsvColor {
    /// Maximum hue value.
    pub const MAX_HUE: u16 = u16::MAX;

    /// Maximum saturation value.
    pub const MAX_SATURATION: u8 = 254;

    /// Maximum brightness value.
    pub const MAX_BRIGHTNESS: u8 = 254;

    /// Creates a new HSV color.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if saturation or brightness exceed 254.
    pub fn new(hue: u16, saturation: u8, brightness: u8) -> Result<Self, ValueError> {
        ValueError::check_range(
            "sat",
            i64::from(saturation),
            0,
            i64::from(Self::MAX_SATURATION),
        )?;
        ValueError::check_range(
            "bri",
            i64::from(brightness),
            0,
            i64::from(Self::MAX_BRIGHTNESS),
        )?;
        Ok(Self {
            hue,
            saturation,
            brightness,
        })
    }

    /// Returns the hue (0-65535).
    #[must_use]
    pub const fn hue(&self) -> u16 {
        self.hue
    }

    /// Returns the saturation (0-254).
    #[must_use]
    pub const fn saturation(&self) -> u8 {
        self.saturation
    }

    /// Returns the brightness (0-254).
    #[must_use]
    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    pub(crate) fn set_hue(&mut self, hue: u16) {
        self.hue = hue;
    }

    pub(crate) fn set_saturation(&mut self, saturation: u8) {
        debug_assert!(saturation <= Self::MAX_SATURATION);
        self.saturation = saturation;
    }

    pub(crate) fn set_brightness(&mut self, brightness: u8) {
        debug_assert!(brightness <= Self::MAX_BRIGHTNESS);
        self.brightness = brightness;
    }

    /// Converts to 8-bit RGB.
    ///
    /// The components map to textbook HSV as
    /// `(hue / 65535, 1 - sat / 254, bri / 254)`. Channels are truncated,
    /// not rounded.
    #[must_use]
    pub fn to_rgb(&self) -> RgbColor {
        let h = f64::from(self.hue) / f64::from(Self::MAX_HUE);
        let s = 1.0 - f64::from(self.saturation) / f64::from(Self::MAX_SATURATION);
        let v = f64::from(self.brightness) / f64::from(Self::MAX_BRIGHTNESS);
        let (r, g, b) = hsv_to_rgb(h, s, v);
        RgbColor::new(to_channel(r), to_channel(g), to_channel(b))
    }
}

impl fmt::Display for HsvColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HSV({}, {}, {})",
            self.hue, self.saturation, self.brightness
        )
    }
}

/// Six-sector HSV to RGB transform. All inputs and outputs are in 0.0-1.0.
fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s <= 0.0 {
        return (v, v, v);
    }
    let scaled = h * 6.0;
    let sector = scaled.floor();
    let f = scaled - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    // Safe: h is in 0.0-1.0 so sector is in 0-6
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let sector = sector as u8 % 6;

    match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// Scales a 0.0-1.0 component to 0-255 by truncation.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_channel(x: f64) -> u8 {
    (x * 255.0) as u8
}
