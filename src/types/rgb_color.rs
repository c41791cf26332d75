// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RGB color type.

use std::fmt;

/// RGB color with 8-bit channels (0-255).
///
/// # Examples
///
/// ```
/// use chromobridge::types::RgbColor;
///
/// let color = RgbColor::new(255, 128, 0);
/// assert_eq!(color.to_bytes(), [255, 128, 0]);
/// assert_eq!(color.to_string(), "#FF8000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Black, also the "off" color on the wire.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns the channels in wire order.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    pub(crate) fn set_red(&mut self, red: u8) {
        self.red = red;
    }

    pub(crate) fn set_green(&mut self, green: u8) {
        self.green = green;
    }

    pub(crate) fn set_blue(&mut self, blue: u8) {
        self.blue = blue;
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_setters_touch_one_channel() {
        let mut color = RgbColor::new(1, 2, 3);
        color.set_blue(30);
        assert_eq!(color, RgbColor::new(1, 2, 30));
        color.set_green(20);
        assert_eq!(color, RgbColor::new(1, 20, 30));
        color.set_red(10);
        assert_eq!(color, RgbColor::new(10, 20, 30));
    }

    #[test]
    fn black_is_default() {
        assert_eq!(RgbColor::default(), RgbColor::BLACK);
    }
}
