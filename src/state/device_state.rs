// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device color and power state.

use crate::types::{HsvColor, RgbColor};

use super::Property;

/// Which color group was written last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Hue, saturation and brightness drive the output.
    #[default]
    Hsv,
    /// The stored red, green and blue channels drive the output.
    Rgb,
}

/// Tracked state of one controller.
///
/// Both color groups are kept; [`mode`](Self::mode) says which one is live.
/// Writing a property of the other group flips the mode and leaves the
/// stale group untouched until it is written again.
///
/// A fresh state assumes the controller is powered and running one of its
/// programs, so the first sync switches it to manual mode before sending a
/// color.
///
/// # Examples
///
/// ```
/// use chromobridge::state::{ColorMode, DeviceState, Property};
/// use chromobridge::types::RgbColor;
///
/// let mut state = DeviceState::new();
/// assert!(state.program_mode());
///
/// state.apply(&Property::Red(200));
/// assert_eq!(state.mode(), ColorMode::Rgb);
/// assert_eq!(state.calc_rgb(), RgbColor::new(200, 0, 0));
///
/// state.apply(&Property::Brightness(254));
/// assert_eq!(state.mode(), ColorMode::Hsv);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceState {
    mode: ColorMode,
    hsv: HsvColor,
    rgb: RgbColor,
    on: bool,
    program_mode: bool,
    suppress_next_sync: bool,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            mode: ColorMode::Hsv,
            hsv: HsvColor::default(),
            rgb: RgbColor::default(),
            on: true,
            program_mode: true,
            suppress_next_sync: false,
        }
    }
}

impl DeviceState {
    /// Creates the state assumed for a controller never seen before.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the live color group.
    #[must_use]
    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Returns the stored HSV values.
    #[must_use]
    pub fn hsv(&self) -> HsvColor {
        self.hsv
    }

    /// Returns the stored RGB channels.
    #[must_use]
    pub fn rgb(&self) -> RgbColor {
        self.rgb
    }

    /// Returns `true` if the output is powered.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Returns `true` while the controller is assumed to run a program.
    #[must_use]
    pub fn program_mode(&self) -> bool {
        self.program_mode
    }

    /// Returns `true` if the next sync request will be skipped.
    #[must_use]
    pub fn suppress_next_sync(&self) -> bool {
        self.suppress_next_sync
    }

    pub(crate) fn set_program_mode(&mut self, program_mode: bool) {
        self.program_mode = program_mode;
    }

    pub(crate) fn set_suppress_next_sync(&mut self, suppress: bool) {
        self.suppress_next_sync = suppress;
    }

    /// Sets the power state.
    pub fn set_on(&mut self, on: bool) {
        self.on = on;
    }

    /// Computes the color to send.
    ///
    /// In HSV mode this converts the stored HSV values; in RGB mode the
    /// stored channels are returned as they are.
    #[must_use]
    pub fn calc_rgb(&self) -> RgbColor {
        match self.mode {
            ColorMode::Hsv => self.hsv.to_rgb(),
            ColorMode::Rgb => self.rgb,
        }
    }

    /// Applies a validated property to the stored state.
    ///
    /// Properties that only trigger controller commands (effects and
    /// increments) leave the state untouched. Returns `true` if the state
    /// changed.
    pub fn apply(&mut self, property: &Property) -> bool {
        let before = *self;
        match *property {
            Property::Hue(v) => {
                self.mode = ColorMode::Hsv;
                self.hsv.set_hue(v);
            }
            Property::Saturation(v) => {
                self.mode = ColorMode::Hsv;
                self.hsv.set_saturation(v);
            }
            Property::Brightness(v) => {
                self.mode = ColorMode::Hsv;
                self.hsv.set_brightness(v);
            }
            Property::Red(v) => {
                self.mode = ColorMode::Rgb;
                self.rgb.set_red(v);
            }
            Property::Green(v) => {
                self.mode = ColorMode::Rgb;
                self.rgb.set_green(v);
            }
            Property::Blue(v) => {
                self.mode = ColorMode::Rgb;
                self.rgb.set_blue(v);
            }
            Property::ColorTemperature => {
                self.mode = ColorMode::Hsv;
                self.hsv.set_saturation(HsvColor::MAX_SATURATION);
            }
            Property::Power(on) => self.on = on,
            Property::Effect(_)
            | Property::Increment(_)
            | Property::IncrementRed(_)
            | Property::IncrementGreen(_)
            | Property::IncrementBlue(_) => {}
        }
        *self != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state() {
        let state = DeviceState::new();
        assert_eq!(state.mode(), ColorMode::Hsv);
        assert!(state.is_on());
        assert!(state.program_mode());
        assert!(!state.suppress_next_sync());
        assert_eq!(state.calc_rgb(), RgbColor::BLACK);
    }

    #[test]
    fn hsv_properties_switch_mode() {
        let mut state = DeviceState::new();
        state.apply(&Property::Red(10));
        assert_eq!(state.mode(), ColorMode::Rgb);
        assert!(state.apply(&Property::Hue(1)));
        assert_eq!(state.mode(), ColorMode::Hsv);
        assert_eq!(state.hsv().hue(), 1);
    }

    #[test]
    fn rgb_values_survive_hsv_writes() {
        let mut state = DeviceState::new();
        state.apply(&Property::Red(10));
        state.apply(&Property::Green(20));
        state.apply(&Property::Blue(30));
        state.apply(&Property::Brightness(254));
        assert_eq!(state.rgb(), RgbColor::new(10, 20, 30));
        state.apply(&Property::Green(21));
        assert_eq!(state.calc_rgb(), RgbColor::new(10, 21, 30));
    }

    #[test]
    fn blue_sets_blue_channel() {
        let mut state = DeviceState::new();
        state.apply(&Property::Blue(99));
        assert_eq!(state.rgb(), RgbColor::new(0, 0, 99));
    }

    #[test]
    fn color_temperature_desaturates() {
        let mut state = DeviceState::new();
        state.apply(&Property::Red(10));
        state.apply(&Property::Brightness(254));
        state.apply(&Property::ColorTemperature);
        assert_eq!(state.mode(), ColorMode::Hsv);
        assert_eq!(state.hsv().saturation(), 254);
        assert_eq!(state.calc_rgb(), RgbColor::new(255, 255, 255));
    }

    #[test]
    fn power_property() {
        let mut state = DeviceState::new();
        assert!(state.apply(&Property::Power(false)));
        assert!(!state.is_on());
        assert!(!state.apply(&Property::Power(false)));
    }

    #[test]
    fn command_properties_leave_state_alone() {
        let mut state = DeviceState::new();
        assert!(!state.apply(&Property::Increment(5)));
        assert!(!state.apply(&Property::IncrementBlue(5)));
        assert_eq!(state, DeviceState::new());
    }
}
