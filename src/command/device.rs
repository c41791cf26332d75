// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device register commands.

use std::fmt;

use crate::command::{Command, DEVICE_COMMAND};
use crate::types::{Effect, RgbColor};

/// Register numbers inside a device command payload.
mod register {
    pub const COLOR: u8 = 4;
    pub const INCREMENT_RED: u8 = 8;
    pub const INCREMENT_GREEN: u8 = 9;
    pub const INCREMENT_BLUE: u8 = 10;
    pub const MANUAL_MODE: u8 = 18;
    pub const PROGRAM: u8 = 21;
}

/// A device-level operation on a controller.
///
/// Arguments are typed, so an out-of-range value can't be built into a
/// frame: effects go through [`Effect::new`] and channel values are `u8`.
///
/// # Examples
///
/// ```
/// use chromobridge::command::{Command, DeviceCommand};
///
/// assert_eq!(DeviceCommand::PowerOff.payload(), vec![4, 0, 0, 0]);
/// assert_eq!(DeviceCommand::IncrementUniform(5).payload(), vec![8, 5, 5, 5]);
/// assert_eq!(DeviceCommand::IncrementBlue(7).payload(), vec![10, 7]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    /// Show a static color.
    SetColor(RgbColor),
    /// Switch the output off (black).
    PowerOff,
    /// Leave program mode so raw colors are honored.
    EnterManualMode,
    /// Return to program mode.
    ExitManualMode,
    /// Run a built-in program.
    SelectEffect(Effect),
    /// Add the same increment to all three channels.
    IncrementUniform(u8),
    /// Add an increment to the red channel.
    IncrementRed(u8),
    /// Add an increment to the green channel.
    IncrementGreen(u8),
    /// Add an increment to the blue channel.
    IncrementBlue(u8),
}

impl Command for DeviceCommand {
    fn opcode(&self) -> u8 {
        DEVICE_COMMAND
    }

    fn payload(&self) -> Vec<u8> {
        match *self {
            Self::SetColor(color) => {
                let [r, g, b] = color.to_bytes();
                vec![register::COLOR, r, g, b]
            }
            Self::PowerOff => vec![register::COLOR, 0, 0, 0],
            Self::EnterManualMode => vec![register::MANUAL_MODE, 1],
            Self::ExitManualMode => vec![register::MANUAL_MODE, 0],
            Self::SelectEffect(effect) => vec![register::PROGRAM, 0, effect.wire_value()],
            Self::IncrementUniform(v) => vec![register::INCREMENT_RED, v, v, v],
            Self::IncrementRed(v) => vec![register::INCREMENT_RED, v],
            Self::IncrementGreen(v) => vec![register::INCREMENT_GREEN, v],
            Self::IncrementBlue(v) => vec![register::INCREMENT_BLUE, v],
        }
    }
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetColor(color) => write!(f, "set color {color}"),
            Self::PowerOff => f.write_str("power off"),
            Self::EnterManualMode => f.write_str("enter manual mode"),
            Self::ExitManualMode => f.write_str("exit manual mode"),
            Self::SelectEffect(effect) => write!(f, "select {effect}"),
            Self::IncrementUniform(v) => write!(f, "increment all by {v}"),
            Self::IncrementRed(v) => write!(f, "increment red by {v}"),
            Self::IncrementGreen(v) => write!(f, "increment green by {v}"),
            Self::IncrementBlue(v) => write!(f, "increment blue by {v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_payload() {
        let cmd = DeviceCommand::SetColor(RgbColor::new(255, 128, 1));
        assert_eq!(cmd.opcode(), 0x7E);
        assert_eq!(cmd.payload(), vec![4, 255, 128, 1]);
    }

    #[test]
    fn power_off_is_black() {
        assert_eq!(
            DeviceCommand::PowerOff.payload(),
            DeviceCommand::SetColor(RgbColor::BLACK).payload()
        );
    }

    #[test]
    fn manual_mode_payloads() {
        assert_eq!(DeviceCommand::EnterManualMode.payload(), vec![18, 1]);
        assert_eq!(DeviceCommand::ExitManualMode.payload(), vec![18, 0]);
    }

    #[test]
    fn effect_payloads() {
        for (index, program) in [(1, 200), (5, 212), (9, 224)] {
            let cmd = DeviceCommand::SelectEffect(Effect::new(index).unwrap());
            assert_eq!(cmd.payload(), vec![21, 0, program]);
        }
    }

    #[test]
    fn increment_payloads() {
        assert_eq!(DeviceCommand::IncrementUniform(3).payload(), vec![8, 3, 3, 3]);
        assert_eq!(DeviceCommand::IncrementRed(3).payload(), vec![8, 3]);
        assert_eq!(DeviceCommand::IncrementGreen(3).payload(), vec![9, 3]);
        assert_eq!(DeviceCommand::IncrementBlue(3).payload(), vec![10, 3]);
    }

    #[test]
    fn command_display() {
        assert_eq!(
            DeviceCommand::SetColor(RgbColor::new(255, 0, 0)).to_string(),
            "set color #FF0000"
        );
        assert_eq!(
            DeviceCommand::SelectEffect(Effect::new(4).unwrap()).to_string(),
            "select effect 4"
        );
    }
}
