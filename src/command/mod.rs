// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controller command definitions.
//!
//! Every controller operation the bridge uses travels as a USP3 "device
//! command" (opcode `0x7E`) whose first payload byte selects a register.
//!
//! # Available Commands
//!
//! | Command | Payload |
//! |---------|---------|
//! | [`DeviceCommand::SetColor`] | `[4, r, g, b]` |
//! | [`DeviceCommand::PowerOff`] | `[4, 0, 0, 0]` |
//! | [`DeviceCommand::EnterManualMode`] | `[18, 1]` |
//! | [`DeviceCommand::ExitManualMode`] | `[18, 0]` |
//! | [`DeviceCommand::SelectEffect`] | `[21, 0, program]` |
//! | [`DeviceCommand::IncrementUniform`] | `[8, v, v, v]` |
//! | [`DeviceCommand::IncrementRed`] | `[8, v]` |
//! | [`DeviceCommand::IncrementGreen`] | `[9, v]` |
//! | [`DeviceCommand::IncrementBlue`] | `[10, v]` |
//!
//! # Examples
//!
//! ```
//! use chromobridge::command::{Command, DeviceCommand};
//! use chromobridge::types::{Effect, RgbColor};
//!
//! let cmd = DeviceCommand::SetColor(RgbColor::new(10, 20, 30));
//! assert_eq!(cmd.opcode(), 0x7E);
//! assert_eq!(cmd.payload(), vec![4, 10, 20, 30]);
//!
//! let effect = DeviceCommand::SelectEffect(Effect::new(2).unwrap());
//! assert_eq!(effect.payload(), vec![21, 0, 203]);
//! ```

mod device;

pub use device::DeviceCommand;

/// Opcode of the USP3 "device command".
pub const DEVICE_COMMAND: u8 = 0x7E;

/// A command that can be framed and sent to a controller.
pub trait Command {
    /// Returns the USP3 command byte.
    fn opcode(&self) -> u8;

    /// Returns the command payload, without the command byte.
    fn payload(&self) -> Vec<u8>;
}
