// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for controller commands.
//!
//! Each type checks its range at construction time, so a value that reaches
//! the frame encoder is already known to be valid.
//!
//! # Types
//!
//! - [`DeviceAddress`] - 24-bit USP3 address (0 = broadcast)
//! - [`HsvColor`] - Hue 0-65535, saturation 0-254, brightness 0-254
//! - [`RgbColor`] - 8-bit RGB channels
//! - [`Effect`] - Built-in program index (1-9)

mod address;
mod color;
mod effect;
mod rgb_color;

pub use address::DeviceAddress;
pub use color::HsvColor;
pub use effect::Effect;
pub use rgb_color::RgbColor;
