// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Chromobridge - control Chromoflex LED controllers from MQTT.
//!
//! Chromoflex controllers sit on a serial bus and speak USP3, a framed
//! binary protocol with 24-bit addresses. This crate keeps a color and power
//! record per controller, turns named property updates into that record,
//! and writes the minimal command sequence to bring the controller in line.
//!
//! # Supported Properties
//!
//! - **Color**: `hue`, `sat`, `bri` (HSV) or `red`, `green`, `blue` (RGB)
//! - **Power**: `on`, plus a bare brightness value that switches off below 1
//! - **Programs**: `effect` starts one of the nine built-in programs
//! - **Increments**: `increment`, `incrementr`, `incrementg`, `incrementb`
//!
//! # Quick Start
//!
//! ## Driving a controller directly
//!
//! Any [`std::io::Write`] sink works as the bus; frames are written and
//! flushed one at a time.
//!
//! ```
//! use chromobridge::Bridge;
//! use chromobridge::types::DeviceAddress;
//!
//! # fn main() -> chromobridge::Result<()> {
//! let mut bridge = Bridge::new(Vec::new());
//! let kitchen = DeviceAddress::new(0x0102)?;
//!
//! bridge.set_property(kitchen, "red", 255)?;
//! bridge.set_batch(kitchen, [("hue", 21845), ("sat", 0), ("bri", 254)])?;
//! bridge.set_brightness_or_toggle(kitchen, 0.0)?;
//!
//! assert!(!bridge.state(kitchen).unwrap().is_on());
//! # Ok(())
//! # }
//! ```
//!
//! ## Running the MQTT bridge
//!
//! With the `mqtt` feature, `protocol::MqttSession` subscribes to
//! `<prefix>set/#` and feeds every routed request into a [`Bridge`]. The
//! `chromobridge` binary wires it to a serial port opened with
//! `protocol::serial::open` (feature `serial`).

pub mod bridge;
pub mod command;
pub mod config;
pub mod error;
pub mod protocol;
pub mod state;
pub mod sync;
pub mod types;

pub use bridge::Bridge;
pub use command::{Command, DeviceCommand};
pub use config::{BridgeConfig, BridgeConfigBuilder};
pub use error::{Error, FrameError, ProtocolError, Result, RouteError, ValueError};
pub use protocol::{SetPayload, SetRequest, SetTarget, TopicRouter};
pub use state::{ColorMode, DeviceState, Property, StateRegistry};
pub use sync::StateSynchronizer;
pub use types::{DeviceAddress, Effect, HsvColor, RgbColor};
