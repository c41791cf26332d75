// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pushing device state to controllers.
//!
//! The [`StateSynchronizer`] owns the state registry and the frame writer.
//! After every update the caller asks for a sync with
//! [`request_sync`](StateSynchronizer::request_sync); the synchronizer either
//! writes the state out right away or, if the device's one-shot suppression
//! latch is set, clears the latch and writes nothing.
//!
//! ```text
//! request_sync ──► latch set? ──yes──► clear latch, done
//!                      │no
//!                      ▼
//!                   sync ──► off? ──yes──► PowerOff
//!                      │no
//!                      ▼
//!          program mode? ──yes──► EnterManualMode, clear program mode
//!                      │
//!                      ▼
//!                  SetColor(calc_rgb)
//! ```

use std::io::Write;

use crate::command::DeviceCommand;
use crate::error::Result;
use crate::protocol::usp3::FrameWriter;
use crate::state::{DeviceState, Property, StateRegistry};
use crate::types::{DeviceAddress, Effect};

/// Decides when state changes become controller writes.
///
/// All work happens on the calling thread: each call encodes and writes its
/// frames before returning.
///
/// # Examples
///
/// ```
/// use chromobridge::state::Property;
/// use chromobridge::sync::StateSynchronizer;
/// use chromobridge::types::DeviceAddress;
///
/// let mut sync = StateSynchronizer::new(Vec::new());
/// let addr = DeviceAddress::BROADCAST;
///
/// sync.apply(addr, &Property::Red(255)).unwrap();
/// sync.request_sync(addr).unwrap();
///
/// // manual mode switch + color
/// assert_eq!(sync.writer().frames_sent(), 2);
/// ```
#[derive(Debug)]
pub struct StateSynchronizer<W> {
    registry: StateRegistry,
    writer: FrameWriter<W>,
}

impl<W: Write> StateSynchronizer<W> {
    /// Creates a synchronizer with an empty registry.
    pub fn new(sink: W) -> Self {
        Self::with_registry(sink, StateRegistry::new())
    }

    /// Creates a synchronizer around an existing registry.
    pub fn with_registry(sink: W, registry: StateRegistry) -> Self {
        Self {
            registry,
            writer: FrameWriter::new(sink),
        }
    }

    /// Returns the state registry.
    #[must_use]
    pub fn registry(&self) -> &StateRegistry {
        &self.registry
    }

    /// Returns the state of `address`, if it has been referenced.
    #[must_use]
    pub fn state(&self, address: DeviceAddress) -> Option<&DeviceState> {
        self.registry.get(address)
    }

    /// Returns the frame writer.
    #[must_use]
    pub fn writer(&self) -> &FrameWriter<W> {
        &self.writer
    }

    /// Consumes the synchronizer, returning the registry and the sink.
    pub fn into_parts(self) -> (StateRegistry, W) {
        (self.registry, self.writer.into_inner())
    }

    /// Applies a validated property to `address`.
    ///
    /// State properties update the stored record. Effects start a program
    /// through [`start_effect`](Self::start_effect) and increments go
    /// straight to the controller. No sync is requested.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if a command write fails.
    pub fn apply(&mut self, address: DeviceAddress, property: &Property) -> Result<()> {
        tracing::trace!(address = %address, property = %property, "Applying property");
        match *property {
            Property::Effect(effect) => self.start_effect(address, effect),
            Property::Increment(v) => self.send(address, DeviceCommand::IncrementUniform(v)),
            Property::IncrementRed(v) => self.send(address, DeviceCommand::IncrementRed(v)),
            Property::IncrementGreen(v) => self.send(address, DeviceCommand::IncrementGreen(v)),
            Property::IncrementBlue(v) => self.send(address, DeviceCommand::IncrementBlue(v)),
            _ => {
                self.registry.state_mut(address).apply(property);
                Ok(())
            }
        }
    }

    /// Syncs `address` unless its suppression latch is set.
    ///
    /// A set latch is cleared and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if a write fails.
    pub fn request_sync(&mut self, address: DeviceAddress) -> Result<()> {
        let state = self.registry.state_mut(address);
        if state.suppress_next_sync() {
            state.set_suppress_next_sync(false);
            tracing::debug!(address = %address, "Sync suppressed");
            return Ok(());
        }
        self.sync(address)
    }

    /// Writes the current state of `address` to the controller.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if a write fails. Program mode is only
    /// cleared once the manual mode switch has been written.
    pub fn sync(&mut self, address: DeviceAddress) -> Result<()> {
        let state = self.registry.state_mut(address);
        if !state.is_on() {
            tracing::debug!(address = %address, "Syncing power off");
            return self.writer.send(address, &DeviceCommand::PowerOff);
        }

        let color = state.calc_rgb();
        let leave_program = state.program_mode();
        tracing::debug!(address = %address, color = %color, "Syncing color");

        if leave_program {
            self.writer.send(address, &DeviceCommand::EnterManualMode)?;
            self.registry.state_mut(address).set_program_mode(false);
        }
        self.writer.send(address, &DeviceCommand::SetColor(color))
    }

    /// Starts a built-in program on `address`.
    ///
    /// Marks the device as being in program mode and arms the suppression
    /// latch, so the sync request that follows the update doesn't paint a
    /// static color over the program.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if a write fails.
    pub fn start_effect(&mut self, address: DeviceAddress, effect: Effect) -> Result<()> {
        let state = self.registry.state_mut(address);
        state.set_program_mode(true);
        state.set_suppress_next_sync(true);
        tracing::debug!(address = %address, effect = %effect, "Starting effect");

        self.writer.send(address, &DeviceCommand::ExitManualMode)?;
        self.writer.send(address, &DeviceCommand::SelectEffect(effect))
    }

    /// Sends a command to `address` without touching its state.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the write fails.
    pub fn send(&mut self, address: DeviceAddress, command: DeviceCommand) -> Result<()> {
        tracing::debug!(address = %address, command = %command, "Sending command");
        self.writer.send(address, &command)
    }
}
