// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state management types.
//!
//! [`DeviceState`] is the per-controller record of color, power and program
//! mode. [`Property`] is a validated update that can be applied to it, and
//! [`StateRegistry`] keeps one state per address.
//!
//! # Examples
//!
//! ```
//! use chromobridge::state::{DeviceState, Property};
//!
//! let mut state = DeviceState::new();
//!
//! // Apply returns true if state actually changed
//! let change = Property::parse("on", 0).unwrap();
//! assert!(state.apply(&change));
//! assert!(!state.apply(&change));
//! assert!(!state.is_on());
//! ```

mod device_state;
mod property;
mod registry;

pub use device_state::{ColorMode, DeviceState};
pub use property::Property;
pub use registry::StateRegistry;
