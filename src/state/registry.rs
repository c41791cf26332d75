// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Address-keyed store of device states.

use std::collections::HashMap;

use crate::types::DeviceAddress;

use super::DeviceState;

/// Holds one [`DeviceState`] per address.
///
/// States are created on first reference and kept for the life of the
/// registry. The registry does no locking; callers driving it from several
/// threads must serialize access themselves.
///
/// # Examples
///
/// ```
/// use chromobridge::state::StateRegistry;
/// use chromobridge::types::DeviceAddress;
///
/// let mut registry = StateRegistry::new();
/// let addr = DeviceAddress::new(7).unwrap();
/// assert!(registry.get(addr).is_none());
///
/// registry.state_mut(addr).set_on(false);
/// assert!(!registry.get(addr).unwrap().is_on());
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StateRegistry {
    states: HashMap<DeviceAddress, DeviceState>,
}

impl StateRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state for `address`, if it has been referenced before.
    #[must_use]
    pub fn get(&self, address: DeviceAddress) -> Option<&DeviceState> {
        self.states.get(&address)
    }

    /// Returns the state for `address`, creating it on first use.
    pub fn state_mut(&mut self, address: DeviceAddress) -> &mut DeviceState {
        self.states.entry(address).or_insert_with(|| {
            tracing::debug!(address = %address, "Tracking new device");
            DeviceState::new()
        })
    }

    /// Returns the number of tracked devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if no device has been referenced yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Iterates over tracked addresses and their states.
    pub fn iter(&self) -> impl Iterator<Item = (&DeviceAddress, &DeviceState)> {
        self.states.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_are_created_lazily() {
        let mut registry = StateRegistry::new();
        assert!(registry.is_empty());
        let a = DeviceAddress::new(1).unwrap();
        let b = DeviceAddress::new(2).unwrap();
        registry.state_mut(a);
        registry.state_mut(a);
        assert_eq!(registry.len(), 1);
        registry.state_mut(b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn states_are_independent() {
        let mut registry = StateRegistry::new();
        let a = DeviceAddress::new(1).unwrap();
        let b = DeviceAddress::new(2).unwrap();
        registry.state_mut(a).set_on(false);
        assert!(registry.state_mut(b).is_on());
        assert!(!registry.get(a).unwrap().is_on());
        assert_eq!(registry.iter().count(), 2);
    }
}
