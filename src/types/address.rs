// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! USP3 device addressing.

use std::fmt;

use crate::error::ValueError;

/// A 24-bit USP3 device address.
///
/// Address 0 is the broadcast address and reaches every controller on the
/// bus.
///
/// # Examples
///
/// ```
/// use chromobridge::types::DeviceAddress;
///
/// let addr = DeviceAddress::new(0x01_02_03).unwrap();
/// assert_eq!(addr.to_bytes(), [0x01, 0x02, 0x03]);
///
/// assert!(DeviceAddress::new(0x100_0000).is_err());
/// assert_eq!(DeviceAddress::BROADCAST.value(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DeviceAddress(u32);

impl DeviceAddress {
    /// Highest valid address.
    pub const MAX: u32 = 0xFF_FFFF;

    /// The broadcast address.
    pub const BROADCAST: Self = Self(0);

    /// Creates a device address.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `value` does not fit in 24 bits.
    pub fn new(value: u32) -> Result<Self, ValueError> {
        Self::try_from(i64::from(value))
    }

    /// Builds an address from three bytes, most significant first.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self(u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]))
    }

    /// Returns the numeric address.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Returns `true` for the broadcast address.
    #[must_use]
    pub const fn is_broadcast(&self) -> bool {
        self.0 == 0
    }

    /// Returns the three address bytes, most significant first.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 3] {
        let [_, hi, mid, lo] = self.0.to_be_bytes();
        [hi, mid, lo]
    }
}

impl TryFrom<i64> for DeviceAddress {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let value = ValueError::check_range("address", value, 0, i64::from(Self::MAX))?;
        // Safe: range checked above
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = value as u32;
        Ok(Self(value))
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:06X}", self.0)
    }
}
