// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Built-in controller effects.

use std::fmt;

use crate::error::ValueError;

/// Index of a built-in automated lighting program (1-9).
///
/// On the wire the controller expects program numbers starting at 200 in
/// steps of three.
///
/// # Examples
///
/// ```
/// use chromobridge::types::Effect;
///
/// let effect = Effect::new(3).unwrap();
/// assert_eq!(effect.wire_value(), 206);
///
/// assert!(Effect::new(0).is_err());
/// assert!(Effect::new(10).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Effect(u8);

impl Effect {
    /// Lowest effect index.
    pub const MIN: u8 = 1;

    /// Highest effect index.
    pub const MAX: u8 = 9;

    const WIRE_BASE: u8 = 200;
    const WIRE_STEP: u8 = 3;

    /// Creates an effect index.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `index` is outside 1-9.
    pub fn new(index: u8) -> Result<Self, ValueError> {
        Self::try_from(i64::from(index))
    }

    /// Returns the 1-based effect index.
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.0
    }

    /// Returns the program number sent to the controller.
    #[must_use]
    pub const fn wire_value(&self) -> u8 {
        Self::WIRE_BASE + (self.0 - 1) * Self::WIRE_STEP
    }
}

impl TryFrom<i64> for Effect {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let value = ValueError::check_range(
            "effect",
            value,
            i64::from(Self::MIN),
            i64::from(Self::MAX),
        )?;
        // Safe: range checked above
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = value as u8;
        Ok(Self(value))
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effect {}", self.0)
    }
}
