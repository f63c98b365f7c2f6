use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Rejection;

/// A percentage in `0..=100` (brightness, volume).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Percent(u8);

impl Percent {
    pub const ZERO: Self = Self(0);
    pub const FULL: Self = Self(100);

    /// Wrap `value` if it lies in `0..=100`.
    #[must_use]
    pub fn new(value: u8) -> Option<Self> {
        (value <= 100).then_some(Self(value))
    }

    /// Validate an arbitrary integer, naming `field` in the rejection.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::OutOfRange`] outside `0..=100`.
    pub fn checked(field: &'static str, value: i64) -> Result<Self, Rejection> {
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(Rejection::OutOfRange {
                field,
                value,
                min: 0,
                max: 100,
            })
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Add `step`, stopping at 100.
    #[must_use]
    pub fn saturating_add(self, step: u8) -> Self {
        Self(self.0.saturating_add(step).min(100))
    }

    /// Subtract `step`, stopping at 0.
    #[must_use]
    pub fn saturating_sub(self, step: u8) -> Self {
        Self(self.0.saturating_sub(step))
    }
}

impl TryFrom<u8> for Percent {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("{value} is not a percentage"))
    }
}

impl From<Percent> for u8 {
    fn from(value: Percent) -> Self {
        value.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
