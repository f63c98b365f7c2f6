//! Device context: the clock and randomness a device sees while handling a
//! command or a simulation tick.
//!
//! Devices never read the system clock or a global RNG themselves, so every
//! transition is reproducible in tests.

use chrono::FixedOffset;
use rand::RngCore;

use crate::time::{LocalTime, Timestamp};

/// Clock and entropy handed to a device for one transition.
pub struct DeviceContext<'a> {
    pub now: Timestamp,
    pub offset: FixedOffset,
    pub rng: &'a mut dyn RngCore,
}

impl<'a> DeviceContext<'a> {
    /// Build a context from explicit parts.
    pub fn new(now: Timestamp, offset: FixedOffset, rng: &'a mut dyn RngCore) -> Self {
        Self { now, offset, rng }
    }

    /// `now` expressed in the home's time zone.
    #[must_use]
    pub fn local_now(&self) -> LocalTime {
        self.now.with_timezone(&self.offset)
    }
}
