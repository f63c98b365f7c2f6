//! Timers: delayed and repeating transitions a device asks for.
//!
//! Devices do not own threads. They describe the timer they need as a
//! [`TimerRequest`] inside their [`Outcome`](crate::outcome::Outcome); the
//! application layer schedules it under a [`TimerKey`] and calls the device
//! back with the [`TimerPurpose`] when it fires.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What a timer is for. At most one timer per (device, purpose) is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPurpose {
    /// Re-lock an unlocked smart lock.
    AutoLock,
    /// Close an open garage door.
    AutoClose,
    /// Alternate blinds between open and closed.
    AutoAdjust,
    /// Return an unanswered doorbell to standby.
    RingTimeout,
    /// Replay the doorbell chime.
    Ringtone,
    /// Deliver a voice assistant's answer after its thinking delay.
    AssistantResponse,
}

impl fmt::Display for TimerPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AutoLock => "auto_lock",
            Self::AutoClose => "auto_close",
            Self::AutoAdjust => "auto_adjust",
            Self::RingTimeout => "ring_timeout",
            Self::Ringtone => "ringtone",
            Self::AssistantResponse => "assistant_response",
        })
    }
}

/// Scheduling key: one slot per device name and purpose.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimerKey {
    pub device: String,
    pub purpose: TimerPurpose,
}

impl TimerKey {
    #[must_use]
    pub fn new(device: impl Into<String>, purpose: TimerPurpose) -> Self {
        Self {
            device: device.into(),
            purpose,
        }
    }
}

impl fmt::Display for TimerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.device, self.purpose)
    }
}

/// A scheduling instruction emitted by a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerRequest {
    /// Fire once after `delay`, replacing any pending timer for `purpose`.
    Once {
        purpose: TimerPurpose,
        delay: Duration,
    },
    /// Fire every `period`, at most `repeats` times when bounded.
    Repeating {
        purpose: TimerPurpose,
        period: Duration,
        repeats: Option<u32>,
    },
    /// Drop the pending timer for `purpose`, if any.
    Cancel(TimerPurpose),
}

impl TimerRequest {
    /// The purpose this request refers to.
    #[must_use]
    pub fn purpose(&self) -> TimerPurpose {
        match self {
            Self::Once { purpose, .. } | Self::Repeating { purpose, .. } => *purpose,
            Self::Cancel(purpose) => *purpose,
        }
    }
}
