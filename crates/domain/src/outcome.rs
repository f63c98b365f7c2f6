//! Outcome: what an accepted command produced.

use std::time::Duration;

use crate::timer::{TimerPurpose, TimerRequest};

/// Notices to publish and timers to (re)schedule after a transition.
///
/// Notices are delivered to observers in order; timer requests are applied
/// in order, so a `Cancel` followed by a `Once` for the same purpose behaves
/// like a restart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub notices: Vec<String>,
    pub timers: Vec<TimerRequest>,
}

impl Outcome {
    /// An outcome carrying a single notice.
    #[must_use]
    pub fn notice(message: impl Into<String>) -> Self {
        Self::default().with_notice(message)
    }

    #[must_use]
    pub fn with_notice(mut self, message: impl Into<String>) -> Self {
        self.notices.push(message.into());
        self
    }

    /// Schedule a one-shot timer.
    #[must_use]
    pub fn start(mut self, purpose: TimerPurpose, delay: Duration) -> Self {
        self.timers.push(TimerRequest::Once { purpose, delay });
        self
    }

    /// Schedule a repeating timer.
    #[must_use]
    pub fn repeat(mut self, purpose: TimerPurpose, period: Duration, repeats: Option<u32>) -> Self {
        self.timers.push(TimerRequest::Repeating {
            purpose,
            period,
            repeats,
        });
        self
    }

    #[must_use]
    pub fn cancel(mut self, purpose: TimerPurpose) -> Self {
        self.timers.push(TimerRequest::Cancel(purpose));
        self
    }

    /// Append everything from `other` after this outcome's content.
    #[must_use]
    pub fn merge(mut self, other: Outcome) -> Self {
        self.notices.extend(other.notices);
        self.timers.extend(other.timers);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty() && self.timers.is_empty()
    }
}
