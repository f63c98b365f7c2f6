//! Scheduler port: cancellable delayed and repeating callbacks.

use std::time::Duration;

use homesim_domain::timer::TimerKey;

use crate::error::SchedulerError;

/// Work to run when a timer fires.
pub type TimerCallback = Box<dyn FnMut() + Send + 'static>;

/// Runs callbacks later, at most one pending timer per [`TimerKey`].
///
/// Scheduling a key that already has a pending timer cancels the previous
/// one: only the latest callback for a key ever runs.
pub trait Scheduler: Send + Sync {
    /// Run `callback` once after `delay`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] when the timer cannot be armed.
    fn schedule(
        &self,
        key: TimerKey,
        delay: Duration,
        callback: TimerCallback,
    ) -> Result<(), SchedulerError>;

    /// Run `callback` every `period`, at most `repeats` times when bounded.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] when the timer cannot be armed.
    fn schedule_repeating(
        &self,
        key: TimerKey,
        period: Duration,
        repeats: Option<u32>,
        callback: TimerCallback,
    ) -> Result<(), SchedulerError>;

    /// Cancel the pending timer for `key`. Returns whether one existed.
    fn cancel(&self, key: &TimerKey) -> bool;

    /// Cancel every pending timer of `device`. Returns how many were dropped.
    fn cancel_device(&self, device: &str) -> usize;
}

impl<T: Scheduler> Scheduler for std::sync::Arc<T> {
    fn schedule(
        &self,
        key: TimerKey,
        delay: Duration,
        callback: TimerCallback,
    ) -> Result<(), SchedulerError> {
        (**self).schedule(key, delay, callback)
    }

    fn schedule_repeating(
        &self,
        key: TimerKey,
        period: Duration,
        repeats: Option<u32>,
        callback: TimerCallback,
    ) -> Result<(), SchedulerError> {
        (**self).schedule_repeating(key, period, repeats, callback)
    }

    fn cancel(&self, key: &TimerKey) -> bool {
        (**self).cancel(key)
    }

    fn cancel_device(&self, device: &str) -> usize {
        (**self).cancel_device(device)
    }
}
