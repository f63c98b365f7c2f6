//! Cancellable timers backed by tokio tasks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use homesim_domain::timer::TimerKey;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

use crate::error::SchedulerError;
use crate::ports::{Scheduler, TimerCallback};

struct Slot {
    generation: u64,
    handle: AbortHandle,
}

type Slots = Arc<Mutex<HashMap<TimerKey, Slot>>>;

/// [`Scheduler`] that spawns one tokio task per pending timer.
///
/// Re-scheduling a key aborts the superseded task. Each task also checks
/// its generation against the slot table when it wakes, so a task that was
/// already past its sleep when it got superseded still never runs its
/// callback.
#[derive(Default)]
pub struct TokioScheduler {
    slots: Slots,
    generation: AtomicU64,
}

impl TokioScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of timers currently pending.
    #[must_use]
    pub fn pending(&self) -> usize {
        lock(&self.slots).len()
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, slot) in lock(&self.slots).drain() {
            slot.handle.abort();
        }
    }
}

fn lock(slots: &Slots) -> MutexGuard<'_, HashMap<TimerKey, Slot>> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

fn install(
    table: &mut HashMap<TimerKey, Slot>,
    key: TimerKey,
    generation: u64,
    handle: AbortHandle,
) {
    tracing::trace!(%key, generation, "timer armed");
    if let Some(previous) = table.insert(key, Slot { generation, handle }) {
        previous.handle.abort();
    }
}

fn is_current(slots: &Slots, key: &TimerKey, generation: u64) -> bool {
    lock(slots)
        .get(key)
        .is_some_and(|slot| slot.generation == generation)
}

/// Release the slot if it still belongs to `generation`.
fn take_if_current(slots: &Slots, key: &TimerKey, generation: u64) -> bool {
    let mut slots = lock(slots);
    if slots
        .get(key)
        .is_some_and(|slot| slot.generation == generation)
    {
        slots.remove(key);
        true
    } else {
        false
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(
        &self,
        key: TimerKey,
        delay: Duration,
        mut callback: TimerCallback,
    ) -> Result<(), SchedulerError> {
        let runtime = Handle::try_current()?;
        let generation = self.next_generation();
        let slots = Arc::clone(&self.slots);
        let task_key = key.clone();
        // the task must not observe the table before its own slot is installed
        let mut table = lock(&self.slots);
        let handle = runtime
            .spawn(async move {
                tokio::time::sleep(delay).await;
                if take_if_current(&slots, &task_key, generation) {
                    tracing::debug!(key = %task_key, "timer fired");
                    callback();
                }
            })
            .abort_handle();
        install(&mut table, key, generation, handle);
        Ok(())
    }

    fn schedule_repeating(
        &self,
        key: TimerKey,
        period: Duration,
        repeats: Option<u32>,
        mut callback: TimerCallback,
    ) -> Result<(), SchedulerError> {
        if repeats == Some(0) {
            self.cancel(&key);
            return Ok(());
        }
        let runtime = Handle::try_current()?;
        let generation = self.next_generation();
        let slots = Arc::clone(&self.slots);
        let task_key = key.clone();
        let mut table = lock(&self.slots);
        let handle = runtime
            .spawn(async move {
                let mut fired: u32 = 0;
                loop {
                    tokio::time::sleep(period).await;
                    let last = repeats.is_some_and(|limit| fired.saturating_add(1) >= limit);
                    let current = if last {
                        take_if_current(&slots, &task_key, generation)
                    } else {
                        is_current(&slots, &task_key, generation)
                    };
                    if !current {
                        return;
                    }
                    tracing::debug!(
                        key = %task_key,
                        round = fired.saturating_add(1),
                        "repeating timer fired"
                    );
                    callback();
                    fired = fired.saturating_add(1);
                    if last {
                        return;
                    }
                }
            })
            .abort_handle();
        install(&mut table, key, generation, handle);
        Ok(())
    }

    fn cancel(&self, key: &TimerKey) -> bool {
        match lock(&self.slots).remove(key) {
            Some(slot) => {
                slot.handle.abort();
                tracing::trace!(%key, "timer cancelled");
                true
            }
            None => false,
        }
    }

    fn cancel_device(&self, device: &str) -> usize {
        let mut slots = lock(&self.slots);
        let keys: Vec<TimerKey> = slots
            .keys()
            .filter(|key| key.device == device)
            .cloned()
            .collect();
        for key in &keys {
            if let Some(slot) = slots.remove(key) {
                slot.handle.abort();
            }
        }
        keys.len()
    }
}
