//! Home service: the controller that owns every simulated device.
//!
//! Devices are keyed by name in one map behind a single lock. A command is
//! handled entirely under that lock; notices are published and timers armed
//! only after it is released, so observers and timer callbacks may call back
//! into the service.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::FixedOffset;
use homesim_domain::command::Command;
use homesim_domain::context::DeviceContext;
use homesim_domain::device::{Device, DeviceKind};
use homesim_domain::error::{HomeError, NotFoundError, Rejection, ValidationError};
use homesim_domain::id::SubscriptionId;
use homesim_domain::outcome::Outcome;
use homesim_domain::time::{self, Timestamp};
use homesim_domain::timer::{TimerKey, TimerPurpose, TimerRequest};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::observer_registry::ObserverRegistry;
use crate::ports::{DeviceFactory, Observer, Scheduler, SmartDevice, TimerCallback};

type Devices = BTreeMap<String, Box<dyn SmartDevice>>;

struct Inner<F, S> {
    factory: F,
    scheduler: S,
    devices: Mutex<Devices>,
    observers: ObserverRegistry,
    rng: Mutex<StdRng>,
    offset: FixedOffset,
    clock: fn() -> Timestamp,
}

/// Application service owning the devices of one home.
///
/// Cloning is cheap and yields a handle to the same home.
pub struct HomeService<F, S> {
    inner: Arc<Inner<F, S>>,
}

impl<F, S> Clone for HomeService<F, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Configures the clock, time zone and randomness of a [`HomeService`].
pub struct HomeServiceBuilder<F, S> {
    factory: F,
    scheduler: S,
    rng: Option<StdRng>,
    offset: Option<FixedOffset>,
    clock: fn() -> Timestamp,
}

impl<F, S> HomeServiceBuilder<F, S>
where
    F: DeviceFactory + 'static,
    S: Scheduler + 'static,
{
    /// Use a deterministic random source.
    #[must_use]
    pub fn rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Evaluate time-of-day rules in this time zone.
    #[must_use]
    pub fn offset(mut self, offset: FixedOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: fn() -> Timestamp) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn build(self) -> HomeService<F, S> {
        HomeService {
            inner: Arc::new(Inner {
                factory: self.factory,
                scheduler: self.scheduler,
                devices: Mutex::new(BTreeMap::new()),
                observers: ObserverRegistry::new(),
                rng: Mutex::new(self.rng.unwrap_or_else(StdRng::from_os_rng)),
                offset: self.offset.unwrap_or_else(time::local_offset),
                clock: self.clock,
            }),
        }
    }
}

fn not_found(name: &str) -> HomeError {
    NotFoundError {
        entity: "Device",
        id: name.to_string(),
    }
    .into()
}

impl<F, S> HomeService<F, S>
where
    F: DeviceFactory + 'static,
    S: Scheduler + 'static,
{
    /// Create a service with the system clock, local time zone and OS entropy.
    pub fn new(factory: F, scheduler: S) -> Self {
        Self::builder(factory, scheduler).build()
    }

    pub fn builder(factory: F, scheduler: S) -> HomeServiceBuilder<F, S> {
        HomeServiceBuilder {
            factory,
            scheduler,
            rng: None,
            offset: None,
            clock: time::now,
        }
    }

    /// Create a device from its type string (`"light"`, `"garage door"`, …).
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::Validation`] for an unknown type, an empty name or
    /// a name already in use.
    #[tracing::instrument(skip(self))]
    pub fn add_device(&self, device_type: &str, name: &str) -> Result<Device, HomeError> {
        let kind: DeviceKind = device_type.parse()?;
        self.add(kind, name)
    }

    /// Create a device of a known kind.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::Validation`] for an empty or duplicate name.
    #[tracing::instrument(skip(self))]
    pub fn add(&self, kind: DeviceKind, name: &str) -> Result<Device, HomeError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        let mut devices = self.inner.lock_devices();
        if devices.contains_key(name) {
            return Err(ValidationError::DuplicateName(name.to_string()).into());
        }
        let device = self.inner.factory.create(kind, name);
        let snapshot = device.snapshot();
        devices.insert(name.to_string(), device);
        drop(devices);
        tracing::info!(device = name, %kind, "device added");
        Ok(snapshot)
    }

    /// Remove a device, cancelling its timers and dropping its observers.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] when no device has this name.
    #[tracing::instrument(skip(self))]
    pub fn remove_device(&self, name: &str) -> Result<Device, HomeError> {
        let device = self
            .inner
            .lock_devices()
            .remove(name)
            .ok_or_else(|| not_found(name))?;
        let timers = self.inner.scheduler.cancel_device(name);
        let observers = self.inner.observers.remove_device(name);
        tracing::info!(device = name, timers, observers, "device removed");
        Ok(device.snapshot())
    }

    /// Parse a free-form state string for the device and apply it.
    ///
    /// Rejections are also published to the device's observers.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] for an unknown device and
    /// [`HomeError::Rejected`] when the device refuses the input.
    #[tracing::instrument(skip(self))]
    pub fn change_state(&self, name: &str, input: &str) -> Result<Device, HomeError> {
        self.inner
            .execute(name, |device| Command::parse(device.kind(), input))
    }

    /// Apply an already typed command.
    ///
    /// # Errors
    ///
    /// Same as [`Self::change_state`]; a command for another device kind is
    /// rejected as unsupported.
    #[tracing::instrument(skip(self))]
    pub fn send(&self, name: &str, command: Command) -> Result<Device, HomeError> {
        self.inner.execute(name, move |device| {
            if command.kind() == device.kind() {
                Ok(command)
            } else {
                Err(Rejection::Unsupported {
                    kind: device.kind(),
                })
            }
        })
    }

    /// Snapshot of one device.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] when no device has this name.
    pub fn get_device(&self, name: &str) -> Result<Device, HomeError> {
        self.inner
            .lock_devices()
            .get(name)
            .map(|device| device.snapshot())
            .ok_or_else(|| not_found(name))
    }

    /// Snapshots of every device, ordered by name.
    #[must_use]
    pub fn list_devices(&self) -> Vec<Device> {
        self.inner
            .lock_devices()
            .values()
            .map(|device| device.snapshot())
            .collect()
    }

    /// Connect or disconnect a device.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] when no device has this name.
    #[tracing::instrument(skip(self))]
    pub fn set_active(&self, name: &str, active: bool) -> Result<Device, HomeError> {
        let (outcome, snapshot) = {
            let mut devices = self.inner.lock_devices();
            let device = devices.get_mut(name).ok_or_else(|| not_found(name))?;
            (device.set_active(active), device.snapshot())
        };
        tracing::info!(device = name, active, "connection changed");
        self.inner.dispatch(name, outcome);
        Ok(snapshot)
    }

    /// Register an observer on a device.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] when no device has this name.
    pub fn subscribe(
        &self,
        name: &str,
        observer: Arc<dyn Observer>,
    ) -> Result<SubscriptionId, HomeError> {
        if !self.inner.lock_devices().contains_key(name) {
            return Err(not_found(name));
        }
        Ok(self.inner.observers.subscribe(name, observer))
    }

    /// Drop a subscription. Returns whether it existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.observers.unsubscribe(id)
    }

    /// Advance every device's simulation by one step.
    #[tracing::instrument(skip(self))]
    pub fn tick(&self) {
        let outcomes: Vec<(String, Outcome)> = {
            let mut devices = self.inner.lock_devices();
            let mut rng = self.inner.lock_rng();
            let mut ctx = DeviceContext::new((self.inner.clock)(), self.inner.offset, &mut *rng);
            devices
                .iter_mut()
                .map(|(name, device)| (name.clone(), device.tick(&mut ctx)))
                .filter(|(_, outcome)| !outcome.is_empty())
                .collect()
        };
        for (name, outcome) in outcomes {
            self.inner.dispatch(&name, outcome);
        }
    }
}

impl<F, S> Inner<F, S>
where
    F: DeviceFactory + 'static,
    S: Scheduler + 'static,
{
    fn lock_devices(&self) -> MutexGuard<'_, Devices> {
        self.devices.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn execute(
        self: &Arc<Self>,
        name: &str,
        command: impl FnOnce(&dyn SmartDevice) -> Result<Command, Rejection>,
    ) -> Result<Device, HomeError> {
        let result = {
            let mut devices = self.lock_devices();
            let device = devices.get_mut(name).ok_or_else(|| not_found(name))?;
            let mut rng = self.lock_rng();
            let mut ctx = DeviceContext::new((self.clock)(), self.offset, &mut *rng);
            if device.is_active() {
                command(&**device)
                    .and_then(|command| device.apply(command, &mut ctx))
                    .map(|outcome| (outcome, device.snapshot()))
            } else {
                Err(Rejection::Disconnected)
            }
        };
        match result {
            Ok((outcome, snapshot)) => {
                tracing::debug!(device = name, status = %snapshot.status, "command applied");
                self.dispatch(name, outcome);
                Ok(snapshot)
            }
            Err(rejection) => {
                tracing::warn!(device = name, %rejection, "command rejected");
                self.observers.publish(name, &rejection.to_string());
                Err(rejection.into())
            }
        }
    }

    fn fire_timer(self: &Arc<Self>, name: &str, purpose: TimerPurpose) {
        let outcome = {
            let mut devices = self.lock_devices();
            let Some(device) = devices.get_mut(name) else {
                return;
            };
            let mut rng = self.lock_rng();
            let mut ctx = DeviceContext::new((self.clock)(), self.offset, &mut *rng);
            device.on_timer(purpose, &mut ctx)
        };
        tracing::debug!(device = name, %purpose, "timer handled");
        self.dispatch(name, outcome);
    }

    fn timer_callback(self: &Arc<Self>, name: &str, purpose: TimerPurpose) -> TimerCallback {
        let home: Weak<Self> = Arc::downgrade(self);
        let name = name.to_string();
        Box::new(move || {
            if let Some(home) = home.upgrade() {
                home.fire_timer(&name, purpose);
            }
        })
    }

    /// Publish notices, then apply timer requests in order.
    fn dispatch(self: &Arc<Self>, name: &str, outcome: Outcome) {
        for notice in &outcome.notices {
            self.observers.publish(name, notice);
        }
        for request in outcome.timers {
            let key = TimerKey::new(name, request.purpose());
            let armed = match request {
                TimerRequest::Once { purpose, delay } => {
                    self.scheduler
                        .schedule(key, delay, self.timer_callback(name, purpose))
                }
                TimerRequest::Repeating {
                    purpose,
                    period,
                    repeats,
                } => self.scheduler.schedule_repeating(
                    key,
                    period,
                    repeats,
                    self.timer_callback(name, purpose),
                ),
                TimerRequest::Cancel(_) => {
                    self.scheduler.cancel(&key);
                    Ok(())
                }
            };
            if let Err(error) = armed {
                tracing::warn!(device = name, %error, "timer not armed");
            }
        }
    }
}
