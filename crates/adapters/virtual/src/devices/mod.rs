//! Simulated devices, one module per kind.
//!
//! Every device embeds a [`DeviceCore`] holding the identity, status string
//! and connection flag shared by all kinds; the per-kind state machine lives
//! next to it.

/// Implements the identity half of
/// [`SmartDevice`](homesim_app::ports::SmartDevice) by delegating to a
/// `core: DeviceCore` field.
macro_rules! delegate_core {
    () => {
        fn id(&self) -> homesim_domain::id::DeviceId {
            self.core.id
        }

        fn name(&self) -> &str {
            &self.core.name
        }

        fn kind(&self) -> homesim_domain::device::DeviceKind {
            self.core.kind
        }

        fn status(&self) -> &str {
            &self.core.status
        }

        fn is_active(&self) -> bool {
            self.core.active
        }

        fn set_active(&mut self, active: bool) -> homesim_domain::outcome::Outcome {
            self.core.set_active(active)
        }
    };
}

mod ac;
mod blinds;
mod camera;
mod doorbell;
mod fan;
mod garage_door;
mod light;
mod lock;
mod speaker;
mod sprinkler;
mod thermostat;
mod voice_assistant;

use std::collections::BTreeMap;

pub use ac::AirConditioner;
pub use blinds::Blinds;
pub use camera::Camera;
pub use doorbell::{DoorbellState, VideoDoorbell};
pub use fan::Fan;
pub use garage_door::GarageDoor;
pub use light::Light;
pub use lock::SmartLock;
pub use speaker::Speaker;
pub use sprinkler::Sprinkler;
pub use thermostat::{Thermostat, ThermostatState};
pub use voice_assistant::{ListeningMode, VoiceAssistant};

use homesim_domain::device::{Device, DeviceKind};
use homesim_domain::error::Rejection;
use homesim_domain::id::DeviceId;
use homesim_domain::outcome::Outcome;

/// Identity and connection state shared by every simulated device.
#[derive(Debug, Clone)]
pub(crate) struct DeviceCore {
    pub(crate) id: DeviceId,
    pub(crate) name: String,
    pub(crate) kind: DeviceKind,
    pub(crate) status: String,
    pub(crate) active: bool,
}

impl DeviceCore {
    pub(crate) fn new(kind: DeviceKind, name: &str, status: impl Into<String>) -> Self {
        Self {
            id: DeviceId::new(),
            name: name.to_string(),
            kind,
            status: status.into(),
            active: true,
        }
    }

    /// Refuse anything while disconnected.
    pub(crate) fn ensure_active(&self) -> Result<(), Rejection> {
        if self.active {
            Ok(())
        } else {
            Err(Rejection::Disconnected)
        }
    }

    pub(crate) fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub(crate) fn set_active(&mut self, active: bool) -> Outcome {
        if self.active == active {
            return Outcome::default();
        }
        self.active = active;
        tracing::info!(device = %self.name, active, "connection toggled");
        Outcome::notice(if active {
            "Device connected"
        } else {
            "Device disconnected"
        })
    }

    /// Snapshot without any kind-specific attributes.
    pub(crate) fn snapshot(&self) -> Device {
        Device {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind,
            status: self.status.clone(),
            active: self.active,
            attributes: BTreeMap::new(),
        }
    }
}

/// Battery charge of a wireless device, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Battery(u8);

impl Default for Battery {
    fn default() -> Self {
        Self(100)
    }
}

impl Battery {
    const LOW: u8 = 20;

    pub(crate) fn level(self) -> u8 {
        self.0
    }

    pub(crate) fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Below the warning threshold.
    pub(crate) fn is_low(self) -> bool {
        self.0 < Self::LOW
    }

    /// At or below the warning threshold.
    pub(crate) fn is_at_most_low(self) -> bool {
        self.0 <= Self::LOW
    }

    /// Remove `step` percent of charge.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::BatteryEmpty`] when nothing is left to drain.
    pub(crate) fn drain(&mut self, step: u8) -> Result<u8, Rejection> {
        if self.is_empty() {
            return Err(Rejection::BatteryEmpty);
        }
        self.0 = self.0.saturating_sub(step);
        Ok(self.0)
    }
}

/// Notices emitted after draining a battery by hand.
pub(crate) fn battery_report(device: &str, battery: Battery) -> Outcome {
    let outcome = Outcome::notice(format!("Battery level is now: {}%", battery.level()));
    if battery.is_low() {
        tracing::warn!(device, level = battery.level(), "battery low");
        outcome.with_notice(format!(
            "Warning: Battery level is low ({}%)",
            battery.level()
        ))
    } else {
        outcome
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{FixedOffset, TimeZone, Utc};
    use homesim_domain::context::DeviceContext;
    use homesim_domain::time::Timestamp;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Owns the clock and RNG a [`DeviceContext`] borrows during a test.
    pub(crate) struct Harness {
        pub(crate) now: Timestamp,
        pub(crate) rng: StdRng,
    }

    impl Harness {
        pub(crate) fn at(hour: u32, minute: u32) -> Self {
            Self {
                now: Utc.with_ymd_and_hms(2024, 3, 15, hour, minute, 0).unwrap(),
                rng: StdRng::seed_from_u64(7),
            }
        }

        pub(crate) fn ctx(&mut self) -> DeviceContext<'_> {
            DeviceContext::new(self.now, FixedOffset::east_opt(0).unwrap(), &mut self.rng)
        }

        pub(crate) fn advance_minutes(&mut self, minutes: i64) {
            self.now += chrono::Duration::minutes(minutes);
        }
    }

    impl Default for Harness {
        fn default() -> Self {
            Self::at(12, 0)
        }
    }
}
