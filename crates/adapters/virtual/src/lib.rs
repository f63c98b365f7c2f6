//! # homesim-adapter-virtual
//!
//! Simulated appliances behind the
//! [`SmartDevice`](homesim_app::ports::SmartDevice) port, plus the
//! [`VirtualDeviceFactory`] that builds them from a kind and a name.
//!
//! ## Provided devices
//!
//! | Kind | Type | Behaviour |
//! |------|------|-----------|
//! | `light` | [`Light`] | On/off, brightness, colour |
//! | `thermostat` | [`Thermostat`] | Heating/cooling/auto towards a target, energy accounting, reports |
//! | `camera` | [`Camera`] | Standby, recording and night mode with a photo gallery |
//! | `doorbell` | [`VideoDoorbell`] | Ringing with timeout, motion, visitor log, battery |
//! | `voice assistant` | [`VoiceAssistant`] | Listening modes, intent interpretation, delayed answers |
//! | `lock` | [`SmartLock`] | PIN users, auto-lock after five minutes, battery |
//! | `blinds` | [`Blinds`] | Manual or self-adjusting position, child safety, battery |
//! | `garage door` | [`GarageDoor`] | PIN access, maintenance, auto-close after ten minutes |
//! | `ac` | [`AirConditioner`] | Modes, fan speed, energy saving, daily schedule |
//! | `fan` | [`Fan`] | Speed setting |
//! | `speaker` | [`Speaker`] | Song queue, playback, stepped volume |
//! | `sprinkler` | [`Sprinkler`] | Watering runs, rain sensor, daily schedule |
//!
//! Devices are sans-IO: they read time and randomness from the
//! [`DeviceContext`](homesim_domain::context::DeviceContext) they are given
//! and describe timers in their outcomes instead of spawning them.
//!
//! ## Dependency rule
//!
//! Depends on `homesim-app` (port traits) and `homesim-domain` only.

mod devices;

use homesim_app::ports::{DeviceFactory, SmartDevice};
use homesim_domain::device::DeviceKind;
use homesim_domain::voice::InterpreterConfig;

pub use devices::{
    AirConditioner, Blinds, Camera, DoorbellState, Fan, GarageDoor, Light, ListeningMode,
    SmartLock, Speaker, Sprinkler, Thermostat, ThermostatState, VideoDoorbell, VoiceAssistant,
};

/// Settings applied to every device the factory builds.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceDefaults {
    /// PIN of the `admin` user of new smart locks.
    pub lock_pin: String,
    /// Access PIN of new garage doors.
    pub garage_pin: String,
    pub voice: InterpreterConfig,
}

impl Default for DeviceDefaults {
    fn default() -> Self {
        Self {
            lock_pin: "1234".to_string(),
            garage_pin: "0000".to_string(),
            voice: InterpreterConfig::default(),
        }
    }
}

/// Builds one simulated device per [`DeviceKind`].
#[derive(Debug, Clone, Default)]
pub struct VirtualDeviceFactory {
    defaults: DeviceDefaults,
}

impl VirtualDeviceFactory {
    #[must_use]
    pub fn new(defaults: DeviceDefaults) -> Self {
        Self { defaults }
    }

    #[must_use]
    pub fn defaults(&self) -> &DeviceDefaults {
        &self.defaults
    }
}

impl DeviceFactory for VirtualDeviceFactory {
    fn create(&self, kind: DeviceKind, name: &str) -> Box<dyn SmartDevice> {
        tracing::debug!(%kind, name, "building virtual device");
        match kind {
            DeviceKind::Light => Box::new(Light::new(name)),
            DeviceKind::Thermostat => Box::new(Thermostat::new(name)),
            DeviceKind::Camera => Box::new(Camera::new(name)),
            DeviceKind::Doorbell => Box::new(VideoDoorbell::new(name)),
            DeviceKind::VoiceAssistant => {
                Box::new(VoiceAssistant::new(name, self.defaults.voice))
            }
            DeviceKind::Lock => Box::new(SmartLock::new(name, &self.defaults.lock_pin)),
            DeviceKind::Blinds => Box::new(Blinds::new(name)),
            DeviceKind::GarageDoor => Box::new(GarageDoor::new(name, &self.defaults.garage_pin)),
            DeviceKind::Ac => Box::new(AirConditioner::new(name)),
            DeviceKind::Fan => Box::new(Fan::new(name)),
            DeviceKind::Speaker => Box::new(Speaker::new(name)),
            DeviceKind::Sprinkler => Box::new(Sprinkler::new(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_device_of_requested_kind_for_every_kind() {
        let factory = VirtualDeviceFactory::default();
        for kind in DeviceKind::ALL {
            let device = factory.create(kind, "test");
            assert_eq!(device.kind(), kind);
            assert_eq!(device.name(), "test");
            assert!(device.is_active());
            assert!(!device.status().is_empty(), "{kind} has no status");
        }
    }

    #[test]
    fn should_start_devices_in_documented_states() {
        let factory = VirtualDeviceFactory::default();
        let status = |kind| factory.create(kind, "x").status().to_string();
        assert_eq!(status(DeviceKind::Light), "off");
        assert_eq!(status(DeviceKind::Lock), "locked");
        assert_eq!(status(DeviceKind::GarageDoor), "closed");
        assert_eq!(status(DeviceKind::Speaker), "paused");
        assert_eq!(status(DeviceKind::Doorbell), "standby");
        assert_eq!(status(DeviceKind::VoiceAssistant), "idle");
    }

    #[test]
    fn should_give_each_device_a_distinct_id() {
        let factory = VirtualDeviceFactory::default();
        let a = factory.create(DeviceKind::Fan, "a");
        let b = factory.create(DeviceKind::Fan, "b");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn should_apply_configured_lock_pin() {
        use homesim_domain::command::Command;
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let factory = VirtualDeviceFactory::new(DeviceDefaults {
            lock_pin: "4321".to_string(),
            ..DeviceDefaults::default()
        });
        let mut lock = factory.create(DeviceKind::Lock, "front");
        let mut rng = StdRng::seed_from_u64(1);
        let mut ctx = homesim_domain::context::DeviceContext::new(
            chrono::Utc::now(),
            chrono::FixedOffset::east_opt(0).unwrap(),
            &mut rng,
        );
        let command = Command::parse(DeviceKind::Lock, "pin:4321").unwrap();
        assert!(lock.apply(command, &mut ctx).is_ok());
        assert_eq!(lock.status(), "unlocked");
    }
}
