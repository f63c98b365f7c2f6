//! Device port: the state machine behind one simulated appliance.

use homesim_domain::command::Command;
use homesim_domain::context::DeviceContext;
use homesim_domain::device::{Device, DeviceKind};
use homesim_domain::error::Rejection;
use homesim_domain::id::DeviceId;
use homesim_domain::outcome::Outcome;
use homesim_domain::timer::TimerPurpose;

/// A simulated appliance.
///
/// Implementations are plain synchronous state machines: they never sleep,
/// spawn or talk to observers. Everything they want to happen next is
/// described by the returned [`Outcome`].
pub trait SmartDevice: Send {
    fn id(&self) -> DeviceId;

    fn name(&self) -> &str;

    fn kind(&self) -> DeviceKind;

    /// Status reflecting the last accepted transition.
    fn status(&self) -> &str;

    fn is_active(&self) -> bool;

    /// Connect or disconnect the device.
    fn set_active(&mut self, active: bool) -> Outcome;

    /// Handle a command addressed to this device.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] and leaves the state untouched when the command
    /// is not acceptable right now.
    fn apply(
        &mut self,
        command: Command,
        ctx: &mut DeviceContext<'_>,
    ) -> Result<Outcome, Rejection>;

    /// A timer previously requested by this device fired.
    fn on_timer(&mut self, purpose: TimerPurpose, ctx: &mut DeviceContext<'_>) -> Outcome {
        let _ = (purpose, ctx);
        Outcome::default()
    }

    /// Periodic simulation step.
    fn tick(&mut self, ctx: &mut DeviceContext<'_>) -> Outcome {
        let _ = ctx;
        Outcome::default()
    }

    /// Read-only view of the current state.
    fn snapshot(&self) -> Device;
}

/// Creates devices from a kind and a user-chosen name.
pub trait DeviceFactory: Send + Sync {
    fn create(&self, kind: DeviceKind, name: &str) -> Box<dyn SmartDevice>;
}

impl<T: DeviceFactory> DeviceFactory for std::sync::Arc<T> {
    fn create(&self, kind: DeviceKind, name: &str) -> Box<dyn SmartDevice> {
        (**self).create(kind, name)
    }
}
