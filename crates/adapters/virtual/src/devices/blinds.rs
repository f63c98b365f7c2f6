//! Smart blinds: battery powered, with child safety and an automatic mode
//! that alternates between open and closed every five minutes.

use std::time::Duration;

use homesim_app::ports::SmartDevice;
use homesim_domain::command::{BlindsCommand, Command, Position};
use homesim_domain::context::DeviceContext;
use homesim_domain::device::{Device, DeviceKind};
use homesim_domain::error::Rejection;
use homesim_domain::outcome::Outcome;
use homesim_domain::timer::TimerPurpose;

use super::{Battery, DeviceCore, battery_report};

const ADJUST_PERIOD: Duration = Duration::from_secs(5 * 60);
const BATTERY_DRAIN: u8 = 10;

pub struct Blinds {
    core: DeviceCore,
    position: Position,
    automatic: bool,
    /// Whether the auto-adjust timer is currently requested.
    adjusting: bool,
    child_safety: bool,
    battery: Battery,
}

impl Blinds {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            core: DeviceCore::new(DeviceKind::Blinds, name, Position::Closed.to_string()),
            position: Position::Closed,
            automatic: true,
            adjusting: false,
            child_safety: false,
            battery: Battery::default(),
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    fn move_to(&mut self, position: Position) -> Outcome {
        self.position = position;
        self.core.set_status(position.to_string());
        Outcome::notice(format!("Smart Blinds are now {position}."))
    }

    fn start_adjusting(&mut self) -> Outcome {
        self.adjusting = true;
        Outcome::default().repeat(TimerPurpose::AutoAdjust, ADJUST_PERIOD, None)
    }

    fn stop_adjusting(&mut self) -> Outcome {
        self.adjusting = false;
        Outcome::default().cancel(TimerPurpose::AutoAdjust)
    }

    fn handle(&mut self, command: BlindsCommand) -> Result<Outcome, Rejection> {
        match command {
            BlindsCommand::Move(position) => {
                if self.battery.is_empty() {
                    return Err(Rejection::BatteryEmpty);
                }
                if self.child_safety {
                    return Err(Rejection::ChildSafetyEnabled);
                }
                self.automatic = false;
                Ok(self.move_to(position).merge(self.stop_adjusting()))
            }
            BlindsCommand::Automatic => {
                self.automatic = true;
                Ok(Outcome::notice("Smart Blinds are now in automatic mode.")
                    .merge(self.start_adjusting()))
            }
            BlindsCommand::Manual => {
                self.automatic = false;
                Ok(Outcome::notice("Smart Blinds are now in manual mode.")
                    .merge(self.stop_adjusting()))
            }
            BlindsCommand::ToggleChildSafety => {
                self.child_safety = !self.child_safety;
                Ok(Outcome::notice(if self.child_safety {
                    "Child Safety Mode is now enabled."
                } else {
                    "Child Safety Mode is now disabled."
                }))
            }
            BlindsCommand::Reset => {
                self.position = Position::Closed;
                self.core.set_status(Position::Closed.to_string());
                Ok(Outcome::notice("Smart Blinds position has been reset."))
            }
            BlindsCommand::DrainBattery => {
                self.battery.drain(BATTERY_DRAIN)?;
                Ok(battery_report(&self.core.name, self.battery))
            }
        }
    }
}

impl SmartDevice for Blinds {
    delegate_core!();

    fn apply(
        &mut self,
        command: Command,
        _ctx: &mut DeviceContext<'_>,
    ) -> Result<Outcome, Rejection> {
        self.core.ensure_active()?;
        match command {
            Command::Blinds(command) => self.handle(command),
            _ => Err(Rejection::Unsupported {
                kind: self.core.kind,
            }),
        }
    }

    fn on_timer(&mut self, purpose: TimerPurpose, _ctx: &mut DeviceContext<'_>) -> Outcome {
        if purpose != TimerPurpose::AutoAdjust
            || !self.core.active
            || !self.automatic
            || self.battery.is_empty()
        {
            return Outcome::default();
        }
        let next = match self.position {
            Position::Open => Position::Closed,
            Position::Closed | Position::HalfOpen => Position::Open,
        };
        self.move_to(next)
    }

    /// Automatic mode is on from the factory; the first tick arms its timer.
    fn tick(&mut self, _ctx: &mut DeviceContext<'_>) -> Outcome {
        if self.core.active && self.automatic && !self.adjusting {
            self.start_adjusting()
        } else {
            Outcome::default()
        }
    }

    fn snapshot(&self) -> Device {
        self.core
            .snapshot()
            .with_attribute("position", self.position.to_string())
            .with_attribute("automatic", self.automatic)
            .with_attribute("child_safety", self.child_safety)
            .with_attribute("battery", self.battery.level())
    }
}

#[cfg(test)]
mod tests {
    use homesim_domain::timer::TimerRequest;

    use super::*;
    use crate::devices::testing::Harness;

    fn send(blinds: &mut Blinds, input: &str) -> Result<Outcome, Rejection> {
        let mut harness = Harness::default();
        let command = Command::parse(DeviceKind::Blinds, input)?;
        blinds.apply(command, &mut harness.ctx())
    }

    #[test]
    fn should_move_and_stop_auto_adjust_when_moved_by_hand() {
        let mut blinds = Blinds::new("bedroom");
        let outcome = send(&mut blinds, "half-open").unwrap();
        assert_eq!(outcome.notices, vec!["Smart Blinds are now half-open."]);
        assert_eq!(
            outcome.timers,
            vec![TimerRequest::Cancel(TimerPurpose::AutoAdjust)]
        );
        assert_eq!(blinds.status(), "half-open");
    }

    #[test]
    fn should_refuse_manual_move_when_child_safety_on() {
        let mut blinds = Blinds::new("bedroom");
        send(&mut blinds, "child safety").unwrap();
        assert_eq!(send(&mut blinds, "open"), Err(Rejection::ChildSafetyEnabled));
        assert_eq!(blinds.position(), Position::Closed);
    }

    #[test]
    fn should_refuse_move_when_battery_empty() {
        let mut blinds = Blinds::new("bedroom");
        for _ in 0..10 {
            send(&mut blinds, "drain battery").unwrap();
        }
        assert_eq!(send(&mut blinds, "open"), Err(Rejection::BatteryEmpty));
        assert_eq!(
            send(&mut blinds, "drain battery"),
            Err(Rejection::BatteryEmpty)
        );
    }

    #[test]
    fn should_alternate_position_when_auto_adjust_fires() {
        let mut blinds = Blinds::new("bedroom");
        let mut harness = Harness::default();
        let armed = blinds.tick(&mut harness.ctx());
        assert_eq!(
            armed.timers,
            vec![TimerRequest::Repeating {
                purpose: TimerPurpose::AutoAdjust,
                period: ADJUST_PERIOD,
                repeats: None,
            }]
        );
        assert!(blinds.tick(&mut harness.ctx()).is_empty());

        blinds.on_timer(TimerPurpose::AutoAdjust, &mut harness.ctx());
        assert_eq!(blinds.position(), Position::Open);
        blinds.on_timer(TimerPurpose::AutoAdjust, &mut harness.ctx());
        assert_eq!(blinds.position(), Position::Closed);
    }

    #[test]
    fn should_ignore_auto_adjust_when_manual() {
        let mut blinds = Blinds::new("bedroom");
        let mut harness = Harness::default();
        send(&mut blinds, "manual").unwrap();
        assert!(
            blinds
                .on_timer(TimerPurpose::AutoAdjust, &mut harness.ctx())
                .is_empty()
        );
        assert!(blinds.tick(&mut harness.ctx()).is_empty());
    }

    #[test]
    fn should_close_when_reset() {
        let mut blinds = Blinds::new("bedroom");
        send(&mut blinds, "open").unwrap();
        let outcome = send(&mut blinds, "reset").unwrap();
        assert_eq!(outcome.notices, vec!["Smart Blinds position has been reset."]);
        assert_eq!(blinds.status(), "closed");
    }
}
