//! Garage door: PIN access, maintenance mode and a ten minute auto-close.

use std::time::Duration;

use homesim_app::ports::SmartDevice;
use homesim_domain::command::{Command, GarageDoorCommand, Position};
use homesim_domain::context::DeviceContext;
use homesim_domain::device::{Device, DeviceKind};
use homesim_domain::error::Rejection;
use homesim_domain::outcome::Outcome;
use homesim_domain::timer::TimerPurpose;

use super::{Battery, DeviceCore, battery_report};

const AUTO_CLOSE_DELAY: Duration = Duration::from_secs(10 * 60);
const BATTERY_DRAIN: u8 = 10;

pub struct GarageDoor {
    core: DeviceCore,
    position: Position,
    automatic: bool,
    maintenance: bool,
    pin: String,
    battery: Battery,
}

impl GarageDoor {
    #[must_use]
    pub fn new(name: &str, pin: &str) -> Self {
        Self {
            core: DeviceCore::new(DeviceKind::GarageDoor, name, Position::Closed.to_string()),
            position: Position::Closed,
            automatic: true,
            maintenance: false,
            pin: pin.to_string(),
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
        let outcome = Outcome::notice(format!("Garage Door is now {position}."));
        match position {
            Position::Closed => outcome.cancel(TimerPurpose::AutoClose),
            Position::Open | Position::HalfOpen if self.automatic => {
                outcome.start(TimerPurpose::AutoClose, AUTO_CLOSE_DELAY)
            }
            Position::Open | Position::HalfOpen => outcome,
        }
    }

    fn ensure_movable(&self) -> Result<(), Rejection> {
        if self.battery.is_empty() {
            return Err(Rejection::BatteryEmpty);
        }
        if self.maintenance {
            return Err(Rejection::InvalidTransition {
                action: "move",
                status: "in maintenance mode".to_string(),
            });
        }
        Ok(())
    }

    fn handle(&mut self, command: GarageDoorCommand) -> Result<Outcome, Rejection> {
        match command {
            GarageDoorCommand::Move(position) => {
                self.ensure_movable()?;
                if position == Position::Open && !self.automatic {
                    return Err(Rejection::ManualMode);
                }
                Ok(self.move_to(position))
            }
            GarageDoorCommand::Automatic => {
                self.automatic = true;
                let outcome = Outcome::notice("Garage Door is now in automatic mode.");
                if self.position == Position::Closed {
                    Ok(outcome)
                } else {
                    Ok(outcome.start(TimerPurpose::AutoClose, AUTO_CLOSE_DELAY))
                }
            }
            GarageDoorCommand::Manual => {
                self.automatic = false;
                Ok(Outcome::notice("Garage Door is now in manual mode.")
                    .cancel(TimerPurpose::AutoClose))
            }
            GarageDoorCommand::UnlockWithPin(pin) => {
                if pin != self.pin {
                    tracing::warn!(device = %self.core.name, "wrong PIN entered");
                    return Err(Rejection::InvalidPin);
                }
                self.ensure_movable()?;
                Ok(Outcome::notice("Access granted with PIN.").merge(self.move_to(Position::Open)))
            }
            GarageDoorCommand::Maintenance(true) => {
                self.maintenance = true;
                self.core.set_status("maintenance");
                Ok(Outcome::notice("Garage Door is now in maintenance mode.")
                    .cancel(TimerPurpose::AutoClose))
            }
            GarageDoorCommand::Maintenance(false) => {
                self.maintenance = false;
                self.core.set_status(self.position.to_string());
                Ok(Outcome::notice("Garage Door is back to normal operation."))
            }
            GarageDoorCommand::DrainBattery => {
                self.battery.drain(BATTERY_DRAIN)?;
                Ok(battery_report(&self.core.name, self.battery))
            }
        }
    }
}

impl SmartDevice for GarageDoor {
    delegate_core!();

    fn apply(
        &mut self,
        command: Command,
        _ctx: &mut DeviceContext<'_>,
    ) -> Result<Outcome, Rejection> {
        self.core.ensure_active()?;
        match command {
            Command::GarageDoor(command) => self.handle(command),
            _ => Err(Rejection::Unsupported {
                kind: self.core.kind,
            }),
        }
    }

    fn on_timer(&mut self, purpose: TimerPurpose, _ctx: &mut DeviceContext<'_>) -> Outcome {
        if purpose != TimerPurpose::AutoClose
            || !self.core.active
            || self.maintenance
            || self.position == Position::Closed
        {
            return Outcome::default();
        }
        self.position = Position::Closed;
        self.core.set_status(Position::Closed.to_string());
        Outcome::notice("Garage Door closed automatically.")
    }

    fn snapshot(&self) -> Device {
        self.core
            .snapshot()
            .with_attribute("position", self.position.to_string())
            .with_attribute("automatic", self.automatic)
            .with_attribute("maintenance", self.maintenance)
            .with_attribute("battery", self.battery.level())
    }
}

#[cfg(test)]
mod tests {
    use homesim_domain::timer::TimerRequest;

    use super::*;
    use crate::devices::testing::Harness;

    fn send(door: &mut GarageDoor, input: &str) -> Result<Outcome, Rejection> {
        let mut harness = Harness::default();
        let command = Command::parse(DeviceKind::GarageDoor, input)?;
        door.apply(command, &mut harness.ctx())
    }

    #[test]
    fn should_arm_auto_close_when_opened() {
        let mut door = GarageDoor::new("garage", "0000");
        let outcome = send(&mut door, "open").unwrap();
        assert_eq!(outcome.notices, vec!["Garage Door is now open."]);
        assert_eq!(
            outcome.timers,
            vec![TimerRequest::Once {
                purpose: TimerPurpose::AutoClose,
                delay: AUTO_CLOSE_DELAY,
            }]
        );
    }

    #[test]
    fn should_close_when_auto_close_fires() {
        let mut door = GarageDoor::new("garage", "0000");
        let mut harness = Harness::default();
        send(&mut door, "open").unwrap();
        let outcome = door.on_timer(TimerPurpose::AutoClose, &mut harness.ctx());
        assert_eq!(outcome.notices, vec!["Garage Door closed automatically."]);
        assert_eq!(door.status(), "closed");
    }

    #[test]
    fn should_refuse_open_when_manual() {
        let mut door = GarageDoor::new("garage", "0000");
        send(&mut door, "manual").unwrap();
        assert_eq!(send(&mut door, "open"), Err(Rejection::ManualMode));
        assert_eq!(door.position(), Position::Closed);
        let outcome = send(&mut door, "half-open").unwrap();
        assert!(outcome.timers.is_empty());
    }

    #[test]
    fn should_cancel_auto_close_when_closed_by_hand() {
        let mut door = GarageDoor::new("garage", "0000");
        send(&mut door, "open").unwrap();
        let outcome = send(&mut door, "close").unwrap();
        assert_eq!(
            outcome.timers,
            vec![TimerRequest::Cancel(TimerPurpose::AutoClose)]
        );
    }

    #[test]
    fn should_open_with_correct_pin() {
        let mut door = GarageDoor::new("garage", "0000");
        let outcome = send(&mut door, "pin:0000").unwrap();
        assert_eq!(
            outcome.notices,
            vec!["Access granted with PIN.", "Garage Door is now open."]
        );
        assert_eq!(send(&mut door, "pin:1111"), Err(Rejection::InvalidPin));
    }

    #[test]
    fn should_refuse_moves_during_maintenance() {
        let mut door = GarageDoor::new("garage", "0000");
        send(&mut door, "maintenance:on").unwrap();
        assert_eq!(door.status(), "maintenance");
        assert!(matches!(
            send(&mut door, "open"),
            Err(Rejection::InvalidTransition { action: "move", .. })
        ));
        send(&mut door, "maintenance:off").unwrap();
        assert_eq!(door.status(), "closed");
        assert!(send(&mut door, "open").is_ok());
    }

    #[test]
    fn should_refuse_moves_when_battery_empty() {
        let mut door = GarageDoor::new("garage", "0000");
        for _ in 0..10 {
            send(&mut door, "drain battery").unwrap();
        }
        assert_eq!(send(&mut door, "open"), Err(Rejection::BatteryEmpty));
    }
}
