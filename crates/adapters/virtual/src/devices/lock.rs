//! Smart lock with per-user PINs and auto-lock.

use std::collections::BTreeMap;
use std::time::Duration;

use homesim_app::ports::SmartDevice;
use homesim_domain::command::{Command, LockCommand};
use homesim_domain::context::DeviceContext;
use homesim_domain::device::{Device, DeviceKind};
use homesim_domain::error::Rejection;
use homesim_domain::outcome::Outcome;
use homesim_domain::timer::TimerPurpose;

use super::{Battery, DeviceCore, battery_report};

const AUTO_LOCK_DELAY: Duration = Duration::from_secs(5 * 60);
const BATTERY_DRAIN: u8 = 5;
const ADMIN: &str = "admin";

pub struct SmartLock {
    core: DeviceCore,
    locked: bool,
    auto_lock: bool,
    users: BTreeMap<String, String>,
    battery: Battery,
}

impl SmartLock {
    /// A locked lock whose `admin` user owns `pin`.
    #[must_use]
    pub fn new(name: &str, pin: &str) -> Self {
        Self {
            core: DeviceCore::new(DeviceKind::Lock, name, "locked"),
            locked: true,
            auto_lock: true,
            users: BTreeMap::from([(ADMIN.to_string(), pin.to_string())]),
            battery: Battery::default(),
        }
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn lock(&mut self) -> Outcome {
        self.locked = true;
        self.core.set_status("locked");
        Outcome::notice("Smart Lock is now locked.").cancel(TimerPurpose::AutoLock)
    }

    fn unlock(&mut self, notice: &str) -> Outcome {
        self.locked = false;
        self.core.set_status("unlocked");
        let outcome = Outcome::notice(notice);
        if self.auto_lock {
            outcome.start(TimerPurpose::AutoLock, AUTO_LOCK_DELAY)
        } else {
            outcome
        }
    }

    fn handle(&mut self, command: LockCommand) -> Result<Outcome, Rejection> {
        match command {
            LockCommand::Lock => Ok(self.lock()),
            LockCommand::Unlock => Ok(self.unlock("Smart Lock is now unlocked.")),
            LockCommand::ToggleAutoLock => {
                self.auto_lock = !self.auto_lock;
                if !self.auto_lock {
                    return Ok(Outcome::notice("Auto-lock is now disabled.")
                        .cancel(TimerPurpose::AutoLock));
                }
                let enabled = Outcome::notice("Auto-lock is now enabled.");
                if self.locked {
                    Ok(enabled)
                } else {
                    Ok(enabled.start(TimerPurpose::AutoLock, AUTO_LOCK_DELAY))
                }
            }
            LockCommand::UnlockWithPin(pin) => {
                if self.users.values().any(|known| *known == pin) {
                    Ok(self.unlock("Smart Lock is now unlocked by PIN."))
                } else {
                    tracing::warn!(device = %self.core.name, "wrong PIN entered");
                    Err(Rejection::InvalidPin)
                }
            }
            LockCommand::AddUser { name, pin } => {
                if self.users.contains_key(&name) {
                    return Err(Rejection::UserExists(name));
                }
                let notice = format!("User {name} added with a new PIN.");
                self.users.insert(name, pin);
                Ok(Outcome::notice(notice))
            }
            LockCommand::RemoveUser(name) => {
                if self.users.remove(&name).is_none() {
                    return Err(Rejection::UnknownUser(name));
                }
                Ok(Outcome::notice(format!("User {name} has been removed.")))
            }
            LockCommand::EmergencyUnlock => {
                self.locked = false;
                self.core.set_status("unlocked");
                tracing::warn!(device = %self.core.name, "emergency override");
                Ok(
                    Outcome::notice("Emergency override: Smart Lock is now unlocked.")
                        .cancel(TimerPurpose::AutoLock),
                )
            }
            LockCommand::DrainBattery => {
                self.battery.drain(BATTERY_DRAIN)?;
                Ok(battery_report(&self.core.name, self.battery))
            }
        }
    }
}

impl SmartDevice for SmartLock {
    delegate_core!();

    fn apply(
        &mut self,
        command: Command,
        _ctx: &mut DeviceContext<'_>,
    ) -> Result<Outcome, Rejection> {
        self.core.ensure_active()?;
        match command {
            Command::Lock(command) => self.handle(command),
            _ => Err(Rejection::Unsupported {
                kind: self.core.kind,
            }),
        }
    }

    fn on_timer(&mut self, purpose: TimerPurpose, _ctx: &mut DeviceContext<'_>) -> Outcome {
        if purpose == TimerPurpose::AutoLock && self.core.active && !self.locked {
            self.lock()
        } else {
            Outcome::default()
        }
    }

    fn snapshot(&self) -> Device {
        self.core
            .snapshot()
            .with_attribute("locked", self.locked)
            .with_attribute("auto_lock", self.auto_lock)
            .with_attribute("battery", self.battery.level())
            .with_attribute(
                "users",
                serde_json::json!(self.users.keys().collect::<Vec<_>>()),
            )
    }
}
