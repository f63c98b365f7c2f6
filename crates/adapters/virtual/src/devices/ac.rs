//! Air conditioner with fan speed, energy saving and a time-of-day schedule
//! that is followed while in auto mode.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime, Timelike};
use homesim_app::ports::SmartDevice;
use homesim_domain::command::{AcCommand, AcMode, Command, FanSpeed};
use homesim_domain::context::DeviceContext;
use homesim_domain::device::{Device, DeviceKind};
use homesim_domain::error::Rejection;
use homesim_domain::outcome::Outcome;

use super::DeviceCore;

const MIN_TEMPERATURE: i64 = 16;
const MAX_TEMPERATURE: i64 = 30;
const MODE_STEP: i64 = 2;

pub struct AirConditioner {
    core: DeviceCore,
    mode: AcMode,
    /// Mode picked by the schedule while in auto.
    scheduled: Option<AcMode>,
    temperature: i64,
    fan: FanSpeed,
    energy_saving: bool,
    schedule: BTreeMap<NaiveTime, AcMode>,
    /// The schedule slot applied last, so one entry runs once per day.
    last_slot: Option<(NaiveDate, NaiveTime)>,
}

impl AirConditioner {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            core: DeviceCore::new(DeviceKind::Ac, name, AcMode::Off.to_string()),
            mode: AcMode::Off,
            scheduled: None,
            temperature: 24,
            fan: FanSpeed::default(),
            energy_saving: false,
            schedule: BTreeMap::new(),
            last_slot: None,
        }
    }

    #[must_use]
    pub fn temperature(&self) -> i64 {
        self.temperature
    }

    #[must_use]
    pub fn mode(&self) -> AcMode {
        self.mode
    }

    fn refresh_status(&mut self) {
        let status = match (self.mode, self.scheduled) {
            (AcMode::Auto, Some(running)) => format!("auto ({running})"),
            (mode, _) => mode.to_string(),
        };
        self.core.set_status(status);
    }

    /// Nudge the set-point the way the selected mode works.
    fn adjust_for(&mut self, mode: AcMode) {
        match mode {
            AcMode::Cooling => {
                self.temperature = (self.temperature - MODE_STEP).max(MIN_TEMPERATURE);
            }
            AcMode::Heating => {
                self.temperature = (self.temperature + MODE_STEP).min(MAX_TEMPERATURE);
            }
            AcMode::Off | AcMode::FanMode | AcMode::Auto => {}
        }
    }

    /// Follow the schedule entry for the current minute, once per day.
    fn follow_schedule(&mut self, ctx: &DeviceContext<'_>) -> Outcome {
        let local = ctx.local_now();
        let Some(minute) = NaiveTime::from_hms_opt(local.hour(), local.minute(), 0) else {
            return Outcome::default();
        };
        let slot = (local.date_naive(), minute);
        let Some(&mode) = self.schedule.get(&minute) else {
            return Outcome::default();
        };
        if self.last_slot == Some(slot) {
            return Outcome::default();
        }
        self.last_slot = Some(slot);
        self.scheduled = Some(mode);
        self.adjust_for(mode);
        self.refresh_status();
        tracing::info!(device = %self.core.name, %mode, "schedule applied");
        Outcome::notice(format!(
            "Scheduled mode {mode} applied at {}",
            minute.format("%H:%M")
        ))
    }

    fn handle(&mut self, command: AcCommand, ctx: &DeviceContext<'_>) -> Outcome {
        match command {
            AcCommand::SetMode(mode) => {
                self.mode = mode;
                self.scheduled = None;
                self.adjust_for(mode);
                self.refresh_status();
                let outcome = Outcome::notice(format!("AC mode changed to {mode}"));
                if mode == AcMode::Auto {
                    outcome.merge(self.follow_schedule(ctx))
                } else {
                    outcome
                }
            }
            AcCommand::SetTemperature(temperature) => {
                self.temperature = temperature;
                Outcome::notice(format!("Temperature set to: {temperature}°C"))
            }
            AcCommand::SetFanSpeed(speed) => {
                self.fan = speed;
                Outcome::notice(format!("Fan speed set to: {speed}"))
            }
            AcCommand::ToggleEnergySaving => {
                self.energy_saving = !self.energy_saving;
                Outcome::notice(if self.energy_saving {
                    "Energy-saving mode enabled"
                } else {
                    "Energy-saving mode disabled"
                })
            }
            AcCommand::Schedule { at, mode } => {
                self.schedule.insert(at, mode);
                Outcome::notice(format!("Scheduled AC to {mode} at {}", at.format("%H:%M")))
            }
        }
    }
}

impl SmartDevice for AirConditioner {
    delegate_core!();

    fn apply(
        &mut self,
        command: Command,
        ctx: &mut DeviceContext<'_>,
    ) -> Result<Outcome, Rejection> {
        self.core.ensure_active()?;
        match command {
            Command::Ac(command) => Ok(self.handle(command, ctx)),
            _ => Err(Rejection::Unsupported {
                kind: self.core.kind,
            }),
        }
    }

    fn tick(&mut self, ctx: &mut DeviceContext<'_>) -> Outcome {
        if self.core.active && self.mode == AcMode::Auto {
            self.follow_schedule(ctx)
        } else {
            Outcome::default()
        }
    }

    fn snapshot(&self) -> Device {
        let schedule: BTreeMap<String, String> = self
            .schedule
            .iter()
            .map(|(at, mode)| (at.format("%H:%M").to_string(), mode.to_string()))
            .collect();
        self.core
            .snapshot()
            .with_attribute("mode", self.mode.to_string())
            .with_attribute("temperature", self.temperature)
            .with_attribute("fan_speed", self.fan.to_string())
            .with_attribute("energy_saving", self.energy_saving)
            .with_attribute("schedule", serde_json::json!(schedule))
    }
}
