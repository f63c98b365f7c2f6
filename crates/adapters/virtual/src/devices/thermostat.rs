//! Smart thermostat: room temperature simulation with energy accounting.
//!
//! Each simulation step moves the room temperature according to the running
//! state:
//!
//! | State | Temperature per step | Humidity per step |
//! |-------|----------------------|-------------------|
//! | heating | +0.5 °C + U[0, 0.2) | −1.5 − U[0, 0.5) |
//! | cooling | −0.4 °C − U[0, 0.2) | −1.0 − U[0, 0.5) |
//! | off, maintaining | (22 − current) × 0.1 | ± 0.3 |
//!
//! Heating and cooling hand over to maintaining once the room is within the
//! tolerance band around the target. Energy accrues with wall-clock time spent
//! in each running state.

use std::fmt;

use chrono::TimeDelta;
use homesim_app::ports::SmartDevice;
use homesim_domain::command::{Command, ThermostatCommand, ThermostatMode};
use homesim_domain::context::DeviceContext;
use homesim_domain::device::{Device, DeviceKind};
use homesim_domain::error::Rejection;
use homesim_domain::outcome::Outcome;
use homesim_domain::time::Timestamp;
use rand::Rng;

use super::DeviceCore;

const MIN_TARGET: f64 = 10.0;
const MAX_TARGET: f64 = 32.0;
const TOLERANCE: f64 = 0.5;
const AMBIENT: f64 = 22.0;
const HEATING_RATE: f64 = 0.5;
const COOLING_RATE: f64 = 0.4;
const DRIFT_RATE: f64 = 0.1;
const MIN_HUMIDITY: f64 = 20.0;
const MAX_HUMIDITY: f64 = 70.0;
const PRICE_PER_KWH: f64 = 0.15;

/// What the thermostat is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermostatState {
    Off,
    Heating,
    Cooling,
    Maintaining,
}

impl ThermostatState {
    /// Power draw in kWh per hour.
    fn power(self) -> f64 {
        match self {
            Self::Off => 0.0,
            Self::Heating => 1.8,
            Self::Cooling => 2.5,
            Self::Maintaining => 0.5,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Heating => "heating",
            Self::Cooling => "cooling",
            Self::Maintaining => "maintaining",
        }
    }
}

impl fmt::Display for ThermostatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Running averages for the weekly report.
#[derive(Debug, Clone, Copy)]
struct Averages {
    samples: u32,
    temperature: f64,
    humidity: f64,
}

impl Averages {
    fn record(&mut self, temperature: f64, humidity: f64) {
        self.samples = self.samples.saturating_add(1);
        self.temperature += temperature;
        self.humidity += humidity;
    }

    fn temperature(&self) -> f64 {
        self.temperature / f64::from(self.samples.max(1))
    }

    fn humidity(&self) -> f64 {
        self.humidity / f64::from(self.samples.max(1))
    }
}

pub struct Thermostat {
    core: DeviceCore,
    current: f64,
    target: f64,
    state: ThermostatState,
    auto: bool,
    humidity: f64,
    energy_kwh: f64,
    /// Energy has been accounted for up to this instant.
    accounted_until: Option<Timestamp>,
    averages: Averages,
}

impl Thermostat {
    #[must_use]
    pub fn new(name: &str) -> Self {
        let mut thermostat = Self {
            core: DeviceCore::new(DeviceKind::Thermostat, name, ""),
            current: 20.0,
            target: 20.0,
            state: ThermostatState::Off,
            auto: false,
            humidity: 45.0,
            energy_kwh: 0.0,
            accounted_until: None,
            averages: Averages {
                samples: 1,
                temperature: 20.0,
                humidity: 45.0,
            },
        };
        thermostat.refresh_status();
        thermostat
    }

    #[must_use]
    pub fn current_temperature(&self) -> f64 {
        self.current
    }

    #[must_use]
    pub fn target_temperature(&self) -> f64 {
        self.target
    }

    #[must_use]
    pub fn state(&self) -> ThermostatState {
        self.state
    }

    #[must_use]
    pub fn energy_usage(&self) -> f64 {
        self.energy_kwh
    }

    #[must_use]
    pub fn humidity(&self) -> f64 {
        self.humidity
    }

    fn refresh_status(&mut self) {
        let mode = self.state.as_str().to_uppercase();
        let status = if self.auto {
            format!("{:.1}°C | AUTO: {mode}", self.current)
        } else {
            format!("{:.1}°C | {mode}", self.current)
        };
        self.core.set_status(status);
    }

    /// Charge energy for the time spent in the current state since the last
    /// accounting. A clock that went backwards is charged nothing.
    fn accrue(&mut self, now: Timestamp) {
        if let Some(since) = self.accounted_until {
            let elapsed = (now - since).max(TimeDelta::zero());
            #[allow(clippy::cast_precision_loss)]
            let hours = elapsed.num_milliseconds() as f64 / 3_600_000.0;
            self.energy_kwh += self.state.power() * hours;
        }
        self.accounted_until = Some(now);
    }

    /// Pick heating, cooling or maintaining from the tolerance band.
    fn decide(&mut self) -> String {
        let target = self.target;
        if self.current < target - TOLERANCE {
            self.state = ThermostatState::Heating;
            format!("Auto: Starting heating to reach {target:.1}°C")
        } else if self.current > target + TOLERANCE {
            self.state = ThermostatState::Cooling;
            format!("Auto: Starting cooling to reach {target:.1}°C")
        } else {
            self.state = ThermostatState::Maintaining;
            format!("Auto: Temperature at desired level, maintaining {target:.1}°C")
        }
    }

    /// One simulation step.
    fn simulate(&mut self, ctx: &mut DeviceContext<'_>) -> Outcome {
        let (delta, humidity_delta) = match self.state {
            ThermostatState::Heating => (
                HEATING_RATE + ctx.rng.random_range(0.0..0.2),
                -1.5 - ctx.rng.random_range(0.0..0.5),
            ),
            ThermostatState::Cooling => (
                -COOLING_RATE - ctx.rng.random_range(0.0..0.2),
                -1.0 - ctx.rng.random_range(0.0..0.5),
            ),
            ThermostatState::Off | ThermostatState::Maintaining => (
                (AMBIENT - self.current) * DRIFT_RATE,
                ctx.rng.random_range(-0.3..0.3),
            ),
        };
        self.current += delta;
        self.humidity = (self.humidity + humidity_delta).clamp(MIN_HUMIDITY, MAX_HUMIDITY);
        self.averages.record(self.current, self.humidity);

        let mut outcome = Outcome::default();
        let reached = match self.state {
            ThermostatState::Heating => self.current >= self.target - TOLERANCE,
            ThermostatState::Cooling => self.current <= self.target + TOLERANCE,
            ThermostatState::Off | ThermostatState::Maintaining => false,
        };
        if reached {
            self.state = ThermostatState::Maintaining;
            outcome = outcome.with_notice(format!(
                "Target temperature reached. Maintaining {:.1}°C",
                self.target
            ));
        } else if self.auto
            && self.state == ThermostatState::Maintaining
            && (self.current - self.target).abs() > TOLERANCE
        {
            outcome = outcome.with_notice(self.decide());
        }
        self.refresh_status();
        outcome
    }

    fn set_mode(&mut self, mode: ThermostatMode, ctx: &mut DeviceContext<'_>) -> Outcome {
        let target = self.target;
        match mode {
            ThermostatMode::Off => {
                self.auto = false;
                self.state = ThermostatState::Off;
                self.refresh_status();
                Outcome::notice("Thermostat turned off")
            }
            ThermostatMode::Heating => {
                self.auto = false;
                self.state = ThermostatState::Heating;
                Outcome::notice(format!("Heating mode activated. Target: {target:.1}°C"))
                    .merge(self.simulate(ctx))
            }
            ThermostatMode::Cooling => {
                self.auto = false;
                self.state = ThermostatState::Cooling;
                Outcome::notice(format!("Cooling mode activated. Target: {target:.1}°C"))
                    .merge(self.simulate(ctx))
            }
            ThermostatMode::Auto => {
                self.auto = true;
                let decision = self.decide();
                self.refresh_status();
                Outcome::notice(decision).with_notice(format!(
                    "Auto mode activated. System will maintain {target:.1}°C"
                ))
            }
        }
    }

    fn set_target(&mut self, requested: f64) -> Outcome {
        self.target = requested.clamp(MIN_TARGET, MAX_TARGET);
        let mut outcome = Outcome::default();
        if self.auto {
            outcome = outcome.with_notice(self.decide());
        }
        self.refresh_status();
        Outcome::notice(format!("Target temperature set to {:.1}°C", self.target)).merge(outcome)
    }

    fn reading(&self) -> String {
        format!(
            "Current temperature: {:.1}°C, Target: {:.1}°C, Mode: {}\nHumidity: {:.1}%\nEnergy usage: {:.2} kWh",
            self.current,
            self.target,
            self.state.as_str().to_uppercase(),
            self.humidity,
            self.energy_kwh
        )
    }

    /// Energy, cost and comfort summary with a saving recommendation.
    #[must_use]
    pub fn weekly_report(&self) -> String {
        let mut report = String::from("=== Weekly Thermostat Report ===\n");
        report.push_str(&format!("Total Energy Usage: {:.2} kWh\n", self.energy_kwh));
        report.push_str(&format!(
            "Estimated Cost: ${:.2}\n",
            self.energy_kwh * PRICE_PER_KWH
        ));
        report.push_str(&format!(
            "Average Temperature: {:.1}°C\n",
            self.averages.temperature()
        ));
        report.push_str(&format!(
            "Average Humidity: {:.1}%\n",
            self.averages.humidity()
        ));
        match self.state {
            ThermostatState::Cooling if self.target < 24.0 => {
                let savings = (24.0 - self.target) * 0.1 * 7.0;
                report.push_str(&format!(
                    "Recommendation: Increasing cooling temperature to 24°C could save approximately ${savings:.2} per week\n"
                ));
            }
            ThermostatState::Heating if self.target > 20.0 => {
                let savings = (self.target - 20.0) * 0.12 * 7.0;
                report.push_str(&format!(
                    "Recommendation: Decreasing heating temperature to 20°C could save approximately ${savings:.2} per week\n"
                ));
            }
            _ => {}
        }
        report
    }
}

impl SmartDevice for Thermostat {
    delegate_core!();

    fn apply(
        &mut self,
        command: Command,
        ctx: &mut DeviceContext<'_>,
    ) -> Result<Outcome, Rejection> {
        self.core.ensure_active()?;
        let Command::Thermostat(command) = command else {
            return Err(Rejection::Unsupported {
                kind: self.core.kind,
            });
        };
        self.accrue(ctx.now);
        let outcome = match command {
            ThermostatCommand::SetMode(mode) => self.set_mode(mode, ctx),
            ThermostatCommand::SetTarget(target) => self.set_target(target),
            ThermostatCommand::Report => Outcome::notice(self.reading()),
            ThermostatCommand::WeeklyReport => Outcome::notice(self.weekly_report()),
        };
        Ok(outcome)
    }

    fn tick(&mut self, ctx: &mut DeviceContext<'_>) -> Outcome {
        if !self.core.active {
            return Outcome::default();
        }
        self.accrue(ctx.now);
        self.simulate(ctx)
    }

    fn snapshot(&self) -> Device {
        self.core
            .snapshot()
            .with_attribute("current_temperature", self.current)
            .with_attribute("target_temperature", self.target)
            .with_attribute("mode", self.state.as_str())
            .with_attribute("auto", self.auto)
            .with_attribute("humidity", self.humidity)
            .with_attribute("energy_kwh", self.energy_kwh)
    }
}
