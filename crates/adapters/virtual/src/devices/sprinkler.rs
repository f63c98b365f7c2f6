//! Lawn sprinkler with a rain sensor and daily watering slots.

use std::collections::{BTreeMap, VecDeque};

use chrono::{NaiveDate, NaiveTime, Timelike};
use homesim_app::ports::SmartDevice;
use homesim_domain::command::{Command, SprinklerCommand, SprinklerMode};
use homesim_domain::context::DeviceContext;
use homesim_domain::device::{Device, DeviceKind};
use homesim_domain::error::Rejection;
use homesim_domain::outcome::Outcome;
use rand::Rng;

use super::DeviceCore;

const RAIN_PROBABILITY: f64 = 0.5;
const HISTORY_LIMIT: usize = 50;

pub struct Sprinkler {
    core: DeviceCore,
    mode: SprinklerMode,
    duration: u32,
    rain_sensor: bool,
    schedule: BTreeMap<NaiveTime, u32>,
    history: VecDeque<String>,
    last_slot: Option<(NaiveDate, NaiveTime)>,
}

impl Sprinkler {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            core: DeviceCore::new(DeviceKind::Sprinkler, name, SprinklerMode::Off.to_string()),
            mode: SprinklerMode::Off,
            duration: 10,
            rain_sensor: false,
            schedule: BTreeMap::new(),
            history: VecDeque::new(),
            last_slot: None,
        }
    }

    /// The latest watering runs, oldest first, as `HH:MM - Watered for N minutes`.
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    #[must_use]
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Run one watering cycle unless the rain sensor reports rain.
    fn water(&mut self, minutes: u32, ctx: &mut DeviceContext<'_>) -> Outcome {
        if self.rain_sensor && ctx.rng.random_bool(RAIN_PROBABILITY) {
            tracing::info!(device = %self.core.name, "rain detected, skipping watering");
            return Outcome::notice("Rain detected. Watering cancelled.");
        }
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(format!(
            "{} - Watered for {minutes} minutes",
            ctx.local_now().format("%H:%M")
        ));
        Outcome::notice(format!("Watering started for {minutes} minutes."))
    }

    fn handle(&mut self, command: SprinklerCommand, ctx: &mut DeviceContext<'_>) -> Outcome {
        match command {
            SprinklerCommand::SetMode(mode) => {
                self.mode = mode;
                self.core.set_status(mode.to_string());
                let outcome = Outcome::notice(format!("Smart Sprinkler is now {mode}"));
                if mode == SprinklerMode::On {
                    outcome.merge(self.water(self.duration, ctx))
                } else {
                    outcome
                }
            }
            SprinklerCommand::Duration(minutes) => {
                self.duration = minutes;
                Outcome::notice(format!("Watering duration set to {minutes} minutes."))
            }
            SprinklerCommand::ToggleRainSensor => {
                self.rain_sensor = !self.rain_sensor;
                Outcome::notice(if self.rain_sensor {
                    "Rain sensor enabled"
                } else {
                    "Rain sensor disabled"
                })
            }
            SprinklerCommand::Schedule { at, minutes } => {
                self.schedule.insert(at, minutes);
                Outcome::notice(format!(
                    "Scheduled watering at {} for {minutes} minutes.",
                    at.format("%H:%M")
                ))
            }
        }
    }
}

impl SmartDevice for Sprinkler {
    delegate_core!();

    fn apply(
        &mut self,
        command: Command,
        ctx: &mut DeviceContext<'_>,
    ) -> Result<Outcome, Rejection> {
        self.core.ensure_active()?;
        match command {
            Command::Sprinkler(command) => Ok(self.handle(command, ctx)),
            _ => Err(Rejection::Unsupported {
                kind: self.core.kind,
            }),
        }
    }

    fn tick(&mut self, ctx: &mut DeviceContext<'_>) -> Outcome {
        if !self.core.active || self.mode != SprinklerMode::Scheduled {
            return Outcome::default();
        }
        let local = ctx.local_now();
        let Some(minute) = NaiveTime::from_hms_opt(local.hour(), local.minute(), 0) else {
            return Outcome::default();
        };
        let slot = (local.date_naive(), minute);
        match self.schedule.get(&minute).copied() {
            Some(minutes) if self.last_slot != Some(slot) => {
                self.last_slot = Some(slot);
                self.duration = minutes;
                self.water(minutes, ctx)
            }
            _ => Outcome::default(),
        }
    }

    fn snapshot(&self) -> Device {
        let schedule: BTreeMap<String, u32> = self
            .schedule
            .iter()
            .map(|(at, minutes)| (at.format("%H:%M").to_string(), *minutes))
            .collect();
        self.core
            .snapshot()
            .with_attribute("duration", self.duration)
            .with_attribute("rain_sensor", self.rain_sensor)
            .with_attribute("schedule", serde_json::json!(schedule))
            .with_attribute("history", serde_json::json!(self.history))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::testing::Harness;

    fn send(
        sprinkler: &mut Sprinkler,
        harness: &mut Harness,
        input: &str,
    ) -> Result<Outcome, Rejection> {
        let command = Command::parse(DeviceKind::Sprinkler, input)?;
        sprinkler.apply(command, &mut harness.ctx())
    }

    #[test]
    fn should_water_for_configured_duration_when_turned_on() {
        let mut sprinkler = Sprinkler::new("lawn");
        let mut harness = Harness::at(6, 5);
        send(&mut sprinkler, &mut harness, "duration:15").unwrap();
        let outcome = send(&mut sprinkler, &mut harness, "on").unwrap();
        assert_eq!(
            outcome.notices,
            vec![
                "Smart Sprinkler is now on",
                "Watering started for 15 minutes."
            ]
        );
        assert_eq!(
            sprinkler.history().collect::<Vec<_>>(),
            ["06:05 - Watered for 15 minutes"]
        );
    }

    #[test]
    fn should_either_water_or_skip_when_rain_sensor_on() {
        let mut sprinkler = Sprinkler::new("lawn");
        let mut harness = Harness::default();
        send(&mut sprinkler, &mut harness, "rain sensor").unwrap();
        for _ in 0..10 {
            let outcome = send(&mut sprinkler, &mut harness, "on").unwrap();
            let last = outcome.notices.last().unwrap();
            assert!(
                last == "Watering started for 10 minutes."
                    || last == "Rain detected. Watering cancelled.",
                "{last}"
            );
        }
        assert!(sprinkler.history().count() <= 10);
    }

    #[test]
    fn should_water_once_per_scheduled_slot() {
        let mut sprinkler = Sprinkler::new("lawn");
        let mut harness = Harness::at(5, 59);
        let outcome = send(&mut sprinkler, &mut harness, "schedule:06:00:20").unwrap();
        assert_eq!(
            outcome.notices,
            vec!["Scheduled watering at 06:00 for 20 minutes."]
        );
        send(&mut sprinkler, &mut harness, "scheduled").unwrap();
        assert!(sprinkler.tick(&mut harness.ctx()).is_empty());

        harness.advance_minutes(1);
        let outcome = sprinkler.tick(&mut harness.ctx());
        assert_eq!(outcome.notices, vec!["Watering started for 20 minutes."]);
        assert!(sprinkler.tick(&mut harness.ctx()).is_empty());
        assert_eq!(sprinkler.history().count(), 1);
        assert_eq!(sprinkler.duration(), 20);
    }

    #[test]
    fn should_ignore_schedule_when_off() {
        let mut sprinkler = Sprinkler::new("lawn");
        let mut harness = Harness::at(6, 0);
        send(&mut sprinkler, &mut harness, "schedule:06:00:20").unwrap();
        assert!(sprinkler.tick(&mut harness.ctx()).is_empty());
        assert_eq!(sprinkler.history().count(), 0);
    }

    #[test]
    fn should_keep_only_latest_runs_when_history_full() {
        let mut sprinkler = Sprinkler::new("lawn");
        let mut harness = Harness::at(6, 0);
        for _ in 0..=HISTORY_LIMIT {
            send(&mut sprinkler, &mut harness, "on").unwrap();
            harness.advance_minutes(1);
        }
        assert_eq!(sprinkler.history().count(), HISTORY_LIMIT);
        assert_eq!(
            sprinkler.history().next(),
            Some("06:01 - Watered for 10 minutes")
        );
    }
}
