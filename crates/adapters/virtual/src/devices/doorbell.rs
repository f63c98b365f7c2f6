//! Video doorbell: ring, answer and recording state machine.
//!
//! ```text
//!              ring                answer              talk
//!  standby ──────────► ringing ──────────► answered ──────────► conversation
//!     ▲  ▲               │ │                  │
//!     │  └── ignore ─────┘ └── 30 s timeout ──┘ (back to standby)
//!     │
//!     ├── motion ──► motion_detected ── record ──► recording
//!     └── standby (from anywhere)
//! ```
//!
//! A ring replays the chime every 3 s, at most three times, and falls back to
//! standby after 30 s without an answer.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::Timelike;
use homesim_app::ports::SmartDevice;
use homesim_domain::command::{Command, DoorbellCommand};
use homesim_domain::context::DeviceContext;
use homesim_domain::device::{Device, DeviceKind};
use homesim_domain::error::Rejection;
use homesim_domain::outcome::Outcome;
use homesim_domain::timer::TimerPurpose;

use super::{Battery, DeviceCore};

const RING_TIMEOUT: Duration = Duration::from_secs(30);
const RINGTONE_PERIOD: Duration = Duration::from_secs(3);
const RINGTONE_REPEATS: u32 = 3;
const RING_DRAIN: u8 = 5;
const NIGHT_STARTS: u32 = 19;
const NIGHT_ENDS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorbellState {
    Standby,
    Ringing,
    Answered,
    MotionDetected,
    Recording,
    Conversation,
}

impl DoorbellState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standby => "standby",
            Self::Ringing => "ringing",
            Self::Answered => "answered",
            Self::MotionDetected => "motion_detected",
            Self::Recording => "recording",
            Self::Conversation => "conversation",
        }
    }
}

impl fmt::Display for DoorbellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct VideoDoorbell {
    core: DeviceCore,
    state: DoorbellState,
    battery: Battery,
    motion_detection: bool,
    night_vision: bool,
    live_feed: bool,
    visitors: Vec<String>,
    access_codes: BTreeMap<String, String>,
    snapshots: Vec<String>,
}

impl VideoDoorbell {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            core: DeviceCore::new(DeviceKind::Doorbell, name, DoorbellState::Standby.as_str()),
            state: DoorbellState::Standby,
            battery: Battery::default(),
            motion_detection: false,
            night_vision: false,
            live_feed: false,
            visitors: Vec::new(),
            access_codes: BTreeMap::new(),
            snapshots: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> DoorbellState {
        self.state
    }

    #[must_use]
    pub fn battery_level(&self) -> u8 {
        self.battery.level()
    }

    #[must_use]
    pub fn visitor_log(&self) -> &[String] {
        &self.visitors
    }

    fn transition(&mut self, state: DoorbellState) {
        tracing::debug!(device = %self.core.name, from = %self.state, to = %state, "doorbell transition");
        self.state = state;
        self.core.set_status(state.as_str());
    }

    fn refuse(&self, action: &'static str) -> Rejection {
        Rejection::InvalidTransition {
            action,
            status: self.state.as_str().to_string(),
        }
    }

    fn capture(&mut self, ctx: &DeviceContext<'_>) -> String {
        let name = format!(
            "{}_{}_{}.jpg",
            self.core.name,
            ctx.local_now().format("%Y%m%d_%H%M%S"),
            self.snapshots.len() + 1
        );
        self.snapshots.push(name.clone());
        format!("Snapshot captured: {name}")
    }

    fn ring(&mut self, ctx: &DeviceContext<'_>) -> Result<Outcome, Rejection> {
        match self.state {
            DoorbellState::Standby
            | DoorbellState::MotionDetected
            | DoorbellState::Recording
            | DoorbellState::Ringing => {}
            _ => return Err(self.refuse("ring")),
        }
        let level = self.battery.drain(RING_DRAIN)?;
        self.transition(DoorbellState::Ringing);
        let mut outcome = Outcome::notice("Doorbell rang.")
            .with_notice("Ding Dong! Someone is at the door.")
            .with_notice(self.capture(ctx))
            .repeat(
                TimerPurpose::Ringtone,
                RINGTONE_PERIOD,
                Some(RINGTONE_REPEATS),
            )
            .start(TimerPurpose::RingTimeout, RING_TIMEOUT);
        if self.battery.is_at_most_low() {
            tracing::warn!(device = %self.core.name, level, "battery low");
            outcome = outcome.with_notice(format!("Warning: Battery level is low ({level}%)"));
        }
        Ok(outcome)
    }

    fn stop_ringing() -> Outcome {
        Outcome::default()
            .cancel(TimerPurpose::RingTimeout)
            .cancel(TimerPurpose::Ringtone)
    }

    fn motion(&mut self, ctx: &DeviceContext<'_>) -> Result<Outcome, Rejection> {
        if !self.motion_detection {
            return Err(Rejection::MotionDetectionDisabled);
        }
        let mut outcome = Outcome::default();
        let hour = ctx.local_now().hour();
        if (hour >= NIGHT_STARTS || hour < NIGHT_ENDS) && !self.night_vision {
            self.night_vision = true;
            outcome = outcome.with_notice("Night vision activated automatically.");
        }
        match self.state {
            DoorbellState::Standby | DoorbellState::MotionDetected => {
                self.transition(DoorbellState::MotionDetected);
                let snapshot = self.capture(ctx);
                Ok(outcome.with_notice("Motion detected.").with_notice(snapshot))
            }
            busy => Ok(outcome.with_notice(format!("Motion detected while {busy}."))),
        }
    }

    fn handle(
        &mut self,
        command: DoorbellCommand,
        ctx: &DeviceContext<'_>,
    ) -> Result<Outcome, Rejection> {
        match command {
            DoorbellCommand::Ring => self.ring(ctx),
            DoorbellCommand::Answer => {
                if self.state != DoorbellState::Ringing {
                    return Err(self.refuse("answer"));
                }
                self.transition(DoorbellState::Answered);
                Ok(Self::stop_ringing().with_notice("Doorbell answered."))
            }
            DoorbellCommand::Ignore => {
                if self.state != DoorbellState::Ringing {
                    return Err(self.refuse("ignore"));
                }
                self.transition(DoorbellState::Standby);
                Ok(Self::stop_ringing().with_notice("Doorbell ignored."))
            }
            DoorbellCommand::Talk => {
                if self.state != DoorbellState::Answered {
                    return Err(self.refuse("talk"));
                }
                self.transition(DoorbellState::Conversation);
                Ok(Outcome::notice("Two-way conversation started."))
            }
            DoorbellCommand::Motion => self.motion(ctx),
            DoorbellCommand::Record => match self.state {
                DoorbellState::Standby
                | DoorbellState::MotionDetected
                | DoorbellState::Answered => {
                    self.transition(DoorbellState::Recording);
                    Ok(Outcome::notice("Recording started."))
                }
                _ => Err(self.refuse("record")),
            },
            DoorbellCommand::Standby => {
                self.transition(DoorbellState::Standby);
                Ok(Self::stop_ringing().with_notice("Doorbell status: standby"))
            }
            DoorbellCommand::ToggleMotionDetection => {
                self.motion_detection = !self.motion_detection;
                Ok(Outcome::notice(if self.motion_detection {
                    "Motion detection enabled"
                } else {
                    "Motion detection disabled"
                }))
            }
            DoorbellCommand::NightVision(enabled) => {
                self.night_vision = enabled;
                Ok(Outcome::notice(if enabled {
                    "Night vision activated"
                } else {
                    "Night vision deactivated"
                }))
            }
            DoorbellCommand::LogVisitor(visitor) => {
                let at = ctx.local_now().format("%Y-%m-%d %H:%M:%S").to_string();
                self.visitors.push(format!("{at} - Visitor: {visitor}"));
                Ok(Outcome::notice(format!("Visitor {visitor} logged at {at}")))
            }
            DoorbellCommand::GrantAccess { person, code } => {
                let notice = format!("Access granted to {person}");
                self.access_codes.insert(person, code);
                Ok(Outcome::notice(notice))
            }
            DoorbellCommand::VerifyAccess { person, code } => {
                if self.access_codes.get(&person) == Some(&code) {
                    Ok(Outcome::notice(format!("Access verified for {person}")))
                } else {
                    Err(Rejection::AccessDenied(person))
                }
            }
            DoorbellCommand::LiveFeed(on) => {
                self.live_feed = on;
                Ok(Outcome::notice(if on {
                    "Live feed started."
                } else {
                    "Live feed stopped."
                }))
            }
        }
    }
}

impl SmartDevice for VideoDoorbell {
    delegate_core!();

    fn apply(
        &mut self,
        command: Command,
        ctx: &mut DeviceContext<'_>,
    ) -> Result<Outcome, Rejection> {
        self.core.ensure_active()?;
        match command {
            Command::Doorbell(command) => self.handle(command, ctx),
            _ => Err(Rejection::Unsupported {
                kind: self.core.kind,
            }),
        }
    }

    fn on_timer(&mut self, purpose: TimerPurpose, _ctx: &mut DeviceContext<'_>) -> Outcome {
        if !self.core.active {
            tracing::debug!(device = %self.core.name, ?purpose, "timer dropped while disconnected");
            return Self::stop_ringing();
        }
        if self.state != DoorbellState::Ringing {
            return Outcome::default().cancel(purpose);
        }
        match purpose {
            TimerPurpose::Ringtone => Outcome::notice("Ding Dong!"),
            TimerPurpose::RingTimeout => {
                self.transition(DoorbellState::Standby);
                Outcome::notice("No answer. Doorbell returned to standby.")
                    .cancel(TimerPurpose::Ringtone)
            }
            _ => Outcome::default(),
        }
    }

    fn snapshot(&self) -> Device {
        self.core
            .snapshot()
            .with_attribute("battery", self.battery.level())
            .with_attribute("motion_detection", self.motion_detection)
            .with_attribute("night_vision", self.night_vision)
            .with_attribute("live_feed", self.live_feed)
            .with_attribute("visitors", self.visitors.len())
            .with_attribute("snapshots", self.snapshots.len())
            .with_attribute(
                "authorized",
                serde_json::json!(self.access_codes.keys().collect::<Vec<_>>()),
            )
    }
}
