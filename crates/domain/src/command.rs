//! Commands: the typed vocabulary each device kind accepts.
//!
//! The presentation layer speaks in free-form strings (`"on"`,
//! `"brightness:80"`, `"target:22.5"`, `"schedule:07:30:cooling"`). Those are
//! parsed once, case-insensitively, into a tagged [`Command`]; devices only
//! ever see the typed form. Parsing failures are [`Rejection`]s.
//!
//! Prefixed sub-commands keep their payload's original case, so song titles,
//! PINs and spoken sentences survive untouched.

mod assistant;
mod camera;
mod climate;
mod doorbell;
mod light;
mod lock;
mod opening;
mod percent;
mod speaker;
mod sprinkler;
mod thermostat;

use chrono::NaiveTime;

pub use assistant::AssistantCommand;
pub use camera::CameraCommand;
pub use climate::{AcCommand, AcMode, FanSetting, FanSpeed};
pub use doorbell::DoorbellCommand;
pub use light::{LightColor, LightCommand};
pub use lock::LockCommand;
pub use opening::{BlindsCommand, GarageDoorCommand, Position};
pub use percent::Percent;
pub use speaker::SpeakerCommand;
pub use sprinkler::{SprinklerCommand, SprinklerMode};
pub use thermostat::{ThermostatCommand, ThermostatMode};

use crate::device::DeviceKind;
use crate::error::Rejection;

/// A command addressed to one device kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Light(LightCommand),
    Thermostat(ThermostatCommand),
    Camera(CameraCommand),
    Doorbell(DoorbellCommand),
    VoiceAssistant(AssistantCommand),
    Lock(LockCommand),
    Blinds(BlindsCommand),
    GarageDoor(GarageDoorCommand),
    Ac(AcCommand),
    Fan(FanSetting),
    Speaker(SpeakerCommand),
    Sprinkler(SprinklerCommand),
}

impl Command {
    /// Parse a free-form state string in the vocabulary of `kind`.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] the device would show for this input.
    pub fn parse(kind: DeviceKind, input: &str) -> Result<Self, Rejection> {
        match kind {
            DeviceKind::Light => input.parse().map(Self::Light),
            DeviceKind::Thermostat => input.parse().map(Self::Thermostat),
            DeviceKind::Camera => input.parse().map(Self::Camera),
            DeviceKind::Doorbell => input.parse().map(Self::Doorbell),
            DeviceKind::VoiceAssistant => input.parse().map(Self::VoiceAssistant),
            DeviceKind::Lock => input.parse().map(Self::Lock),
            DeviceKind::Blinds => input.parse().map(Self::Blinds),
            DeviceKind::GarageDoor => input.parse().map(Self::GarageDoor),
            DeviceKind::Ac => input.parse().map(Self::Ac),
            DeviceKind::Fan => input.parse().map(Self::Fan),
            DeviceKind::Speaker => input.parse().map(Self::Speaker),
            DeviceKind::Sprinkler => input.parse().map(Self::Sprinkler),
        }
    }

    /// The device kind this command is meant for.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::Light(_) => DeviceKind::Light,
            Self::Thermostat(_) => DeviceKind::Thermostat,
            Self::Camera(_) => DeviceKind::Camera,
            Self::Doorbell(_) => DeviceKind::Doorbell,
            Self::VoiceAssistant(_) => DeviceKind::VoiceAssistant,
            Self::Lock(_) => DeviceKind::Lock,
            Self::Blinds(_) => DeviceKind::Blinds,
            Self::GarageDoor(_) => DeviceKind::GarageDoor,
            Self::Ac(_) => DeviceKind::Ac,
            Self::Fan(_) => DeviceKind::Fan,
            Self::Speaker(_) => DeviceKind::Speaker,
            Self::Sprinkler(_) => DeviceKind::Sprinkler,
        }
    }
}

/// Lowercase, trim and collapse inner whitespace.
pub(crate) fn normalize(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Strip `prefix` case-insensitively, returning the trimmed remainder.
pub(crate) fn strip_prefix_ci<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let input = input.trim_start();
    let head = input.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(input[prefix.len()..].trim())
    } else {
        None
    }
}

pub(crate) fn invalid_state(kind: DeviceKind, input: &str) -> Rejection {
    Rejection::InvalidState {
        kind,
        input: input.trim().to_string(),
    }
}

pub(crate) fn parse_int(field: &'static str, raw: &str) -> Result<i64, Rejection> {
    raw.trim().parse().map_err(|_| Rejection::InvalidFormat {
        field,
        input: raw.trim().to_string(),
    })
}

/// Parse an integer and check it against an inclusive range.
pub(crate) fn parse_bounded(
    field: &'static str,
    label: &'static str,
    raw: &str,
    min: i64,
    max: i64,
) -> Result<i64, Rejection> {
    let value = parse_int(field, raw)?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(Rejection::OutOfRange {
            field: label,
            value,
            min,
            max,
        })
    }
}

/// `on`/`off` style switches.
pub(crate) fn parse_switch(field: &'static str, raw: &str) -> Result<bool, Rejection> {
    match normalize(raw).as_str() {
        "on" | "true" | "enable" | "enabled" | "yes" => Ok(true),
        "off" | "false" | "disable" | "disabled" | "no" => Ok(false),
        _ => Err(Rejection::InvalidFormat {
            field,
            input: raw.trim().to_string(),
        }),
    }
}

/// `HH:MM` wall-clock time for schedules.
pub(crate) fn parse_schedule_time(raw: &str) -> Result<NaiveTime, Rejection> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| Rejection::InvalidFormat {
        field: "time",
        input: raw.trim().to_string(),
    })
}

/// Split `"<HH:MM>:<rest>"` into its time and trailing payload.
pub(crate) fn split_schedule(raw: &str) -> Result<(NaiveTime, &str), Rejection> {
    let (time, rest) = raw.rsplit_once(':').ok_or_else(|| Rejection::InvalidFormat {
        field: "schedule",
        input: raw.trim().to_string(),
    })?;
    Ok((parse_schedule_time(time)?, rest.trim()))
}

/// Split `"<a>:<b>"` into two non-empty trimmed parts.
pub(crate) fn split_pair<'a>(
    field: &'static str,
    raw: &'a str,
) -> Result<(&'a str, &'a str), Rejection> {
    raw.split_once(':')
        .map(|(a, b)| (a.trim(), b.trim()))
        .filter(|(a, b)| !a.is_empty() && !b.is_empty())
        .ok_or_else(|| Rejection::InvalidFormat {
            field,
            input: raw.trim().to_string(),
        })
}
