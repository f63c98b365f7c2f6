use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::{invalid_state, normalize, parse_bounded, split_schedule, strip_prefix_ci};
use crate::device::DeviceKind;
use crate::error::Rejection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SprinklerMode {
    On,
    Off,
    Scheduled,
}

impl fmt::Display for SprinklerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Scheduled => "scheduled",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SprinklerCommand {
    SetMode(SprinklerMode),
    /// Watering duration in minutes, `1..=60`.
    Duration(u32),
    ToggleRainSensor,
    Schedule { at: NaiveTime, minutes: u32 },
}

fn minutes(raw: &str) -> Result<u32, Rejection> {
    let value = parse_bounded("duration", "Duration", raw, 1, 60)?;
    // bounded above, the conversion cannot fail
    Ok(u32::try_from(value).unwrap_or(1))
}

impl FromStr for SprinklerCommand {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(raw) = strip_prefix_ci(s, "duration:") {
            return minutes(raw).map(Self::Duration);
        }
        if let Some(raw) = strip_prefix_ci(s, "schedule:") {
            let (at, rest) = split_schedule(raw)?;
            return Ok(Self::Schedule {
                at,
                minutes: minutes(rest)?,
            });
        }
        match normalize(s).as_str() {
            "on" => Ok(Self::SetMode(SprinklerMode::On)),
            "off" => Ok(Self::SetMode(SprinklerMode::Off)),
            "scheduled" => Ok(Self::SetMode(SprinklerMode::Scheduled)),
            "rain sensor" => Ok(Self::ToggleRainSensor),
            _ => Err(invalid_state(DeviceKind::Sprinkler, s)),
        }
    }
}
