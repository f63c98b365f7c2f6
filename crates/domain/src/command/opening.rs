//! Blinds and garage doors share the open/closed/half-open vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{invalid_state, normalize, parse_switch, strip_prefix_ci};
use crate::device::DeviceKind;
use crate::error::Rejection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    Open,
    Closed,
    HalfOpen,
}

impl Position {
    fn parse(input: &str) -> Option<Self> {
        match input {
            "open" => Some(Self::Open),
            "closed" | "close" => Some(Self::Closed),
            "half-open" | "half open" => Some(Self::HalfOpen),
            _ => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::HalfOpen => "half-open",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlindsCommand {
    Move(Position),
    Automatic,
    Manual,
    ToggleChildSafety,
    Reset,
    DrainBattery,
}

impl FromStr for BlindsCommand {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = normalize(s);
        if let Some(position) = Position::parse(&input) {
            return Ok(Self::Move(position));
        }
        match input.as_str() {
            "automatic" | "auto" => Ok(Self::Automatic),
            "manual" => Ok(Self::Manual),
            "child safety" => Ok(Self::ToggleChildSafety),
            "reset" => Ok(Self::Reset),
            "drain battery" => Ok(Self::DrainBattery),
            _ => Err(invalid_state(DeviceKind::Blinds, s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GarageDoorCommand {
    Move(Position),
    Automatic,
    Manual,
    UnlockWithPin(String),
    Maintenance(bool),
    DrainBattery,
}

impl FromStr for GarageDoorCommand {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(raw) = strip_prefix_ci(s, "pin:") {
            return Ok(Self::UnlockWithPin(raw.to_string()));
        }
        if let Some(raw) = strip_prefix_ci(s, "maintenance:") {
            return parse_switch("maintenance", raw).map(Self::Maintenance);
        }
        let input = normalize(s);
        if let Some(position) = Position::parse(&input) {
            return Ok(Self::Move(position));
        }
        match input.as_str() {
            "automatic" | "auto" => Ok(Self::Automatic),
            "manual" => Ok(Self::Manual),
            "drain battery" => Ok(Self::DrainBattery),
            _ => Err(invalid_state(DeviceKind::GarageDoor, s)),
        }
    }
}
