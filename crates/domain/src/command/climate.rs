//! Air conditioner and fan vocabulary.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::{invalid_state, normalize, parse_bounded, split_schedule, strip_prefix_ci};
use crate::device::DeviceKind;
use crate::error::Rejection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcMode {
    Off,
    Cooling,
    Heating,
    FanMode,
    Auto,
}

impl AcMode {
    fn parse(input: &str) -> Option<Self> {
        match input {
            "off" => Some(Self::Off),
            "cooling" | "cool" => Some(Self::Cooling),
            "heating" | "heat" => Some(Self::Heating),
            "fan mode" | "fan" => Some(Self::FanMode),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }
}

impl fmt::Display for AcMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::Cooling => "cooling",
            Self::Heating => "heating",
            Self::FanMode => "fan mode",
            Self::Auto => "auto",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanSpeed {
    Low,
    #[default]
    Medium,
    High,
}

impl FanSpeed {
    fn parse(input: &str) -> Option<Self> {
        match input {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcCommand {
    SetMode(AcMode),
    /// Set-point in °C, already checked against `16..=30`.
    SetTemperature(i64),
    SetFanSpeed(FanSpeed),
    ToggleEnergySaving,
    Schedule { at: NaiveTime, mode: AcMode },
}

impl FromStr for AcCommand {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(raw) = strip_prefix_ci(s, "temperature:") {
            return parse_bounded("temperature", "Temperature", raw, 16, 30)
                .map(Self::SetTemperature);
        }
        if let Some(raw) = strip_prefix_ci(s, "fan:") {
            return FanSpeed::parse(&normalize(raw))
                .map(Self::SetFanSpeed)
                .ok_or_else(|| Rejection::InvalidFormat {
                    field: "fan speed",
                    input: raw.to_string(),
                });
        }
        if let Some(raw) = strip_prefix_ci(s, "schedule:") {
            let (at, mode) = split_schedule(raw)?;
            // a slot names the mode to run, so it cannot defer to the schedule itself
            return match AcMode::parse(&normalize(mode)) {
                Some(AcMode::Auto) | None => Err(Rejection::InvalidFormat {
                    field: "mode",
                    input: mode.to_string(),
                }),
                Some(mode) => Ok(Self::Schedule { at, mode }),
            };
        }
        let input = normalize(s);
        if input == "energy saving" {
            return Ok(Self::ToggleEnergySaving);
        }
        AcMode::parse(&input)
            .map(Self::SetMode)
            .ok_or_else(|| invalid_state(DeviceKind::Ac, s))
    }
}

/// Settings accepted by a standalone fan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanSetting {
    Off,
    Low,
    Medium,
    High,
    Auto,
}

impl fmt::Display for FanSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Auto => "auto",
        })
    }
}

impl FromStr for FanSetting {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "off" => Ok(Self::Off),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "auto" => Ok(Self::Auto),
            _ => Err(invalid_state(DeviceKind::Fan, s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_ac_modes() {
        assert_eq!("Fan Mode".parse(), Ok(AcCommand::SetMode(AcMode::FanMode)));
        assert_eq!("cooling".parse(), Ok(AcCommand::SetMode(AcMode::Cooling)));
    }

    #[test]
    fn should_reject_set_point_outside_range() {
        assert!(matches!(
            "temperature:31".parse::<AcCommand>(),
            Err(Rejection::OutOfRange {
                min: 16,
                max: 30,
                ..
            })
        ));
        assert_eq!(
            "temperature:16".parse(),
            Ok(AcCommand::SetTemperature(16))
        );
    }

    #[test]
    fn should_parse_schedule_with_mode() {
        assert_eq!(
            "schedule:07:30:cooling".parse(),
            Ok(AcCommand::Schedule {
                at: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
                mode: AcMode::Cooling,
            })
        );
    }

    #[test]
    fn should_reject_schedule_with_unknown_mode() {
        assert!(matches!(
            "schedule:07:30:turbo".parse::<AcCommand>(),
            Err(Rejection::InvalidFormat { field: "mode", .. })
        ));
    }

    #[test]
    fn should_reject_schedule_when_mode_is_auto() {
        assert_eq!(
            "schedule:07:30:auto".parse::<AcCommand>(),
            Err(Rejection::InvalidFormat {
                field: "mode",
                input: "auto".to_string(),
            })
        );
    }

    #[test]
    fn should_reject_warp_speed() {
        assert_eq!(
            "warp-speed".parse::<AcCommand>(),
            Err(Rejection::InvalidState {
                kind: DeviceKind::Ac,
                input: "warp-speed".to_string(),
            })
        );
    }

    #[test]
    fn should_parse_fan_settings() {
        assert_eq!("HIGH".parse(), Ok(FanSetting::High));
        assert!("turbo".parse::<FanSetting>().is_err());
    }
}
