use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{invalid_state, normalize, strip_prefix_ci};
use crate::device::DeviceKind;
use crate::error::Rejection;

/// Modes a user can ask a thermostat for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThermostatMode {
    Off,
    Heating,
    Cooling,
    Auto,
}

impl fmt::Display for ThermostatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::Heating => "heating",
            Self::Cooling => "cooling",
            Self::Auto => "auto",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThermostatCommand {
    SetMode(ThermostatMode),
    /// Requested target in °C; clamping happens on the device.
    SetTarget(f64),
    /// Announce the current reading.
    Report,
    /// Weekly energy report with recommendations.
    WeeklyReport,
}

fn parse_celsius(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let raw = raw
        .strip_suffix("°C")
        .or_else(|| raw.strip_suffix("°c"))
        .or_else(|| raw.strip_suffix('°'))
        .unwrap_or(raw);
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl FromStr for ThermostatCommand {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(raw) = strip_prefix_ci(s, "target:") {
            return parse_celsius(raw)
                .map(Self::SetTarget)
                .ok_or_else(|| Rejection::InvalidFormat {
                    field: "temperature",
                    input: raw.to_string(),
                });
        }
        let command = match normalize(s).as_str() {
            "off" => Self::SetMode(ThermostatMode::Off),
            "heating" | "heat" => Self::SetMode(ThermostatMode::Heating),
            "cooling" | "cool" => Self::SetMode(ThermostatMode::Cooling),
            "auto" => Self::SetMode(ThermostatMode::Auto),
            "current temperature" => Self::Report,
            "report" | "weekly report" => Self::WeeklyReport,
            _ => {
                return parse_celsius(s)
                    .map(Self::SetTarget)
                    .ok_or_else(|| invalid_state(DeviceKind::Thermostat, s));
            }
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_modes() {
        assert_eq!(
            "Heating".parse::<ThermostatCommand>(),
            Ok(ThermostatCommand::SetMode(ThermostatMode::Heating))
        );
        assert_eq!(
            "auto".parse::<ThermostatCommand>(),
            Ok(ThermostatCommand::SetMode(ThermostatMode::Auto))
        );
    }

    #[test]
    fn should_parse_target_with_prefix() {
        assert_eq!(
            "target:22.5".parse::<ThermostatCommand>(),
            Ok(ThermostatCommand::SetTarget(22.5))
        );
    }

    #[test]
    fn should_parse_bare_number_with_unit() {
        assert_eq!(
            "24°C".parse::<ThermostatCommand>(),
            Ok(ThermostatCommand::SetTarget(24.0))
        );
        assert_eq!(
            " 18 ".parse::<ThermostatCommand>(),
            Ok(ThermostatCommand::SetTarget(18.0))
        );
    }

    #[test]
    fn should_keep_out_of_range_target_for_device_to_clamp() {
        assert_eq!(
            "target:45".parse::<ThermostatCommand>(),
            Ok(ThermostatCommand::SetTarget(45.0))
        );
    }

    #[test]
    fn should_reject_non_finite_target() {
        assert!(matches!(
            "target:NaN".parse::<ThermostatCommand>(),
            Err(Rejection::InvalidFormat { .. })
        ));
        assert!("inf".parse::<ThermostatCommand>().is_err());
    }

    #[test]
    fn should_parse_reports() {
        assert_eq!(
            "current temperature".parse::<ThermostatCommand>(),
            Ok(ThermostatCommand::Report)
        );
        assert_eq!(
            "REPORT".parse::<ThermostatCommand>(),
            Ok(ThermostatCommand::WeeklyReport)
        );
    }

    #[test]
    fn should_reject_unknown_word() {
        assert!(matches!(
            "tropical".parse::<ThermostatCommand>(),
            Err(Rejection::InvalidState {
                kind: DeviceKind::Thermostat,
                ..
            })
        ));
    }
}
