use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Percent, invalid_state, normalize, parse_int, strip_prefix_ci};
use crate::device::DeviceKind;
use crate::error::Rejection;

/// Commands understood by a smart light.
///
/// Accepts `on`, `off`, `brightness:<0-100>`, `color:<name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightCommand {
    On,
    Off,
    Brightness(Percent),
    Color(LightColor),
}

/// The palette a smart light can show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightColor {
    #[default]
    White,
    Red,
    Blue,
    Pink,
    Green,
    Yellow,
    Purple,
    Orange,
}

impl LightColor {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Pink => "pink",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Purple => "purple",
            Self::Orange => "orange",
        }
    }
}

impl fmt::Display for LightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LightColor {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let color = match normalize(s).as_str() {
            "white" => Self::White,
            "red" => Self::Red,
            "blue" => Self::Blue,
            "pink" => Self::Pink,
            "green" => Self::Green,
            "yellow" => Self::Yellow,
            "purple" => Self::Purple,
            "orange" => Self::Orange,
            other => return Err(Rejection::UnsupportedColor(other.to_string())),
        };
        Ok(color)
    }
}

impl FromStr for LightCommand {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(raw) = strip_prefix_ci(s, "brightness:") {
            let value = parse_int("brightness", raw)?;
            return Percent::checked("Brightness", value).map(Self::Brightness);
        }
        if let Some(raw) = strip_prefix_ci(s, "color:") {
            return raw.parse().map(Self::Color);
        }
        match normalize(s).as_str() {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            _ => Err(invalid_state(DeviceKind::Light, s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_power_case_insensitively() {
        assert_eq!("On".parse::<LightCommand>(), Ok(LightCommand::On));
        assert_eq!("OFF".parse::<LightCommand>(), Ok(LightCommand::Off));
    }

    #[test]
    fn should_parse_brightness_payload() {
        assert_eq!(
            "brightness:80".parse::<LightCommand>(),
            Ok(LightCommand::Brightness(Percent::new(80).unwrap()))
        );
    }

    #[test]
    fn should_reject_brightness_above_hundred() {
        let result = "brightness:120".parse::<LightCommand>();
        assert!(matches!(
            result,
            Err(Rejection::OutOfRange {
                field: "Brightness",
                value: 120,
                ..
            })
        ));
    }

    #[test]
    fn should_reject_non_numeric_brightness() {
        let result = "brightness:bright".parse::<LightCommand>();
        assert!(matches!(
            result,
            Err(Rejection::InvalidFormat {
                field: "brightness",
                ..
            })
        ));
    }

    #[test]
    fn should_parse_supported_color_and_reject_others() {
        assert_eq!(
            "color:Purple".parse::<LightCommand>(),
            Ok(LightCommand::Color(LightColor::Purple))
        );
        assert_eq!(
            "color:teal".parse::<LightCommand>(),
            Err(Rejection::UnsupportedColor("teal".to_string()))
        );
    }

    #[test]
    fn should_reject_unrecognized_state() {
        assert!(matches!(
            "dim".parse::<LightCommand>(),
            Err(Rejection::InvalidState {
                kind: DeviceKind::Light,
                ..
            })
        ));
    }
}
