use std::str::FromStr;

use super::{invalid_state, normalize};
use crate::device::DeviceKind;
use crate::error::Rejection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraCommand {
    On,
    Off,
    Recording,
    NightMode,
    TakePhoto,
    ClearPhotos,
}

impl FromStr for CameraCommand {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            "recording" | "record" => Ok(Self::Recording),
            "night mode" | "night" => Ok(Self::NightMode),
            "photo" | "take photo" => Ok(Self::TakePhoto),
            "clear photos" => Ok(Self::ClearPhotos),
            _ => Err(invalid_state(DeviceKind::Camera, s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_multi_word_inputs() {
        assert_eq!("Night  Mode".parse(), Ok(CameraCommand::NightMode));
        assert_eq!("clear photos".parse(), Ok(CameraCommand::ClearPhotos));
    }

    #[test]
    fn should_reject_unknown_input() {
        assert!("zoom".parse::<CameraCommand>().is_err());
    }
}
