use std::str::FromStr;

use super::{invalid_state, normalize, strip_prefix_ci};
use crate::device::DeviceKind;
use crate::error::Rejection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeakerCommand {
    Play,
    Pause,
    Mute,
    VolumeUp,
    VolumeDown,
    Queue(String),
    Skip,
}

impl FromStr for SpeakerCommand {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(raw) = strip_prefix_ci(s, "queue:") {
            if raw.is_empty() {
                return Err(Rejection::InvalidSong);
            }
            return Ok(Self::Queue(raw.to_string()));
        }
        match normalize(s).as_str() {
            "playing" | "play" => Ok(Self::Play),
            "paused" | "pause" => Ok(Self::Pause),
            "muted" | "mute" => Ok(Self::Mute),
            "volume up" => Ok(Self::VolumeUp),
            "volume down" => Ok(Self::VolumeDown),
            "skip" | "next" => Ok(Self::Skip),
            _ => Err(invalid_state(DeviceKind::Speaker, s)),
        }
    }
}
