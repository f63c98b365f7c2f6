use std::str::FromStr;

use super::{Percent, invalid_state, normalize, parse_int, strip_prefix_ci};
use crate::device::DeviceKind;
use crate::error::Rejection;

/// Commands for the voice assistant device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantCommand {
    Listen,
    Passive,
    Mute,
    Volume(Percent),
    /// A spoken sentence to interpret.
    Ask(String),
    ClearHistory,
}

impl FromStr for AssistantCommand {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(raw) = strip_prefix_ci(s, "volume:") {
            let value = parse_int("volume", raw)?;
            return Percent::checked("Volume", value).map(Self::Volume);
        }
        if let Some(raw) = strip_prefix_ci(s, "command:") {
            if raw.is_empty() {
                return Err(Rejection::InvalidFormat {
                    field: "command",
                    input: String::new(),
                });
            }
            return Ok(Self::Ask(raw.to_string()));
        }
        match normalize(s).as_str() {
            "listening" | "listen" | "active" => Ok(Self::Listen),
            "passive" | "standby" => Ok(Self::Passive),
            "mute" | "muted" => Ok(Self::Mute),
            "clear history" => Ok(Self::ClearHistory),
            _ => Err(invalid_state(DeviceKind::VoiceAssistant, s)),
        }
    }
}
