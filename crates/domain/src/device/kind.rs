//! Device kinds and the type strings the factory accepts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Every kind of simulated device the home knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Light,
    Thermostat,
    Camera,
    Doorbell,
    VoiceAssistant,
    Lock,
    Blinds,
    GarageDoor,
    Ac,
    Fan,
    Speaker,
    Sprinkler,
}

impl DeviceKind {
    pub const ALL: [Self; 12] = [
        Self::Light,
        Self::Thermostat,
        Self::Camera,
        Self::Doorbell,
        Self::VoiceAssistant,
        Self::Lock,
        Self::Blinds,
        Self::GarageDoor,
        Self::Ac,
        Self::Fan,
        Self::Speaker,
        Self::Sprinkler,
    ];

    /// Canonical type string, as accepted by the factory.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Thermostat => "thermostat",
            Self::Camera => "camera",
            Self::Doorbell => "doorbell",
            Self::VoiceAssistant => "voice assistant",
            Self::Lock => "lock",
            Self::Blinds => "blinds",
            Self::GarageDoor => "garage door",
            Self::Ac => "ac",
            Self::Fan => "fan",
            Self::Speaker => "speaker",
            Self::Sprinkler => "sprinkler",
        }
    }

    /// Human-readable product label used in messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "Smart Light",
            Self::Thermostat => "Smart Thermostat",
            Self::Camera => "Smart Camera",
            Self::Doorbell => "Video Doorbell",
            Self::VoiceAssistant => "Voice Assistant",
            Self::Lock => "Smart Lock",
            Self::Blinds => "Smart Blinds",
            Self::GarageDoor => "Garage Door",
            Self::Ac => "AC",
            Self::Fan => "Smart Fan",
            Self::Speaker => "Smart Speaker",
            Self::Sprinkler => "Smart Sprinkler",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DeviceKind {
    type Err = ValidationError;

    /// Case-insensitive; `_` and `-` are treated as spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_ascii_lowercase()
            .replace(['_', '-'], " ");
        let kind = match normalized.as_str() {
            "light" | "lamp" => Self::Light,
            "thermostat" => Self::Thermostat,
            "camera" => Self::Camera,
            "doorbell" | "video doorbell" => Self::Doorbell,
            "voice assistant" | "assistant" => Self::VoiceAssistant,
            "lock" | "smart lock" => Self::Lock,
            "blinds" => Self::Blinds,
            "garage door" | "garage" => Self::GarageDoor,
            "ac" | "air conditioner" => Self::Ac,
            "fan" => Self::Fan,
            "speaker" => Self::Speaker,
            "sprinkler" => Self::Sprinkler,
            _ => return Err(ValidationError::UnknownDeviceType(s.to_string())),
        };
        Ok(kind)
    }
}
