//! Voice: intent recognition for the voice assistant.
//!
//! An utterance is normalised, matched against per-[`Category`] regular
//! expressions with named capture groups, scored, and turned into an
//! [`Intent`]. Short low-confidence follow-ups ("and the bedroom") borrow
//! the category of the previous intent from a bounded conversation context.
//! [`respond`] renders a spoken answer from templates.

mod gazetteer;
mod interpreter;
mod patterns;
mod response;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use interpreter::{Interpreter, InterpreterConfig};
pub use response::respond;

/// What a command is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Lights,
    Temperature,
    Music,
    Camera,
    Security,
    Weather,
    News,
    Time,
    Reminders,
    Routines,
    Greeting,
    Thanks,
    Unknown,
}

impl Category {
    /// Every recognisable category, in matching priority order.
    pub const RECOGNISED: [Self; 12] = [
        Self::Lights,
        Self::Temperature,
        Self::Music,
        Self::Camera,
        Self::Security,
        Self::Weather,
        Self::News,
        Self::Time,
        Self::Reminders,
        Self::Routines,
        Self::Greeting,
        Self::Thanks,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lights => "lights",
            Self::Temperature => "temperature",
            Self::Music => "music",
            Self::Camera => "camera",
            Self::Security => "security",
            Self::Weather => "weather",
            Self::News => "news",
            Self::Time => "time",
            Self::Reminders => "reminders",
            Self::Routines => "routines",
            Self::Greeting => "greeting",
            Self::Thanks => "thanks",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recognised intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub category: Category,
    pub entities: BTreeMap<String, String>,
    /// Match quality in `[0, 1]`.
    pub confidence: f64,
    /// The normalised utterance.
    pub utterance: String,
}

impl Intent {
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.category == Category::Unknown
    }

    #[must_use]
    pub fn entity(&self, key: &str) -> Option<&str> {
        self.entities.get(key).map(String::as_str)
    }
}

/// Lowercase, collapse whitespace and drop trailing punctuation.
pub(crate) fn normalize_utterance(input: &str) -> String {
    let collapsed = input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    collapsed
        .trim_end_matches(['.', ',', '!', '?', ';', ':'])
        .trim_end()
        .to_string()
}
