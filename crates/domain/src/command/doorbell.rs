use std::str::FromStr;

use super::{invalid_state, normalize, parse_switch, split_pair, strip_prefix_ci};
use crate::device::DeviceKind;
use crate::error::Rejection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoorbellCommand {
    Ring,
    Answer,
    Ignore,
    Talk,
    Motion,
    Record,
    Standby,
    ToggleMotionDetection,
    NightVision(bool),
    LogVisitor(String),
    GrantAccess { person: String, code: String },
    VerifyAccess { person: String, code: String },
    LiveFeed(bool),
}

impl FromStr for DoorbellCommand {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(raw) = strip_prefix_ci(s, "night vision:") {
            return parse_switch("night vision", raw).map(Self::NightVision);
        }
        if let Some(raw) = strip_prefix_ci(s, "live feed:") {
            return parse_switch("live feed", raw).map(Self::LiveFeed);
        }
        if let Some(raw) = strip_prefix_ci(s, "visitor:") {
            if raw.is_empty() {
                return Err(Rejection::InvalidFormat {
                    field: "visitor",
                    input: raw.to_string(),
                });
            }
            return Ok(Self::LogVisitor(raw.to_string()));
        }
        if let Some(raw) = strip_prefix_ci(s, "grant:") {
            let (person, code) = split_pair("access code", raw)?;
            return Ok(Self::GrantAccess {
                person: person.to_string(),
                code: code.to_string(),
            });
        }
        if let Some(raw) = strip_prefix_ci(s, "verify:") {
            let (person, code) = split_pair("access code", raw)?;
            return Ok(Self::VerifyAccess {
                person: person.to_string(),
                code: code.to_string(),
            });
        }
        match normalize(s).as_str() {
            "ring" => Ok(Self::Ring),
            "answer" => Ok(Self::Answer),
            "ignore" => Ok(Self::Ignore),
            "talk" => Ok(Self::Talk),
            "motion" => Ok(Self::Motion),
            "record" | "recording" => Ok(Self::Record),
            "standby" => Ok(Self::Standby),
            "motion detection" => Ok(Self::ToggleMotionDetection),
            _ => Err(invalid_state(DeviceKind::Doorbell, s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_simple_events() {
        assert_eq!("RING".parse(), Ok(DoorbellCommand::Ring));
        assert_eq!(
            "motion detection".parse(),
            Ok(DoorbellCommand::ToggleMotionDetection)
        );
    }

    #[test]
    fn should_parse_switch_payloads() {
        assert_eq!(
            "night vision:on".parse(),
            Ok(DoorbellCommand::NightVision(true))
        );
        assert_eq!("live feed:OFF".parse(), Ok(DoorbellCommand::LiveFeed(false)));
        assert!("night vision:maybe".parse::<DoorbellCommand>().is_err());
    }

    #[test]
    fn should_keep_visitor_name_case() {
        assert_eq!(
            "visitor:Alice Smith".parse(),
            Ok(DoorbellCommand::LogVisitor("Alice Smith".to_string()))
        );
    }

    #[test]
    fn should_parse_access_code_pairs() {
        assert_eq!(
            "grant:Bob:4321".parse(),
            Ok(DoorbellCommand::GrantAccess {
                person: "Bob".to_string(),
                code: "4321".to_string(),
            })
        );
        assert!("verify:Bob".parse::<DoorbellCommand>().is_err());
    }
}
