use std::str::FromStr;

use super::{invalid_state, normalize, split_pair, strip_prefix_ci};
use crate::device::DeviceKind;
use crate::error::Rejection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockCommand {
    Lock,
    Unlock,
    ToggleAutoLock,
    UnlockWithPin(String),
    AddUser { name: String, pin: String },
    RemoveUser(String),
    EmergencyUnlock,
    DrainBattery,
}

impl FromStr for LockCommand {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(raw) = strip_prefix_ci(s, "pin:") {
            return Ok(Self::UnlockWithPin(raw.to_string()));
        }
        if let Some(raw) = strip_prefix_ci(s, "add user:") {
            let (name, pin) = split_pair("user", raw)?;
            return Ok(Self::AddUser {
                name: name.to_string(),
                pin: pin.to_string(),
            });
        }
        if let Some(raw) = strip_prefix_ci(s, "remove user:") {
            if raw.is_empty() {
                return Err(Rejection::InvalidFormat {
                    field: "user",
                    input: String::new(),
                });
            }
            return Ok(Self::RemoveUser(raw.to_string()));
        }
        match normalize(s).as_str() {
            "locked" | "lock" => Ok(Self::Lock),
            "unlocked" | "unlock" => Ok(Self::Unlock),
            "auto-lock" | "auto lock" => Ok(Self::ToggleAutoLock),
            "emergency unlock" => Ok(Self::EmergencyUnlock),
            "drain battery" => Ok(Self::DrainBattery),
            _ => Err(invalid_state(DeviceKind::Lock, s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_both_verb_and_adjective() {
        assert_eq!("lock".parse(), Ok(LockCommand::Lock));
        assert_eq!("Locked".parse(), Ok(LockCommand::Lock));
        assert_eq!("unlock".parse(), Ok(LockCommand::Unlock));
    }

    #[test]
    fn should_parse_user_management() {
        assert_eq!(
            "add user:Carol:9876".parse(),
            Ok(LockCommand::AddUser {
                name: "Carol".to_string(),
                pin: "9876".to_string(),
            })
        );
        assert_eq!(
            "remove user:Carol".parse(),
            Ok(LockCommand::RemoveUser("Carol".to_string()))
        );
    }

    #[test]
    fn should_parse_pin_payload() {
        assert_eq!(
            "PIN:1234".parse(),
            Ok(LockCommand::UnlockWithPin("1234".to_string()))
        );
    }

    #[test]
    fn should_reject_add_user_without_pin() {
        assert!("add user:Carol".parse::<LockCommand>().is_err());
    }
}
