//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts via `#[from]`.
//! [`Rejection`] is special: it is advisory. Its `Display` text is what the
//! user sees in a notification, and a rejected command never changes state.

use crate::device::DeviceKind;

/// Top-level error for home-controller operations.
#[derive(Debug, thiserror::Error)]
pub enum HomeError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("command rejected: {0}")]
    Rejected(#[from] Rejection),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("unknown device type: {0}")]
    UnknownDeviceType(String),

    #[error("a device named {0:?} already exists")]
    DuplicateName(String),
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Why a device refused a command.
///
/// The device state is left untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("Device is disconnected")]
    Disconnected,

    #[error("Invalid state for {kind}: {input}")]
    InvalidState { kind: DeviceKind, input: String },

    #[error("{kind} does not accept this command")]
    Unsupported { kind: DeviceKind },

    #[error("Invalid {field} format: {input}")]
    InvalidFormat { field: &'static str, input: String },

    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Unsupported color: {0}")]
    UnsupportedColor(String),

    #[error("Cannot {action} while {status}")]
    InvalidTransition {
        action: &'static str,
        status: String,
    },

    #[error("Invalid PIN.")]
    InvalidPin,

    #[error("Access denied for {0}")]
    AccessDenied(String),

    #[error("User {0} already exists.")]
    UserExists(String),

    #[error("User {0} not found.")]
    UnknownUser(String),

    #[error("Battery is empty. Please replace the battery.")]
    BatteryEmpty,

    #[error("Child Safety Mode is enabled. Manual operation is disabled.")]
    ChildSafetyEnabled,

    #[error("Manual mode: Please use the manual controls.")]
    ManualMode,

    #[error("No songs in the queue. Please add songs first.")]
    EmptyQueue,

    #[error("Invalid song name.")]
    InvalidSong,

    #[error("Volume is already at maximum.")]
    VolumeAtMaximum,

    #[error("Volume is already at minimum.")]
    VolumeAtMinimum,

    #[error("Cannot process command while muted")]
    Muted,

    #[error("Cannot take photo: Camera is not in recording mode")]
    NotRecording,

    #[error("Motion detection is disabled")]
    MotionDetectionDisabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_validation_error_into_home_error() {
        let err: HomeError = ValidationError::EmptyName.into();
        assert!(matches!(err, HomeError::Validation(ValidationError::EmptyName)));
    }

    #[test]
    fn should_convert_rejection_into_home_error() {
        let err: HomeError = Rejection::InvalidPin.into();
        assert!(matches!(err, HomeError::Rejected(Rejection::InvalidPin)));
    }

    #[test]
    fn should_display_not_found_with_entity_and_id() {
        let err = NotFoundError {
            entity: "Device",
            id: "porch".to_string(),
        };
        assert_eq!(err.to_string(), "Device not found: porch");
    }

    #[test]
    fn should_display_invalid_state_with_device_label() {
        let err = Rejection::InvalidState {
            kind: DeviceKind::Ac,
            input: "warp-speed".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid state for AC: warp-speed");
    }

    #[test]
    fn should_display_out_of_range_bounds() {
        let err = Rejection::OutOfRange {
            field: "Volume",
            value: 140,
            min: 0,
            max: 100,
        };
        assert_eq!(err.to_string(), "Volume must be between 0 and 100 (got 140)");
    }
}
