//! Device: a simulated smart-home appliance.
//!
//! The live state machines live in the virtual adapter; this module defines
//! what the rest of the system sees of them: the [`DeviceKind`] vocabulary and
//! the read-only [`Device`] snapshot returned by the home controller.

mod attribute_value;
mod kind;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use attribute_value::AttributeValue;
pub use kind::DeviceKind;

use crate::error::{HomeError, ValidationError};
use crate::id::DeviceId;

/// Point-in-time view of a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub kind: DeviceKind,
    pub status: String,
    pub active: bool,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), HomeError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Look up an attribute by key.
    #[must_use]
    pub fn get_attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Attach an attribute, replacing any previous value under `key`.
    #[must_use]
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    name: Option<String>,
    kind: Option<DeviceKind>,
    status: Option<String>,
    active: Option<bool>,
    attributes: BTreeMap<String, AttributeValue>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: DeviceKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// A missing kind defaults to [`DeviceKind::Light`], a missing status to
    /// `"off"` and a missing active flag to `true`.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<Device, HomeError> {
        let device = Device {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            kind: self.kind.unwrap_or(DeviceKind::Light),
            status: self.status.unwrap_or_else(|| "off".to_string()),
            active: self.active.unwrap_or(true),
            attributes: self.attributes,
        };
        device.validate()?;
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_valid_device_when_name_provided() {
        let device = Device::builder()
            .name("kitchen")
            .kind(DeviceKind::Thermostat)
            .status("20.0°C | OFF")
            .build()
            .unwrap();
        assert_eq!(device.name, "kitchen");
        assert_eq!(device.kind, DeviceKind::Thermostat);
        assert!(device.active);
    }

    #[test]
    fn should_return_validation_error_when_name_is_blank() {
        let result = Device::builder().name("   ").build();
        assert!(matches!(
            result,
            Err(HomeError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_expose_attributes_by_key() {
        let device = Device::builder()
            .name("hall")
            .attribute("brightness", 80_i64)
            .attribute("color", "white")
            .build()
            .unwrap();
        assert_eq!(
            device.get_attribute("brightness"),
            Some(&AttributeValue::Int(80))
        );
        assert_eq!(
            device.get_attribute("color"),
            Some(&AttributeValue::String("white".to_string()))
        );
        assert!(device.get_attribute("volume").is_none());
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let device = Device::builder()
            .name("porch")
            .kind(DeviceKind::Doorbell)
            .status("standby")
            .attribute("battery", 95_i64)
            .build()
            .unwrap();
        let json = serde_json::to_string(&device).unwrap();
        let parsed: Device = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, device);
    }
}
