//! Smart light: on/off, brightness and a small colour palette.

use homesim_app::ports::SmartDevice;
use homesim_domain::command::{Command, LightColor, LightCommand, Percent};
use homesim_domain::context::DeviceContext;
use homesim_domain::device::{Device, DeviceKind};
use homesim_domain::error::Rejection;
use homesim_domain::outcome::Outcome;

use super::DeviceCore;

/// A dimmable colour light. Starts off, at full brightness, in white.
pub struct Light {
    core: DeviceCore,
    on: bool,
    brightness: Percent,
    color: LightColor,
}

impl Light {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            core: DeviceCore::new(DeviceKind::Light, name, "off"),
            on: false,
            brightness: Percent::FULL,
            color: LightColor::default(),
        }
    }

    fn refresh_status(&mut self) {
        let status = if self.on {
            format!(
                "on (Brightness: {}, Color: {})",
                self.brightness, self.color
            )
        } else {
            "off".to_string()
        };
        self.core.set_status(status);
    }

    fn handle(&mut self, command: LightCommand) -> Outcome {
        let notice = match command {
            LightCommand::On => {
                self.on = true;
                "Light is on".to_string()
            }
            LightCommand::Off => {
                self.on = false;
                "Light is off".to_string()
            }
            LightCommand::Brightness(level) => {
                self.brightness = level;
                format!("Brightness changed to {level}")
            }
            LightCommand::Color(color) => {
                self.color = color;
                format!("Color changed to {color}")
            }
        };
        self.refresh_status();
        Outcome::notice(notice)
    }
}

impl SmartDevice for Light {
    delegate_core!();

    fn apply(
        &mut self,
        command: Command,
        _ctx: &mut DeviceContext<'_>,
    ) -> Result<Outcome, Rejection> {
        self.core.ensure_active()?;
        match command {
            Command::Light(command) => Ok(self.handle(command)),
            _ => Err(Rejection::Unsupported {
                kind: self.core.kind,
            }),
        }
    }

    fn snapshot(&self) -> Device {
        self.core
            .snapshot()
            .with_attribute("on", self.on)
            .with_attribute("brightness", self.brightness.value())
            .with_attribute("color", self.color.as_str())
    }
}
