use homesim_app::ports::SmartDevice;
use homesim_domain::command::{Command, FanSetting};
use homesim_domain::context::DeviceContext;
use homesim_domain::device::{Device, DeviceKind};
use homesim_domain::error::Rejection;
use homesim_domain::outcome::Outcome;

use super::DeviceCore;

/// Ceiling fan; its status is the selected setting.
pub struct Fan {
    core: DeviceCore,
    setting: FanSetting,
}

impl Fan {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            core: DeviceCore::new(DeviceKind::Fan, name, FanSetting::Off.to_string()),
            setting: FanSetting::Off,
        }
    }

    #[must_use]
    pub fn setting(&self) -> FanSetting {
        self.setting
    }
}

impl SmartDevice for Fan {
    delegate_core!();

    fn apply(
        &mut self,
        command: Command,
        _ctx: &mut DeviceContext<'_>,
    ) -> Result<Outcome, Rejection> {
        self.core.ensure_active()?;
        let Command::Fan(setting) = command else {
            return Err(Rejection::Unsupported {
                kind: self.core.kind,
            });
        };
        self.setting = setting;
        self.core.set_status(setting.to_string());
        Ok(Outcome::notice(format!("Fan is now {setting}")))
    }

    fn snapshot(&self) -> Device {
        self.core
            .snapshot()
            .with_attribute("setting", self.setting.to_string())
    }
}
