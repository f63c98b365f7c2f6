//! Line-oriented console: the presentation layer of the daemon.
//!
//! Each input line is one command. Device notifications do not go through
//! the returned [`Reply`]; they reach the console observer that every device
//! added here is subscribed to.

use std::fmt::Write as _;
use std::sync::Arc;

use homesim_app::ports::{DeviceFactory, Observer, Scheduler};
use homesim_app::services::HomeService;
use homesim_domain::device::Device;
use homesim_domain::error::HomeError;

pub const HELP: &str = "\
Commands:
  add <type> <name>        create a device (types: light, thermostat, camera,
                           doorbell, voice_assistant, lock, blinds,
                           garage_door, ac, fan, speaker, sprinkler)
  remove <name>            delete a device and its timers
  set <name> <input...>    change a device's state
  show <name>              print a device snapshot as JSON
  list                     list every device
  connect <name>           reconnect a device
  disconnect <name>        disconnect a device
  tick                     advance the simulation by one step
  help                     show this message
  quit                     exit";

/// What the caller should do after a line was executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print this text (nothing when empty) and keep reading.
    Output(String),
    Quit,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self::Output(text.into())
    }
}

/// Observer printing notifications on standard output.
pub struct StdoutObserver;

impl Observer for StdoutObserver {
    fn update(&self, message: &str) {
        println!("{message}");
    }
}

pub struct Console<F, S> {
    home: HomeService<F, S>,
    observer: Arc<dyn Observer>,
}

impl<F, S> Console<F, S>
where
    F: DeviceFactory + 'static,
    S: Scheduler + 'static,
{
    pub fn new(home: HomeService<F, S>, observer: Arc<dyn Observer>) -> Self {
        Self { home, observer }
    }

    /// Create a device and subscribe the console observer to it.
    ///
    /// # Errors
    ///
    /// Returns the home's validation error for an unknown type or a bad name.
    pub fn add(&self, device_type: &str, name: &str) -> Result<Device, HomeError> {
        let device = self.home.add_device(device_type, name)?;
        self.home
            .subscribe(&device.name, Arc::clone(&self.observer))?;
        Ok(device)
    }

    /// Execute one input line.
    pub fn execute(&self, line: &str) -> Reply {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let result = match verb.to_ascii_lowercase().as_str() {
            "" => return Reply::text(""),
            "help" | "?" => return Reply::text(HELP),
            "quit" | "exit" => return Reply::Quit,
            "add" => match rest.split_once(char::is_whitespace) {
                Some((kind, name)) => self
                    .add(kind, name)
                    .map(|device| format!("Added {} '{}' ({})", device.kind, device.name, device.status)),
                None => return usage("add <type> <name>"),
            },
            "remove" if !rest.is_empty() => self
                .home
                .remove_device(rest)
                .map(|device| format!("Removed '{}'", device.name)),
            "set" => match rest.split_once(char::is_whitespace) {
                Some((name, input)) => self
                    .home
                    .change_state(name, input.trim())
                    .map(|device| summary(&device)),
                None => return usage("set <name> <input...>"),
            },
            "show" if !rest.is_empty() => self.home.get_device(rest).map(|device| {
                serde_json::to_string_pretty(&device).unwrap_or_else(|err| err.to_string())
            }),
            "list" => Ok(self.list()),
            "connect" if !rest.is_empty() => {
                self.home.set_active(rest, true).map(|device| summary(&device))
            }
            "disconnect" if !rest.is_empty() => {
                self.home.set_active(rest, false).map(|device| summary(&device))
            }
            "tick" => {
                self.home.tick();
                Ok(String::new())
            }
            "remove" | "show" | "connect" | "disconnect" => {
                return usage(&format!("{verb} <name>"));
            }
            _ => return Reply::text(format!("Unknown command '{verb}'. Type 'help'.")),
        };
        match result {
            Ok(text) => Reply::Output(text),
            // already delivered to the device's observers
            Err(HomeError::Rejected(_)) => Reply::text(""),
            Err(err) => Reply::text(format!("Error: {err}")),
        }
    }

    fn list(&self) -> String {
        let devices = self.home.list_devices();
        if devices.is_empty() {
            return "No devices.".to_string();
        }
        let mut out = String::new();
        for device in devices {
            let _ = writeln!(out, "{}", summary(&device));
        }
        out.trim_end().to_string()
    }
}

fn usage(form: &str) -> Reply {
    Reply::text(format!("Usage: {form}"))
}

fn summary(device: &Device) -> String {
    let mut line = format!("{:<16} {:<18} {}", device.name, device.kind, device.status);
    if !device.active {
        line.push_str(" [disconnected]");
    }
    line
}
