//! Smart speaker with a song queue and stepped volume.

use std::collections::VecDeque;

use homesim_app::ports::SmartDevice;
use homesim_domain::command::{Command, SpeakerCommand};
use homesim_domain::context::DeviceContext;
use homesim_domain::device::{Device, DeviceKind};
use homesim_domain::error::Rejection;
use homesim_domain::outcome::Outcome;

use super::DeviceCore;

const VOLUME_STEP: u8 = 5;
const MAX_VOLUME: u8 = 100;

pub struct Speaker {
    core: DeviceCore,
    volume: u8,
    queue: VecDeque<String>,
    current: Option<String>,
}

impl Speaker {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            core: DeviceCore::new(DeviceKind::Speaker, name, "paused"),
            volume: 50,
            queue: VecDeque::new(),
            current: None,
        }
    }

    #[must_use]
    pub fn volume(&self) -> u8 {
        self.volume
    }

    #[must_use]
    pub fn current_song(&self) -> Option<&str> {
        self.current.as_deref()
    }

    fn handle(&mut self, command: SpeakerCommand) -> Result<Outcome, Rejection> {
        match command {
            SpeakerCommand::Play => {
                let song = self.queue.pop_front().ok_or(Rejection::EmptyQueue)?;
                self.core.set_status("playing");
                let notice = format!("Smart Speaker is now playing: {song}");
                self.current = Some(song);
                Ok(Outcome::notice(notice))
            }
            SpeakerCommand::Pause => {
                self.core.set_status("paused");
                Ok(Outcome::notice("Smart Speaker is now paused."))
            }
            SpeakerCommand::Mute => {
                self.volume = 0;
                self.core.set_status("muted");
                Ok(Outcome::notice("Smart Speaker is now muted."))
            }
            SpeakerCommand::VolumeUp => {
                if self.volume >= MAX_VOLUME {
                    return Err(Rejection::VolumeAtMaximum);
                }
                self.volume = (self.volume + VOLUME_STEP).min(MAX_VOLUME);
                self.core.set_status("volume up");
                Ok(Outcome::notice(format!(
                    "Smart Speaker volume increased to: {}",
                    self.volume
                )))
            }
            SpeakerCommand::VolumeDown => {
                if self.volume == 0 {
                    return Err(Rejection::VolumeAtMinimum);
                }
                self.volume = self.volume.saturating_sub(VOLUME_STEP);
                self.core.set_status("volume down");
                Ok(Outcome::notice(format!(
                    "Smart Speaker volume decreased to: {}",
                    self.volume
                )))
            }
            SpeakerCommand::Queue(song) => {
                let notice = format!("Song \"{song}\" has been added to the queue.");
                self.queue.push_back(song);
                Ok(Outcome::notice(notice))
            }
            SpeakerCommand::Skip => {
                let status = self.core.status.clone();
                if status != "paused" && status != "playing" {
                    return Err(Rejection::InvalidTransition {
                        action: "skip song",
                        status: format!("in {status} state"),
                    });
                }
                let song = self.queue.pop_front().ok_or(Rejection::EmptyQueue)?;
                let notice = format!("Skipping to next song: {song}");
                self.current = Some(song);
                Ok(Outcome::notice(notice))
            }
        }
    }
}

impl SmartDevice for Speaker {
    delegate_core!();

    fn apply(
        &mut self,
        command: Command,
        _ctx: &mut DeviceContext<'_>,
    ) -> Result<Outcome, Rejection> {
        self.core.ensure_active()?;
        match command {
            Command::Speaker(command) => self.handle(command),
            _ => Err(Rejection::Unsupported {
                kind: self.core.kind,
            }),
        }
    }

    fn snapshot(&self) -> Device {
        let device = self
            .core
            .snapshot()
            .with_attribute("volume", self.volume)
            .with_attribute("queue", serde_json::json!(self.queue));
        match &self.current {
            Some(song) => device.with_attribute("current_song", song.as_str()),
            None => device,
        }
    }
}
