//! Smart camera. Photos are kept as capture names in memory.

use homesim_app::ports::SmartDevice;
use homesim_domain::command::{CameraCommand, Command};
use homesim_domain::context::DeviceContext;
use homesim_domain::device::{Device, DeviceKind};
use homesim_domain::error::Rejection;
use homesim_domain::outcome::Outcome;

use super::DeviceCore;

pub struct Camera {
    core: DeviceCore,
    recording: bool,
    night_mode: bool,
    photos: Vec<String>,
}

impl Camera {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            core: DeviceCore::new(DeviceKind::Camera, name, "off"),
            recording: false,
            night_mode: false,
            photos: Vec::new(),
        }
    }

    /// Capture names, oldest first.
    #[must_use]
    pub fn photos(&self) -> &[String] {
        &self.photos
    }

    fn take_photo(&mut self, ctx: &DeviceContext<'_>) -> Result<Outcome, Rejection> {
        if !self.recording {
            return Err(Rejection::NotRecording);
        }
        let stamp = ctx.local_now().format("%Y%m%d_%H%M%S");
        let suffix = if self.night_mode { "_bw" } else { "" };
        let mut file = format!("{}_{stamp}{suffix}.png", self.core.name);
        if self.photos.contains(&file) {
            file = format!(
                "{}_{stamp}{suffix}_{}.png",
                self.core.name,
                self.photos.len()
            );
        }
        let notice = format!("Photo taken: {file}. View it in the gallery.");
        self.photos.push(file);
        Ok(Outcome::notice(notice))
    }

    fn switch(&mut self, status: &str, recording: bool, night_mode: bool) {
        self.core.set_status(status);
        self.recording = recording;
        self.night_mode = night_mode;
    }

    fn handle(
        &mut self,
        command: CameraCommand,
        ctx: &DeviceContext<'_>,
    ) -> Result<Outcome, Rejection> {
        match command {
            CameraCommand::Off => {
                self.switch("off", false, false);
                Ok(Outcome::notice("Camera is off"))
            }
            CameraCommand::On => {
                self.switch("on", false, false);
                Ok(Outcome::notice("Camera is on (standby)"))
            }
            CameraCommand::Recording => {
                self.switch("recording", true, false);
                let started = Outcome::notice("Camera is now recording");
                Ok(started.merge(self.take_photo(ctx)?))
            }
            CameraCommand::NightMode => {
                self.switch("night mode", true, true);
                let started = Outcome::notice("Camera is in night mode recording");
                Ok(started.merge(self.take_photo(ctx)?))
            }
            CameraCommand::TakePhoto => self.take_photo(ctx),
            CameraCommand::ClearPhotos => {
                let cleared = self.photos.len();
                self.photos.clear();
                tracing::debug!(device = %self.core.name, cleared, "photos cleared");
                Ok(Outcome::notice(format!(
                    "All photos cleared from {}",
                    self.core.name
                )))
            }
        }
    }
}

impl SmartDevice for Camera {
    delegate_core!();

    fn apply(
        &mut self,
        command: Command,
        ctx: &mut DeviceContext<'_>,
    ) -> Result<Outcome, Rejection> {
        self.core.ensure_active()?;
        match command {
            Command::Camera(command) => self.handle(command, ctx),
            _ => Err(Rejection::Unsupported {
                kind: self.core.kind,
            }),
        }
    }

    fn snapshot(&self) -> Device {
        self.core
            .snapshot()
            .with_attribute("recording", self.recording)
            .with_attribute("night_mode", self.night_mode)
            .with_attribute("photos", self.photos.len())
            .with_attribute(
                "last_photo",
                self.photos.last().cloned().unwrap_or_default(),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::testing::Harness;

    fn send(camera: &mut Camera, harness: &mut Harness, input: &str) -> Result<Outcome, Rejection> {
        let command = Command::parse(DeviceKind::Camera, input)?;
        camera.apply(command, &mut harness.ctx())
    }

    #[test]
    fn should_refuse_photo_when_not_recording() {
        let mut camera = Camera::new("porch");
        let mut harness = Harness::default();
        send(&mut camera, &mut harness, "on").unwrap();
        let result = send(&mut camera, &mut harness, "photo");
        assert_eq!(result, Err(Rejection::NotRecording));
        assert!(camera.photos().is_empty());
    }

    #[test]
    fn should_take_initial_photo_when_recording_starts() {
        let mut camera = Camera::new("porch");
        let mut harness = Harness::at(9, 30);
        let outcome = send(&mut camera, &mut harness, "recording").unwrap();
        assert_eq!(
            outcome.notices,
            vec![
                "Camera is now recording",
                "Photo taken: porch_20240315_093000.png. View it in the gallery."
            ]
        );
        assert_eq!(camera.status(), "recording");
    }

    #[test]
    fn should_keep_capture_names_unique_within_same_second() {
        let mut camera = Camera::new("porch");
        let mut harness = Harness::default();
        send(&mut camera, &mut harness, "recording").unwrap();
        send(&mut camera, &mut harness, "photo").unwrap();
        let photos = camera.photos();
        assert_eq!(photos.len(), 2);
        assert_ne!(photos[0], photos[1]);
    }

    #[test]
    fn should_mark_night_captures_as_black_and_white() {
        let mut camera = Camera::new("yard");
        let mut harness = Harness::at(23, 0);
        send(&mut camera, &mut harness, "night mode").unwrap();
        assert!(camera.photos()[0].ends_with("_bw.png"));
    }

    #[test]
    fn should_stop_recording_when_switched_to_standby() {
        let mut camera = Camera::new("porch");
        let mut harness = Harness::default();
        send(&mut camera, &mut harness, "recording").unwrap();
        send(&mut camera, &mut harness, "on").unwrap();
        assert_eq!(
            send(&mut camera, &mut harness, "take photo"),
            Err(Rejection::NotRecording)
        );
    }

    #[test]
    fn should_clear_all_photos() {
        let mut camera = Camera::new("porch");
        let mut harness = Harness::default();
        send(&mut camera, &mut harness, "recording").unwrap();
        let outcome = send(&mut camera, &mut harness, "clear photos").unwrap();
        assert_eq!(outcome.notices, vec!["All photos cleared from porch"]);
        assert!(camera.photos().is_empty());
    }
}
