//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod device;
pub mod observer;
pub mod scheduler;

pub use device::{DeviceFactory, SmartDevice};
pub use observer::Observer;
pub use scheduler::{Scheduler, TimerCallback};
