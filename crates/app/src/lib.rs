//! # homesim-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters implement:
//!   - `SmartDevice`: one simulated appliance's state machine
//!   - `DeviceFactory`: create a device from its kind and name
//!   - `Observer`: receive textual notifications
//!   - `Scheduler`: run cancellable delayed and repeating callbacks
//! - Define the **driving port** as a use-case struct:
//!   - `HomeService`: add, remove, change state, subscribe, tick
//! - Provide **in-process infrastructure** that doesn't need IO
//!   (observer registry, tokio-backed scheduler)
//!
//! ## Dependency rule
//! Depends on `homesim-domain` only (plus `tokio` for timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod error;
pub mod observer_registry;
pub mod ports;
pub mod scheduler;
pub mod services;
