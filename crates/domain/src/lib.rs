//! # homesim-domain
//!
//! Pure domain model for the homesim smart-home simulator.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Devices** (kinds, snapshots, typed attributes)
//! - Define **Commands** (one tagged enum per device kind, parsed from the
//!   free-form state strings the presentation layer sends)
//! - Define **Rejections** (advisory, user-visible reasons a command was refused)
//! - Define **Outcomes** and **Timers** (what an accepted command asks the
//!   application layer to notify and schedule)
//! - Contain the **voice interpreter** (intent/entity extraction, confidence
//!   scoring, conversation context, response templates)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! Scheduling and notification delivery are expressed as traits in the `app`
//! crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod command;
pub mod context;
pub mod device;
pub mod outcome;
pub mod timer;
pub mod voice;
