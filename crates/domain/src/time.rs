//! Time and timestamp helpers.

use chrono::{DateTime, FixedOffset, Local, Offset, Utc};

/// UTC timestamp used for energy accounting, history entries, capture names, etc.
pub type Timestamp = DateTime<Utc>;

/// Wall-clock time in the home's time zone, used for time-of-day heuristics.
pub type LocalTime = DateTime<FixedOffset>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// The UTC offset of the machine running the simulation.
#[must_use]
pub fn local_offset() -> FixedOffset {
    Local::now().offset().fix()
}
