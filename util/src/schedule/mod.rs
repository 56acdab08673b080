//! Scheduling core: time-of-day windows, event status derivation, recurring
//! series expansion and canonical merging of mixed event fetches.
//!
//! Everything in this module is pure: callers pass the current instant in,
//! nothing here reads the clock.

mod clock;
mod merge;
mod recurrence;
mod status;

pub use clock::TimeOfDay;
pub use merge::{merge, Canonical, EventKey};
pub use recurrence::{
    expand, weekday_from_name, weekday_name, Occurrence, OccurrenceKey, RecurrenceRule,
};
pub use status::{status_at, status_for, EventStatus};

/// Errors raised by the scheduling core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// A clock-time string was not of the form `HH:MM`.
    #[error("invalid time format: expected HH:MM, got `{0}`")]
    InvalidTimeFormat(String),
    /// A weekday name was not recognised.
    #[error("unknown weekday name `{0}`")]
    UnknownWeekday(String),
}
