use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use super::ScheduleError;

/// A wall-clock time of day, parsed from the `HH:MM` strings the store keeps
/// on events.
///
/// Malformed input fails loudly with [`ScheduleError::InvalidTimeFormat`]
/// instead of silently miscomputing a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Anchors this clock time onto a calendar date, producing a UTC instant.
    ///
    /// Start and end of a window are always anchored on the *same* date;
    /// overnight windows (end before start) are not supported.
    pub fn on(self, date: NaiveDate) -> DateTime<Utc> {
        date.and_time(self.0).and_utc()
    }

    pub fn as_naive(self) -> NaiveTime {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s, "%H:%M")
            .map(TimeOfDay)
            .map_err(|_| ScheduleError::InvalidTimeFormat(s.to_string()))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}
