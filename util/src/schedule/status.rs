use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{ScheduleError, TimeOfDay};

/// Display state of a dated event relative to some instant.
///
/// The derived `Ord` ranks statuses by finality: `Upcoming < Ongoing <
/// Finished`. Merging duplicate occurrences relies on this to let a more
/// advanced observation win over a stale one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum EventStatus {
    Upcoming,
    #[serde(rename = "On-going")]
    Ongoing,
    Finished,
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventStatus::Upcoming => "Upcoming",
            EventStatus::Ongoing => "On-going",
            EventStatus::Finished => "Finished",
        };
        write!(f, "{s}")
    }
}

/// Derives the status of an event on `date` running from `start` to `end`,
/// as observed at `now`.
///
/// Start and end are anchored on the same calendar day; the window is closed
/// on both sides, so `now == start` and `now == end` both count as on-going.
pub fn status_at(
    date: NaiveDate,
    start: TimeOfDay,
    end: TimeOfDay,
    now: DateTime<Utc>,
) -> EventStatus {
    if now < start.on(date) {
        EventStatus::Upcoming
    } else if now <= end.on(date) {
        EventStatus::Ongoing
    } else {
        EventStatus::Finished
    }
}

/// Convenience over [`status_at`] for callers holding raw `HH:MM` strings.
pub fn status_for(
    date: NaiveDate,
    start: &str,
    end: &str,
    now: DateTime<Utc>,
) -> Result<EventStatus, ScheduleError> {
    Ok(status_at(date, start.parse()?, end.parse()?, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn window_boundaries_are_inclusive() {
        let start: TimeOfDay = "10:00".parse().unwrap();
        let end: TimeOfDay = "11:30".parse().unwrap();

        let at = |h, m| Utc.with_ymd_and_hms(2024, 6, 1, h, m, 0).unwrap();

        assert_eq!(status_at(day(), start, end, at(9, 59)), EventStatus::Upcoming);
        assert_eq!(status_at(day(), start, end, at(10, 0)), EventStatus::Ongoing);
        assert_eq!(status_at(day(), start, end, at(11, 30)), EventStatus::Ongoing);
        assert_eq!(status_at(day(), start, end, at(11, 31)), EventStatus::Finished);
    }

    #[test]
    fn status_is_monotone_in_now() {
        let start: TimeOfDay = "08:15".parse().unwrap();
        let end: TimeOfDay = "09:45".parse().unwrap();

        let mut previous = EventStatus::Upcoming;
        let mut now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let end_of_day = Utc.with_ymd_and_hms(2024, 6, 1, 23, 59, 0).unwrap();

        while now <= end_of_day {
            let s = status_at(day(), start, end, now);
            assert!(s >= previous, "status went backwards at {now}");
            previous = s;
            now += chrono::Duration::minutes(1);
        }
        assert_eq!(previous, EventStatus::Finished);
    }

    #[test]
    fn finality_order() {
        assert!(EventStatus::Finished > EventStatus::Ongoing);
        assert!(EventStatus::Ongoing > EventStatus::Upcoming);
    }

    #[test]
    fn status_for_rejects_malformed_clock() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert!(matches!(
            status_for(day(), "1000", "11:00", now),
            Err(ScheduleError::InvalidTimeFormat(_))
        ));
    }
}
