use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};

use super::status::{status_at, EventStatus};
use super::{ScheduleError, TimeOfDay};

/// A repeating schedule: a time window repeated on a set of weekdays between
/// an anchor date and an end date, both inclusive.
#[derive(Debug, Clone)]
pub struct RecurrenceRule {
    /// Id of the parent event this series belongs to.
    pub series_id: i64,
    /// First possible occurrence date. Not special-cased: it is only emitted
    /// if its weekday is in the set.
    pub anchor: NaiveDate,
    /// Last possible occurrence date, inclusive.
    pub until: NaiveDate,
    pub weekdays: HashSet<Weekday>,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// Deterministic identity of one occurrence: the parent series and the
/// calendar date. Stable across repeated expansions, unlike a wall-clock
/// generated id, so repeated fetch/generate cycles dedupe cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OccurrenceKey {
    pub series_id: i64,
    pub date: NaiveDate,
}

impl fmt::Display for OccurrenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.series_id, self.date)
    }
}

/// One concrete dated instance materialized from a [`RecurrenceRule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub key: OccurrenceKey,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub status: EventStatus,
}

/// Expands a rule into every matching occurrence, in ascending date order.
///
/// `now` is snapshotted once by the caller and used for every emitted status,
/// so a single expansion is internally consistent. The function is pure and
/// idempotent: two calls with the same arguments yield identical occurrences.
///
/// A rule whose weekday set matches no date in `[anchor, until]` (including
/// an empty set, or `until` before `anchor`) expands to an empty vec rather
/// than an error.
pub fn expand(rule: &RecurrenceRule, now: DateTime<Utc>) -> Vec<Occurrence> {
    let mut out = Vec::new();
    let mut day = rule.anchor;
    while day <= rule.until {
        if rule.weekdays.contains(&day.weekday()) {
            out.push(Occurrence {
                key: OccurrenceKey {
                    series_id: rule.series_id,
                    date: day,
                },
                start: rule.start,
                end: rule.end,
                status: status_at(day, rule.start, rule.end, now),
            });
        }
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    out
}

/// Parses the lowercase weekday names the store keeps on parent events.
pub fn weekday_from_name(name: &str) -> Result<Weekday, ScheduleError> {
    name.parse::<Weekday>()
        .map_err(|_| ScheduleError::UnknownWeekday(name.to_string()))
}

/// The store's canonical lowercase name for a weekday.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn rule(anchor: (i32, u32, u32), until: (i32, u32, u32), days: &[Weekday]) -> RecurrenceRule {
        RecurrenceRule {
            series_id: 7,
            anchor: NaiveDate::from_ymd_opt(anchor.0, anchor.1, anchor.2).unwrap(),
            until: NaiveDate::from_ymd_opt(until.0, until.1, until.2).unwrap(),
            weekdays: days.iter().copied().collect(),
            start: "10:00".parse().unwrap(),
            end: "11:00".parse().unwrap(),
        }
    }

    #[test]
    fn emits_exactly_the_matching_dates() {
        // 2024-01-01 is a Monday.
        let r = rule((2024, 1, 1), (2024, 1, 14), &[Weekday::Mon, Weekday::Wed]);
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();

        let occ = expand(&r, now);
        let dates: Vec<String> = occ.iter().map(|o| o.key.date.to_string()).collect();
        assert_eq!(
            dates,
            vec!["2024-01-01", "2024-01-03", "2024-01-08", "2024-01-10"]
        );
    }

    #[test]
    fn statuses_share_one_now_snapshot() {
        let r = rule((2024, 1, 1), (2024, 1, 14), &[Weekday::Mon, Weekday::Wed]);
        // Mid-window on the second Monday.
        let now = Utc.with_ymd_and_hms(2024, 1, 8, 10, 30, 0).unwrap();

        let statuses: Vec<EventStatus> = expand(&r, now).into_iter().map(|o| o.status).collect();
        assert_eq!(
            statuses,
            vec![
                EventStatus::Finished,
                EventStatus::Finished,
                EventStatus::Ongoing,
                EventStatus::Upcoming,
            ]
        );
    }

    #[test]
    fn expansion_is_idempotent() {
        let r = rule((2024, 1, 1), (2024, 3, 31), &[Weekday::Tue, Weekday::Sat]);
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();

        let first: Vec<OccurrenceKey> = expand(&r, now).into_iter().map(|o| o.key).collect();
        let second: Vec<OccurrenceKey> = expand(&r, now).into_iter().map(|o| o.key).collect();
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0] < w[1]), "ascending and unique");
    }

    #[test]
    fn empty_weekday_set_expands_to_nothing() {
        let r = rule((2024, 1, 1), (2024, 12, 31), &[]);
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(expand(&r, now).is_empty());
    }

    #[test]
    fn inverted_range_expands_to_nothing() {
        let r = rule((2024, 2, 1), (2024, 1, 1), &[Weekday::Mon]);
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(expand(&r, now).is_empty());
    }

    #[test]
    fn anchor_is_not_special_cased() {
        // Anchor is a Monday but only Fridays are selected.
        let r = rule((2024, 1, 1), (2024, 1, 7), &[Weekday::Fri]);
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let occ = expand(&r, now);
        assert_eq!(occ.len(), 1);
        assert_eq!(occ[0].key.date.to_string(), "2024-01-05");
    }

    #[test]
    fn weekday_names_round_trip() {
        for day in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            assert_eq!(weekday_from_name(weekday_name(day)).unwrap(), day);
        }
        assert!(weekday_from_name("someday").is_err());
    }
}
