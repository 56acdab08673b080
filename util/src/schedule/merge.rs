use std::collections::HashMap;

use chrono::NaiveDate;

use super::status::EventStatus;

/// Identity of an entry in a mixed event fetch.
///
/// - one-off events are unique per `(id, date)`;
/// - a recurring parent rule is a singleton per `id`;
/// - an occurrence is unique per `(series id, date)`, whether it came from
///   the store or from a local expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKey {
    Single { id: i64, date: NaiveDate },
    Series { id: i64 },
    Occurrence { series_id: i64, date: NaiveDate },
}

/// Anything that can participate in canonical merging.
pub trait Canonical {
    fn key(&self) -> EventKey;
    /// Computed status, where one applies. Parent rules have none.
    fn status(&self) -> Option<EventStatus>;
}

/// Collapses a mixed sequence to at most one entry per key, preserving
/// first-seen order.
///
/// When two occurrences collide on a key, the one with the more final status
/// replaces the earlier entry in place: a later fetch that observed a more
/// advanced state wins over a stale one. Non-occurrence duplicates keep the
/// first entry.
pub fn merge<T: Canonical>(items: Vec<T>) -> Vec<T> {
    let mut seen: HashMap<EventKey, usize> = HashMap::new();
    let mut out: Vec<T> = Vec::with_capacity(items.len());

    for item in items {
        let key = item.key();
        match seen.get(&key) {
            None => {
                seen.insert(key, out.len());
                out.push(item);
            }
            Some(&at) => {
                if matches!(key, EventKey::Occurrence { .. }) && item.status() > out[at].status() {
                    out[at] = item;
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        key: EventKey,
        status: Option<EventStatus>,
        tag: &'static str,
    }

    impl Canonical for Entry {
        fn key(&self) -> EventKey {
            self.key
        }
        fn status(&self) -> Option<EventStatus> {
            self.status
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn occurrence_conflict_prefers_more_final_status() {
        let key = EventKey::Occurrence {
            series_id: 1,
            date: date(8),
        };
        let merged = merge(vec![
            Entry {
                key,
                status: Some(EventStatus::Upcoming),
                tag: "stale",
            },
            Entry {
                key,
                status: Some(EventStatus::Finished),
                tag: "fresh",
            },
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].tag, "fresh");
        assert_eq!(merged[0].status, Some(EventStatus::Finished));
    }

    #[test]
    fn occurrence_conflict_keeps_first_on_equal_status() {
        let key = EventKey::Occurrence {
            series_id: 1,
            date: date(8),
        };
        let merged = merge(vec![
            Entry {
                key,
                status: Some(EventStatus::Ongoing),
                tag: "persisted",
            },
            Entry {
                key,
                status: Some(EventStatus::Ongoing),
                tag: "expanded",
            },
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].tag, "persisted");
    }

    #[test]
    fn series_is_a_singleton_and_singles_key_on_date() {
        let merged = merge(vec![
            Entry {
                key: EventKey::Series { id: 3 },
                status: None,
                tag: "rule-a",
            },
            Entry {
                key: EventKey::Series { id: 3 },
                status: None,
                tag: "rule-b",
            },
            Entry {
                key: EventKey::Single { id: 9, date: date(2) },
                status: Some(EventStatus::Upcoming),
                tag: "match-day-2",
            },
            Entry {
                key: EventKey::Single { id: 9, date: date(3) },
                status: Some(EventStatus::Upcoming),
                tag: "match-day-3",
            },
        ]);
        let tags: Vec<_> = merged.iter().map(|e| e.tag).collect();
        assert_eq!(tags, vec!["rule-a", "match-day-2", "match-day-3"]);
    }

    #[test]
    fn first_seen_order_is_preserved() {
        let merged = merge(vec![
            Entry {
                key: EventKey::Single { id: 1, date: date(1) },
                status: Some(EventStatus::Finished),
                tag: "first",
            },
            Entry {
                key: EventKey::Occurrence {
                    series_id: 2,
                    date: date(1),
                },
                status: Some(EventStatus::Upcoming),
                tag: "second",
            },
            Entry {
                key: EventKey::Single { id: 1, date: date(1) },
                status: Some(EventStatus::Finished),
                tag: "dup",
            },
        ]);
        let tags: Vec<_> = merged.iter().map(|e| e.tag).collect();
        assert_eq!(tags, vec!["first", "second"]);
    }
}
