//! Event lifecycle: one-off sessions and matches, recurring parent rules,
//! occurrence materialization and listing.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use db::models::event::{
    self, Column as EventColumn, Entity as EventEntity, EventType, Outcome,
};
use util::schedule::{
    expand, merge, status_for, weekday_from_name, weekday_name, Canonical, EventKey, EventStatus,
    OccurrenceKey, RecurrenceRule, TimeOfDay,
};

use crate::attendance::{self, AttendanceMark};
use crate::error::ServiceError;
use crate::metrics;

/// Parameters for creating an event row: a one-off, a recurring parent rule,
/// or a persisted occurrence of an existing rule (when `parent_id` is set).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvent {
    pub academy_id: i64,
    pub event_type: EventType,
    pub title: String,
    pub event_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub weekdays: Vec<String>,
    pub series_end_date: Option<NaiveDate>,
    pub parent_id: Option<i64>,
    pub opponent: Option<String>,
    pub venue: Option<String>,
}

/// Partial update body for `PATCH /events/{id}`.
///
/// Scores are taken as raw goals; the outcome is always re-derived
/// server-side and never accepted from the client. Attendance and metrics
/// maps fan out to their own tables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatchEvent {
    pub title: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub opponent: Option<String>,
    pub venue: Option<String>,
    pub goals_for: Option<i32>,
    pub goals_against: Option<i32>,
    pub weekdays: Option<Vec<String>>,
    pub series_end_date: Option<NaiveDate>,
    pub attendance: Option<HashMap<i64, AttendanceMark>>,
    pub metrics: Option<HashMap<i64, serde_json::Value>>,
}

/// One entry of an event listing: a stored row or a locally expanded
/// occurrence, with its display status computed against a single instant.
#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    /// Row id; `None` for an expanded occurrence that has not been persisted.
    pub id: Option<i64>,
    pub academy_id: i64,
    pub event_type: EventType,
    pub title: String,
    pub event_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub recurring: bool,
    pub weekdays: Vec<String>,
    pub series_end_date: Option<NaiveDate>,
    pub parent_id: Option<i64>,
    /// Stable composite identity `parent_id:date`, set on occurrences.
    pub occurrence_key: Option<String>,
    pub opponent: Option<String>,
    pub venue: Option<String>,
    pub goals_for: Option<i32>,
    pub goals_against: Option<i32>,
    pub outcome: Option<Outcome>,
    /// `None` on parent rules, which are schedules rather than dated events.
    pub status: Option<EventStatus>,
}

impl Canonical for EventView {
    fn key(&self) -> EventKey {
        if let Some(series_id) = self.parent_id {
            EventKey::Occurrence {
                series_id,
                date: self.event_date,
            }
        } else if self.recurring {
            // Parent rules always come from the store, so the id is present.
            EventKey::Series {
                id: self.id.unwrap_or_default(),
            }
        } else {
            EventKey::Single {
                id: self.id.unwrap_or_default(),
                date: self.event_date,
            }
        }
    }

    fn status(&self) -> Option<EventStatus> {
        self.status
    }
}

impl EventView {
    /// Builds a view of a stored row, computing status for dated rows.
    pub fn from_model(m: &event::Model, now: DateTime<Utc>) -> Result<Self, ServiceError> {
        let status = if m.recurring {
            None
        } else {
            Some(status_for(m.event_date, &m.start_time, &m.end_time, now)?)
        };
        Ok(Self {
            id: Some(m.id),
            academy_id: m.academy_id,
            event_type: m.event_type,
            title: m.title.clone(),
            event_date: m.event_date,
            start_time: m.start_time.clone(),
            end_time: m.end_time.clone(),
            recurring: m.recurring,
            weekdays: m
                .weekdays
                .as_ref()
                .map(weekday_names_from_json)
                .transpose()?
                .unwrap_or_default(),
            series_end_date: m.series_end_date,
            parent_id: m.parent_id,
            occurrence_key: m.parent_id.map(|series_id| {
                OccurrenceKey {
                    series_id,
                    date: m.event_date,
                }
                .to_string()
            }),
            opponent: m.opponent.clone(),
            venue: m.venue.clone(),
            goals_for: m.goals_for,
            goals_against: m.goals_against,
            outcome: m.outcome,
            status,
        })
    }
}

/// Derives a match outcome from recorded goals; `None` until both are known.
pub fn derive_outcome(goals_for: Option<i32>, goals_against: Option<i32>) -> Option<Outcome> {
    match (goals_for, goals_against) {
        (Some(gf), Some(ga)) if gf > ga => Some(Outcome::Win),
        (Some(gf), Some(ga)) if gf < ga => Some(Outcome::Loss),
        (Some(_), Some(_)) => Some(Outcome::Draw),
        _ => None,
    }
}

fn weekday_names_from_json(value: &serde_json::Value) -> Result<Vec<String>, ServiceError> {
    let Some(entries) = value.as_array() else {
        return Err(ServiceError::validation(
            "weekdays must be an array of weekday names",
        ));
    };
    entries
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_owned)
                .ok_or_else(|| ServiceError::validation("weekdays must be an array of weekday names"))
        })
        .collect()
}

fn weekday_set(names: &[String]) -> Result<HashSet<Weekday>, ServiceError> {
    let mut set = HashSet::new();
    for name in names {
        set.insert(weekday_from_name(name)?);
    }
    Ok(set)
}

/// Reconstructs the recurrence rule a parent row encodes.
pub fn rule_for(parent: &event::Model) -> Result<RecurrenceRule, ServiceError> {
    let names = parent
        .weekdays
        .as_ref()
        .map(weekday_names_from_json)
        .transpose()?
        .unwrap_or_default();
    Ok(RecurrenceRule {
        series_id: parent.id,
        anchor: parent.event_date,
        until: parent
            .series_end_date
            .ok_or_else(|| ServiceError::validation("recurring rule is missing its end date"))?,
        weekdays: weekday_set(&names)?,
        start: parent.start_time.parse()?,
        end: parent.end_time.parse()?,
    })
}

/// Checks that `date` is a legal occurrence date of `rule`: inside the
/// rule's inclusive range and on one of its weekdays.
fn occurrence_date_on_rule(rule: &RecurrenceRule, date: NaiveDate) -> Result<(), ServiceError> {
    if date < rule.anchor || date > rule.until {
        return Err(ServiceError::validation(
            "occurrence date is outside the rule's date range",
        ));
    }
    if !rule.weekdays.contains(&chrono::Datelike::weekday(&date)) {
        return Err(ServiceError::validation(format!(
            "occurrence date {date} does not fall on a {} of this rule",
            rule.weekdays
                .iter()
                .map(|d| weekday_name(*d))
                .collect::<Vec<_>>()
                .join("/"),
        )));
    }
    Ok(())
}

fn validate_window(start_time: &str, end_time: &str) -> Result<(TimeOfDay, TimeOfDay), ServiceError> {
    let start: TimeOfDay = start_time.parse()?;
    let end: TimeOfDay = end_time.parse()?;
    if end < start {
        // Overnight windows are not represented; see the schedule module.
        return Err(ServiceError::validation(
            "end time is before start time; overnight events are not supported",
        ));
    }
    Ok((start, end))
}

/// Creates an event row.
///
/// For a recurring rule the whole series is validated up front: the end date
/// must not precede the anchor and the expansion must be non-empty, so a rule
/// that could never produce an occurrence is rejected while the caller can
/// still fix it. For an occurrence (`parent_id` set) the date must satisfy
/// the parent's weekday filter and range, and the time window is inherited.
pub async fn create(
    db: &DatabaseConnection,
    input: CreateEvent,
    created_by: i64,
    now: DateTime<Utc>,
) -> Result<event::Model, ServiceError> {
    if let Some(parent_id) = input.parent_id {
        return materialize_occurrence(db, parent_id, &input, created_by).await;
    }

    validate_window(&input.start_time, &input.end_time)?;

    let mut weekdays_json = None;
    if input.recurring {
        let until = input.series_end_date.ok_or_else(|| {
            ServiceError::validation("recurring events require a series end date")
        })?;
        if until < input.event_date {
            return Err(ServiceError::validation(
                "series end date is before the first session date",
            ));
        }
        let rule = RecurrenceRule {
            series_id: 0,
            anchor: input.event_date,
            until,
            weekdays: weekday_set(&input.weekdays)?,
            start: input.start_time.parse()?,
            end: input.end_time.parse()?,
        };
        if expand(&rule, now).is_empty() {
            return Err(ServiceError::EmptyRecurrence);
        }
        weekdays_json = Some(serde_json::Value::from(input.weekdays.clone()));
    }

    let model = event::ActiveModel {
        academy_id: Set(input.academy_id),
        event_type: Set(input.event_type),
        title: Set(input.title.clone()),
        event_date: Set(input.event_date),
        start_time: Set(input.start_time.clone()),
        end_time: Set(input.end_time.clone()),
        recurring: Set(input.recurring),
        weekdays: Set(weekdays_json),
        series_end_date: Set(input.recurring.then(|| input.series_end_date).flatten()),
        parent_id: Set(None),
        opponent: Set(input.opponent.clone()),
        venue: Set(input.venue.clone()),
        goals_for: Set(None),
        goals_against: Set(None),
        outcome: Set(None),
        created_by: Set(created_by),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(model)
}

/// Persists one occurrence of an existing rule, enforcing the occurrence
/// invariant: the date must lie within the rule's range and match its
/// weekday filter.
async fn materialize_occurrence(
    db: &DatabaseConnection,
    parent_id: i64,
    input: &CreateEvent,
    created_by: i64,
) -> Result<event::Model, ServiceError> {
    let parent = EventEntity::find_by_id(parent_id)
        .one(db)
        .await?
        .ok_or(ServiceError::OrphanOccurrence)?;

    if !parent.recurring || parent.academy_id != input.academy_id {
        return Err(ServiceError::validation(
            "parent_id does not reference a recurring rule of this academy",
        ));
    }

    let rule = rule_for(&parent)?;
    let date = input.event_date;
    occurrence_date_on_rule(&rule, date)?;

    let now = Utc::now();
    let model = event::ActiveModel {
        academy_id: Set(parent.academy_id),
        event_type: Set(parent.event_type),
        title: Set(parent.title.clone()),
        event_date: Set(date),
        // Occurrences inherit the parent's window.
        start_time: Set(parent.start_time.clone()),
        end_time: Set(parent.end_time.clone()),
        recurring: Set(false),
        weekdays: Set(None),
        series_end_date: Set(None),
        parent_id: Set(Some(parent.id)),
        opponent: Set(None),
        venue: Set(parent.venue.clone()),
        goals_for: Set(None),
        goals_against: Set(None),
        outcome: Set(None),
        created_by: Set(created_by),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(model)
}

/// Lists an academy's events with computed statuses, deduplicated.
pub async fn list(
    db: &DatabaseConnection,
    academy_id: i64,
    event_type: Option<EventType>,
    now: DateTime<Utc>,
) -> Result<Vec<EventView>, ServiceError> {
    let mut query = EventEntity::find().filter(EventColumn::AcademyId.eq(academy_id));
    if let Some(kind) = event_type {
        query = query.filter(EventColumn::EventType.eq(kind));
    }
    let rows = query
        .order_by_asc(EventColumn::EventDate)
        .order_by_asc(EventColumn::Id)
        .all(db)
        .await?;

    let views = rows
        .iter()
        .map(|m| EventView::from_model(m, now))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(merge(views))
}

/// Lists the occurrences of one rule: persisted rows merged with a fresh
/// local expansion, so dates that were never materialized still appear.
///
/// A dangling `parent_id` is an orphan reference and is reported as such
/// rather than silently returning nothing.
pub async fn occurrences(
    db: &DatabaseConnection,
    parent_id: i64,
    academy_id: i64,
    now: DateTime<Utc>,
) -> Result<Vec<EventView>, ServiceError> {
    let Some(parent) = EventEntity::find_by_id(parent_id)
        .one(db)
        .await?
        .filter(|p| p.academy_id == academy_id)
    else {
        tracing::warn!(parent_id, academy_id, "occurrence query for a missing parent rule");
        return Err(ServiceError::OrphanOccurrence);
    };
    if !parent.recurring {
        return Err(ServiceError::validation("event is not a recurring rule"));
    }

    let persisted = EventEntity::find()
        .filter(EventColumn::ParentId.eq(parent.id))
        .order_by_asc(EventColumn::EventDate)
        .all(db)
        .await?;
    let mut views = persisted
        .iter()
        .map(|m| EventView::from_model(m, now))
        .collect::<Result<Vec<_>, _>>()?;

    let rule = rule_for(&parent)?;
    for occ in expand(&rule, now) {
        views.push(EventView {
            id: None,
            academy_id: parent.academy_id,
            event_type: parent.event_type,
            title: parent.title.clone(),
            event_date: occ.key.date,
            start_time: occ.start.to_string(),
            end_time: occ.end.to_string(),
            recurring: false,
            weekdays: Vec::new(),
            series_end_date: None,
            parent_id: Some(parent.id),
            occurrence_key: Some(occ.key.to_string()),
            opponent: None,
            venue: parent.venue.clone(),
            goals_for: None,
            goals_against: None,
            outcome: None,
            status: Some(occ.status),
        });
    }

    let mut merged = merge(views);
    merged.sort_by_key(|v| v.event_date);
    Ok(merged)
}

/// Fetches one event scoped to an academy.
pub async fn get(
    db: &DatabaseConnection,
    event_id: i64,
    academy_id: i64,
) -> Result<event::Model, ServiceError> {
    EventEntity::find_by_id(event_id)
        .one(db)
        .await?
        .filter(|e| e.academy_id == academy_id)
        .ok_or(ServiceError::NotFound("event"))
}

/// Applies a partial update and returns the refreshed view.
///
/// Attendance and metrics maps are fanned out to their per-player tables;
/// both are rejected on parent rules, which are schedules and have no
/// attendees of their own.
pub async fn patch(
    db: &DatabaseConnection,
    event_id: i64,
    actor_id: i64,
    input: PatchEvent,
    now: DateTime<Utc>,
) -> Result<EventView, ServiceError> {
    let existing = EventEntity::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("event"))?;

    let start_time = input
        .start_time
        .clone()
        .unwrap_or_else(|| existing.start_time.clone());
    let end_time = input
        .end_time
        .clone()
        .unwrap_or_else(|| existing.end_time.clone());
    validate_window(&start_time, &end_time)?;

    if !existing.recurring && (input.weekdays.is_some() || input.series_end_date.is_some()) {
        return Err(ServiceError::validation(
            "weekdays and series_end_date only apply to recurring rules",
        ));
    }
    if existing.recurring && (input.attendance.is_some() || input.metrics.is_some()) {
        return Err(ServiceError::validation(
            "attendance and metrics are tracked per occurrence, not on the rule",
        ));
    }

    // Moving a persisted occurrence keeps it on its rule's grid: the new
    // date must satisfy the same range and weekday checks as creation.
    if let (Some(parent_id), Some(date)) = (existing.parent_id, input.event_date) {
        let parent = EventEntity::find_by_id(parent_id)
            .one(db)
            .await?
            .ok_or(ServiceError::OrphanOccurrence)?;
        let rule = rule_for(&parent)?;
        occurrence_date_on_rule(&rule, date)?;
    }

    let goals_for = input.goals_for.or(existing.goals_for);
    let goals_against = input.goals_against.or(existing.goals_against);

    let mut active: event::ActiveModel = existing.clone().into();
    if let Some(title) = input.title {
        active.title = Set(title);
    }
    if let Some(date) = input.event_date {
        active.event_date = Set(date);
    }
    active.start_time = Set(start_time);
    active.end_time = Set(end_time);
    if let Some(opponent) = input.opponent {
        active.opponent = Set(Some(opponent));
    }
    if let Some(venue) = input.venue {
        active.venue = Set(Some(venue));
    }
    if let Some(weekdays) = &input.weekdays {
        weekday_set(weekdays)?;
        active.weekdays = Set(Some(serde_json::Value::from(weekdays.clone())));
    }
    if let Some(until) = input.series_end_date {
        let anchor = input.event_date.unwrap_or(existing.event_date);
        if until < anchor {
            return Err(ServiceError::validation(
                "series end date is before the first session date",
            ));
        }
        active.series_end_date = Set(Some(until));
    }
    active.goals_for = Set(goals_for);
    active.goals_against = Set(goals_against);
    active.outcome = Set(derive_outcome(goals_for, goals_against));
    active.updated_at = Set(now);

    let updated = active.update(db).await?;

    if let Some(map) = &input.attendance {
        attendance::apply_map(db, &updated, map, actor_id, now).await?;
    }
    if let Some(map) = &input.metrics {
        metrics::apply_map(db, &updated, map, now).await?;
    }

    EventView::from_model(&updated, now)
}

/// Deletes an event; deleting a parent rule removes its persisted
/// occurrences as well.
pub async fn delete(db: &DatabaseConnection, event_id: i64, academy_id: i64) -> Result<(), ServiceError> {
    // Scope check before any destructive statement.
    get(db, event_id, academy_id).await?;

    EventEntity::delete_many()
        .filter(EventColumn::ParentId.eq(event_id))
        .exec(db)
        .await?;
    EventEntity::delete_by_id(event_id).exec(db).await?;
    Ok(())
}
