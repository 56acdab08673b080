//! Attendance fan-out for one event's per-player tri-state map.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use db::models::attendance_record::{
    self, AttendanceStatus, Column as RecordColumn, Entity as RecordEntity,
};
use db::models::event;
use db::models::player::{Column as PlayerColumn, Entity as PlayerEntity};

use crate::error::ServiceError;

/// Tri-state wire value for one player in an attendance map. `Unmarked`
/// deletes the record, restoring the "no row" convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceMark {
    Present,
    Absent,
    Unmarked,
}

impl AttendanceMark {
    fn as_status(self) -> Option<AttendanceStatus> {
        match self {
            AttendanceMark::Present => Some(AttendanceStatus::Present),
            AttendanceMark::Absent => Some(AttendanceStatus::Absent),
            AttendanceMark::Unmarked => None,
        }
    }
}

/// Applies an attendance map to one event.
///
/// Every player key is validated against the event's academy; an unknown or
/// foreign participant id fails the whole patch rather than being silently
/// dropped.
pub async fn apply_map(
    db: &DatabaseConnection,
    event: &event::Model,
    map: &HashMap<i64, AttendanceMark>,
    marked_by: i64,
    now: DateTime<Utc>,
) -> Result<(), ServiceError> {
    for (&player_id, &mark) in map {
        let known = PlayerEntity::find_by_id(player_id)
            .filter(PlayerColumn::AcademyId.eq(event.academy_id))
            .one(db)
            .await?
            .is_some();
        if !known {
            return Err(ServiceError::validation(format!(
                "player {player_id} is not registered in this academy"
            )));
        }

        match mark.as_status() {
            Some(status) => upsert(db, event.id, player_id, status, marked_by, now).await?,
            None => {
                RecordEntity::delete_by_id((event.id, player_id))
                    .exec(db)
                    .await?;
            }
        }
    }
    Ok(())
}

async fn upsert(
    db: &DatabaseConnection,
    event_id: i64,
    player_id: i64,
    status: AttendanceStatus,
    marked_by: i64,
    now: DateTime<Utc>,
) -> Result<(), ServiceError> {
    match RecordEntity::find_by_id((event_id, player_id)).one(db).await? {
        Some(existing) => {
            let mut active: attendance_record::ActiveModel = existing.into();
            active.status = Set(status);
            active.marked_at = Set(now);
            active.marked_by = Set(marked_by);
            active.update(db).await?;
        }
        None => {
            attendance_record::ActiveModel {
                event_id: Set(event_id),
                player_id: Set(player_id),
                status: Set(status),
                marked_at: Set(now),
                marked_by: Set(marked_by),
            }
            .insert(db)
            .await?;
        }
    }
    Ok(())
}

/// All marks recorded for one event, keyed by player id. Players without a
/// row are unmarked by convention and simply absent from the map.
pub async fn for_event(
    db: &DatabaseConnection,
    event_id: i64,
) -> Result<HashMap<i64, attendance_record::Model>, ServiceError> {
    let rows = RecordEntity::find()
        .filter(RecordColumn::EventId.eq(event_id))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| (r.player_id, r)).collect())
}
