//! Per-player performance metrics for one event.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use db::models::event;
use db::models::player::{Column as PlayerColumn, Entity as PlayerEntity};
use db::models::player_metric::{self, Column as MetricColumn, Entity as MetricEntity};

use crate::error::ServiceError;

/// Applies a metrics map to one event, replacing each player's document.
///
/// Metrics are free-form JSON objects; the only validation is that every
/// player belongs to the event's academy.
pub async fn apply_map(
    db: &DatabaseConnection,
    event: &event::Model,
    map: &HashMap<i64, serde_json::Value>,
    now: DateTime<Utc>,
) -> Result<(), ServiceError> {
    for (&player_id, document) in map {
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

        match MetricEntity::find_by_id((event.id, player_id)).one(db).await? {
            Some(existing) => {
                let mut active: player_metric::ActiveModel = existing.into();
                active.metrics = Set(document.clone());
                active.updated_at = Set(now);
                active.update(db).await?;
            }
            None => {
                player_metric::ActiveModel {
                    event_id: Set(event.id),
                    player_id: Set(player_id),
                    metrics: Set(document.clone()),
                    updated_at: Set(now),
                }
                .insert(db)
                .await?;
            }
        }
    }
    Ok(())
}

/// All metric documents recorded for one event, keyed by player id.
pub async fn for_event(
    db: &DatabaseConnection,
    event_id: i64,
) -> Result<HashMap<i64, player_metric::Model>, ServiceError> {
    let rows = MetricEntity::find()
        .filter(MetricColumn::EventId.eq(event_id))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| (r.player_id, r)).collect())
}
