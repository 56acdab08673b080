use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;

/// Kind of dated event the store holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, serde::Serialize, serde::Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[sea_orm(string_value = "training")]
    Training,
    #[sea_orm(string_value = "match")]
    Match,
}

/// Match outcome from the academy's perspective, derived server-side from
/// the recorded goals. Never accepted from clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, serde::Serialize, serde::Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[sea_orm(string_value = "win")]
    Win,
    #[sea_orm(string_value = "loss")]
    Loss,
    #[sea_orm(string_value = "draw")]
    Draw,
}

/// Represents one row of the `events` table.
///
/// The table holds four shapes of row:
/// - one-off trainings and matches (`recurring = false`, `parent_id = None`);
/// - recurring parent rules (`recurring = true`) whose `event_date` is the
///   anchor and whose `weekdays`/`series_end_date` define the series;
/// - persisted occurrences (`parent_id = Some`), one per materialized date,
///   unique on `(parent_id, event_date)`;
/// - never both: a parent rule is not itself an attendable event.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub academy_id: i64,
    pub event_type: EventType,
    pub title: String,
    /// Concrete date for one-offs and occurrences; anchor date for rules.
    pub event_date: NaiveDate,
    /// Clock times as `HH:MM`; both on the same calendar day.
    pub start_time: String,
    pub end_time: String,
    pub recurring: bool,
    /// Lowercase weekday names as a JSON array; only set on parent rules.
    pub weekdays: Option<Json>,
    /// Last date of the series, inclusive; only set on parent rules.
    pub series_end_date: Option<NaiveDate>,
    /// Back-reference from a persisted occurrence to its parent rule.
    pub parent_id: Option<i64>,
    pub opponent: Option<String>,
    pub venue: Option<String>,
    pub goals_for: Option<i32>,
    pub goals_against: Option<i32>,
    pub outcome: Option<Outcome>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::academy::Entity",
        from = "Column::AcademyId",
        to = "super::academy::Column::Id"
    )]
    Academy,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    Creator,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id"
    )]
    Parent,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    AttendanceRecords,
    #[sea_orm(has_many = "super::player_metric::Entity")]
    PlayerMetrics,
}

impl Related<super::academy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Academy.def()
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceRecords.def()
    }
}

impl Related<super::player_metric::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlayerMetrics.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
