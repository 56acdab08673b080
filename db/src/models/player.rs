use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

/// Represents a registered player (participant) in the `players` table.
///
/// Players are managed entities, not login users: attendance and metrics key
/// on player id, while the staff member who marked them keys on user id.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "players")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub academy_id: i64,
    pub full_name: String,
    /// Age group or squad label, e.g. "U15".
    pub squad: Option<String>,
    pub position: Option<String>,
    pub jersey_number: Option<i32>,
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
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    AttendanceRecords,
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

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        academy_id: i64,
        full_name: &str,
        squad: Option<&str>,
        position: Option<&str>,
        jersey_number: Option<i32>,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        ActiveModel {
            academy_id: Set(academy_id),
            full_name: Set(full_name.to_owned()),
            squad: Set(squad.map(|s| s.to_owned())),
            position: Set(position.map(|s| s.to_owned())),
            jersey_number: Set(jersey_number),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }
}
