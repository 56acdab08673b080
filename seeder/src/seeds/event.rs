use crate::seed::Seeder;
use chrono::{Datelike, Duration, Utc};
use db::models::academy::Entity as AcademyEntity;
use db::models::event::EventType;
use db::models::user::{Column as UserColumn, Entity as UserEntity};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use services::event::{self, CreateEvent};
use util::schedule::weekday_name;

pub struct EventSeeder;

#[async_trait::async_trait]
impl Seeder for EventSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        let now = Utc::now();
        let today = now.date_naive();
        let coach = UserEntity::find()
            .filter(UserColumn::Username.eq("coach"))
            .one(db)
            .await
            .expect("Failed to look up coach")
            .expect("User seeder must run first");
        let academies = AcademyEntity::find()
            .all(db)
            .await
            .expect("Failed to list academies");

        for academy in &academies {
            // One-off match next week.
            let match_date = today + Duration::days(7);
            event::create(
                db,
                CreateEvent {
                    academy_id: academy.id,
                    event_type: EventType::Match,
                    title: "League fixture".into(),
                    event_date: match_date,
                    start_time: "14:00".into(),
                    end_time: "15:30".into(),
                    recurring: false,
                    weekdays: Vec::new(),
                    series_end_date: None,
                    parent_id: None,
                    opponent: Some("Hillcrest Rovers".into()),
                    venue: Some("Main pitch".into()),
                },
                coach.id,
                now,
            )
            .await
            .expect("Failed to seed match");

            // Recurring training anchored today, twice a week for six weeks.
            let anchor_day = weekday_name(today.weekday()).to_string();
            let second_day = weekday_name(today.weekday().succ().succ()).to_string();
            event::create(
                db,
                CreateEvent {
                    academy_id: academy.id,
                    event_type: EventType::Training,
                    title: "Squad training".into(),
                    event_date: today,
                    start_time: "17:00".into(),
                    end_time: "18:30".into(),
                    recurring: true,
                    weekdays: vec![anchor_day, second_day],
                    series_end_date: Some(today + Duration::weeks(6)),
                    parent_id: None,
                    opponent: None,
                    venue: Some("Training ground".into()),
                },
                coach.id,
                now,
            )
            .await
            .expect("Failed to seed training rule");
        }
    }
}
