use crate::seed::Seeder;
use db::models::academy::Entity as AcademyEntity;
use db::models::player::Model;
use fake::{faker::name::en::Name, Fake};
use sea_orm::{DatabaseConnection, EntityTrait};

pub struct PlayerSeeder;

const SQUADS: [&str; 3] = ["U13", "U15", "U17"];
const POSITIONS: [&str; 4] = ["Goalkeeper", "Defence", "Midfield", "Forward"];

#[async_trait::async_trait]
impl Seeder for PlayerSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        let academies = AcademyEntity::find()
            .all(db)
            .await
            .expect("Failed to list academies");

        for academy in &academies {
            for jersey in 1..=11 {
                let full_name: String = Name().fake();
                let squad = SQUADS[fastrand::usize(..SQUADS.len())];
                let position = POSITIONS[fastrand::usize(..POSITIONS.len())];
                let _ = Model::create(
                    db,
                    academy.id,
                    &full_name,
                    Some(squad),
                    Some(position),
                    Some(jersey),
                )
                .await;
            }
        }
    }
}
