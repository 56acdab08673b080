use crate::seed::Seeder;
use db::models::academy;
use db::models::academy_role::{self, Role};
use db::models::user::{Column as UserColumn, Entity as UserEntity};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

pub struct AcademySeeder;

#[async_trait::async_trait]
impl Seeder for AcademySeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        let northside = academy::Model::create(db, "Northside FC", "northside")
            .await
            .expect("Failed to seed academy");
        let _ = academy::Model::create(db, "Riverside United", "riverside").await;

        // The fixed coach runs Northside.
        let coach = UserEntity::find()
            .filter(UserColumn::Username.eq("coach"))
            .one(db)
            .await
            .expect("Failed to look up coach")
            .expect("User seeder must run first");
        let _ = academy_role::Model::assign(db, coach.id, northside.id, Role::Coach).await;
    }
}
