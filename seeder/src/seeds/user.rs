use crate::seed::Seeder;
use db::models::user::Model;
use fake::{faker::internet::en::SafeEmail, Fake};
use sea_orm::DatabaseConnection;

pub struct UserSeeder;

#[async_trait::async_trait]
impl Seeder for UserSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        // Fixed admin user
        let _ = Model::create(db, "admin", "admin@example.com", "password123", true).await;

        // Fixed coach user, granted a role by the academy seeder
        let _ = Model::create(db, "coach", "coach@example.com", "password123", false).await;

        // Random users without any academy role
        for i in 0..5 {
            let username = format!("user{:04}", fastrand::u32(..10_000) + i);
            let email: String = SafeEmail().fake();
            let _ = Model::create(db, &username, &email, "password123", false).await;
        }
    }
}
