use migration::{Migrator, MigratorTrait};

use crate::seed::{run_seeder, Seeder};
use crate::seeds::{
    academy::AcademySeeder, event::EventSeeder, player::PlayerSeeder, user::UserSeeder,
};

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    let db = db::connect().await;
    Migrator::up(&db, None).await.expect("Migrations failed");

    for (seeder, name) in [
        (Box::new(UserSeeder) as Box<dyn Seeder + Send + Sync>, "User"),
        (Box::new(AcademySeeder), "Academy"),
        (Box::new(PlayerSeeder), "Player"),
        (Box::new(EventSeeder), "Event"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }
}
