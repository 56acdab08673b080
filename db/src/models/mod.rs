pub mod academy;
pub mod academy_role;
pub mod attendance_record;
pub mod event;
pub mod player;
pub mod player_metric;
pub mod user;

pub use academy::Entity as Academy;
pub use academy_role::Entity as AcademyRole;
pub use attendance_record::Entity as AttendanceRecord;
pub use event::Entity as Event;
pub use player::Entity as Player;
pub use player_metric::Entity as PlayerMetric;
pub use user::Entity as User;
