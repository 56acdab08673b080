pub mod m202601150001_create_users;
pub mod m202601150002_create_academies;
pub mod m202601150003_create_academy_roles;
pub mod m202601150004_create_players;
pub mod m202601150005_create_events;
pub mod m202601150006_create_attendance_records;
pub mod m202601150007_create_player_metrics;
