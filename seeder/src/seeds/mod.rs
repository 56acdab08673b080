pub mod academy;
pub mod event;
pub mod player;
pub mod user;
