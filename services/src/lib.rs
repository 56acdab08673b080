pub mod attendance;
pub mod error;
pub mod event;
pub mod metrics;

pub use error::ServiceError;
