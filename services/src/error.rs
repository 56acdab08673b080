use sea_orm::DbErr;
use util::schedule::ScheduleError;

/// Failure modes of the service layer.
///
/// Everything here is recoverable: the API layer maps variants onto HTTP
/// statuses and a `success: false` envelope; nothing on a request path
/// panics.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// A recurring rule whose weekday set matches no date in its range.
    /// Raised at creation time, where the caller can still fix the rule;
    /// expansion itself treats the empty result as legal.
    #[error("recurrence rule matches no dates in its range")]
    EmptyRecurrence,

    /// An occurrence (or occurrence query) references a parent rule that no
    /// longer exists.
    #[error("occurrence references a missing parent event")]
    OrphanOccurrence,

    #[error(transparent)]
    Db(#[from] DbErr),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ServiceError::Validation(msg.into())
    }
}
