//! Typed client for the TouchLine API.
//!
//! Wraps the HTTP surface in a small state machine suited to interactive
//! frontends: listing calls go through a short-lived cache, mutations are
//! applied optimistically with rollback on persistent failure, and a poller
//! keeps views fresh while they are visible.

pub mod attendance;
pub mod http;
pub mod optimistic;
pub mod poll;

pub use attendance::{next_mark, Mark};
pub use http::{ApiClient, ClientError, EventDto};
pub use optimistic::{optimistic_update, persist_with_retry, RetryPolicy};
pub use poll::Poller;
