//! Optimistic mutation: apply locally first, persist with bounded retry,
//! and restore the pre-mutation snapshot if persistence never succeeds.

use std::future::Future;
use std::time::Duration;

/// Retry schedule for persisting a mutation: `max_attempts` tries with
/// exponential backoff starting at `base_delay`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Delay before the given retry. The first attempt (index 0) runs
    /// immediately; each later one doubles the previous delay.
    fn delay_before(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 {
            return None;
        }
        Some(self.base_delay * 2u32.saturating_pow(attempt - 1))
    }
}

/// Runs `persist` until it succeeds or the policy is exhausted, sleeping
/// between attempts. Returns the last error when every attempt fails.
pub async fn persist_with_retry<T, E, F, Fut>(
    policy: RetryPolicy,
    mut persist: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let attempts = policy.max_attempts.max(1);
    let mut last_err = None;
    for attempt in 0..attempts {
        if let Some(delay) = policy.delay_before(attempt) {
            tokio::time::sleep(delay).await;
        }
        match persist().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!(attempt = attempt + 1, error = %e, "persist attempt failed");
                last_err = Some(e);
            }
        }
    }
    // attempts >= 1, so at least one error was recorded.
    Err(last_err.unwrap())
}

/// Applies `mutate` to `state` immediately, then persists with retry.
///
/// When persistence fails for good, `state` is restored to a snapshot taken
/// before the mutation, so the caller's view never keeps a write the server
/// rejected. The snapshot covers the whole state, not just the mutated
/// field.
pub async fn optimistic_update<S, T, E, M, F, Fut>(
    state: &mut S,
    policy: RetryPolicy,
    mutate: M,
    persist: F,
) -> Result<T, E>
where
    S: Clone,
    M: FnOnce(&mut S),
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let snapshot = state.clone();
    mutate(state);

    match persist_with_retry(policy, persist).await {
        Ok(value) => Ok(value),
        Err(e) => {
            *state = snapshot;
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, Clone, PartialEq)]
    struct Roster {
        marks: Vec<(i64, &'static str)>,
        title: String,
    }

    fn roster() -> Roster {
        Roster {
            marks: vec![(1, "unmarked"), (2, "present")],
            title: "Evening drills".into(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failed_persist_restores_the_full_snapshot() {
        let mut state = roster();
        let before = state.clone();

        let result: Result<(), String> = optimistic_update(
            &mut state,
            RetryPolicy::default(),
            |s| {
                s.marks[0].1 = "present";
                s.title = "Renamed".into();
            },
            || async { Err("boom".to_string()) },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(state, before);
    }

    #[tokio::test(start_paused = true)]
    async fn successful_persist_keeps_the_mutation() {
        let mut state = roster();

        let result: Result<(), String> = optimistic_update(
            &mut state,
            RetryPolicy::default(),
            |s| s.marks[0].1 = "present",
            || async { Ok(()) },
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(state.marks[0].1, "present");
    }

    #[tokio::test(start_paused = true)]
    async fn retry_stops_after_the_configured_attempts() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(10),
        };

        let result: Result<(), String> = persist_with_retry(policy, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("still down".to_string()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_returns_the_first_success() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(10),
        };

        let result: Result<u32, String> = persist_with_retry(policy, || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 2 {
                    Err("transient".to_string())
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
