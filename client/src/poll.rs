//! Background refresh loop with visibility awareness.
//!
//! The poller ticks at a fixed cadence while the view is visible, goes
//! quiet while it is hidden, and refreshes immediately on resume so stale
//! data never lingers after the user comes back.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to a spawned polling loop.
pub struct Poller {
    visible: watch::Sender<bool>,
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Poller {
    /// Spawns a loop invoking `tick` every `period` while visible. The
    /// first tick fires immediately. Missed ticks are skipped rather than
    /// bursted, so a long suspension never causes a refresh storm.
    pub fn spawn<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (visible_tx, mut visible_rx) = watch::channel(true);
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if *visible_rx.borrow() {
                            tick().await;
                        }
                    }
                    changed = visible_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        // Coming back into view refreshes at once and
                        // restarts the cadence from now.
                        if *visible_rx.borrow() {
                            interval.reset();
                            tick().await;
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
        });

        Self {
            visible: visible_tx,
            shutdown: shutdown_tx,
            handle,
        }
    }

    /// Stops ticking until `resume` is called.
    pub fn suspend(&self) {
        let _ = self.visible.send(false);
    }

    /// Resumes ticking, triggering an immediate refresh.
    pub fn resume(&self) {
        let _ = self.visible.send(true);
    }

    /// Stops the loop for good.
    pub fn shutdown(self) {
        let _ = self.shutdown.send(true);
        self.handle.abort();
    }
}
