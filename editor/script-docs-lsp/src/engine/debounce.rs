//! Trailing-edge debouncing for file watch events
//!
//! Every trigger pushes the deadline back by the configured delay. The
//! action runs once the deadline passes with no further triggers.

use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

/// Handle to a debounce task. Dropping it stops the task after any pending
/// action has run.
#[derive(Debug, Clone)]
pub struct Debouncer {
    tx: mpsc::UnboundedSender<()>,
}

impl Debouncer {
    /// Spawn the debounce task on the current tokio runtime.
    pub fn spawn<F, Fut>(delay: Duration, action: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();

        tokio::spawn(async move {
            while rx.recv().await.is_some() {
                let mut deadline = Instant::now() + delay;

                loop {
                    tokio::select! {
                        () = sleep_until(deadline) => break,
                        event = rx.recv() => match event {
                            Some(()) => deadline = Instant::now() + delay,
                            None => break,
                        },
                    }
                }

                action().await;
            }
        });

        Self { tx }
    }

    /// Record an event, restarting the quiet period.
    pub fn trigger(&self) {
        if self.tx.send(()).is_err() {
            tracing::warn!("Debounce task has stopped");
        }
    }
}
