use std::sync::Arc;
use std::time::Duration;

use common::window::TimeRemaining;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::session::VotingSession;

const TICK: Duration = Duration::from_secs(1);

/// Once-a-second view of [`VotingSession::time_remaining`].
///
/// The ticker task stops when the handle is dropped.
pub struct Countdown {
    rx: watch::Receiver<Option<TimeRemaining>>,
    cancel: CancellationToken,
}

impl Countdown {
    /// Evaluate immediately, then on every tick. Must be called inside a
    /// tokio runtime.
    pub fn start(session: Arc<VotingSession>) -> Self {
        let (tx, rx) = watch::channel(session.time_remaining());
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(TICK);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if tx.send(session.time_remaining()).is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("Countdown stopped");
        });

        Self { rx, cancel }
    }

    /// Latest published value. `None` once the window has closed or when no
    /// window is loaded.
    pub fn current(&self) -> Option<TimeRemaining> {
        *self.rx.borrow()
    }

    /// Wait for the next tick. Returns `None` after the ticker stops.
    pub async fn tick(&mut self) -> Option<Option<TimeRemaining>> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<TimeRemaining>> {
        self.rx.clone()
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
