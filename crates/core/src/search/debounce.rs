use std::pin::Pin;
use std::time::Duration;
use tokio::time::{sleep, Instant, Sleep};

/// Restart-on-change timer. Each `push` replaces the pending value and
/// re-arms the timer; only a value that sat untouched for the whole window
/// comes out of [`Debouncer::expired`].
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Pin<Box<Sleep>>)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T) {
        let deadline = Instant::now() + self.window;
        match self.pending.as_mut() {
            Some((pending, timer)) => {
                *pending = value;
                timer.as_mut().reset(deadline);
            }
            None => self.pending = Some((value, Box::pin(sleep(self.window)))),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Resolves with the quiescent value. Never resolves while nothing is
    /// pending. Cancel safe: dropping the future keeps the pending value.
    pub async fn expired(&mut self) -> T {
        loop {
            match self.pending.as_mut() {
                Some((_, timer)) => timer.as_mut().await,
                None => std::future::pending::<()>().await,
            }
            if let Some((value, _)) = self.pending.take() {
                return value;
            }
        }
    }
}
