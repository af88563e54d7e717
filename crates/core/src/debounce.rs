use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

/// Holds the latest value until `delay` has passed without a newer one.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replaces any pending value and restarts the quiet period.
    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.delay));
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at)
    }

    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if *at <= now => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    /// Drops the timer and hands back whatever is pending.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(v, _)| v)
    }
}

/// Feeds values from `rx` through a [`Debouncer`] and calls `on_settled` once
/// per quiet period with the last value received. A value still pending when
/// the channel closes is delivered right away.
pub async fn run_debounced<T, F, Fut>(rx: &mut mpsc::Receiver<T>, delay: Duration, mut on_settled: F)
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = ()>,
{
    let mut debouncer = Debouncer::new(delay);
    loop {
        let deadline = debouncer.deadline();
        tokio::select! {
            msg = rx.recv() => match msg {
                Some(value) => debouncer.push(value),
                None => {
                    if let Some(value) = debouncer.flush() {
                        on_settled(value).await;
                    }
                    break;
                }
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some(value) = debouncer.take_due(Instant::now()) {
                    on_settled(value).await;
                }
            }
        }
    }
}
