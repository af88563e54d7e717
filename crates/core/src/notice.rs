use std::time::Duration;
use tokio::time::Instant;

/// A user-facing error line that disappears on its own after `ttl`.
#[derive(Debug, Clone)]
pub struct Notice {
    ttl: Duration,
    current: Option<(String, Instant)>,
}

impl Notice {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    pub fn raise(&mut self, message: impl Into<String>) {
        self.current = Some((message.into(), Instant::now()));
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The message, unless it has expired.
    pub fn message(&self) -> Option<&str> {
        match &self.current {
            Some((msg, raised)) if raised.elapsed() < self.ttl => Some(msg.as_str()),
            _ => None,
        }
    }
}
