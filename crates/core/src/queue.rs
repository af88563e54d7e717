//! Local review queue: the matches under review, a cursor, and the busy flag
//! that allows one decision in flight at a time.

use providers::{Decision, Match};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// previous match
    Left,
    /// next match
    Right,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" | "prev" | "previous" | "p" => Ok(Direction::Left),
            "right" | "next" | "n" => Ok(Direction::Right),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("match {0} is not in the review queue")]
    NotInQueue(String),
    #[error("another decision is still being processed")]
    Busy,
}

/// Handed out by [`MatchQueue::begin_decision`] and given back to
/// [`MatchQueue::finish_decision`] once the server has answered.
#[derive(Debug)]
#[must_use]
pub struct PendingDecision {
    match_id: String,
    decision: Decision,
}

impl PendingDecision {
    pub fn match_id(&self) -> &str {
        &self.match_id
    }

    pub fn decision(&self) -> Decision {
        self.decision
    }
}

#[derive(Debug, Default)]
pub struct MatchQueue {
    items: Vec<Match>,
    cursor: usize,
    processing: bool,
}

impl MatchQueue {
    pub fn new(items: Vec<Match>) -> Self {
        Self {
            items,
            cursor: 0,
            processing: false,
        }
    }

    /// Swaps in a freshly fetched list and rewinds the cursor.
    pub fn replace(&mut self, items: Vec<Match>) {
        self.items = items;
        self.cursor = 0;
        self.processing = false;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn items(&self) -> &[Match] {
        &self.items
    }

    pub fn current(&self) -> Option<&Match> {
        self.items.get(self.cursor)
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn contains(&self, match_id: &str) -> bool {
        self.items.iter().any(|m| m.id == match_id)
    }

    /// 1-based position of the cursor and the queue length, for progress display.
    pub fn position(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            None
        } else {
            Some((self.cursor + 1, self.items.len()))
        }
    }

    /// Moves the cursor one step with wraparound. No-op for 0 or 1 items.
    pub fn advance(&mut self, direction: Direction) {
        let len = self.items.len();
        if len <= 1 {
            return;
        }
        self.cursor = match direction {
            Direction::Right => (self.cursor + 1) % len,
            Direction::Left => (self.cursor + len - 1) % len,
        };
    }

    pub fn begin_decision(
        &mut self,
        match_id: &str,
        decision: Decision,
    ) -> Result<PendingDecision, QueueError> {
        if self.processing {
            return Err(QueueError::Busy);
        }
        if !self.contains(match_id) {
            return Err(QueueError::NotInQueue(match_id.to_string()));
        }
        self.processing = true;
        Ok(PendingDecision {
            match_id: match_id.to_string(),
            decision,
        })
    }

    /// Clears the busy flag; on success removes the decided match and returns it.
    pub fn finish_decision(&mut self, pending: PendingDecision, succeeded: bool) -> Option<Match> {
        self.processing = false;
        if !succeeded {
            return None;
        }
        self.remove(&pending.match_id)
    }

    fn remove(&mut self, match_id: &str) -> Option<Match> {
        let idx = self.items.iter().position(|m| m.id == match_id)?;
        let removed = self.items.remove(idx);
        // cursor keeps its position; clamp when it fell off the end
        if self.items.is_empty() {
            self.cursor = 0;
        } else if self.cursor >= self.items.len() {
            self.cursor = self.items.len() - 1;
        }
        Some(removed)
    }
}
