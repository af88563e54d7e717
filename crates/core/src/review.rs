//! Swipe-style review of pending matches.

use crate::config::ReviewConfig;
use crate::notice::Notice;
use crate::queue::{Direction, MatchQueue, PendingDecision, QueueError};
use providers::{ApiError, Decision, Match, MatchQuery, PetApi};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error(transparent)]
    Queue(#[from] QueueError),
    #[error("nothing to review")]
    Empty,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// What the review screen should show right now.
#[derive(Debug)]
pub enum ReviewView<'a> {
    /// The last fetch failed and there is nothing to show; offer "try again".
    Failed { message: &'a str },
    /// No pending matches. Terminal state, not an error.
    Empty,
    Reviewing {
        current: &'a Match,
        position: usize,
        total: usize,
        comparing: bool,
        processing: bool,
        notice: Option<&'a str>,
    },
}

/// Clears the busy flag if a decision is abandoned mid-request.
struct InFlight<'a> {
    queue: &'a mut MatchQueue,
    pending: Option<PendingDecision>,
}

impl InFlight<'_> {
    fn finish(mut self, succeeded: bool) -> Option<Match> {
        let pending = self.pending.take()?;
        self.queue.finish_decision(pending, succeeded)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            warn!(match_id = pending.match_id(), "decision abandoned before the server answered");
            let _ = self.queue.finish_decision(pending, false);
        }
    }
}

pub struct ReviewSession {
    api: Arc<dyn PetApi>,
    queue: MatchQueue,
    fetch_limit: u32,
    notice: Notice,
    load_error: Option<String>,
    comparing: bool,
}

impl ReviewSession {
    pub fn new(api: Arc<dyn PetApi>, cfg: &ReviewConfig) -> Self {
        Self {
            api,
            queue: MatchQueue::default(),
            fetch_limit: cfg.fetch_limit,
            notice: Notice::new(cfg.error_dismiss()),
            load_error: None,
            comparing: false,
        }
    }

    pub fn queue(&self) -> &MatchQueue {
        &self.queue
    }

    /// Fetches pending matches, replacing the local queue. Also serves as the
    /// explicit "try again" / "refresh" action.
    pub async fn load(&mut self) -> Result<usize, ApiError> {
        match self
            .api
            .list_matches(&MatchQuery::pending(self.fetch_limit))
            .await
        {
            Ok(matches) => {
                let count = matches.len();
                self.queue.replace(matches);
                self.load_error = None;
                self.notice.clear();
                info!(count, "loaded pending matches");
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "failed to load matches");
                self.queue.replace(Vec::new());
                self.load_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    pub fn advance(&mut self, direction: Direction) {
        self.queue.advance(direction);
    }

    pub fn toggle_compare(&mut self) -> bool {
        self.comparing = !self.comparing;
        self.comparing
    }

    pub async fn decide_current(&mut self, decision: Decision) -> Result<Match, ReviewError> {
        let id = self.queue.current().ok_or(ReviewError::Empty)?.id.clone();
        self.decide(&id, decision).await
    }

    /// Sends the verdict for `match_id`. On success the match leaves the queue;
    /// on failure the queue is untouched and a self-dismissing notice is raised.
    /// Failed decisions are never retried here.
    ///
    /// Dropping the returned future before the server answers leaves the
    /// match in place and frees the queue for the next decision.
    pub async fn decide(&mut self, match_id: &str, decision: Decision) -> Result<Match, ReviewError> {
        let pending = self.queue.begin_decision(match_id, decision)?;
        let in_flight = InFlight {
            queue: &mut self.queue,
            pending: Some(pending),
        };
        match self.api.decide_match(match_id, decision).await {
            Ok(receipt) => {
                let removed = in_flight
                    .finish(true)
                    .ok_or_else(|| QueueError::NotInQueue(match_id.to_string()))?;
                info!(match_id, %decision, status = %receipt.status, "decision recorded");
                Ok(removed)
            }
            Err(e) => {
                let _ = in_flight.finish(false);
                warn!(match_id, %decision, error = %e, "decision failed");
                self.notice.raise(e.user_message());
                Err(e.into())
            }
        }
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.message()
    }

    pub fn view(&self) -> ReviewView<'_> {
        match self.queue.current() {
            None => match &self.load_error {
                Some(message) => ReviewView::Failed { message },
                None => ReviewView::Empty,
            },
            Some(current) => ReviewView::Reviewing {
                current,
                position: self.queue.cursor() + 1,
                total: self.queue.len(),
                comparing: self.comparing,
                processing: self.queue.is_processing(),
                notice: self.notice.message(),
            },
        }
    }
}
