//! Client-side access to the lost-and-found reports/matches API.

use thiserror::Error;

pub mod http;
pub mod noop;
pub mod query;
pub mod schema;

pub use query::{MatchQuery, ReportQuery};
pub use schema::{
    CreatedReport, Decision, DecisionReceipt, Match, MatchStatus, NewReport, PetTags, Report,
    ReportSummary, ReportType, UploadImage,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not implemented")]
    NotImplemented,
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("{detail} (HTTP {status})")]
    Status { status: u16, detail: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Text suitable for an inline error line.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

#[async_trait::async_trait]
pub trait PetApi: Send + Sync {
    async fn list_reports(&self, query: &ReportQuery) -> Result<Vec<Report>, ApiError>;

    async fn list_matches(&self, query: &MatchQuery) -> Result<Vec<Match>, ApiError>;

    async fn create_report(&self, report: NewReport) -> Result<CreatedReport, ApiError>;

    async fn decide_match(
        &self,
        match_id: &str,
        decision: Decision,
    ) -> Result<DecisionReceipt, ApiError>;
}
