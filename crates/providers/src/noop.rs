use crate::{
    ApiError, CreatedReport, Decision, DecisionReceipt, Match, MatchQuery, NewReport, PetApi,
    Report, ReportQuery,
};

/// Offline provider: reads come back empty, writes are refused.
#[derive(Debug, Default)]
pub struct NoopApi;

#[async_trait::async_trait]
impl PetApi for NoopApi {
    async fn list_reports(&self, _query: &ReportQuery) -> Result<Vec<Report>, ApiError> {
        Ok(Vec::new())
    }

    async fn list_matches(&self, _query: &MatchQuery) -> Result<Vec<Match>, ApiError> {
        Ok(Vec::new())
    }

    async fn create_report(&self, _report: NewReport) -> Result<CreatedReport, ApiError> {
        Err(ApiError::NotImplemented)
    }

    async fn decide_match(
        &self,
        _match_id: &str,
        _decision: Decision,
    ) -> Result<DecisionReceipt, ApiError> {
        Err(ApiError::NotImplemented)
    }
}
