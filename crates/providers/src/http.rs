use crate::schema::{MatchesEnvelope, ReportsEnvelope};
use crate::{
    ApiError, CreatedReport, Decision, DecisionReceipt, Match, MatchQuery, NewReport, PetApi,
    Report, ReportQuery,
};
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Clone)]
pub struct HttpConfig {
    pub base_url: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    cfg: Arc<HttpConfig>,
}

impl HttpApi {
    pub fn new(cfg: HttpConfig) -> Self {
        Self {
            client: Client::new(),
            cfg: Arc::new(cfg),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.cfg.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait::async_trait]
impl PetApi for HttpApi {
    async fn list_reports(&self, query: &ReportQuery) -> Result<Vec<Report>, ApiError> {
        let params = query.to_params();
        debug!(?params, "GET /api/reports");
        let resp = self
            .client
            .get(self.url("/api/reports"))
            .query(&params)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;
        let envelope: ReportsEnvelope = read_json(resp).await?;
        envelope.into_reports()
    }

    async fn list_matches(&self, query: &MatchQuery) -> Result<Vec<Match>, ApiError> {
        let params = query.to_params();
        debug!(?params, "GET /api/matches");
        let resp = self
            .client
            .get(self.url("/api/matches"))
            .query(&params)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;
        let envelope: MatchesEnvelope = read_json(resp).await?;
        envelope.into_matches()
    }

    async fn create_report(&self, report: NewReport) -> Result<CreatedReport, ApiError> {
        let mut form = Form::new();
        for image in &report.images {
            let part = Part::bytes(image.bytes.to_vec())
                .file_name(image.file_name.clone())
                .mime_str(&image.mime)
                .map_err(|e| ApiError::RequestFailed(e.to_string()))?;
            form = form.part("files", part);
        }
        for (name, value) in report.form_fields() {
            form = form.text(name, value);
        }
        debug!(images = report.images.len(), "POST /api/reports");

        let resp = self
            .client
            .post(self.url("/api/reports"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;
        let created: CreatedReport = read_json(resp).await?;
        created.validate()?;
        Ok(created)
    }

    async fn decide_match(
        &self,
        match_id: &str,
        decision: Decision,
    ) -> Result<DecisionReceipt, ApiError> {
        debug!(match_id, %decision, "POST /api/matches/:id/decision");
        let resp = self
            .client
            .post(self.url(&format!("/api/matches/{match_id}/decision")))
            .query(&[("decision", decision.as_str())])
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;
        read_json(resp).await
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.bytes().await.unwrap_or(Bytes::from_static(b""));
        return Err(status_error(status, &body));
    }
    let body = resp
        .bytes()
        .await
        .map_err(|e| ApiError::RequestFailed(e.to_string()))?;
    serde_json::from_slice(&body).map_err(|e| ApiError::Malformed(e.to_string()))
}

/// Builds the error for a non-2xx response, preferring the body's `detail`.
pub(crate) fn status_error(status: StatusCode, body: &[u8]) -> ApiError {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: serde_json::Value,
    }

    let detail = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|b| match b.detail {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
    ApiError::Status {
        status: status.as_u16(),
        detail,
    }
}
