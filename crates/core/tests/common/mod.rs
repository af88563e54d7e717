#![allow(dead_code)]

use chrono::Utc;
use providers::{
    ApiError, CreatedReport, Decision, DecisionReceipt, Match, MatchQuery, MatchStatus, NewReport,
    PetApi, PetTags, Report, ReportQuery, ReportSummary, ReportType,
};
use std::sync::Mutex;

pub fn tags(species: &str, breed: &str, color: &str) -> PetTags {
    PetTags {
        species: species.into(),
        breed: breed.into(),
        primary_color: color.into(),
        age_group: "Adult".into(),
        size: "Medium".into(),
        marks: vec![],
    }
}

pub fn summary(id: &str) -> ReportSummary {
    ReportSummary {
        id: id.into(),
        pet_name: Some(format!("pet-{id}")),
        pet_type: "Dog".into(),
        image_urls: vec![format!("https://img.test/{id}.jpg")],
        tags: tags("Dog", "Beagle", "Brown"),
        location: "Santa Cruz, CA".into(),
        description: None,
        created_at: Utc::now(),
    }
}

pub fn pending_match(id: &str) -> Match {
    pending_match_between(id, &format!("{id}-lost"), &format!("{id}-found"))
}

pub fn pending_match_between(id: &str, lost: &str, found: &str) -> Match {
    Match {
        id: id.into(),
        lost_report: summary(lost),
        found_report: summary(found),
        match_score: 3.0,
        matched_tags: vec!["species".into(), "breed".into(), "primary_color".into()],
        status: MatchStatus::Pending,
        created_at: Utc::now(),
        decision_made_at: None,
    }
}

pub fn report(id: &str, report_type: ReportType, pet_type: &str) -> Report {
    Report {
        id: id.into(),
        report_type,
        pet_name: Some(format!("pet-{id}")),
        pet_type: pet_type.into(),
        image_urls: vec![format!("https://img.test/{id}.jpg")],
        image_count: Some(1),
        tags: tags(pet_type, "Mixed", "Black"),
        location: "Palo Alto, CA".into(),
        description: Some("friendly".into()),
        status: "active".into(),
        is_matched: false,
        created_at: Utc::now(),
    }
}

pub fn server_error(status: u16) -> ApiError {
    ApiError::Status {
        status,
        detail: format!("server said {status}"),
    }
}

/// In-memory stand-in for the reports/matches API that records every call.
#[derive(Default)]
pub struct FakeApi {
    pub reports: Mutex<Vec<Report>>,
    pub matches: Mutex<Vec<Match>>,
    pub list_error: Mutex<Option<u16>>,
    pub matches_error: Mutex<Option<u16>>,
    pub create_error: Mutex<Option<u16>>,
    pub decide_error: Mutex<Option<u16>>,
    /// `decide_match` never answers.
    pub decide_stalls: Mutex<bool>,
    pub created_id: Mutex<String>,
    pub calls: Mutex<Vec<String>>,
    pub report_queries: Mutex<Vec<ReportQuery>>,
    pub submitted: Mutex<Vec<NewReport>>,
}

impl FakeApi {
    pub fn with_matches(matches: Vec<Match>) -> Self {
        let api = Self::default();
        *api.matches.lock().unwrap() = matches;
        api
    }

    pub fn with_reports(reports: Vec<Report>) -> Self {
        let api = Self::default();
        *api.reports.lock().unwrap() = reports;
        api
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait::async_trait]
impl PetApi for FakeApi {
    async fn list_reports(&self, query: &ReportQuery) -> Result<Vec<Report>, ApiError> {
        self.record("list_reports");
        self.report_queries.lock().unwrap().push(query.clone());
        if let Some(code) = *self.list_error.lock().unwrap() {
            return Err(server_error(code));
        }
        Ok(self.reports.lock().unwrap().clone())
    }

    async fn list_matches(&self, _query: &MatchQuery) -> Result<Vec<Match>, ApiError> {
        self.record("list_matches");
        if let Some(code) = *self.matches_error.lock().unwrap() {
            return Err(server_error(code));
        }
        Ok(self.matches.lock().unwrap().clone())
    }

    async fn create_report(&self, report: NewReport) -> Result<CreatedReport, ApiError> {
        self.record("create_report");
        if let Some(code) = *self.create_error.lock().unwrap() {
            return Err(server_error(code));
        }
        let id = {
            let id = self.created_id.lock().unwrap();
            if id.is_empty() {
                "new-report".to_string()
            } else {
                id.clone()
            }
        };
        let image_urls = report
            .images
            .iter()
            .map(|img| format!("https://img.test/{id}/{}", img.file_name))
            .collect();
        self.submitted.lock().unwrap().push(report);
        Ok(CreatedReport {
            report_id: id,
            image_urls,
            pet_details: None,
            detected_pet: tags("Dog", "Beagle", "Brown"),
            image_count: None,
        })
    }

    async fn decide_match(
        &self,
        match_id: &str,
        decision: Decision,
    ) -> Result<DecisionReceipt, ApiError> {
        self.record(format!("decide:{match_id}:{decision}"));
        let stalls = *self.decide_stalls.lock().unwrap();
        if stalls {
            std::future::pending::<()>().await;
        }
        if let Some(code) = *self.decide_error.lock().unwrap() {
            return Err(server_error(code));
        }
        self.matches.lock().unwrap().retain(|m| m.id != match_id);
        Ok(DecisionReceipt {
            status: "success".into(),
            message: None,
        })
    }
}

/// PNG signature followed by `tag`, enough for content sniffing.
pub fn png_bytes(tag: u8) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0, 0, 0, 0x0D, b'I', b'H', b'D', b'R', tag]);
    bytes
}

pub fn jpeg_bytes(tag: u8) -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, tag]
}
