//! Wire schema for the reports/matches API.
//!
//! Every payload that crosses the boundary is deserialized into these types
//! and then checked with `validate`; a response that does not fit is rejected
//! as [`ApiError::Malformed`] instead of being rendered half-filled.

use crate::ApiError;
use bytes::Bytes;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ReportType {
    Lost,
    Found,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Lost => "Lost",
            ReportType::Found => "Found",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lost" => Ok(ReportType::Lost),
            "found" => Ok(ReportType::Found),
            other => Err(format!("unknown report type: {other}")),
        }
    }
}

impl TryFrom<String> for ReportType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReportType> for String {
    fn from(value: ReportType) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Accepted,
    Rejected,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Accepted => "accepted",
            MatchStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Accept => "accept",
            Decision::Reject => "reject",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes the backend extracts from a report's first image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PetTags {
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub primary_color: String,
    #[serde(default)]
    pub age_group: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub marks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "report_id", alias = "id")]
    pub id: String,
    pub report_type: ReportType,
    #[serde(default)]
    pub pet_name: Option<String>,
    pub pet_type: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub image_count: Option<u32>,
    #[serde(default)]
    pub tags: PetTags,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub is_matched: bool,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.id.trim().is_empty() {
            return Err(ApiError::Malformed("report without id".into()));
        }
        if self.pet_type.trim().is_empty() {
            return Err(ApiError::Malformed(format!(
                "report {} without pet_type",
                self.id
            )));
        }
        Ok(())
    }

    pub fn image_count(&self) -> usize {
        self.image_count
            .map(|c| c as usize)
            .unwrap_or(self.image_urls.len())
    }
}

/// Report as embedded inside a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    #[serde(rename = "report_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub pet_name: Option<String>,
    pub pet_type: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub tags: PetTags,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    #[serde(rename = "match_id", alias = "id")]
    pub id: String,
    pub lost_report: ReportSummary,
    pub found_report: ReportSummary,
    pub match_score: f64,
    #[serde(default)]
    pub matched_tags: Vec<String>,
    pub status: MatchStatus,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub decision_made_at: Option<DateTime<Utc>>,
}

impl Match {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.id.trim().is_empty() {
            return Err(ApiError::Malformed("match without id".into()));
        }
        for (side, report) in [("lost", &self.lost_report), ("found", &self.found_report)] {
            if report.id.trim().is_empty() {
                return Err(ApiError::Malformed(format!(
                    "match {} has a {side} report without id",
                    self.id
                )));
            }
        }
        if !self.match_score.is_finite() || self.match_score < 0.0 {
            return Err(ApiError::Malformed(format!(
                "match {} has invalid score {}",
                self.id, self.match_score
            )));
        }
        Ok(())
    }

    /// True when either side of the match is the given report.
    pub fn involves(&self, report_id: &str) -> bool {
        self.lost_report.id == report_id || self.found_report.id == report_id
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReportsEnvelope {
    pub status: String,
    pub reports: Vec<Report>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MatchesEnvelope {
    pub status: String,
    pub matches: Vec<Match>,
}

pub(crate) fn ensure_success(status: &str) -> Result<(), ApiError> {
    if status.eq_ignore_ascii_case("success") {
        Ok(())
    } else {
        Err(ApiError::Malformed(format!("unexpected status {status:?}")))
    }
}

impl ReportsEnvelope {
    pub fn into_reports(self) -> Result<Vec<Report>, ApiError> {
        ensure_success(&self.status)?;
        for r in &self.reports {
            r.validate()?;
        }
        Ok(self.reports)
    }
}

impl MatchesEnvelope {
    pub fn into_matches(self) -> Result<Vec<Match>, ApiError> {
        ensure_success(&self.status)?;
        for m in &self.matches {
            m.validate()?;
        }
        Ok(self.matches)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetDetails {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub pet_type: String,
    #[serde(default)]
    pub location: String,
}

/// Body returned by `POST /api/reports`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedReport {
    pub report_id: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub pet_details: Option<PetDetails>,
    #[serde(default)]
    pub detected_pet: PetTags,
    #[serde(default)]
    pub image_count: Option<u32>,
}

impl CreatedReport {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.report_id.trim().is_empty() {
            return Err(ApiError::Malformed("created report without id".into()));
        }
        Ok(())
    }

    pub fn image_count(&self) -> usize {
        self.image_count
            .map(|c| c as usize)
            .unwrap_or(self.image_urls.len())
    }
}

/// Body returned by the decision endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionReceipt {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// One image attached to a new report.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadImage {
    pub file_name: String,
    pub mime: String,
    pub bytes: Bytes,
}

/// Multipart payload for `POST /api/reports`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub report_type: ReportType,
    pub pet_name: String,
    pub pet_type: String,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub user_location: String,
    pub description: String,
    pub images: Vec<UploadImage>,
}

impl NewReport {
    /// Text fields in the order the backend form expects them.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("report_type", self.report_type.to_string()),
            ("pet_name", self.pet_name.clone()),
            ("pet_type", self.pet_type.clone()),
            ("user_name", self.user_name.clone()),
            ("user_email", self.user_email.clone()),
            ("user_phone", self.user_phone.clone()),
            ("user_location", self.user_location.clone()),
            ("description", self.description.clone()),
        ]
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    // naive ISO timestamps are written in UTC by the backend
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp {raw:?}: {e}"))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.is_empty() => parse_timestamp(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_and_rfc3339_timestamps_both_parse() {
        let a = parse_timestamp("2025-01-15T10:30:00.123456").unwrap();
        let b = parse_timestamp("2025-01-15T10:30:00.123456Z").unwrap();
        assert_eq!(a, b);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn report_type_is_case_insensitive() {
        assert_eq!("LOST".parse::<ReportType>().unwrap(), ReportType::Lost);
        assert_eq!(" found ".parse::<ReportType>().unwrap(), ReportType::Found);
        assert!("stray".parse::<ReportType>().is_err());
    }
}
