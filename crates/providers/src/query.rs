use crate::schema::{MatchStatus, ReportType};

/// Filters for `GET /api/reports`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub status: Option<String>,
    pub pet_type: Option<String>,
    pub report_type: Option<ReportType>,
    pub search: Option<String>,
    pub limit: Option<u32>,
}

impl ReportQuery {
    /// Query-string pairs; blank values are left out.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(status) = non_blank(self.status.as_deref()) {
            params.push(("status", status));
        }
        if let Some(pet_type) = non_blank(self.pet_type.as_deref()) {
            params.push(("pet_type", pet_type));
        }
        if let Some(report_type) = self.report_type {
            params.push(("report_type", report_type.to_string()));
        }
        if let Some(search) = non_blank(self.search.as_deref()) {
            params.push(("search", search));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// Filters for `GET /api/matches`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchQuery {
    pub status: Option<MatchStatus>,
    pub limit: Option<u32>,
}

impl MatchQuery {
    pub fn pending(limit: u32) -> Self {
        Self {
            status: Some(MatchStatus::Pending),
            limit: Some(limit),
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
