//! Read-only map view: reports grouped into per-location clusters.

use crate::config::GalleryConfig;
use crate::gallery::is_pet_report;
use providers::{ApiError, PetApi, Report, ReportQuery, ReportType};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SightingFilter {
    #[default]
    All,
    Lost,
    Found,
}

impl SightingFilter {
    fn admits(&self, report_type: ReportType) -> bool {
        match self {
            SightingFilter::All => true,
            SightingFilter::Lost => report_type == ReportType::Lost,
            SightingFilter::Found => report_type == ReportType::Found,
        }
    }
}

impl FromStr for SightingFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(SightingFilter::All),
            "lost" => Ok(SightingFilter::Lost),
            "found" => Ok(SightingFilter::Found),
            other => Err(format!("unknown sighting filter: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SightingPet {
    pub report_id: String,
    pub name: String,
    pub report_type: ReportType,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SightingCluster {
    pub location: String,
    pub lost: usize,
    pub found: usize,
    pub pets: Vec<SightingPet>,
}

impl SightingCluster {
    pub fn count(&self) -> usize {
        self.lost + self.found
    }

    /// Marker kind for the cluster; ties read as found.
    pub fn kind(&self) -> ReportType {
        if self.lost > self.found {
            ReportType::Lost
        } else {
            ReportType::Found
        }
    }
}

/// Groups reports by location (case- and whitespace-insensitive), largest
/// cluster first. Reports without a location are left off the map.
pub fn cluster(reports: &[Report], filter: SightingFilter) -> Vec<SightingCluster> {
    let mut groups: BTreeMap<String, SightingCluster> = BTreeMap::new();
    for report in reports.iter().filter(|r| filter.admits(r.report_type)) {
        let location = report.location.split_whitespace().collect::<Vec<_>>().join(" ");
        if location.is_empty() {
            continue;
        }
        let entry = groups
            .entry(location.to_lowercase())
            .or_insert_with(|| SightingCluster {
                location: location.clone(),
                lost: 0,
                found: 0,
                pets: Vec::new(),
            });
        match report.report_type {
            ReportType::Lost => entry.lost += 1,
            ReportType::Found => entry.found += 1,
        }
        entry.pets.push(SightingPet {
            report_id: report.id.clone(),
            name: report
                .pet_name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| format!("Unknown {}", report.pet_type)),
            report_type: report.report_type,
            image: report.image_urls.first().cloned(),
        });
    }
    let mut clusters: Vec<SightingCluster> = groups.into_values().collect();
    // BTreeMap order keeps ties alphabetical
    clusters.sort_by(|a, b| b.count().cmp(&a.count()));
    clusters
}

/// Map view state: the last fetched reports and the lost/found toggle.
/// Toggling the filter regroups locally without another fetch.
pub struct MapSession {
    api: Arc<dyn PetApi>,
    query: ReportQuery,
    filter: SightingFilter,
    reports: Vec<Report>,
    error: Option<String>,
}

impl MapSession {
    pub fn new(api: Arc<dyn PetApi>, cfg: &GalleryConfig) -> Self {
        Self {
            api,
            query: ReportQuery {
                status: Some(cfg.status.clone()),
                limit: Some(cfg.limit),
                ..ReportQuery::default()
            },
            filter: SightingFilter::default(),
            reports: Vec::new(),
            error: None,
        }
    }

    pub fn filter(&self) -> SightingFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: SightingFilter) {
        self.filter = filter;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clusters(&self) -> Vec<SightingCluster> {
        cluster(&self.reports, self.filter)
    }

    pub async fn refresh(&mut self) -> Result<usize, ApiError> {
        match self.api.list_reports(&self.query).await {
            Ok(reports) => {
                self.reports = reports.into_iter().filter(is_pet_report).collect();
                self.error = None;
                Ok(self.reports.len())
            }
            Err(e) => {
                warn!(error = %e, "map fetch failed");
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }
}
