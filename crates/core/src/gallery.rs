//! Gallery of reported pets: filters, the client-side re-filter pass over a
//! fetched page, and display cards.

use crate::config::GalleryConfig;
use providers::{ApiError, PetApi, Report, ReportQuery, ReportType};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryFilter {
    /// `None` means all pet types.
    pub pet_type: Option<String>,
    /// `None` means lost and found.
    pub report_type: Option<ReportType>,
    pub search: String,
}

impl GalleryFilter {
    pub fn to_query(&self, cfg: &GalleryConfig) -> ReportQuery {
        ReportQuery {
            status: Some(cfg.status.clone()),
            pet_type: self.pet_type.clone(),
            report_type: self.report_type,
            search: Some(self.search.trim().to_string()),
            limit: Some(cfg.limit),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStatus {
    Lost,
    Found,
    Matched,
}

impl CardStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CardStatus::Lost => "Missing",
            CardStatus::Found => "Found",
            CardStatus::Matched => "Matched",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryCard {
    pub id: String,
    pub name: String,
    pub pet_type: String,
    pub breed: String,
    pub status: CardStatus,
    pub location: String,
    pub date: String,
    pub image: Option<String>,
    pub description: String,
}

impl From<&Report> for GalleryCard {
    fn from(report: &Report) -> Self {
        let status = if report.is_matched {
            CardStatus::Matched
        } else {
            match report.report_type {
                ReportType::Lost => CardStatus::Lost,
                ReportType::Found => CardStatus::Found,
            }
        };
        let breed = or_unknown(&report.tags.breed);
        let description = match report.description.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => d.to_string(),
            _ => {
                let kind = if report.tags.breed.trim().is_empty() {
                    report.pet_type.as_str()
                } else {
                    report.tags.breed.as_str()
                };
                let color = report.tags.primary_color.trim();
                if color.is_empty() {
                    format!("A {kind}")
                } else {
                    format!("A {kind} with {color} coloring")
                }
            }
        };
        Self {
            id: report.id.clone(),
            name: report
                .pet_name
                .as_deref()
                .map(or_unknown)
                .unwrap_or_else(|| "Unknown".to_string()),
            pet_type: report.pet_type.to_lowercase(),
            breed,
            status,
            location: or_unknown(&report.location),
            date: report.created_at.format("%b %-d, %Y").to_string(),
            image: report.image_urls.first().cloned(),
            description,
        }
    }
}

fn or_unknown(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() {
        "Unknown".to_string()
    } else {
        v.to_string()
    }
}

/// Scraped sightings sometimes carry a map screenshot instead of a pet photo.
pub fn is_pet_report(report: &Report) -> bool {
    let Some(first) = report.image_urls.first() else {
        return true;
    };
    let file_name = first
        .rsplit('/')
        .next()
        .unwrap_or(first)
        .to_lowercase();
    if file_name.contains("map") {
        return false;
    }
    let mentions_map = |text: &str| {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == "map" || word == "maps")
    };
    !(mentions_map(&report.tags.species)
        || report.description.as_deref().map(mentions_map).unwrap_or(false))
}

/// Second filtering pass over what the server returned, in case its own
/// filtering was incomplete.
pub fn refilter(reports: &[Report], filter: &GalleryFilter) -> Vec<GalleryCard> {
    reports
        .iter()
        .filter(|r| is_pet_report(r))
        .map(GalleryCard::from)
        .filter(|card| {
            filter
                .pet_type
                .as_deref()
                .map(|t| card.pet_type.eq_ignore_ascii_case(t))
                .unwrap_or(true)
        })
        .filter(|card| match filter.report_type {
            None => true,
            Some(ReportType::Lost) => card.status == CardStatus::Lost,
            Some(ReportType::Found) => card.status == CardStatus::Found,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum GalleryState {
    Idle,
    Loaded(Vec<GalleryCard>),
    /// Fetch failed; the view offers a manual retry.
    Failed(String),
}

pub struct GallerySession {
    api: Arc<dyn PetApi>,
    cfg: GalleryConfig,
    filter: GalleryFilter,
    state: GalleryState,
}

impl GallerySession {
    pub fn new(api: Arc<dyn PetApi>, cfg: &GalleryConfig) -> Self {
        Self {
            api,
            cfg: cfg.clone(),
            filter: GalleryFilter::default(),
            state: GalleryState::Idle,
        }
    }

    pub fn filter(&self) -> &GalleryFilter {
        &self.filter
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    pub fn cards(&self) -> &[GalleryCard] {
        match &self.state {
            GalleryState::Loaded(cards) => cards,
            _ => &[],
        }
    }

    /// Fetches with the current filter. Also the manual "try again" action.
    pub async fn refresh(&mut self) -> Result<usize, ApiError> {
        let query = self.filter.to_query(&self.cfg);
        debug!(?query, "fetching gallery");
        match self.api.list_reports(&query).await {
            Ok(reports) => {
                let cards = refilter(&reports, &self.filter);
                let count = cards.len();
                self.state = GalleryState::Loaded(cards);
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "gallery fetch failed");
                self.state = GalleryState::Failed(e.user_message());
                Err(e)
            }
        }
    }

    /// Filter changes fetch immediately.
    pub async fn set_pet_type(&mut self, pet_type: Option<String>) -> Result<usize, ApiError> {
        self.filter.pet_type = pet_type;
        self.refresh().await
    }

    pub async fn set_report_type(
        &mut self,
        report_type: Option<ReportType>,
    ) -> Result<usize, ApiError> {
        self.filter.report_type = report_type;
        self.refresh().await
    }

    /// Replaces the whole filter without fetching.
    pub fn set_filter(&mut self, filter: GalleryFilter) {
        self.filter = filter;
    }

    /// Search text only updates the filter; the caller debounces and then
    /// calls [`GallerySession::refresh`].
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.filter.search = text.into();
    }
}
