//! New-report submission: form state, local validation, and the
//! `idle → uploading → analyzing → saving → complete` progress machine.

use crate::config::UploadConfig;
use crate::images::ImageFile;
use crate::session::SessionUser;
use providers::{ApiError, CreatedReport, Match, MatchQuery, NewReport, PetApi, ReportType};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub const PET_TYPES: [&str; 5] = ["Dog", "Cat", "Bird", "Rabbit", "Other"];

/// Upper bound on matches read back after a submission.
const RELATED_MATCH_LIMIT: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select image files")]
    NoImagesSelected,
    #[error("Please upload at least one image")]
    MissingImages,
    #[error("Please fill in all required fields")]
    MissingFields(Vec<&'static str>),
    #[error("no image at position {0}")]
    NoSuchImage(usize),
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Upload failed: {0}")]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone)]
pub struct UploadForm {
    pub report_type: ReportType,
    pub pet_name: String,
    pub pet_type: String,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub user_location: String,
    pub description: String,
    images: Vec<ImageFile>,
}

impl Default for UploadForm {
    fn default() -> Self {
        Self {
            report_type: ReportType::Lost,
            pet_name: String::new(),
            pet_type: PET_TYPES[0].to_string(),
            user_name: String::new(),
            user_email: String::new(),
            user_phone: String::new(),
            user_location: String::new(),
            description: String::new(),
            images: Vec::new(),
        }
    }
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills blank contact fields from the signed-in user.
    pub fn prefill_contact(&mut self, user: &SessionUser) {
        if self.user_name.trim().is_empty() {
            if let Some(name) = &user.name {
                self.user_name = name.clone();
            }
        }
        if self.user_email.trim().is_empty() {
            if let Some(email) = &user.email {
                self.user_email = email.clone();
            }
        }
    }

    pub fn images(&self) -> &[ImageFile] {
        &self.images
    }

    /// Appends a selection of images. An empty selection is an error; images
    /// already selected (same content) are not added twice.
    pub fn add_images(&mut self, images: Vec<ImageFile>) -> Result<usize, ValidationError> {
        if images.is_empty() {
            return Err(ValidationError::NoImagesSelected);
        }
        let mut added = 0;
        for img in images {
            if self.images.iter().any(|existing| existing.digest == img.digest) {
                continue;
            }
            self.images.push(img);
            added += 1;
        }
        Ok(added)
    }

    pub fn remove_image(&mut self, index: usize) -> Result<ImageFile, ValidationError> {
        if index >= self.images.len() {
            return Err(ValidationError::NoSuchImage(index));
        }
        Ok(self.images.remove(index))
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("pet_name", &self.pet_name),
            ("user_name", &self.user_name),
            ("user_email", &self.user_email),
            ("user_phone", &self.user_phone),
            ("user_location", &self.user_location),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.images.is_empty() {
            return Err(ValidationError::MissingImages);
        }
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }
        Ok(())
    }

    pub fn to_new_report(&self) -> NewReport {
        NewReport {
            report_type: self.report_type,
            pet_name: self.pet_name.trim().to_string(),
            pet_type: self.pet_type.trim().to_string(),
            user_name: self.user_name.trim().to_string(),
            user_email: self.user_email.trim().to_string(),
            user_phone: self.user_phone.trim().to_string(),
            user_location: self.user_location.trim().to_string(),
            description: self.description.trim().to_string(),
            images: self.images.iter().map(ImageFile::to_upload).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Uploading,
    Analyzing,
    Saving,
    Complete,
}

impl UploadPhase {
    pub fn label(&self) -> &'static str {
        match self {
            UploadPhase::Idle => "Ready",
            UploadPhase::Uploading => "Uploading photos...",
            UploadPhase::Analyzing => "Analyzing with AI...",
            UploadPhase::Saving => "Saving report...",
            UploadPhase::Complete => "Report submitted",
        }
    }
}

impl fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Receives phase changes while a submission runs.
pub trait ProgressSink: Send + Sync {
    fn on_phase(&self, phase: UploadPhase);
}

#[derive(Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_phase(&self, _phase: UploadPhase) {}
}

#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub report: CreatedReport,
    /// Pending matches that already reference the new report.
    pub related_matches: Vec<Match>,
}

pub struct UploadFlow {
    api: Arc<dyn PetApi>,
    settle: Duration,
    phase: UploadPhase,
    error: Option<String>,
    receipt: Option<UploadReceipt>,
}

impl UploadFlow {
    pub fn new(api: Arc<dyn PetApi>, cfg: &UploadConfig) -> Self {
        Self {
            api,
            settle: cfg.match_settle(),
            phase: UploadPhase::Idle,
            error: None,
            receipt: None,
        }
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    /// Inline error from the last attempt, if it failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn receipt(&self) -> Option<&UploadReceipt> {
        self.receipt.as_ref()
    }

    /// Validates and submits `form`. Invalid input never reaches the network.
    /// A failed request puts the flow back to idle with the message kept for
    /// display; the form (and its images) is only borrowed, so it stays intact
    /// for another attempt.
    pub async fn submit(
        &mut self,
        form: &UploadForm,
        progress: &dyn ProgressSink,
    ) -> Result<UploadReceipt, UploadError> {
        self.error = None;
        self.receipt = None;
        self.set_phase(UploadPhase::Idle, progress);

        if let Err(e) = form.validate() {
            self.error = Some(e.to_string());
            return Err(e.into());
        }

        let payload = form.to_new_report();
        self.set_phase(UploadPhase::Uploading, progress);
        let created = match self.api.create_report(payload).await {
            Ok(created) => created,
            Err(e) => {
                let err = UploadError::from(e);
                warn!(error = %err, "report submission failed");
                self.error = Some(err.to_string());
                self.set_phase(UploadPhase::Idle, progress);
                return Err(err);
            }
        };
        info!(report_id = %created.report_id, images = created.image_count(), "report created");

        self.set_phase(UploadPhase::Analyzing, progress);
        self.set_phase(UploadPhase::Saving, progress);
        let related_matches = self.related_matches(&created.report_id).await;

        self.set_phase(UploadPhase::Complete, progress);
        let receipt = UploadReceipt {
            report: created,
            related_matches,
        };
        self.receipt = Some(receipt.clone());
        Ok(receipt)
    }

    /// Waits for the backend's matcher to catch up, then reads pending matches
    /// for the new report. A failed or early read just yields nothing.
    async fn related_matches(&self, report_id: &str) -> Vec<Match> {
        tokio::time::sleep(self.settle).await;
        match self
            .api
            .list_matches(&MatchQuery::pending(RELATED_MATCH_LIMIT))
            .await
        {
            Ok(matches) => matches
                .into_iter()
                .filter(|m| m.involves(report_id))
                .collect(),
            Err(e) => {
                warn!(report_id, error = %e, "could not read matches for new report");
                Vec::new()
            }
        }
    }

    fn set_phase(&mut self, phase: UploadPhase, progress: &dyn ProgressSink) {
        if self.phase != phase {
            self.phase = phase;
            progress.on_phase(phase);
        }
    }
}
