mod common;

use common::{pending_match_between, png_bytes, FakeApi};
use pawscout_core::config::UploadConfig;
use pawscout_core::images::ImageFile;
use pawscout_core::session::SessionUser;
use pawscout_core::upload::{
    NoProgress, ProgressSink, UploadError, UploadFlow, UploadForm, UploadPhase, ValidationError,
};
use providers::ReportType;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingSink(Mutex<Vec<UploadPhase>>);

impl ProgressSink for RecordingSink {
    fn on_phase(&self, phase: UploadPhase) {
        self.0.lock().unwrap().push(phase);
    }
}

fn filled_form() -> UploadForm {
    let mut form = UploadForm::new();
    form.report_type = ReportType::Found;
    form.pet_name = "Biscuit".into();
    form.pet_type = "Dog".into();
    form.user_name = "Jo".into();
    form.user_email = "jo@example.com".into();
    form.user_phone = "555-0100".into();
    form.user_location = " Santa Cruz, CA ".into();
    form.add_images(vec![
        ImageFile::from_bytes("front.png", png_bytes(1)).unwrap(),
        ImageFile::from_bytes("side.png", png_bytes(2)).unwrap(),
    ])
    .unwrap();
    form
}

#[tokio::test]
async fn form_without_images_never_touches_the_network() {
    let api = Arc::new(FakeApi::default());
    let mut flow = UploadFlow::new(api.clone(), &UploadConfig::default());
    let mut form = filled_form();
    form.remove_image(1).unwrap();
    form.remove_image(0).unwrap();

    let err = flow.submit(&form, &NoProgress).await.unwrap_err();
    assert!(matches!(
        err,
        UploadError::Validation(ValidationError::MissingImages)
    ));
    assert_eq!(flow.error(), Some("Please upload at least one image"));
    assert_eq!(flow.phase(), UploadPhase::Idle);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn blank_required_fields_are_listed() {
    let api = Arc::new(FakeApi::default());
    let mut flow = UploadFlow::new(api.clone(), &UploadConfig::default());
    let mut form = filled_form();
    form.user_phone = "   ".into();
    form.pet_name.clear();

    match flow.submit(&form, &NoProgress).await {
        Err(UploadError::Validation(ValidationError::MissingFields(fields))) => {
            assert_eq!(fields, vec!["pet_name", "user_phone"]);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(flow.error(), Some("Please fill in all required fields"));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn server_error_returns_to_idle_and_keeps_the_form() {
    let api = Arc::new(FakeApi::default());
    *api.create_error.lock().unwrap() = Some(500);
    let mut flow = UploadFlow::new(api.clone(), &UploadConfig::default());
    let form = filled_form();
    let sink = RecordingSink::default();

    let err = flow.submit(&form, &sink).await.unwrap_err();
    assert!(matches!(err, UploadError::Api(_)));
    assert_eq!(flow.phase(), UploadPhase::Idle);
    assert_eq!(flow.error(), Some("Upload failed: server said 500 (HTTP 500)"));
    assert!(flow.receipt().is_none());
    assert_eq!(form.images().len(), 2);
    assert_eq!(
        *sink.0.lock().unwrap(),
        vec![UploadPhase::Uploading, UploadPhase::Idle]
    );
    assert_eq!(api.calls(), vec!["create_report"]);
}

#[tokio::test(start_paused = true)]
async fn successful_submit_walks_the_phases_and_reads_related_matches() {
    let api = Arc::new(FakeApi::with_matches(vec![
        pending_match_between("m1", "lost-9", "new-report"),
        pending_match_between("m2", "lost-9", "found-3"),
        pending_match_between("m3", "new-report", "found-7"),
    ]));
    let mut flow = UploadFlow::new(api.clone(), &UploadConfig::default());
    let sink = RecordingSink::default();

    let started = tokio::time::Instant::now();
    let receipt = flow.submit(&filled_form(), &sink).await.unwrap();
    assert!(started.elapsed() >= UploadConfig::default().match_settle());

    assert_eq!(receipt.report.report_id, "new-report");
    assert_eq!(receipt.report.image_count(), 2);
    let related: Vec<&str> = receipt.related_matches.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(related, vec!["m1", "m3"]);

    assert_eq!(flow.phase(), UploadPhase::Complete);
    assert!(flow.error().is_none());
    assert_eq!(
        *sink.0.lock().unwrap(),
        vec![
            UploadPhase::Uploading,
            UploadPhase::Analyzing,
            UploadPhase::Saving,
            UploadPhase::Complete,
        ]
    );

    let submitted = api.submitted.lock().unwrap();
    assert_eq!(submitted[0].user_location, "Santa Cruz, CA");
    assert_eq!(submitted[0].report_type, ReportType::Found);
    assert_eq!(submitted[0].images.len(), 2);
    assert_eq!(submitted[0].images[0].mime, "image/png");
}

#[tokio::test(start_paused = true)]
async fn failed_match_read_still_completes() {
    let api = Arc::new(FakeApi::default());
    *api.matches_error.lock().unwrap() = Some(502);
    let mut flow = UploadFlow::new(api.clone(), &UploadConfig::default());

    let receipt = flow.submit(&filled_form(), &NoProgress).await.unwrap();
    assert!(receipt.related_matches.is_empty());
    assert_eq!(flow.phase(), UploadPhase::Complete);
    assert_eq!(api.calls(), vec!["create_report", "list_matches"]);
}

#[test]
fn duplicate_and_empty_selections() {
    let mut form = UploadForm::new();
    assert_eq!(
        form.add_images(Vec::new()).unwrap_err(),
        ValidationError::NoImagesSelected
    );
    let a = ImageFile::from_bytes("a.png", png_bytes(7)).unwrap();
    let a_again = ImageFile::from_bytes("copy-of-a.png", png_bytes(7)).unwrap();
    assert_eq!(form.add_images(vec![a]).unwrap(), 1);
    assert_eq!(form.add_images(vec![a_again]).unwrap(), 0);
    assert_eq!(form.images().len(), 1);
    assert_eq!(form.remove_image(3).unwrap_err(), ValidationError::NoSuchImage(3));
}

#[test]
fn contact_prefill_only_fills_blanks() {
    let user = SessionUser {
        sub: "auth0|1".into(),
        name: Some("Jo Doe".into()),
        nickname: None,
        email: Some("jo@example.com".into()),
        picture: None,
    };
    let mut form = UploadForm::new();
    form.user_email = "other@example.com".into();
    form.prefill_contact(&user);
    assert_eq!(form.user_name, "Jo Doe");
    assert_eq!(form.user_email, "other@example.com");
}
