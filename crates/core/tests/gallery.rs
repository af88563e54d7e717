mod common;

use common::{report, FakeApi};
use pawscout_core::config::GalleryConfig;
use pawscout_core::gallery::{
    is_pet_report, refilter, CardStatus, GalleryCard, GalleryFilter, GallerySession, GalleryState,
};
use providers::ReportType;
use std::sync::Arc;

#[test]
fn map_screenshots_are_dropped() {
    let mut by_file = report("r1", ReportType::Lost, "Dog");
    by_file.image_urls = vec!["https://img.test/uploads/street_MAP_01.png".into()];
    let mut by_species = report("r2", ReportType::Found, "Dog");
    by_species.tags.species = "Map".into();
    let mut by_description = report("r3", ReportType::Found, "Cat");
    by_description.description = Some("Screenshot from Google Maps".into());
    let mut near_miss = report("r4", ReportType::Found, "Cat");
    near_miss.description = Some("Found near the mapleton bus stop".into());

    assert!(!is_pet_report(&by_file));
    assert!(!is_pet_report(&by_species));
    assert!(!is_pet_report(&by_description));
    assert!(is_pet_report(&near_miss));
}

#[test]
fn text_fields_match_map_as_a_whole_word_but_file_names_as_a_substring() {
    let mut mapped = report("r5", ReportType::Lost, "Dog");
    mapped.tags.species = "Mapped".into();
    mapped.description = Some("Route mapped out by neighbours".into());
    assert!(is_pet_report(&mapped));

    let mut maps = report("r6", ReportType::Lost, "Dog");
    maps.description = Some("see maps.".into());
    assert!(!is_pet_report(&maps));

    let mut sitemap = report("r7", ReportType::Lost, "Dog");
    sitemap.image_urls = vec!["https://img.test/uploads/sitemapped.jpg".into()];
    assert!(!is_pet_report(&sitemap));
}

#[test]
fn refilter_applies_type_and_status_again() {
    let mut matched = report("m", ReportType::Lost, "Dog");
    matched.is_matched = true;
    let reports = vec![
        report("a", ReportType::Lost, "Dog"),
        report("b", ReportType::Found, "dog"),
        report("c", ReportType::Lost, "Cat"),
        matched,
    ];

    let filter = GalleryFilter {
        pet_type: Some("Dog".into()),
        report_type: Some(ReportType::Lost),
        search: String::new(),
    };
    let ids: Vec<String> = refilter(&reports, &filter).into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["a"]);

    let all = refilter(&reports, &GalleryFilter::default());
    assert_eq!(all.len(), 4);
    assert_eq!(all[3].status, CardStatus::Matched);
}

#[test]
fn cards_fill_in_missing_details() {
    let mut r = report("x", ReportType::Lost, "Cat");
    r.pet_name = Some("  ".into());
    r.location = String::new();
    r.description = None;
    r.tags.breed = "Siamese".into();
    r.tags.primary_color = "Cream".into();
    r.created_at = chrono::DateTime::parse_from_rfc3339("2024-03-05T10:00:00Z")
        .unwrap()
        .with_timezone(&chrono::Utc);

    let card = GalleryCard::from(&r);
    assert_eq!(card.name, "Unknown");
    assert_eq!(card.location, "Unknown");
    assert_eq!(card.pet_type, "cat");
    assert_eq!(card.status.label(), "Missing");
    assert_eq!(card.description, "A Siamese with Cream coloring");
    assert_eq!(card.date, "Mar 5, 2024");
    assert_eq!(card.image.as_deref(), Some("https://img.test/x.jpg"));
}

#[tokio::test]
async fn filter_changes_fetch_right_away_but_search_text_does_not() {
    let api = Arc::new(FakeApi::with_reports(vec![
        report("a", ReportType::Lost, "Dog"),
        report("b", ReportType::Found, "Cat"),
    ]));
    let mut gallery = GallerySession::new(api.clone(), &GalleryConfig::default());

    assert_eq!(gallery.set_pet_type(Some("Cat".into())).await.unwrap(), 1);
    assert_eq!(gallery.cards()[0].id, "b");

    gallery.set_search("tabby");
    assert_eq!(api.calls().len(), 1);

    gallery.set_report_type(Some(ReportType::Found)).await.unwrap();
    let queries = api.report_queries.lock().unwrap();
    assert_eq!(queries.len(), 2);
    let last = &queries[1];
    assert_eq!(last.pet_type.as_deref(), Some("Cat"));
    assert_eq!(last.report_type, Some(ReportType::Found));
    assert_eq!(last.search.as_deref(), Some("tabby"));
    assert_eq!(last.status.as_deref(), Some("active"));
    assert_eq!(last.limit, Some(100));
}

#[tokio::test]
async fn failed_fetch_offers_retry() {
    let api = Arc::new(FakeApi::with_reports(vec![report("a", ReportType::Lost, "Dog")]));
    *api.list_error.lock().unwrap() = Some(500);
    let mut gallery = GallerySession::new(api.clone(), &GalleryConfig::default());

    assert!(gallery.refresh().await.is_err());
    assert_eq!(
        gallery.state(),
        &GalleryState::Failed("server said 500".into())
    );
    assert!(gallery.cards().is_empty());

    *api.list_error.lock().unwrap() = None;
    assert_eq!(gallery.refresh().await.unwrap(), 1);
    assert!(matches!(gallery.state(), GalleryState::Loaded(cards) if cards.len() == 1));
}
