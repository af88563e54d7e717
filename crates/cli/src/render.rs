//! Plain-text rendering of the views. Everything here is pure so it can be
//! tested without a terminal.

use pawscout_core::gallery::{GalleryCard, GalleryFilter, GalleryState};
use pawscout_core::review::ReviewView;
use pawscout_core::shell::View;
use pawscout_core::sightings::{SightingCluster, SightingFilter};
use pawscout_core::upload::{UploadPhase, UploadReceipt};
use providers::{Match, PetTags, ReportSummary, ReportType};
use serde_json::{json, Value};
use std::fmt::Write;

pub const REVIEW_HELP: &str =
    "[a]ccept  [r]eject  [n]ext  [p]rev  [c]ompare  [retry]  [q]uit";
pub const GALLERY_HELP: &str =
    "type <dog|cat|...|all>  status <lost|found|all>  search <text>  retry";

fn pet_label(report: &ReportSummary) -> String {
    match report.pet_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("Unknown {}", report.pet_type),
    }
}

fn tag_value(tags: &PetTags, key: &str) -> String {
    match key {
        "species" => tags.species.clone(),
        "breed" => tags.breed.clone(),
        "primary_color" => tags.primary_color.clone(),
        "age_group" => tags.age_group.clone(),
        "size" => tags.size.clone(),
        "marks" => tags.marks.join(", "),
        _ => String::new(),
    }
}

const COMPARED_TAGS: [&str; 6] = [
    "species",
    "breed",
    "primary_color",
    "age_group",
    "size",
    "marks",
];

pub fn match_line(m: &Match) -> String {
    format!(
        "{}  {} <-> {}  score {}  [{}]",
        m.id,
        pet_label(&m.lost_report),
        pet_label(&m.found_report),
        m.match_score,
        m.matched_tags.join(", ")
    )
}

fn side(out: &mut String, label: &str, report: &ReportSummary) {
    let _ = writeln!(
        out,
        "  {label:<5} {} ({}) - {}",
        pet_label(report),
        report.pet_type,
        if report.location.trim().is_empty() {
            "Unknown"
        } else {
            report.location.as_str()
        }
    );
    if let Some(url) = report.image_urls.first() {
        let _ = writeln!(out, "        {url}");
    }
}

pub fn review(view: &ReviewView<'_>) -> String {
    let mut out = String::new();
    match view {
        ReviewView::Failed { message } => {
            let _ = writeln!(out, "Could not load matches: {message}");
            out.push_str("Type `retry` to try again.\n");
        }
        ReviewView::Empty => out.push_str("No pending matches to review.\n"),
        ReviewView::Reviewing {
            current,
            position,
            total,
            comparing,
            processing,
            notice,
        } => {
            let _ = writeln!(
                out,
                "Match {position} of {total}  (score {})",
                current.match_score
            );
            side(&mut out, "LOST", &current.lost_report);
            side(&mut out, "FOUND", &current.found_report);
            if *comparing {
                let _ = writeln!(out, "  {:<15} {:<20} {:<20}", "", "lost", "found");
                for key in COMPARED_TAGS {
                    let marker = if current.matched_tags.iter().any(|t| t == key) {
                        "*"
                    } else {
                        " "
                    };
                    let _ = writeln!(
                        out,
                        "{marker} {key:<15} {:<20} {:<20}",
                        tag_value(&current.lost_report.tags, key),
                        tag_value(&current.found_report.tags, key)
                    );
                }
            } else if !current.matched_tags.is_empty() {
                let _ = writeln!(out, "  matched on: {}", current.matched_tags.join(", "));
            }
            if *processing {
                out.push_str("  processing...\n");
            }
            if let Some(notice) = notice {
                let _ = writeln!(out, "! {notice}");
            }
            out.push_str(REVIEW_HELP);
            out.push('\n');
        }
    }
    out
}

pub fn card_line(card: &GalleryCard) -> String {
    format!(
        "[{}] {} ({}, {}) - {} - {}",
        card.status.label(),
        card.name,
        card.pet_type,
        card.breed,
        card.location,
        card.date
    )
}

pub fn card_json(card: &GalleryCard) -> Value {
    json!({
        "id": card.id,
        "name": card.name,
        "type": card.pet_type,
        "breed": card.breed,
        "status": card.status.label().to_lowercase(),
        "location": card.location,
        "date": card.date,
        "image": card.image,
        "description": card.description,
    })
}

fn filters_active(filter: &GalleryFilter) -> bool {
    filter.pet_type.is_some() || filter.report_type.is_some() || !filter.search.trim().is_empty()
}

pub fn gallery(state: &GalleryState, filter: &GalleryFilter) -> String {
    let mut out = String::new();
    match state {
        GalleryState::Idle => out.push_str("Loading pets...\n"),
        GalleryState::Failed(message) => {
            let _ = writeln!(out, "Could not load pets: {message}");
            out.push_str("Type `retry` to try again.\n");
        }
        GalleryState::Loaded(cards) if cards.is_empty() => {
            out.push_str("No pets found\n");
            if filters_active(filter) {
                out.push_str("Try adjusting your search or filters.\n");
            } else {
                out.push_str("No pets have been reported yet.\n");
            }
        }
        GalleryState::Loaded(cards) => {
            let _ = writeln!(out, "{} pets", cards.len());
            for card in cards {
                out.push_str(&card_line(card));
                out.push('\n');
            }
        }
    }
    out
}

pub fn clusters(clusters: &[SightingCluster], filter: SightingFilter) -> String {
    let mut out = String::new();
    if clusters.is_empty() {
        let _ = writeln!(out, "No sightings to show ({filter:?}).");
        return out;
    }
    for c in clusters {
        let kind = match c.kind() {
            ReportType::Lost => "lost",
            ReportType::Found => "found",
        };
        let _ = writeln!(
            out,
            "{} - {} reports ({} lost, {} found) [{kind}]",
            c.location,
            c.count(),
            c.lost,
            c.found
        );
        for pet in &c.pets {
            let _ = writeln!(out, "    {} {} ({})", pet.report_type, pet.name, pet.report_id);
        }
    }
    out
}

pub fn phase(phase: UploadPhase) -> String {
    match phase {
        UploadPhase::Complete => format!("[done] {phase}"),
        UploadPhase::Idle => format!("[idle] {phase}"),
        _ => format!("[....] {phase}"),
    }
}

pub fn receipt(receipt: &UploadReceipt) -> String {
    let mut out = String::new();
    let report = &receipt.report;
    let _ = writeln!(
        out,
        "Report {} created with {} image(s).",
        report.report_id,
        report.image_count()
    );
    let detected = &report.detected_pet;
    let described: Vec<&str> = [&detected.primary_color, &detected.breed, &detected.species]
        .into_iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if !described.is_empty() {
        let _ = writeln!(out, "Detected: {}", described.join(" "));
    }
    if receipt.related_matches.is_empty() {
        out.push_str("No matches yet. We'll keep looking.\n");
    } else {
        let _ = writeln!(out, "{} possible match(es):", receipt.related_matches.len());
        for m in &receipt.related_matches {
            let _ = writeln!(out, "  {}", match_line(m));
        }
    }
    out
}

pub fn home() -> String {
    let mut out = String::from("Views:\n");
    for view in View::ALL {
        let _ = writeln!(out, "  {:<8} {}", view.key(), view.label());
    }
    out.push_str("Type a view name to open it, `help` for commands, `quit` to leave.\n");
    out
}
