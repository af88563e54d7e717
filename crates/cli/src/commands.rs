//! Line commands understood by the interactive loops.

use pawscout_core::queue::Direction;
use pawscout_core::shell::View;
use pawscout_core::sightings::SightingFilter;
use providers::{Decision, ReportType};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewCommand {
    Decide(Decision),
    Move(Direction),
    Compare,
    Retry,
    Help,
    Quit,
}

impl FromStr for ReviewCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "a" | "accept" | "y" => Ok(ReviewCommand::Decide(Decision::Accept)),
            "r" | "reject" | "x" => Ok(ReviewCommand::Decide(Decision::Reject)),
            "c" | "compare" => Ok(ReviewCommand::Compare),
            "retry" | "refresh" | "reload" => Ok(ReviewCommand::Retry),
            "?" | "h" | "help" => Ok(ReviewCommand::Help),
            "q" | "quit" | "exit" => Ok(ReviewCommand::Quit),
            other => other
                .parse::<Direction>()
                .map(ReviewCommand::Move)
                .map_err(|_| format!("unknown command: {other}")),
        }
    }
}

/// `all` (any case) clears the filter.
fn optional<T>(value: &str, parse: impl Fn(&str) -> Result<T, String>) -> Result<Option<T>, String> {
    if value.trim().eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        parse(value).map(Some)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryCommand {
    PetType(Option<String>),
    Status(Option<ReportType>),
    Search(String),
    Retry,
}

impl FromStr for GalleryCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (head, rest) = s.split_once(' ').unwrap_or((s, ""));
        let rest = rest.trim();
        match head {
            "retry" | "refresh" => Ok(GalleryCommand::Retry),
            "type" if !rest.is_empty() => optional(rest, |v| Ok(capitalize(v))).map(GalleryCommand::PetType),
            "status" if !rest.is_empty() => {
                optional(rest, |v| v.parse::<ReportType>()).map(GalleryCommand::Status)
            }
            "search" => Ok(GalleryCommand::Search(rest.to_string())),
            _ => Err(format!("unknown gallery command: {s}")),
        }
    }
}

/// Pet types are stored capitalized (`Dog`, `Cat`).
fn capitalize(value: &str) -> String {
    let value = value.trim().to_lowercase();
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Open(View),
    Help,
    Quit,
    /// Anything else is handed to the current view.
    Forward(String),
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty command".to_string());
        }
        match s {
            "help" | "?" => return Ok(ShellCommand::Help),
            "quit" | "exit" | "q" => return Ok(ShellCommand::Quit),
            _ => {}
        }
        let target = s.strip_prefix("go ").unwrap_or(s);
        match target.parse::<View>() {
            Ok(view) => Ok(ShellCommand::Open(view)),
            Err(_) => Ok(ShellCommand::Forward(s.to_string())),
        }
    }
}

pub fn parse_map_filter(line: &str) -> Result<SightingFilter, String> {
    let line = line.trim();
    let value = line.strip_prefix("filter").map(str::trim).unwrap_or(line);
    value.parse()
}
