use crate::config::AppConfig;
use crate::gallery::GallerySession;
use crate::review::ReviewSession;
use crate::sightings::MapSession;
use providers::PetApi;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum View {
    #[default]
    Dashboard,
    Matches,
    Gallery,
    Map,
    Upload,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Dashboard,
        View::Matches,
        View::Gallery,
        View::Map,
        View::Upload,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            View::Dashboard => "Home",
            View::Matches => "Matches",
            View::Gallery => "Gallery",
            View::Map => "Map",
            View::Upload => "Report a pet",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            View::Dashboard => "home",
            View::Matches => "matches",
            View::Gallery => "gallery",
            View::Map => "map",
            View::Upload => "upload",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "home" | "dashboard" => Ok(View::Dashboard),
            "matches" | "swipe" | "review" => Ok(View::Matches),
            "gallery" => Ok(View::Gallery),
            "map" => Ok(View::Map),
            "upload" | "report" => Ok(View::Upload),
            other => Err(format!("unknown view: {other}")),
        }
    }
}

/// Owns the current view and the per-view sessions. Views get borrowed from
/// here, so leaving a view and coming back finds it as it was.
pub struct Shell {
    current: View,
    pub review: ReviewSession,
    pub gallery: GallerySession,
    pub map: MapSession,
}

impl Shell {
    pub fn new(api: Arc<dyn PetApi>, cfg: &AppConfig) -> Self {
        Self {
            current: View::default(),
            review: ReviewSession::new(api.clone(), &cfg.review),
            gallery: GallerySession::new(api.clone(), &cfg.gallery),
            map: MapSession::new(api, &cfg.gallery),
        }
    }

    pub fn current(&self) -> View {
        self.current
    }

    /// Returns true when the view actually changed.
    pub fn navigate(&mut self, view: View) -> bool {
        if self.current == view {
            return false;
        }
        self.current = view;
        true
    }
}
