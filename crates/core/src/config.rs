use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub review: ReviewConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// `http` or `noop`
    pub provider: String,
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            provider: "http".to_string(),
            base_url: providers::http::DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    pub fetch_limit: u32,
    pub error_dismiss_secs: u64,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            fetch_limit: 50,
            error_dismiss_secs: 5,
        }
    }
}

impl ReviewConfig {
    pub fn error_dismiss(&self) -> Duration {
        Duration::from_secs(self.error_dismiss_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub match_settle_ms: u64,
    pub exclude: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            match_settle_ms: 2000,
            exclude: Vec::new(),
        }
    }
}

impl UploadConfig {
    pub fn match_settle(&self) -> Duration {
        Duration::from_millis(self.match_settle_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub debounce_ms: u64,
    pub limit: u32,
    pub status: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            limit: 100,
            status: "active".to_string(),
        }
    }
}

impl GalleryConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub path: Option<String>,
}

pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    settings = settings.add_source(
        config::Environment::with_prefix("PAWSCOUT")
            .prefix_separator("__")
            .separator("__"),
    );
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
