use crate::config::AppConfig;
use providers::http::{HttpApi, HttpConfig};
use providers::noop::NoopApi;
use providers::PetApi;
use std::sync::Arc;
use tracing::{info, warn};

pub fn build_api(config: &AppConfig) -> Arc<dyn PetApi> {
    match config.api.provider.as_str() {
        "noop" => {
            info!("using offline API provider");
            Arc::new(NoopApi)
        }
        other => {
            if other != "http" {
                warn!(provider = other, "unknown API provider, falling back to http");
            }
            Arc::new(HttpApi::new(HttpConfig {
                base_url: config.api.base_url.clone(),
            }))
        }
    }
}
