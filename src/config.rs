//! Process configuration from the environment

use crate::llm::LlmConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub db_path: PathBuf,
    pub catalog_path: Option<PathBuf>,
    pub generation_timeout: Duration,
    pub demo_mode: bool,
    /// Raw comma-separated list; the gate trims and filters it
    pub demo_places: String,
    pub llm: LlmConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let var = |key: &str| std::env::var(key).ok();

        let db_path = var("TRIPMATE_DB_PATH").map_or_else(
            || {
                let home = var("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(format!("{home}/.tripmate/tripmate.db"))
            },
            PathBuf::from,
        );

        Self {
            port: var("TRIPMATE_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            db_path,
            catalog_path: var("TRIPMATE_CATALOG_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            generation_timeout: Duration::from_secs(
                var("TRIPMATE_GENERATION_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(20),
            ),
            demo_mode: var("DEMO_MODE").is_some_and(|v| parse_flag(&v)),
            demo_places: var("DEMO_PLACES").unwrap_or_default(),
            llm: LlmConfig::from_env(),
        }
    }
}

/// `true`, `1`, `yes`, `on` in any case
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
