// src/config.rs
//! Unified configuration - every empirically chosen threshold lives here.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fetch: FetchConfig,
    pub limits: RateLimitConfig,
    pub retry: RetryConfig,
    pub scoring: ScoringConfig,
    pub scrape: ScrapeConfig,
    pub scheduler: SchedulerConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Requests allowed per source within one window.
    pub requests_per_window: u32,
    pub window_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Jobs scoring below this are dropped from the ranked output.
    pub min_score: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Upper bound on synthesized fallback jobs per source.
    pub fallback_jobs_cap: usize,
    /// Optional per-source deadline for one batch; timed-out sources
    /// contribute only a summary entry.
    pub deadline_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub period_hours: u64,
    pub branch_delay_secs: u64,
    /// Branch codes tracked by the periodic scrape.
    pub branches: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub database_path: PathBuf,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_window: 30,
            window_secs: 60,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            delay_ms: 500,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { min_score: 40 }
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            fallback_jobs_cap: 5,
            deadline_secs: Some(90),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            period_hours: 6,
            branch_delay_secs: 30,
            branches: vec![
                "cse".into(),
                "it".into(),
                "ece".into(),
                "eee".into(),
                "mech".into(),
                "civil".into(),
            ],
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("data/jobscout.db"),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            limits: RateLimitConfig::default(),
            retry: RetryConfig::default(),
            scoring: ScoringConfig::default(),
            scrape: ScrapeConfig::default(),
            scheduler: SchedulerConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then an optional TOML overlay, then
    /// environment overrides for the most commonly tuned knobs.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = match Self::overlay_path(config_path) {
            Some(path) => {
                info!("Loading configuration overlay from {}", path.display());
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?
            }
            None => Self::default(),
        };

        if let Ok(path) = std::env::var("JOBSCOUT_DB_PATH") {
            config.store.database_path = PathBuf::from(path);
        }
        if let Some(min_score) = Self::env_number("JOBSCOUT_MIN_SCORE") {
            config.scoring.min_score = min_score;
        }
        if let Some(hours) = Self::env_number("JOBSCOUT_PERIOD_HOURS") {
            config.scheduler.period_hours = hours;
        }

        Ok(config)
    }

    fn overlay_path(explicit: Option<&PathBuf>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.clone());
        }
        let default = PathBuf::from("jobscout.toml");
        default.exists().then_some(default)
    }

    fn env_number<T: std::str::FromStr>(key: &str) -> Option<T> {
        std::env::var(key).ok().and_then(|v| v.parse().ok())
    }

    /// Ensure the database directory exists before the pool connects.
    pub async fn ensure_directories(&self) -> Result<()> {
        if let Some(parent) = self.store.database_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Ok(())
    }
}
