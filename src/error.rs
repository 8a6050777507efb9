// src/error.rs
use std::time::Duration;

/// Failure taxonomy for the scrape pipeline. Everything here is absorbed at
/// the orchestrator boundary; callers of `scrape_all_portals` never see it.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("rate limit exceeded for source '{0}'")]
    RateLimitExceeded(String),

    #[error("page load timed out after {0:?}")]
    NavigationTimeout(Duration),

    #[error("selector probes exhausted for {field} on {portal}")]
    ParseMiss { portal: String, field: String },

    #[error("duplicate job identity at store: {0}")]
    PersistenceConflict(String),

    #[error("automation resource unavailable: {0}")]
    AutomationUnavailable(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl ScrapeError {
    pub fn parse_miss(portal: &str, field: &str) -> Self {
        Self::ParseMiss {
            portal: portal.to_string(),
            field: field.to_string(),
        }
    }
}
