// src/fetch.rs
//! Shared page-fetch engine. One lazily started client handle is owned by
//! the orchestrator/scheduler; each adapter call gets a scoped session and
//! the handle is explicitly closed once a batch completes.

use crate::config::FetchConfig;
use crate::error::ScrapeError;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub struct FetchEngine {
    client: Mutex<Option<Client>>,
    timeout: Duration,
    user_agent: String,
}

impl FetchEngine {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            client: Mutex::new(None),
            timeout: Duration::from_secs(config.timeout_secs),
            user_agent: config.user_agent.clone(),
        }
    }

    /// Lazily start the engine and hand out a session handle. A failed
    /// start is `AutomationUnavailable` - fatal for the requesting source
    /// only, since every caller absorbs it into its summary.
    async fn acquire(&self) -> Result<Client, ScrapeError> {
        let mut guard = self.client.lock().await;
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }

        let client = Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .build()
            .map_err(|e| ScrapeError::AutomationUnavailable(e.to_string()))?;

        info!("Fetch engine started (timeout {:?})", self.timeout);
        *guard = Some(client.clone());
        Ok(client)
    }

    /// Fetch one rendered page. The session is scoped to this call and
    /// released on every exit path; timeouts map to `NavigationTimeout`.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        let client = self.acquire().await?;
        debug!("Fetching page: {}", url);

        let response = client
            .get(url)
            .header("Accept", "text/html,application/xhtml+xml")
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?
            .error_for_status()
            .map_err(ScrapeError::Network)?;

        response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))
    }

    fn map_transport_error(&self, error: reqwest::Error) -> ScrapeError {
        if error.is_timeout() {
            ScrapeError::NavigationTimeout(self.timeout)
        } else {
            ScrapeError::Network(error)
        }
    }

    /// Tear down the shared handle. Idempotent; the next `fetch_page`
    /// starts a fresh engine.
    pub async fn close(&self) {
        if self.client.lock().await.take().is_some() {
            info!("Fetch engine closed");
        }
    }

    pub async fn is_open(&self) -> bool {
        self.client.lock().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> FetchEngine {
        FetchEngine::new(&FetchConfig::default())
    }

    #[tokio::test]
    async fn test_engine_starts_lazily() {
        let engine = engine();
        assert!(!engine.is_open().await);
        engine.acquire().await.unwrap();
        assert!(engine.is_open().await);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let engine = engine();
        engine.acquire().await.unwrap();
        engine.close().await;
        engine.close().await;
        assert!(!engine.is_open().await);
    }
}
