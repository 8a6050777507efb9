// src/rate_limiter.rs
use crate::config::RateLimitConfig;
use crate::error::ScrapeError;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::warn;

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Per-source token buckets. Process-wide: one instance is shared by every
/// concurrent scrape batch, and governor's state is safe for concurrent
/// consumption without external locking.
pub struct SourceRateLimiter {
    buckets: HashMap<String, DirectLimiter>,
}

impl SourceRateLimiter {
    pub fn new(sources: &[&str], config: &RateLimitConfig) -> Self {
        let burst =
            NonZeroU32::new(config.requests_per_window.max(1)).unwrap_or(nonzero!(1u32));
        let window = Duration::from_secs(config.window_secs.max(1));
        let period = window / burst.get();

        let mut buckets = HashMap::new();
        for source in sources {
            let quota = Quota::with_period(period)
                .unwrap_or_else(|| Quota::per_minute(burst))
                .allow_burst(burst);
            buckets.insert(source.to_string(), RateLimiter::direct(quota));
        }
        Self { buckets }
    }

    /// Consume one point for `source`. Failure is non-fatal to the batch:
    /// the caller skips this source for the current call.
    pub fn consume(&self, source: &str) -> Result<(), ScrapeError> {
        let Some(bucket) = self.buckets.get(source) else {
            // Unknown sources are not throttled.
            return Ok(());
        };
        bucket.check().map_err(|_| {
            warn!("Rate limit exceeded for source '{}'", source);
            ScrapeError::RateLimitExceeded(source.to_string())
        })
    }
}
