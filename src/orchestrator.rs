// src/orchestrator.rs
//! Runs every portal adapter concurrently and independently, then threads
//! the aggregate through dedup, quality, relevance, and scoring. No single
//! source failure - rate limit, timeout, parse miss, dead automation - can
//! abort the batch or surface to the caller.

use crate::config::AppConfig;
use crate::error::ScrapeError;
use crate::fetch::FetchEngine;
use crate::keywords::KeywordGenerator;
use crate::ontology::SkillOntology;
use crate::pipeline::{dedupe, filter_quality, filter_relevant, score_and_rank};
use crate::portals::{
    enrich_with_defaults, synthetic_results, IndeedAdapter, LinkedInAdapter, NaukriAdapter,
    PortalAdapter, TimesJobsAdapter,
};
use crate::rate_limiter::SourceRateLimiter;
use crate::retry::RetryPolicy;
use crate::types::{CandidateProfile, EnrichedJobRecord, ScoredJob, SourceSummary};
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{info, warn};

pub struct ScrapeOutcome {
    pub jobs: Vec<ScoredJob>,
    pub summaries: Vec<SourceSummary>,
}

pub struct ScrapeOrchestrator {
    adapters: Vec<Arc<dyn PortalAdapter>>,
    engine: Arc<FetchEngine>,
    limiter: Arc<SourceRateLimiter>,
    retry: RetryPolicy,
    ontology: Arc<SkillOntology>,
    config: Arc<AppConfig>,
}

impl ScrapeOrchestrator {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let adapters: Vec<Arc<dyn PortalAdapter>> = vec![
            Arc::new(LinkedInAdapter),
            Arc::new(IndeedAdapter),
            Arc::new(NaukriAdapter),
            Arc::new(TimesJobsAdapter),
        ];
        Self::with_adapters(config, adapters)
    }

    /// Construction seam for tests and alternative source sets.
    pub fn with_adapters(config: Arc<AppConfig>, adapters: Vec<Arc<dyn PortalAdapter>>) -> Self {
        let sources: Vec<&str> = adapters.iter().map(|a| a.name()).collect();
        Self {
            limiter: Arc::new(SourceRateLimiter::new(&sources, &config.limits)),
            retry: RetryPolicy::from_config(&config.retry),
            engine: Arc::new(FetchEngine::new(&config.fetch)),
            ontology: Arc::new(SkillOntology::new()),
            adapters,
            config,
        }
    }

    /// Idempotent teardown of the shared automation resource.
    pub async fn close_browser(&self) {
        self.engine.close().await;
    }

    /// Scrape every portal for one candidate. Always returns; a caller
    /// sees an empty list only when every source failed and nothing could
    /// be synthesized.
    pub async fn scrape_all_portals(
        &self,
        profile: &CandidateProfile,
        branch: &str,
    ) -> ScrapeOutcome {
        let keywords = KeywordGenerator::generate(profile, branch);
        if keywords.is_empty() {
            warn!("Empty keyword set for branch '{}'; nothing to search", branch);
            return ScrapeOutcome {
                jobs: vec![],
                summaries: vec![],
            };
        }
        info!(
            "Scraping {} portals for branch '{}' with keywords: {:?}",
            self.adapters.len(),
            branch,
            keywords
        );

        let deadline = self.config.scrape.deadline_secs.map(Duration::from_secs);
        let mut handles = Vec::with_capacity(self.adapters.len());
        let mut names = Vec::with_capacity(self.adapters.len());

        for adapter in &self.adapters {
            names.push(adapter.name());
            let adapter = adapter.clone();
            let engine = self.engine.clone();
            let limiter = self.limiter.clone();
            let retry = self.retry.clone();
            let keywords = keywords.clone();
            let location = profile.city.clone();
            let fallback_cap = self.config.scrape.fallback_jobs_cap;

            handles.push(tokio::spawn(collect_source(
                adapter, engine, limiter, retry, keywords, location, fallback_cap, deadline,
            )));
        }

        let mut summaries = Vec::new();
        let mut collected: Vec<EnrichedJobRecord> = Vec::new();
        for (name, joined) in names.into_iter().zip(join_all(handles).await) {
            match joined {
                Ok((summary, records)) => {
                    summaries.push(summary);
                    collected.extend(records);
                }
                Err(join_error) => {
                    warn!("[{}] adapter task aborted: {}", name, join_error);
                    summaries.push(SourceSummary {
                        source: name.to_string(),
                        returned: 0,
                        error: Some(format!("task aborted: {join_error}")),
                        fallback_used: false,
                    });
                }
            }
        }

        let total = collected.len();
        let unique = dedupe(collected);
        let complete = filter_quality(unique);
        let relevant = filter_relevant(complete, profile, &self.ontology);
        let jobs = score_and_rank(
            relevant,
            profile,
            &self.ontology,
            self.config.scoring.min_score,
        );

        info!(
            "Batch complete: {} collected, {} ranked above cutoff",
            total,
            jobs.len()
        );
        ScrapeOutcome { jobs, summaries }
    }
}

/// Gather one source end to end: rate-limit gate, retried search with
/// synthetic fallback, then per-record enrichment. Infallible by design.
///
/// The deadline covers the search/retry phase and acts as a running budget
/// for enrichment: records already collected survive expiry, with any
/// still-unenriched ones degrading to generic defaults.
#[allow(clippy::too_many_arguments)]
async fn collect_source(
    adapter: Arc<dyn PortalAdapter>,
    engine: Arc<FetchEngine>,
    limiter: Arc<SourceRateLimiter>,
    retry: RetryPolicy,
    keywords: Vec<String>,
    location: String,
    fallback_cap: usize,
    deadline: Option<Duration>,
) -> (SourceSummary, Vec<EnrichedJobRecord>) {
    let name = adapter.name();

    if let Err(error) = limiter.consume(name) {
        return (
            SourceSummary {
                source: name.to_string(),
                returned: 0,
                error: Some(error.to_string()),
                fallback_used: false,
            },
            vec![],
        );
    }

    let started = Instant::now();
    let search_url = adapter.search_url(&keywords, &location);
    let search = retry.run_with_fallback(
        name,
        || {
            let adapter = adapter.clone();
            let engine = engine.clone();
            let keywords = keywords.clone();
            let location = location.clone();
            async move { adapter.search(&engine, &keywords, &location).await }
        },
        || synthetic_results(name, &keywords, &search_url, &location, fallback_cap),
    );
    let (raw_records, search_error) = match deadline {
        Some(limit) => match timeout(limit, search).await {
            Ok(result) => result,
            Err(_) => {
                warn!("[{}] deadline of {:?} hit during search, synthesizing", name, limit);
                (
                    synthetic_results(name, &keywords, &search_url, &location, fallback_cap),
                    Some(ScrapeError::NavigationTimeout(limit)),
                )
            }
        },
        None => search.await,
    };
    let fallback_used = search_error.is_some();

    // Synthesized records carry the search URL that just failed; fetching
    // it again per record would be pointless, so they take defaults.
    let enriched: Vec<EnrichedJobRecord> = if fallback_used {
        raw_records.into_iter().map(enrich_with_defaults).collect()
    } else {
        let mut enriched = Vec::with_capacity(raw_records.len());
        for record in raw_records {
            let remaining = deadline.map(|limit| limit.saturating_sub(started.elapsed()));
            enriched.push(match remaining {
                Some(budget) if budget.is_zero() => enrich_with_defaults(record),
                Some(budget) => match timeout(budget, adapter.enrich(&engine, record.clone())).await
                {
                    Ok(done) => done,
                    Err(_) => {
                        warn!(
                            "[{}] deadline hit mid-enrichment, '{}' takes defaults",
                            name, record.title
                        );
                        enrich_with_defaults(record)
                    }
                },
                None => adapter.enrich(&engine, record).await,
            });
        }
        enriched
    };

    (
        SourceSummary {
            source: name.to_string(),
            returned: enriched.len(),
            error: search_error.map(|e| e.to_string()),
            fallback_used,
        },
        enriched,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FetchConfig, RateLimitConfig};
    use crate::types::RawJobRecord;
    use async_trait::async_trait;
    use tokio::time::sleep;

    struct StaticAdapter {
        name: &'static str,
        titles: Vec<&'static str>,
    }

    #[async_trait]
    impl PortalAdapter for StaticAdapter {
        fn name(&self) -> &'static str {
            self.name
        }
        fn max_results(&self) -> usize {
            10
        }
        fn search_url(&self, _keywords: &[String], _location: &str) -> String {
            format!("https://{}.example.com/search", self.name)
        }
        async fn search(
            &self,
            _engine: &FetchEngine,
            _keywords: &[String],
            location: &str,
        ) -> Result<Vec<RawJobRecord>, ScrapeError> {
            Ok(self
                .titles
                .iter()
                .map(|title| RawJobRecord {
                    title: title.to_string(),
                    company: "Acme Corp".into(),
                    location: location.to_string(),
                    source: self.name.to_string(),
                    url: format!("https://{}.example.com/j/1", self.name),
                    posted_at: None,
                    salary_text: None,
                    remote: true,
                })
                .collect())
        }
        async fn enrich(&self, _engine: &FetchEngine, record: RawJobRecord) -> EnrichedJobRecord {
            enrich_with_defaults(record)
        }
    }

    struct BrokenAdapter;

    #[async_trait]
    impl PortalAdapter for BrokenAdapter {
        fn name(&self) -> &'static str {
            "broken"
        }
        fn max_results(&self) -> usize {
            10
        }
        fn search_url(&self, _keywords: &[String], _location: &str) -> String {
            "https://broken.example.com/search".into()
        }
        async fn search(
            &self,
            _engine: &FetchEngine,
            _keywords: &[String],
            _location: &str,
        ) -> Result<Vec<RawJobRecord>, ScrapeError> {
            Err(ScrapeError::parse_miss("broken", "job cards"))
        }
        async fn enrich(&self, _engine: &FetchEngine, record: RawJobRecord) -> EnrichedJobRecord {
            enrich_with_defaults(record)
        }
    }

    /// Search fails fast, detail enrichment stalls. The fabricated records
    /// must never depend on the stalled enrichment path.
    struct StalledDetailAdapter;

    #[async_trait]
    impl PortalAdapter for StalledDetailAdapter {
        fn name(&self) -> &'static str {
            "stalled"
        }
        fn max_results(&self) -> usize {
            10
        }
        fn search_url(&self, _keywords: &[String], _location: &str) -> String {
            "https://stalled.example.com/search".into()
        }
        async fn search(
            &self,
            _engine: &FetchEngine,
            _keywords: &[String],
            _location: &str,
        ) -> Result<Vec<RawJobRecord>, ScrapeError> {
            Err(ScrapeError::parse_miss("stalled", "job cards"))
        }
        async fn enrich(&self, _engine: &FetchEngine, record: RawJobRecord) -> EnrichedJobRecord {
            sleep(Duration::from_millis(400)).await;
            enrich_with_defaults(record)
        }
    }

    /// Search returns instantly, each enrichment takes 600ms and tags the
    /// record so the test can tell enriched apart from defaulted.
    struct SlowEnrichAdapter;

    #[async_trait]
    impl PortalAdapter for SlowEnrichAdapter {
        fn name(&self) -> &'static str {
            "slow"
        }
        fn max_results(&self) -> usize {
            10
        }
        fn search_url(&self, _keywords: &[String], _location: &str) -> String {
            "https://slow.example.com/search".into()
        }
        async fn search(
            &self,
            _engine: &FetchEngine,
            _keywords: &[String],
            location: &str,
        ) -> Result<Vec<RawJobRecord>, ScrapeError> {
            Ok((0..3)
                .map(|i| RawJobRecord {
                    title: format!("React Developer {i}"),
                    company: "Acme Corp".into(),
                    location: location.to_string(),
                    source: "slow".into(),
                    url: format!("https://slow.example.com/j/{i}"),
                    posted_at: None,
                    salary_text: None,
                    remote: true,
                })
                .collect())
        }
        async fn enrich(&self, _engine: &FetchEngine, record: RawJobRecord) -> EnrichedJobRecord {
            sleep(Duration::from_millis(600)).await;
            let mut enriched = enrich_with_defaults(record);
            enriched.job_type = "Contract".into();
            enriched
        }
    }

    fn test_config() -> Arc<AppConfig> {
        let mut config = AppConfig::default();
        config.retry.delay_ms = 1;
        Arc::new(config)
    }

    fn profile(skills: &[&str]) -> CandidateProfile {
        CandidateProfile {
            technical_skills: skills.iter().map(|s| s.to_string()).collect(),
            soft_skills: vec![],
            experience_years: 0.5,
            city: "pune".into(),
            country: "india".into(),
        }
    }

    #[tokio::test]
    async fn test_one_failing_source_never_aborts_the_batch() {
        let orchestrator = ScrapeOrchestrator::with_adapters(
            test_config(),
            vec![
                Arc::new(StaticAdapter {
                    name: "alpha",
                    titles: vec!["React Developer"],
                }),
                Arc::new(BrokenAdapter),
            ],
        );
        let outcome = orchestrator
            .scrape_all_portals(&profile(&["React"]), "cse")
            .await;

        assert_eq!(outcome.summaries.len(), 2);
        assert!(outcome
            .jobs
            .iter()
            .any(|j| j.record.raw.title == "React Developer"));
        let broken = outcome
            .summaries
            .iter()
            .find(|s| s.source == "broken")
            .unwrap();
        assert!(broken.fallback_used);
        assert!(broken.error.is_some());
    }

    #[tokio::test]
    async fn test_exhausted_source_still_yields_fallback_records() {
        let orchestrator =
            ScrapeOrchestrator::with_adapters(test_config(), vec![Arc::new(BrokenAdapter)]);
        let outcome = orchestrator
            .scrape_all_portals(&profile(&["React"]), "cse")
            .await;

        let summary = &outcome.summaries[0];
        assert!(summary.fallback_used);
        assert!(summary.returned >= 1);
        // Synthetic records are tagged with source and a usable search URL.
        assert!(outcome
            .jobs
            .iter()
            .all(|j| j.record.raw.source == "broken" && j.record.raw.url.starts_with("https://")));
    }

    #[tokio::test]
    async fn test_deadline_does_not_wipe_synthesized_records() {
        let mut config = AppConfig::default();
        config.retry.delay_ms = 1;
        config.scrape.deadline_secs = Some(1);
        let orchestrator = ScrapeOrchestrator::with_adapters(
            Arc::new(config),
            vec![Arc::new(StalledDetailAdapter)],
        );
        let outcome = orchestrator
            .scrape_all_portals(&profile(&["React"]), "cse")
            .await;

        let summary = &outcome.summaries[0];
        assert!(summary.fallback_used);
        assert!(summary.returned >= 1);
        assert!(!outcome.jobs.is_empty());
        // Fabricated records are filled from defaults, never a detail fetch
        // of the search URL that just failed.
        assert!(outcome
            .jobs
            .iter()
            .all(|j| j.record.description.contains("See the original")));
    }

    #[tokio::test]
    async fn test_deadline_keeps_records_collected_before_expiry() {
        let (summary, records) = collect_source(
            Arc::new(SlowEnrichAdapter),
            Arc::new(FetchEngine::new(&FetchConfig::default())),
            Arc::new(SourceRateLimiter::new(&["slow"], &RateLimitConfig::default())),
            RetryPolicy::new(1, Duration::from_millis(1)),
            vec!["react".into()],
            "pune".into(),
            5,
            Some(Duration::from_secs(1)),
        )
        .await;

        assert!(summary.error.is_none());
        assert_eq!(records.len(), 3);
        // First record finished inside the budget; the rest degraded to
        // generic defaults instead of being dropped.
        assert_eq!(records[0].job_type, "Contract");
        assert_eq!(records[2].job_type, "Full-time");
    }

    #[tokio::test]
    async fn test_duplicates_across_sources_collapse() {
        let orchestrator = ScrapeOrchestrator::with_adapters(
            test_config(),
            vec![
                Arc::new(StaticAdapter {
                    name: "alpha",
                    titles: vec!["React Developer"],
                }),
                Arc::new(StaticAdapter {
                    name: "beta",
                    titles: vec!["React Developer"],
                }),
            ],
        );
        let outcome = orchestrator
            .scrape_all_portals(&profile(&["React"]), "cse")
            .await;
        let survivors = outcome
            .jobs
            .iter()
            .filter(|j| j.record.raw.title == "React Developer")
            .count();
        assert_eq!(survivors, 1);
    }
}
