// src/scheduler.rs
//! Periodic background scrape. Each cycle walks the configured branch
//! codes sequentially with a courtesy delay between them, persists
//! whatever ranked above the cutoff, and releases the fetch engine.
//! Cycles never overlap: a tick that arrives mid-cycle is skipped.

use crate::orchestrator::ScrapeOrchestrator;
use crate::store::JobStore;
use crate::types::CandidateProfile;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{error, info, warn};

#[derive(Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// A previous cycle was still running.
    Skipped,
    Completed { branches: usize, stored: u64 },
}

pub struct BackgroundScheduler {
    orchestrator: Arc<ScrapeOrchestrator>,
    store: Arc<JobStore>,
    period: Duration,
    branch_delay: Duration,
    branches: Vec<String>,
    running: AtomicBool,
    shutdown: Notify,
}

impl BackgroundScheduler {
    pub fn new(
        orchestrator: Arc<ScrapeOrchestrator>,
        store: Arc<JobStore>,
        config: &crate::config::SchedulerConfig,
    ) -> Self {
        Self {
            orchestrator,
            store,
            // tokio's interval panics on zero; a misconfigured period
            // clamps to one hour instead.
            period: Duration::from_secs(config.period_hours.max(1) * 3600),
            branch_delay: Duration::from_secs(config.branch_delay_secs),
            branches: config.branches.clone(),
            running: AtomicBool::new(false),
            shutdown: Notify::new(),
        }
    }

    /// Run until `stop` is called. The first cycle starts immediately.
    pub async fn start(self: Arc<Self>) {
        info!(
            "Scheduler started: {} branches every {:?}",
            self.branches.len(),
            self.period
        );
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                _ = self.shutdown.notified() => {
                    info!("Scheduler stopping");
                    break;
                }
            }
        }
    }

    pub fn stop(&self) {
        self.shutdown.notify_one();
    }

    /// One scheduling tick. Public so a cycle can be driven directly.
    pub async fn tick(&self) -> TickOutcome {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Previous scrape cycle still running, skipping this tick");
            return TickOutcome::Skipped;
        }

        let outcome = self.run_cycle().await;
        self.running.store(false, Ordering::SeqCst);
        outcome
    }

    async fn run_cycle(&self) -> TickOutcome {
        let mut stored = 0u64;

        for (index, branch) in self.branches.iter().enumerate() {
            if index > 0 {
                sleep(self.branch_delay).await;
            }

            let profile = default_profile_for(branch);
            let outcome = self.orchestrator.scrape_all_portals(&profile, branch).await;
            let records: Vec<_> = outcome.jobs.into_iter().map(|job| job.record).collect();

            match self.store.upsert_batch(&records).await {
                Ok(report) => {
                    info!(
                        "Branch '{}': {} new jobs stored ({} duplicates)",
                        branch, report.inserted, report.duplicates
                    );
                    stored += report.inserted;
                }
                Err(e) => {
                    error!("Branch '{}': failed to persist batch: {:#}", branch, e);
                }
            }
        }

        self.orchestrator.close_browser().await;
        TickOutcome::Completed {
            branches: self.branches.len(),
            stored,
        }
    }
}

/// Representative profile used when no concrete candidate drives a cycle.
pub fn default_profile_for(branch: &str) -> CandidateProfile {
    let technical_skills: Vec<String> = match branch {
        "cse" | "it" => vec!["java", "python", "javascript", "sql"],
        "ece" => vec!["embedded c", "vhdl", "matlab"],
        "eee" => vec!["matlab", "plc", "autocad"],
        "mech" => vec!["autocad", "solidworks", "ansys"],
        "civil" => vec!["autocad", "staad pro", "revit"],
        _ => vec![],
    }
    .into_iter()
    .map(String::from)
    .collect();

    CandidateProfile {
        technical_skills,
        soft_skills: vec!["communication".into(), "teamwork".into()],
        experience_years: 0.0,
        city: "pune".into(),
        country: "india".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    async fn scheduler() -> Arc<BackgroundScheduler> {
        let mut config = AppConfig::default();
        config.retry.delay_ms = 1;
        config.scheduler.branch_delay_secs = 0;
        config.scheduler.branches = vec!["cse".into()];
        let config = Arc::new(config);
        let orchestrator = Arc::new(ScrapeOrchestrator::with_adapters(config.clone(), vec![]));
        let store = Arc::new(JobStore::connect_in_memory().await.unwrap());
        Arc::new(BackgroundScheduler::new(
            orchestrator,
            store,
            &config.scheduler,
        ))
    }

    #[tokio::test]
    async fn test_tick_with_no_sources_completes_empty() {
        let scheduler = scheduler().await;
        let outcome = scheduler.tick().await;
        assert_eq!(
            outcome,
            TickOutcome::Completed {
                branches: 1,
                stored: 0
            }
        );
    }

    #[tokio::test]
    async fn test_overlapping_tick_is_skipped() {
        let scheduler = scheduler().await;
        scheduler.running.store(true, Ordering::SeqCst);
        assert_eq!(scheduler.tick().await, TickOutcome::Skipped);
        // The skipped tick must not clear the running cycle's flag... it
        // belongs to the cycle that set it.
        assert!(scheduler.running.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_zero_period_clamps_to_an_hour() {
        let mut config = AppConfig::default();
        config.scheduler.period_hours = 0;
        let orchestrator = Arc::new(ScrapeOrchestrator::with_adapters(
            Arc::new(config.clone()),
            vec![],
        ));
        let store = Arc::new(JobStore::connect_in_memory().await.unwrap());
        let scheduler = BackgroundScheduler::new(orchestrator, store, &config.scheduler);
        assert_eq!(scheduler.period, Duration::from_secs(3600));
    }

    #[test]
    fn test_default_profiles_follow_branch() {
        let cse = default_profile_for("cse");
        assert!(cse.technical_skills.contains(&"java".to_string()));
        let mech = default_profile_for("mech");
        assert!(mech.technical_skills.contains(&"solidworks".to_string()));
        assert_eq!(mech.experience_years, 0.0);
    }
}
