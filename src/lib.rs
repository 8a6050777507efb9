pub mod config;
pub mod error;
pub mod fetch;
pub mod keywords;
pub mod ontology;
pub mod orchestrator;
pub mod pipeline;
pub mod portals;
pub mod rate_limiter;
pub mod retry;
pub mod scheduler;
pub mod store;
pub mod types;

pub use config::AppConfig;
pub use error::ScrapeError;
pub use orchestrator::{ScrapeOrchestrator, ScrapeOutcome};
pub use scheduler::BackgroundScheduler;
pub use store::JobStore;
pub use types::{CandidateProfile, EnrichedJobRecord, ScoredJob, SourceSummary};
