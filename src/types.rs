// src/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Candidate profile as produced by the external resume-analysis component.
/// Immutable for the duration of one scrape batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub experience_years: f32,
    pub city: String,
    pub country: String,
}

impl CandidateProfile {
    /// Candidate technical skills, lowercased and trimmed for matching.
    pub fn normalized_skills(&self) -> Vec<String> {
        self.technical_skills
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// One posting as returned by a portal's search step. Transient; either
/// enriched with detail-page data or filled with generic defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawJobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub source: String,
    pub url: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub salary_text: Option<String>,
    pub remote: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: u32,
    pub max: u32,
    pub currency: String,
}

/// A posting after the enrichment step. This is the only record shape
/// eligible for persistence by the job store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedJobRecord {
    pub raw: RawJobRecord,
    pub description: String,
    pub experience_required: String,
    pub job_type: String,
    pub skills: Vec<String>,
    pub requirements: Vec<String>,
    pub salary: SalaryRange,
}

impl EnrichedJobRecord {
    /// Deduplication key: normalized title + company. Never persisted as-is.
    pub fn identity_key(&self) -> String {
        identity_key(&self.raw.title, &self.raw.company)
    }
}

pub fn identity_key(title: &str, company: &str) -> String {
    format!(
        "{}_{}",
        title.trim().to_lowercase(),
        company.trim().to_lowercase()
    )
}

/// How each job-required skill matched the candidate's skills.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillMatchBreakdown {
    pub exact: Vec<String>,
    pub partial: Vec<String>,
    pub related: Vec<String>,
}

/// An enriched record scored against one candidate profile. Computed per
/// request; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredJob {
    pub record: EnrichedJobRecord,
    pub match_score: u32,
    pub breakdown: SkillMatchBreakdown,
    pub reason: String,
}

/// Per-source observability entry, produced for every adapter on every
/// batch regardless of outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSummary {
    pub source: String,
    pub returned: usize,
    pub error: Option<String>,
    pub fallback_used: bool,
}
