// src/pipeline/mod.rs
pub mod dedup;
pub mod quality;
pub mod relevance;
pub mod scoring;

pub use dedup::dedupe;
pub use quality::filter_quality;
pub use relevance::filter_relevant;
pub use scoring::{parse_experience_range, score_and_rank, ExperienceRange};
