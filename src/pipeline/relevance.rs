// src/pipeline/relevance.rs
use crate::ontology::{text_mentions, SkillOntology};
use crate::types::{CandidateProfile, EnrichedJobRecord};
use tracing::debug;

/// Retain jobs that plausibly match the candidate: by title, by extracted
/// skill intersection, or by description, each directly or through the
/// skill ontology. A candidate with no listed skills passes everything.
/// Re-filtering an already-filtered batch is a no-op.
pub fn filter_relevant(
    records: Vec<EnrichedJobRecord>,
    profile: &CandidateProfile,
    ontology: &SkillOntology,
) -> Vec<EnrichedJobRecord> {
    let candidate_skills = profile.normalized_skills();
    if candidate_skills.is_empty() {
        return records;
    }

    let before = records.len();
    let kept: Vec<_> = records
        .into_iter()
        .filter(|record| is_relevant(record, &candidate_skills, ontology))
        .collect();
    if kept.len() < before {
        debug!("Relevance filter dropped {} records", before - kept.len());
    }
    kept
}

fn is_relevant(
    record: &EnrichedJobRecord,
    candidate_skills: &[String],
    ontology: &SkillOntology,
) -> bool {
    let title = record.raw.title.to_lowercase();
    let description = record.description.to_lowercase();

    for skill in candidate_skills {
        if text_mentions(&title, skill) || text_mentions(&description, skill) {
            return true;
        }
        for related in ontology.related_terms(skill) {
            if text_mentions(&title, &related) || text_mentions(&description, &related) {
                return true;
            }
        }
    }

    record.skills.iter().any(|job_skill| {
        let job_skill = job_skill.to_lowercase();
        candidate_skills.iter().any(|skill| {
            skill == &job_skill
                || skill.contains(&job_skill)
                || job_skill.contains(skill.as_str())
                || ontology.are_related(skill, &job_skill)
        })
    })
}
