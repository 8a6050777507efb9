// src/pipeline/scoring.rs
//! Weighted relevance scoring. Each sub-score lives in [0,100]; the final
//! score is the weighted sum, rounded and clamped. Jobs under the
//! configured cutoff are dropped; survivors are stably sorted descending.

use crate::ontology::{text_mentions, SkillOntology};
use crate::types::{CandidateProfile, EnrichedJobRecord, ScoredJob, SkillMatchBreakdown};

const WEIGHT_SKILL: f32 = 0.50;
const WEIGHT_TITLE: f32 = 0.20;
const WEIGHT_EXPERIENCE: f32 = 0.15;
const WEIGHT_LOCATION: f32 = 0.10;
const WEIGHT_JOB_TYPE: f32 = 0.05;

const EXACT_WEIGHT: f32 = 1.0;
const PARTIAL_WEIGHT: f32 = 0.7;
const RELATED_WEIGHT: f32 = 0.4;

const ROLE_NOUNS: &[&str] = &["developer", "engineer", "programmer", "analyst", "designer"];
const ENTRY_MARKERS: &[&str] = &["fresher", "intern", "trainee", "graduate", "entry"];
const JUNIOR_MARKERS: &[&str] = &["junior", "associate"];
const SENIOR_MARKERS: &[&str] = &["senior", "lead", "principal", "architect", "head"];

/// Numeric band parsed from a job's experience-requirement string.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceRange {
    pub min: f32,
    pub max: f32,
}

/// Parse "2-4 years" style requirements. "fresher" maps to 0-0.5 and
/// anything unparsable to the permissive 0-2 band.
pub fn parse_experience_range(text: &str) -> ExperienceRange {
    let lowered = text.to_lowercase();
    if lowered.contains("fresher") {
        return ExperienceRange { min: 0.0, max: 0.5 };
    }

    let numbers = extract_numbers(&lowered);
    match numbers.as_slice() {
        [] => ExperienceRange { min: 0.0, max: 2.0 },
        [single] => {
            if lowered.contains('+') {
                ExperienceRange {
                    min: *single,
                    max: single + 2.0,
                }
            } else {
                ExperienceRange {
                    min: *single,
                    max: *single,
                }
            }
        }
        [first, second, ..] => ExperienceRange {
            min: first.min(*second),
            max: first.max(*second),
        },
    }
}

fn extract_numbers(text: &str) -> Vec<f32> {
    let mut numbers = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() || (c == '.' && !current.is_empty()) {
            current.push(c);
        } else if !current.is_empty() {
            if let Ok(n) = current.parse::<f32>() {
                numbers.push(n);
            }
            current.clear();
        }
    }
    if let Ok(n) = current.parse::<f32>() {
        numbers.push(n);
    }
    numbers
}

/// Score every record, drop those under `min_score`, and return the rest
/// sorted descending (stable: ties keep discovery order).
pub fn score_and_rank(
    records: Vec<EnrichedJobRecord>,
    profile: &CandidateProfile,
    ontology: &SkillOntology,
    min_score: u32,
) -> Vec<ScoredJob> {
    let mut scored: Vec<ScoredJob> = records
        .into_iter()
        .map(|record| score_job(record, profile, ontology))
        .filter(|job| job.match_score >= min_score)
        .collect();
    scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    scored
}

pub fn score_job(
    record: EnrichedJobRecord,
    profile: &CandidateProfile,
    ontology: &SkillOntology,
) -> ScoredJob {
    let candidate_skills = profile.normalized_skills();

    let (skill_score, breakdown) = skill_subscore(&record, &candidate_skills, ontology);
    let title_score = title_subscore(&record, &candidate_skills, profile.experience_years);
    let experience_score = experience_subscore(&record, profile.experience_years);
    let location_score = location_subscore(&record, profile);
    let job_type_score = job_type_subscore(&record, profile.experience_years);

    let total = WEIGHT_SKILL * skill_score
        + WEIGHT_TITLE * title_score
        + WEIGHT_EXPERIENCE * experience_score
        + WEIGHT_LOCATION * location_score
        + WEIGHT_JOB_TYPE * job_type_score;
    let match_score = total.round().clamp(0.0, 100.0) as u32;

    let reason = recommendation_reason(&record, &breakdown, match_score);
    ScoredJob {
        record,
        match_score,
        breakdown,
        reason,
    }
}

/// Classify each job-required skill as exact, partial (substring overlap),
/// or related (ontology) against the candidate's skills.
fn skill_subscore(
    record: &EnrichedJobRecord,
    candidate_skills: &[String],
    ontology: &SkillOntology,
) -> (f32, SkillMatchBreakdown) {
    let mut breakdown = SkillMatchBreakdown::default();
    if candidate_skills.is_empty() || record.skills.is_empty() {
        return (0.0, breakdown);
    }

    let mut weighted = 0.0;
    for job_skill in &record.skills {
        let job_skill_lower = job_skill.to_lowercase();
        if candidate_skills.iter().any(|s| s == &job_skill_lower) {
            weighted += EXACT_WEIGHT;
            breakdown.exact.push(job_skill.clone());
        } else if candidate_skills.iter().any(|s| {
            s.contains(job_skill_lower.as_str()) || job_skill_lower.contains(s.as_str())
        }) {
            weighted += PARTIAL_WEIGHT;
            breakdown.partial.push(job_skill.clone());
        } else if candidate_skills
            .iter()
            .any(|s| ontology.are_related(s, &job_skill_lower))
        {
            weighted += RELATED_WEIGHT;
            breakdown.related.push(job_skill.clone());
        }
    }

    let score = (weighted / record.skills.len() as f32 * 100.0).min(100.0);
    (score, breakdown)
}

fn title_subscore(
    record: &EnrichedJobRecord,
    candidate_skills: &[String],
    experience_years: f32,
) -> f32 {
    let title = record.raw.title.to_lowercase();

    let mentioned = candidate_skills
        .iter()
        .filter(|skill| text_mentions(&title, skill))
        .count();
    let mut score = 60.0 * mentioned as f32 / candidate_skills.len().max(1) as f32;

    // Whole-word matches only: "entry" must not fire on "carpentry" nor
    // "lead" on "leader".
    let entry = ENTRY_MARKERS.iter().any(|m| text_mentions(&title, m));
    let junior = JUNIOR_MARKERS.iter().any(|m| text_mentions(&title, m));
    let senior = SENIOR_MARKERS.iter().any(|m| text_mentions(&title, m));

    if experience_years < 1.0 {
        if entry {
            score += 15.0;
        }
        if senior {
            score -= 20.0;
        }
    } else if experience_years < 3.0 {
        if junior {
            score += 15.0;
        }
        if senior {
            score -= 10.0;
        }
    } else if senior {
        score += 15.0;
    }

    if ROLE_NOUNS.iter().any(|noun| text_mentions(&title, noun)) {
        score += 10.0;
    }

    score.clamp(0.0, 100.0)
}

fn experience_subscore(record: &EnrichedJobRecord, experience_years: f32) -> f32 {
    let range = parse_experience_range(&record.experience_required);
    if experience_years >= range.min && experience_years <= range.max {
        100.0
    } else if experience_years < range.min {
        let gap = range.min - experience_years;
        (100.0 - 15.0 * gap).max(0.0)
    } else {
        // Overqualified is lightly penalized, never excluded.
        95.0
    }
}

fn location_subscore(record: &EnrichedJobRecord, profile: &CandidateProfile) -> f32 {
    let location = record.raw.location.to_lowercase();
    if record.raw.remote || location.contains("remote") {
        return 100.0;
    }
    let city = profile.city.trim().to_lowercase();
    if !city.is_empty() && location.contains(&city) {
        return 95.0;
    }
    let country = profile.country.trim().to_lowercase();
    if !country.is_empty() && location.contains(&country) {
        return 80.0;
    }
    70.0
}

fn job_type_subscore(record: &EnrichedJobRecord, experience_years: f32) -> f32 {
    let job_type = record.job_type.to_lowercase();
    let full_time = job_type.contains("full");
    let internship = job_type.contains("intern");

    if experience_years < 1.0 {
        if internship {
            100.0
        } else if full_time {
            85.0
        } else {
            75.0
        }
    } else if full_time {
        95.0
    } else {
        75.0
    }
}

fn recommendation_reason(
    record: &EnrichedJobRecord,
    breakdown: &SkillMatchBreakdown,
    score: u32,
) -> String {
    if !breakdown.exact.is_empty() {
        format!(
            "Strong match on {} ({}% overall)",
            breakdown.exact.join(", "),
            score
        )
    } else if !breakdown.partial.is_empty() || !breakdown.related.is_empty() {
        let mut terms = breakdown.partial.clone();
        terms.extend(breakdown.related.iter().cloned());
        format!("Related experience in {} ({}% overall)", terms.join(", "), score)
    } else {
        format!(
            "Matches your profile for '{}' roles ({}% overall)",
            record.raw.title, score
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RawJobRecord, SalaryRange};

    fn record(title: &str, skills: &[&str], experience: &str, remote: bool) -> EnrichedJobRecord {
        EnrichedJobRecord {
            raw: RawJobRecord {
                title: title.into(),
                company: "Acme".into(),
                location: "Pune".into(),
                source: "naukri".into(),
                url: "https://x.com/j".into(),
                posted_at: None,
                salary_text: None,
                remote,
            },
            description: format!("{} position", title),
            experience_required: experience.into(),
            job_type: "Full-time".into(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            requirements: vec![],
            salary: SalaryRange {
                min: 0,
                max: 0,
                currency: "INR".into(),
            },
        }
    }

    fn profile(skills: &[&str], years: f32) -> CandidateProfile {
        CandidateProfile {
            technical_skills: skills.iter().map(|s| s.to_string()).collect(),
            soft_skills: vec![],
            experience_years: years,
            city: "pune".into(),
            country: "india".into(),
        }
    }

    #[test]
    fn test_experience_range_parsing() {
        assert_eq!(
            parse_experience_range("2-4 years"),
            ExperienceRange { min: 2.0, max: 4.0 }
        );
        assert_eq!(
            parse_experience_range("Fresher"),
            ExperienceRange { min: 0.0, max: 0.5 }
        );
        assert_eq!(
            parse_experience_range("competitive mindset"),
            ExperienceRange { min: 0.0, max: 2.0 }
        );
        assert_eq!(
            parse_experience_range("5+ years"),
            ExperienceRange { min: 5.0, max: 7.0 }
        );
    }

    #[test]
    fn test_scores_are_bounded_and_sorted() {
        let ontology = SkillOntology::new();
        let p = profile(&["React", "Node.js"], 2.0);
        let records = vec![
            record("Java Developer", &["java"], "2-4 years", false),
            record("React Developer", &["react", "node.js"], "1-3 years", true),
            record("Frontend Developer", &["react"], "", false),
        ];
        let scored = score_and_rank(records, &p, &ontology, 0);
        for job in &scored {
            assert!(job.match_score <= 100);
        }
        for pair in scored.windows(2) {
            assert!(pair[0].match_score >= pair[1].match_score);
        }
        assert_eq!(scored[0].record.raw.title, "React Developer");
    }

    #[test]
    fn test_cutoff_drops_weak_matches() {
        let ontology = SkillOntology::new();
        let p = profile(&["React"], 0.5);
        let records = vec![record("Forklift Operator", &["forklift"], "", false)];
        assert!(score_and_rank(records, &p, &ontology, 40).is_empty());
    }

    #[test]
    fn test_strong_match_retained_seniority_mismatch_dropped() {
        let ontology = SkillOntology::new();
        let p = profile(&["React", "Node.js"], 0.5);
        let react = record(
            "React Developer",
            &["react", "javascript"],
            "0-1 years",
            true,
        );
        let architect = record("Senior Java Architect", &["java"], "8+ years", false);

        let scored = score_and_rank(vec![react, architect], &p, &ontology, 0);
        assert_eq!(scored[0].record.raw.title, "React Developer");
        assert!(scored[0].match_score > 70);
        let java = scored
            .iter()
            .find(|j| j.record.raw.title == "Senior Java Architect")
            .unwrap();
        assert!(java.match_score < 40);
    }

    #[test]
    fn test_seniority_markers_are_whole_words() {
        // "Carpentry" must not trigger the entry-level bonus.
        let carpentry = record("Carpentry Apprentice", &[], "", false);
        assert_eq!(title_subscore(&carpentry, &[], 0.5), 0.0);
        let entry = record("Entry Level Developer", &[], "", false);
        assert_eq!(title_subscore(&entry, &[], 0.5), 25.0);

        // "Leader" must not trigger the senior penalty for a fresher.
        let leader = record("Team Leader Developer", &[], "", false);
        assert_eq!(title_subscore(&leader, &[], 0.5), 10.0);
        let lead = record("Team Lead Developer", &[], "", false);
        assert_eq!(title_subscore(&lead, &[], 0.5), 0.0);
    }

    #[test]
    fn test_overqualified_is_lightly_penalized() {
        let senior = record("React Developer", &["react"], "0-1 years", false);
        assert_eq!(experience_subscore(&senior, 6.0), 95.0);
    }

    #[test]
    fn test_remote_beats_city_beats_country() {
        let p = profile(&["React"], 1.0);
        let remote = record("React Developer", &[], "", true);
        assert_eq!(location_subscore(&remote, &p), 100.0);

        let mut city = record("React Developer", &[], "", false);
        city.raw.location = "Pune, Maharashtra".into();
        assert_eq!(location_subscore(&city, &p), 95.0);

        let mut country = record("React Developer", &[], "", false);
        country.raw.location = "Delhi, India".into();
        assert_eq!(location_subscore(&country, &p), 80.0);

        let mut abroad = record("React Developer", &[], "", false);
        abroad.raw.location = "Berlin".into();
        assert_eq!(location_subscore(&abroad, &p), 70.0);
    }
}
