// src/keywords.rs
//! Deterministic search keyword derivation: priority skills first, then
//! remaining skills, inferred roles, one experience band, and a branch
//! fallback when the profile yields too little signal.

use crate::types::CandidateProfile;

/// Mainstream languages/frameworks emitted ahead of everything else.
const PRIORITY_SKILLS: &[&str] = &[
    "java", "python", "javascript", "typescript", "react", "angular", "vue", "node.js", "c++",
    "c#", "go", "rust", "php", "swift", "kotlin", "flutter", "sql", "aws", "docker", "kubernetes",
    "html", "css", "spring", "django",
];

const FRONTEND_SIGNALS: &[&str] = &["react", "angular", "vue", "javascript", "typescript", "html", "css"];
const BACKEND_SIGNALS: &[&str] = &["node", "python", "java", "php", "django", "spring", "express"];
const MOBILE_SIGNALS: &[&str] = &["flutter", "react native", "android", "ios", "swift", "kotlin"];
const DATA_SIGNALS: &[&str] = &["sql", "mysql", "postgresql", "mongodb", "database"];
const DEVOPS_SIGNALS: &[&str] = &["aws", "docker", "kubernetes", "jenkins", "git"];

const MAX_KEYWORDS: usize = 8;
const MAX_EXTRA_SKILLS: usize = 3;
const MAX_ROLES: usize = 4;
const MIN_BEFORE_FALLBACK: usize = 3;

pub struct KeywordGenerator;

impl KeywordGenerator {
    /// Build the search keyword set for one scrape request. Output is
    /// lowercase, deduplicated, and never longer than eight entries.
    pub fn generate(profile: &CandidateProfile, branch: &str) -> Vec<String> {
        let skills = profile.normalized_skills();
        let mut keywords: Vec<String> = Vec::new();

        let (priority, rest): (Vec<_>, Vec<_>) = skills
            .iter()
            .cloned()
            .partition(|s| PRIORITY_SKILLS.contains(&s.as_str()));
        keywords.extend(priority);
        keywords.extend(rest.into_iter().take(MAX_EXTRA_SKILLS));

        keywords.extend(infer_roles(&skills));
        keywords.push(experience_keyword(profile.experience_years).to_string());

        if keywords.len() < MIN_BEFORE_FALLBACK {
            keywords.extend(branch_fallback(branch).iter().map(|s| s.to_string()));
        }

        dedup_preserving_order(keywords)
            .into_iter()
            .take(MAX_KEYWORDS)
            .collect()
    }
}

fn has_signal(skills: &[String], signals: &[&str]) -> bool {
    skills
        .iter()
        .any(|skill| signals.iter().any(|signal| skill.contains(signal)))
}

fn infer_roles(skills: &[String]) -> Vec<String> {
    let frontend = has_signal(skills, FRONTEND_SIGNALS);
    let backend = has_signal(skills, BACKEND_SIGNALS);
    let python = skills.iter().any(|s| s.contains("python"));

    let mut roles = Vec::new();
    if frontend && backend {
        roles.push("full stack developer");
    }
    if frontend {
        roles.push("frontend developer");
    }
    if backend {
        roles.push("backend developer");
    }
    if has_signal(skills, MOBILE_SIGNALS) {
        roles.push("mobile developer");
    }
    if python && has_signal(skills, DATA_SIGNALS) {
        roles.push("data analyst");
    }
    if has_signal(skills, DEVOPS_SIGNALS) {
        roles.push("devops engineer");
    }

    roles.truncate(MAX_ROLES);
    roles.into_iter().map(String::from).collect()
}

fn experience_keyword(years: f32) -> &'static str {
    if years < 1.0 {
        "fresher"
    } else if years < 2.0 {
        "junior"
    } else if years < 5.0 {
        "mid level"
    } else {
        "senior"
    }
}

/// Domain-specific role nouns used when the profile alone yields fewer
/// than three keywords.
fn branch_fallback(branch: &str) -> &'static [&'static str] {
    match branch.trim().to_lowercase().as_str() {
        "cse" | "it" => &["software developer", "software engineer", "web developer"],
        "ece" => &["electronics engineer", "embedded systems engineer", "hardware engineer"],
        "eee" => &["electrical engineer", "power systems engineer", "maintenance engineer"],
        "mech" => &["mechanical engineer", "design engineer", "production engineer"],
        "civil" => &["civil engineer", "site engineer", "structural engineer"],
        _ => &["engineer", "analyst", "associate"],
    }
}

fn dedup_preserving_order(keywords: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    keywords
        .into_iter()
        .filter(|k| !k.is_empty() && seen.insert(k.clone()))
        .collect()
}
