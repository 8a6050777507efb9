// src/ontology.rs
//! Skill relation graph backing partial/related matching. Built once at
//! startup from a static adjacency table; relations are bidirectional.

use std::collections::{HashMap, HashSet};

const RELATIONS: &[(&str, &[&str])] = &[
    ("react", &["javascript", "typescript", "redux", "frontend"]),
    ("angular", &["javascript", "typescript", "rxjs", "frontend"]),
    ("vue", &["javascript", "nuxt", "frontend"]),
    ("javascript", &["typescript", "node.js", "es6", "frontend"]),
    ("node.js", &["javascript", "express", "backend"]),
    ("python", &["django", "flask", "fastapi", "pandas", "numpy"]),
    ("java", &["spring", "spring boot", "hibernate", "j2ee"]),
    ("sql", &["mysql", "postgresql", "oracle", "database"]),
    ("mongodb", &["nosql", "database"]),
    ("aws", &["cloud", "ec2", "s3", "lambda"]),
    ("docker", &["kubernetes", "containers", "devops"]),
    ("kubernetes", &["docker", "helm", "devops"]),
    ("c++", &["c", "embedded", "stl"]),
    ("c#", &[".net", "asp.net"]),
    ("php", &["laravel", "wordpress", "backend"]),
    ("flutter", &["dart", "mobile"]),
    ("react native", &["react", "mobile"]),
    ("android", &["kotlin", "java", "mobile"]),
    ("ios", &["swift", "objective-c", "mobile"]),
    ("machine learning", &["python", "tensorflow", "pytorch", "data science"]),
    ("data science", &["python", "pandas", "statistics", "machine learning"]),
    ("git", &["github", "gitlab", "version control"]),
    ("jenkins", &["ci/cd", "devops"]),
    ("embedded c", &["microcontrollers", "firmware", "rtos"]),
    ("vhdl", &["verilog", "fpga", "vlsi"]),
    ("matlab", &["simulink", "signal processing"]),
    ("autocad", &["solidworks", "catia", "drafting"]),
];

/// Skill terms recognized when extracting skills from free text (titles and
/// descriptions). Kept alongside the graph so both stay in sync.
pub const KNOWN_SKILLS: &[&str] = &[
    "react", "angular", "vue", "javascript", "typescript", "node.js", "python", "java", "c++",
    "c#", "go", "rust", "php", "swift", "kotlin", "dart", "flutter", "react native", "android",
    "ios", "sql", "mysql", "postgresql", "mongodb", "redis", "aws", "azure", "gcp", "docker",
    "kubernetes", "jenkins", "git", "html", "css", "spring", "django", "flask", "express",
    "machine learning", "data science", "embedded c", "vhdl", "verilog", "matlab", "autocad",
    "solidworks",
];

pub struct SkillOntology {
    relations: HashMap<String, HashSet<String>>,
}

impl SkillOntology {
    pub fn new() -> Self {
        let mut relations: HashMap<String, HashSet<String>> = HashMap::new();
        for (skill, related) in RELATIONS {
            for term in *related {
                relations
                    .entry((*skill).to_string())
                    .or_default()
                    .insert((*term).to_string());
                relations
                    .entry((*term).to_string())
                    .or_default()
                    .insert((*skill).to_string());
            }
        }
        Self { relations }
    }

    /// Terms related to `skill` (normalized lookup). Empty set when the
    /// skill is not in the graph.
    pub fn related_terms(&self, skill: &str) -> HashSet<String> {
        self.relations
            .get(&normalize(skill))
            .cloned()
            .unwrap_or_default()
    }

    pub fn are_related(&self, a: &str, b: &str) -> bool {
        let (a, b) = (normalize(a), normalize(b));
        self.relations
            .get(&a)
            .map(|terms| terms.contains(&b))
            .unwrap_or(false)
    }
}

impl Default for SkillOntology {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(skill: &str) -> String {
    skill.trim().to_lowercase()
}

/// Word-boundary containment check on pre-lowercased text. Plain substring
/// search would make "go" match "django" and "c" match everything.
pub fn text_mentions(text: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    let mut start = 0;
    while let Some(pos) = text[start..].find(term) {
        let begin = start + pos;
        let end = begin + term.len();
        let before_ok = text[..begin]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = text[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = end;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relations_are_bidirectional() {
        let ontology = SkillOntology::new();
        assert!(ontology.are_related("react", "javascript"));
        assert!(ontology.are_related("javascript", "react"));
        assert!(ontology.are_related("JavaScript", "React"));
    }

    #[test]
    fn test_unknown_skill_has_no_relations() {
        let ontology = SkillOntology::new();
        assert!(ontology.related_terms("underwater basket weaving").is_empty());
        assert!(!ontology.are_related("react", "cobol"));
    }

    #[test]
    fn test_text_mentions_respects_word_boundaries() {
        assert!(text_mentions("senior go developer", "go"));
        assert!(!text_mentions("django developer", "go"));
        assert!(text_mentions("c++ engineer", "c++"));
        assert!(!text_mentions("css wizard", "c"));
        assert!(text_mentions("node.js and react", "react"));
    }
}
