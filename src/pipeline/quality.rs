// src/pipeline/quality.rs
use crate::types::EnrichedJobRecord;
use tracing::debug;

const MIN_TITLE_LEN: usize = 3;
const MIN_COMPANY_LEN: usize = 2;

/// Drop incomplete or low-confidence postings before they reach scoring.
pub fn filter_quality(records: Vec<EnrichedJobRecord>) -> Vec<EnrichedJobRecord> {
    let before = records.len();
    let kept: Vec<_> = records.into_iter().filter(passes).collect();
    if kept.len() < before {
        debug!("Quality filter dropped {} records", before - kept.len());
    }
    kept
}

fn passes(record: &EnrichedJobRecord) -> bool {
    record.raw.title.trim().len() >= MIN_TITLE_LEN
        && record.raw.company.trim().len() >= MIN_COMPANY_LEN
        && (!record.description.trim().is_empty() || !record.requirements.is_empty())
        && record.raw.url.starts_with("http")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RawJobRecord, SalaryRange};

    fn record(title: &str, company: &str, description: &str, url: &str) -> EnrichedJobRecord {
        EnrichedJobRecord {
            raw: RawJobRecord {
                title: title.into(),
                company: company.into(),
                location: String::new(),
                source: "naukri".into(),
                url: url.into(),
                posted_at: None,
                salary_text: None,
                remote: false,
            },
            description: description.into(),
            experience_required: String::new(),
            job_type: "Full-time".into(),
            skills: vec![],
            requirements: vec![],
            salary: SalaryRange {
                min: 0,
                max: 0,
                currency: "INR".into(),
            },
        }
    }

    #[test]
    fn test_complete_record_passes() {
        let records = vec![record("React Developer", "Acme", "desc", "https://x.com/j")];
        assert_eq!(filter_quality(records).len(), 1);
    }

    #[test]
    fn test_incomplete_records_are_dropped() {
        let records = vec![
            record("ab", "Acme", "desc", "https://x.com/j"),
            record("React Developer", "A", "desc", "https://x.com/j"),
            record("React Developer", "Acme", "", "https://x.com/j"),
            record("React Developer", "Acme", "desc", "view-details"),
        ];
        assert!(filter_quality(records).is_empty());
    }

    #[test]
    fn test_requirements_substitute_for_description() {
        let mut r = record("React Developer", "Acme", "", "https://x.com/j");
        r.requirements = vec!["3 years of React".into()];
        assert_eq!(filter_quality(vec![r]).len(), 1);
    }
}
