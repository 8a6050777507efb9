// src/portals/mod.rs
//! Portal adapter contract plus the shared probe machinery. Parsing is
//! markup-fragile by construction: each field is resolved by an ordered
//! list of candidate selectors and the first successful probe wins. When
//! the listing structure itself cannot be probed, a synthetic fallback set
//! keeps the pipeline moving.

use crate::error::ScrapeError;
use crate::fetch::FetchEngine;
use crate::ontology::{text_mentions, KNOWN_SKILLS};
use crate::types::{EnrichedJobRecord, RawJobRecord, SalaryRange};
use async_trait::async_trait;
use chrono::Utc;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

pub mod indeed;
pub mod linkedin;
pub mod naukri;
pub mod timesjobs;

pub use indeed::IndeedAdapter;
pub use linkedin::LinkedInAdapter;
pub use naukri::NaukriAdapter;
pub use timesjobs::TimesJobsAdapter;

#[async_trait]
pub trait PortalAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Source-specific cap on results per search.
    fn max_results(&self) -> usize;

    /// Constructible search URL for the given keywords; also used to tag
    /// synthetic fallback records.
    fn search_url(&self, keywords: &[String], location: &str) -> String;

    async fn search(
        &self,
        engine: &FetchEngine,
        keywords: &[String],
        location: &str,
    ) -> Result<Vec<RawJobRecord>, ScrapeError>;

    /// Optional detail fetch. Infallible by contract: adapters fill in
    /// generic defaults rather than failing the record.
    async fn enrich(&self, engine: &FetchEngine, record: RawJobRecord) -> EnrichedJobRecord;
}

/// Ordered per-field selector lists for one portal's listing page.
/// Declarative configuration, not logic: when a site changes its markup,
/// this is the only thing that needs touching.
pub struct ListingProbes {
    pub cards: &'static [&'static str],
    pub title: &'static [&'static str],
    pub company: &'static [&'static str],
    pub location: &'static [&'static str],
    pub salary: &'static [&'static str],
    pub link: &'static [&'static str],
}

/// Selector lists for a posting's detail page.
pub struct DetailProbes {
    pub description: &'static [&'static str],
    pub experience: &'static [&'static str],
    pub job_type: &'static [&'static str],
}

pub struct DetailContent {
    pub description: String,
    pub experience: Option<String>,
    pub job_type: Option<String>,
}

/// First probe that yields usable text wins.
pub(crate) fn probe_text(root: &ElementRef, selectors: &[&str]) -> Option<String> {
    for raw in selectors {
        if let Ok(selector) = Selector::parse(raw) {
            if let Some(element) = root.select(&selector).next() {
                let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
                if text.len() >= 2 {
                    return Some(text);
                }
            }
        }
    }
    None
}

pub(crate) fn probe_attr(root: &ElementRef, selectors: &[&str], attr: &str) -> Option<String> {
    for raw in selectors {
        if let Ok(selector) = Selector::parse(raw) {
            if let Some(element) = root.select(&selector).next() {
                if let Some(value) = element.value().attr(attr) {
                    if !value.trim().is_empty() {
                        return Some(value.trim().to_string());
                    }
                }
            }
        }
    }
    None
}

pub(crate) fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a listing page into raw records. Every probe for the primary
/// listing structure missing is a `ParseMiss`; the retry/fallback layer
/// turns that into synthetic records.
pub(crate) fn parse_listing(
    html: &str,
    source: &'static str,
    base_url: &str,
    probes: &ListingProbes,
    max: usize,
) -> Result<Vec<RawJobRecord>, ScrapeError> {
    let document = Html::parse_document(html);
    let base = Url::parse(base_url).ok();

    let mut cards: Vec<ElementRef> = Vec::new();
    for raw in probes.cards {
        if let Ok(selector) = Selector::parse(raw) {
            cards = document.select(&selector).collect();
            if !cards.is_empty() {
                break;
            }
        }
    }
    if cards.is_empty() {
        return Err(ScrapeError::parse_miss(source, "job cards"));
    }

    let mut records = Vec::new();
    for card in cards {
        let Some(title) = probe_text(&card, probes.title) else {
            continue;
        };
        let company = probe_text(&card, probes.company).unwrap_or_default();
        let location = probe_text(&card, probes.location).unwrap_or_default();
        let salary_text = probe_text(&card, probes.salary);
        let url = probe_attr(&card, probes.link, "href")
            .and_then(|href| match base.as_ref() {
                Some(base) => base.join(&href).ok().map(|u| u.to_string()),
                None => Some(href),
            })
            .unwrap_or_default();

        let haystack = format!("{} {}", title, location).to_lowercase();
        records.push(RawJobRecord {
            remote: haystack.contains("remote") || haystack.contains("work from home"),
            title,
            company,
            location,
            source: source.to_string(),
            url,
            posted_at: None,
            salary_text,
        });
        if records.len() >= max {
            break;
        }
    }

    if records.is_empty() {
        return Err(ScrapeError::parse_miss(source, "listing fields"));
    }
    Ok(records)
}

pub(crate) fn parse_detail(html: &str, probes: &DetailProbes) -> Option<DetailContent> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let description = probe_text(&root, probes.description)?;
    Some(DetailContent {
        description,
        experience: probe_text(&root, probes.experience),
        job_type: probe_text(&root, probes.job_type),
    })
}

/// Synthesize plausible job-shaped records from keywords when a source
/// cannot be scraped at all. Each record carries the source name and the
/// real, constructible search URL.
pub(crate) fn synthetic_results(
    source: &'static str,
    keywords: &[String],
    search_url: &str,
    location: &str,
    cap: usize,
) -> Vec<RawJobRecord> {
    keywords
        .iter()
        .take(cap)
        .map(|keyword| RawJobRecord {
            title: title_case(keyword),
            company: "Multiple Employers".to_string(),
            location: location.to_string(),
            source: source.to_string(),
            url: search_url.to_string(),
            posted_at: Some(Utc::now()),
            salary_text: None,
            remote: false,
        })
        .collect()
}

/// Enrichment defaults for records whose detail fetch was skipped or
/// failed: generic job type, a title-based salary estimate, and skills
/// recovered from the title.
pub(crate) fn enrich_with_defaults(record: RawJobRecord) -> EnrichedJobRecord {
    let skills = extract_skills(&record.title);
    let salary = record
        .salary_text
        .as_deref()
        .and_then(parse_salary_text)
        .unwrap_or_else(|| estimate_salary_for_title(&record.title));
    let employer = if record.company.trim().is_empty() {
        "the hiring company"
    } else {
        record.company.as_str()
    };
    let description = format!(
        "{} role at {}. See the original {} posting for the full description.",
        record.title, employer, record.source
    );

    EnrichedJobRecord {
        description,
        experience_required: String::new(),
        job_type: infer_job_type(&record.title),
        skills,
        requirements: Vec::new(),
        salary,
        raw: record,
    }
}

pub(crate) fn build_enriched(record: RawJobRecord, detail: DetailContent) -> EnrichedJobRecord {
    let skills = extract_skills(&format!("{} {}", record.title, detail.description));
    let requirements = extract_requirements(&detail.description);
    let salary = record
        .salary_text
        .as_deref()
        .and_then(parse_salary_text)
        .unwrap_or_else(|| estimate_salary_for_title(&record.title));
    let job_type = detail
        .job_type
        .unwrap_or_else(|| infer_job_type(&record.title));

    EnrichedJobRecord {
        description: detail.description,
        experience_required: detail.experience.unwrap_or_default(),
        job_type,
        skills,
        requirements,
        salary,
        raw: record,
    }
}

/// Shared search implementation: fetch the listing page and probe it.
pub(crate) async fn search_listing(
    engine: &FetchEngine,
    source: &'static str,
    base_url: &str,
    search_url: &str,
    probes: &ListingProbes,
    max: usize,
) -> Result<Vec<RawJobRecord>, ScrapeError> {
    let html = engine.fetch_page(search_url).await?;
    parse_listing(&html, source, base_url, probes, max)
}

/// Shared enrichment via detail fetch, degrading to defaults on any miss.
pub(crate) async fn enrich_via_detail(
    engine: &FetchEngine,
    probes: &DetailProbes,
    record: RawJobRecord,
) -> EnrichedJobRecord {
    if record.url.is_empty() || !record.url.starts_with("http") {
        return enrich_with_defaults(record);
    }
    let html = match engine.fetch_page(&record.url).await {
        Ok(html) => html,
        Err(error) => {
            warn!(
                "[{}] detail fetch failed for '{}', using defaults: {}",
                record.source, record.title, error
            );
            return enrich_with_defaults(record);
        }
    };
    match parse_detail(&html, probes) {
        Some(detail) => build_enriched(record, detail),
        None => {
            warn!(
                "[{}] detail probes exhausted for '{}', using defaults",
                record.source, record.title
            );
            enrich_with_defaults(record)
        }
    }
}

pub(crate) fn extract_skills(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    KNOWN_SKILLS
        .iter()
        .filter(|skill| text_mentions(&lowered, skill))
        .map(|skill| skill.to_string())
        .collect()
}

fn extract_requirements(description: &str) -> Vec<String> {
    description
        .lines()
        .map(str::trim)
        .filter(|line| {
            line.starts_with('-') || line.starts_with('*') || line.starts_with('\u{2022}')
        })
        .map(|line| clean_text(line.trim_start_matches(['-', '*', '\u{2022}'])))
        .filter(|line| !line.is_empty())
        .take(10)
        .collect()
}

pub(crate) fn infer_job_type(title: &str) -> String {
    let lowered = title.to_lowercase();
    if lowered.contains("intern") {
        "Internship".to_string()
    } else if lowered.contains("part time") || lowered.contains("part-time") {
        "Part-time".to_string()
    } else if lowered.contains("contract") || lowered.contains("freelance") {
        "Contract".to_string()
    } else {
        "Full-time".to_string()
    }
}

/// Seniority-banded annual estimate (INR) when no salary text survives.
pub(crate) fn estimate_salary_for_title(title: &str) -> SalaryRange {
    let lowered = title.to_lowercase();
    let senior = ["senior", "lead", "principal", "architect", "manager"];
    let entry = ["fresher", "junior", "trainee", "intern", "graduate"];

    let (min, max) = if senior.iter().any(|t| lowered.contains(t)) {
        (1_800_000, 3_600_000)
    } else if entry.iter().any(|t| lowered.contains(t)) {
        (300_000, 600_000)
    } else {
        (600_000, 1_500_000)
    };
    SalaryRange {
        min,
        max,
        currency: "INR".to_string(),
    }
}

/// Best-effort parse of raw salary text like "4-6 LPA" or "₹40,000/month".
pub(crate) fn parse_salary_text(text: &str) -> Option<SalaryRange> {
    let lowered = text.to_lowercase();
    let scale: u32 = if lowered.contains("lpa") || lowered.contains("lakh") {
        100_000
    } else {
        1
    };

    let mut numbers: Vec<u32> = Vec::new();
    let mut current = String::new();
    for c in lowered.chars() {
        if c.is_ascii_digit() {
            current.push(c);
        } else if c != ',' && !current.is_empty() {
            if let Ok(n) = current.parse::<u32>() {
                numbers.push(n.saturating_mul(scale));
            }
            current.clear();
        }
    }
    if let Ok(n) = current.parse::<u32>() {
        numbers.push(n.saturating_mul(scale));
    }

    let currency = if lowered.contains('$') || lowered.contains("usd") {
        "USD"
    } else {
        "INR"
    };
    match numbers.as_slice() {
        [] => None,
        [single] => Some(SalaryRange {
            min: *single,
            max: *single,
            currency: currency.to_string(),
        }),
        [min, max, ..] => Some(SalaryRange {
            min: (*min).min(*max),
            max: (*min).max(*max),
            currency: currency.to_string(),
        }),
    }
}

fn title_case(keyword: &str) -> String {
    keyword
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
