// src/portals/naukri.rs
use super::{
    enrich_via_detail, search_listing, DetailProbes, ListingProbes, PortalAdapter,
};
use crate::error::ScrapeError;
use crate::fetch::FetchEngine;
use crate::types::{EnrichedJobRecord, RawJobRecord};
use async_trait::async_trait;

const BASE_URL: &str = "https://www.naukri.com";

const LISTING_PROBES: ListingProbes = ListingProbes {
    cards: &[
        "div.srp-jobtuple-wrapper",
        "article.jobTuple",
        "div[class*='jobTuple']",
    ],
    title: &["a.title", "a.jobTitle", "a[class*='title']"],
    company: &["a.comp-name", "a.subTitle", "[class*='comp-name']"],
    location: &["span.locWdth", "li.location span", "[class*='location']"],
    salary: &["span.sal-wrap span", "li.salary span", "[class*='salary']"],
    link: &["a.title", "a.jobTitle", "a"],
};

const DETAIL_PROBES: DetailProbes = DetailProbes {
    description: &[
        "section.job-desc div.dang-inner-html",
        "div.job-desc",
        "[class*='job-desc']",
    ],
    experience: &["div.exp span", "span.exp", "[class*='experience']"],
    job_type: &["div.emp-type span", "[class*='emp-type']"],
};

pub struct NaukriAdapter;

#[async_trait]
impl PortalAdapter for NaukriAdapter {
    fn name(&self) -> &'static str {
        "naukri"
    }

    fn max_results(&self) -> usize {
        15
    }

    fn search_url(&self, keywords: &[String], location: &str) -> String {
        let slug = keywords.join("-").replace(' ', "-");
        if location.trim().is_empty() {
            format!("{}/{}-jobs", BASE_URL, slug)
        } else {
            format!(
                "{}/{}-jobs-in-{}",
                BASE_URL,
                slug,
                location.trim().to_lowercase().replace(' ', "-")
            )
        }
    }

    async fn search(
        &self,
        engine: &FetchEngine,
        keywords: &[String],
        location: &str,
    ) -> Result<Vec<RawJobRecord>, ScrapeError> {
        let url = self.search_url(keywords, location);
        search_listing(
            engine,
            self.name(),
            BASE_URL,
            &url,
            &LISTING_PROBES,
            self.max_results(),
        )
        .await
    }

    async fn enrich(&self, engine: &FetchEngine, record: RawJobRecord) -> EnrichedJobRecord {
        enrich_via_detail(engine, &DETAIL_PROBES, record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_slug() {
        let adapter = NaukriAdapter;
        let keywords = vec!["react".to_string(), "full stack developer".to_string()];
        assert_eq!(
            adapter.search_url(&keywords, "Pune"),
            "https://www.naukri.com/react-full-stack-developer-jobs-in-pune"
        );
        assert_eq!(
            adapter.search_url(&keywords, ""),
            "https://www.naukri.com/react-full-stack-developer-jobs"
        );
    }
}
