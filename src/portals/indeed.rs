// src/portals/indeed.rs
use super::{enrich_with_defaults, search_listing, ListingProbes, PortalAdapter};
use crate::error::ScrapeError;
use crate::fetch::FetchEngine;
use crate::types::{EnrichedJobRecord, RawJobRecord};
use async_trait::async_trait;

const BASE_URL: &str = "https://in.indeed.com";

const LISTING_PROBES: ListingProbes = ListingProbes {
    cards: &[
        "div.job_seen_beacon",
        "td.resultContent",
        "div[class*='cardOutline']",
    ],
    title: &[
        "h2.jobTitle a span",
        "h2.jobTitle span[title]",
        "a.jcs-JobTitle",
    ],
    company: &[
        "span[data-testid='company-name']",
        "span.companyName",
        "[class*='company']",
    ],
    location: &[
        "div[data-testid='text-location']",
        "div.companyLocation",
        "[class*='location']",
    ],
    salary: &[
        "div.metadata.salary-snippet-container",
        "span.salary-snippet",
        "[class*='salary']",
    ],
    link: &["h2.jobTitle a", "a.jcs-JobTitle", "a[href*='/rc/clk']"],
};

/// Indeed aggressively blocks secondary fetches, so the detail step is
/// skipped and records are enriched from the listing snippet alone.
pub struct IndeedAdapter;

#[async_trait]
impl PortalAdapter for IndeedAdapter {
    fn name(&self) -> &'static str {
        "indeed"
    }

    fn max_results(&self) -> usize {
        12
    }

    fn search_url(&self, keywords: &[String], location: &str) -> String {
        format!(
            "{}/jobs?q={}&l={}",
            BASE_URL,
            encode(&keywords.join(" ")),
            encode(location)
        )
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

    async fn enrich(&self, _engine: &FetchEngine, record: RawJobRecord) -> EnrichedJobRecord {
        enrich_with_defaults(record)
    }
}

fn encode(value: &str) -> String {
    value.trim().replace(' ', "+")
}
