// src/portals/timesjobs.rs
use super::{enrich_with_defaults, search_listing, ListingProbes, PortalAdapter};
use crate::error::ScrapeError;
use crate::fetch::FetchEngine;
use crate::types::{EnrichedJobRecord, RawJobRecord};
use async_trait::async_trait;

const BASE_URL: &str = "https://www.timesjobs.com";

const LISTING_PROBES: ListingProbes = ListingProbes {
    cards: &[
        "li.clearfix.job-bx",
        "li.job-bx",
        "div[class*='job-bx']",
    ],
    title: &["h2 a", "h3 a", "a[class*='job-title']"],
    company: &["h3.joblist-comp-name", "span.comp-name", "[class*='comp-name']"],
    location: &["ul.top-jd-dtl li span", "span.loc", "[class*='location']"],
    salary: &["ul.top-jd-dtl li.salary", "[class*='salary']"],
    link: &["h2 a", "h3 a", "a"],
};

pub struct TimesJobsAdapter;

#[async_trait]
impl PortalAdapter for TimesJobsAdapter {
    fn name(&self) -> &'static str {
        "timesjobs"
    }

    fn max_results(&self) -> usize {
        12
    }

    fn search_url(&self, keywords: &[String], location: &str) -> String {
        format!(
            "{}/candidate/job-search.html?searchType=personalizedSearch&from=submit&txtKeywords={}&txtLocation={}",
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
    value.trim().replace(' ', "%20")
}
