// src/portals/linkedin.rs
use super::{
    enrich_via_detail, search_listing, DetailProbes, ListingProbes, PortalAdapter,
};
use crate::error::ScrapeError;
use crate::fetch::FetchEngine;
use crate::types::{EnrichedJobRecord, RawJobRecord};
use async_trait::async_trait;

const BASE_URL: &str = "https://www.linkedin.com";

const LISTING_PROBES: ListingProbes = ListingProbes {
    cards: &[
        "div.base-card.job-search-card",
        "li div.base-search-card",
        "ul.jobs-search__results-list li",
    ],
    title: &[
        "h3.base-search-card__title",
        "a.base-card__full-link span.sr-only",
        "h3",
    ],
    company: &[
        "h4.base-search-card__subtitle a",
        "h4.base-search-card__subtitle",
        "a.hidden-nested-link",
    ],
    location: &["span.job-search-card__location", "[class*='location']"],
    salary: &["span.job-search-card__salary-info"],
    link: &["a.base-card__full-link", "a[href*='/jobs/view/']", "a"],
};

const DETAIL_PROBES: DetailProbes = DetailProbes {
    description: &[
        "div.show-more-less-html__markup",
        "div.description__text",
        "[class*='description']",
    ],
    experience: &[
        "li.description__job-criteria-item:nth-of-type(1) span",
        "span.description__job-criteria-text",
    ],
    job_type: &[
        "li.description__job-criteria-item:nth-of-type(2) span",
        "[class*='job-criteria'] span",
    ],
};

pub struct LinkedInAdapter;

#[async_trait]
impl PortalAdapter for LinkedInAdapter {
    fn name(&self) -> &'static str {
        "linkedin"
    }

    fn max_results(&self) -> usize {
        10
    }

    fn search_url(&self, keywords: &[String], location: &str) -> String {
        format!(
            "{}/jobs/search/?keywords={}&location={}",
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

    async fn enrich(&self, engine: &FetchEngine, record: RawJobRecord) -> EnrichedJobRecord {
        enrich_via_detail(engine, &DETAIL_PROBES, record).await
    }
}

fn encode(value: &str) -> String {
    value.trim().replace(' ', "%20")
}
