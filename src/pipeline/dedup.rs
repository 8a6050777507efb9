// src/pipeline/dedup.rs
use crate::types::EnrichedJobRecord;
use std::collections::HashSet;
use tracing::debug;

/// Drop duplicate postings across sources by identity key. First seen
/// wins, preserving discovery order.
pub fn dedupe(records: Vec<EnrichedJobRecord>) -> Vec<EnrichedJobRecord> {
    let before = records.len();
    let mut seen = HashSet::new();
    let deduped: Vec<_> = records
        .into_iter()
        .filter(|record| seen.insert(record.identity_key()))
        .collect();
    if deduped.len() < before {
        debug!("Deduplication removed {} records", before - deduped.len());
    }
    deduped
}
