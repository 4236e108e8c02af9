//! Catalog–feed reconciliation.
//!
//! Matching is exact-key only, tried in priority order per catalog record.
//! The merge is guarded: a feed entry with a sentinel price never overwrites
//! a catalog price, so the last known good price survives a bad fetch.

use std::collections::HashMap;

use serde::Serialize;

use wattlist_core::CanonicalProduct;

use crate::pricefeed::RawPriceEntry;

/// Observable outcome of one reconciliation pass. `matched` counts catalog
/// records that found a feed entry; `updated` counts those whose price was
/// actually accepted. Both are required outputs for operability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub total: usize,
    pub matched: usize,
    pub updated: usize,
}

/// Merges feed prices into catalog records.
///
/// Inputs are untouched; a new sequence is returned in catalog order. Match
/// key priority per record, first hit wins, no fuzzy matching:
/// (1) `link`, (2) `affiliate_url`, (3) record key against feed `asin`.
#[must_use]
pub fn reconcile(
    catalog: &[CanonicalProduct],
    feed: &[RawPriceEntry],
) -> (Vec<CanonicalProduct>, ReconcileReport) {
    let mut by_link: HashMap<&str, &RawPriceEntry> = HashMap::new();
    let mut by_affiliate: HashMap<&str, &RawPriceEntry> = HashMap::new();
    let mut by_asin: HashMap<&str, &RawPriceEntry> = HashMap::new();

    // First feed entry wins on duplicate keys.
    for entry in feed {
        if let Some(link) = entry.link.as_deref() {
            by_link.entry(link).or_insert(entry);
        }
        if let Some(affiliate) = entry.affiliate_link.as_deref() {
            by_affiliate.entry(affiliate).or_insert(entry);
        }
        if let Some(asin) = entry.asin.as_deref() {
            by_asin.entry(asin).or_insert(entry);
        }
    }

    let mut matched = 0usize;
    let mut updated = 0usize;

    let merged: Vec<CanonicalProduct> = catalog
        .iter()
        .map(|product| {
            let mut record = product.clone();

            let entry = record
                .link
                .as_deref()
                .and_then(|link| by_link.get(link))
                .or_else(|| {
                    record
                        .affiliate_url
                        .as_deref()
                        .and_then(|affiliate| by_affiliate.get(affiliate))
                })
                .or_else(|| by_asin.get(record.key.as_str()));

            if let Some(entry) = entry {
                matched += 1;

                if let Some(condition) = entry.condition.as_deref() {
                    if !condition.is_empty() {
                        record.condition = condition.to_string();
                    }
                }

                let feed_price = entry.price_value();
                if feed_price.is_available() {
                    record.price = feed_price;
                    record.price_last_updated =
                        entry.last_updated.or(record.price_last_updated);
                    updated += 1;
                }
            }

            record
        })
        .collect();

    let report = ReconcileReport {
        total: catalog.len(),
        matched,
        updated,
    };

    tracing::info!(
        total = report.total,
        matched = report.matched,
        updated = report.updated,
        "reconciled catalog against price feed"
    );

    (merged, report)
}
