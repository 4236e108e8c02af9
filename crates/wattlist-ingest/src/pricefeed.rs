//! Price-feed parsing.
//!
//! The feed has drifted across fetcher generations: a flat array of entries,
//! a `{ "products": [...] }` wrapper, and a map of key → entry have all been
//! observed. All three shapes funnel into the same `Vec<RawPriceEntry>`.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use wattlist_core::Price;

use crate::error::IngestError;

/// One feed record, immutable input to the reconciler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPriceEntry {
    /// Retailer listing identifier, the third match key in priority order.
    #[serde(default)]
    pub asin: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Plain product URL, the first match key.
    #[serde(default)]
    pub link: Option<String>,
    /// Affiliate-tagged URL, the second match key.
    #[serde(default)]
    pub affiliate_link: Option<String>,
    /// Number, currency string, `"N/A"`, or null; resolved by
    /// [`RawPriceEntry::price_value`].
    #[serde(default)]
    pub price: Option<FeedPrice>,
    #[serde(default, deserialize_with = "flexible_timestamp")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    /// Fetch-stage error note; present means the fetcher failed this entry.
    #[serde(default)]
    pub error: Option<String>,
}

impl RawPriceEntry {
    /// Resolves the feed price under the sentinel rules: absent, null,
    /// `"N/A"`, empty, zero, and negative are all [`Price::Unavailable`].
    #[must_use]
    pub fn price_value(&self) -> Price {
        match &self.price {
            None => Price::Unavailable,
            Some(FeedPrice::Number(v)) => Price::from_amount(*v),
            Some(FeedPrice::Text(s)) => Price::parse(s),
        }
    }
}

/// Feed price as serialized: the fetcher writes numbers when the retailer
/// API returns an amount and display strings when it returns formatted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedPrice {
    Number(f64),
    Text(String),
}

/// The feed document shapes observed in the wild.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedDocument {
    Entries(Vec<RawPriceEntry>),
    Wrapped { products: Vec<RawPriceEntry> },
    Keyed(BTreeMap<String, RawPriceEntry>),
}

/// Parses the price feed, accepting every historical shape.
///
/// For the keyed shape, a map key fills in a missing `asin` on its entry so
/// key-based matching works no matter which shape the fetcher wrote.
///
/// # Errors
///
/// Returns [`IngestError::PriceFeedUnavailable`] when the text is not valid
/// JSON for any known shape. Callers are expected to degrade, not abort.
pub fn parse_price_feed(text: &str) -> Result<Vec<RawPriceEntry>, IngestError> {
    let document: FeedDocument =
        serde_json::from_str(text).map_err(|e| IngestError::PriceFeedUnavailable {
            reason: e.to_string(),
        })?;

    let entries = match document {
        FeedDocument::Entries(entries) | FeedDocument::Wrapped { products: entries } => entries,
        FeedDocument::Keyed(map) => map
            .into_iter()
            .map(|(key, mut entry)| {
                if entry.asin.is_none() {
                    entry.asin = Some(key);
                }
                entry
            })
            .collect(),
    };

    Ok(entries)
}

/// The one consistent bootstrap-recovery policy for optional inputs: take
/// the parsed value, or log a structured warning and fall back to the
/// supplied default. Never propagates.
pub fn load_or_default<T>(source: &str, result: Result<T, IngestError>, default: T) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(source, error = %e, "input unavailable; falling back to default");
            default
        }
    }
}

/// Feed timestamps drift too: the current fetcher writes RFC 3339 with an
/// offset, an older one wrote naive `isoformat()` strings. Unparseable
/// values soft-fail to `None`; per-record coercion never errors.
fn flexible_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else { return Ok(None) };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Some(Utc.from_utc_datetime(&naive)));
    }

    Ok(None)
}
