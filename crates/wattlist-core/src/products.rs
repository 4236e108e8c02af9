use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::parse::first_numeric_run;

/// A catalog product normalized onto the canonical schema, the unit of truth
/// for everything downstream of ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalProduct {
    /// Stable identity within one run: the explicit id column, an identifier
    /// extracted from the retailer URL, or a synthesized `row-N` index.
    /// Always non-empty.
    pub key: String,
    pub display_name: String,
    /// Plain product page URL, if the catalog carries one.
    pub link: Option<String>,
    /// Affiliate-tagged URL, preferred for the buy link.
    pub affiliate_url: Option<String>,
    /// Call-to-action label for the buy column.
    pub link_text: String,
    /// Rated continuous output in watts. `0.0` when absent or unparseable.
    pub running_wattage: f64,
    /// Peak/surge output in watts.
    pub starting_wattage: f64,
    /// Battery capacity in watt-hours. `0.0` for fuel generators.
    pub capacity_wh: f64,
    /// Free-text fuel type exactly as the catalog spells it.
    pub fuel_type: String,
    pub engine_type: String,
    pub condition: String,
    pub price: Price,
    pub price_last_updated: Option<DateTime<Utc>>,
}

impl CanonicalProduct {
    /// An empty record carrying only its identity key. Field defaults match
    /// the normalizer's coercion rules, so a record built from a sparse
    /// catalog row and a record built here look the same.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            display_name: String::new(),
            link: None,
            affiliate_url: None,
            link_text: "Buy Now".to_string(),
            running_wattage: 0.0,
            starting_wattage: 0.0,
            capacity_wh: 0.0,
            fuel_type: String::new(),
            engine_type: String::new(),
            condition: "New".to_string(),
            price: Price::Unavailable,
            price_last_updated: None,
        }
    }

    /// Returns `true` when the record carries a usable price.
    #[must_use]
    pub fn has_price(&self) -> bool {
        self.price.is_available()
    }
}

/// A catalog or feed price.
///
/// `$0`, negative amounts, `"N/A"`, and empty strings are not valid prices;
/// they all collapse to [`Price::Unavailable`], which is a sentinel distinct
/// from a zero amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    /// Plain numeric amount in dollars.
    Amount(f64),
    /// Currency-formatted text (e.g. `"$1,299.00"`), kept verbatim so
    /// formatting can pass it through unchanged.
    Text(String),
    /// No usable price. Serializes as `null`.
    Unavailable,
}

impl Price {
    /// Parses a raw price string under the catalog coercion rules: trim,
    /// strip `$` and `,`, parse as a float. `NaN`, non-positive, empty, and
    /// the `"N/A"` sentinel all yield [`Price::Unavailable`], never an
    /// error. A parseable value that was `$`-prefixed keeps its text form.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("n/a") {
            return Price::Unavailable;
        }

        let cleaned: String = trimmed.chars().filter(|c| *c != '$' && *c != ',').collect();
        match cleaned.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => {
                if trimmed.starts_with('$') {
                    Price::Text(trimmed.to_string())
                } else {
                    Price::Amount(v)
                }
            }
            _ => Price::Unavailable,
        }
    }

    /// Wraps a numeric amount, collapsing non-positive and non-finite values
    /// to [`Price::Unavailable`].
    #[must_use]
    pub fn from_amount(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Price::Amount(value)
        } else {
            Price::Unavailable
        }
    }

    /// Returns `true` unless this is the unavailable sentinel.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(self, Price::Unavailable)
    }

    /// The numeric dollar amount, extracting the first numeric run from a
    /// text price. `None` for the sentinel or for text with no usable value.
    #[must_use]
    pub fn amount(&self) -> Option<f64> {
        match self {
            Price::Amount(v) => Some(*v),
            Price::Text(s) => first_numeric_run(s).filter(|v| *v > 0.0),
            Price::Unavailable => None,
        }
    }
}

/// Coarse wattage classification bucket used for client-side filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductTier {
    Small,
    Medium,
    Large,
}

impl std::fmt::Display for ProductTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductTier::Small => write!(f, "small"),
            ProductTier::Medium => write!(f, "medium"),
            ProductTier::Large => write!(f, "large"),
        }
    }
}

/// Classification and pricing metrics computed from one [`CanonicalProduct`]
/// per run. Never stored on the input record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedFields {
    pub tier: ProductTier,
    /// Canonical brand token, or `"other_brand"` when no keyword matched.
    pub brand: String,
    /// Normalized fuel token from the closed vocabulary.
    pub fuel_type: String,
    /// Display price: `"$199.99"` or the `"Price unavailable"` literal.
    pub formatted_price: String,
    /// `"$0.125"`-style dollars per watt, or `"N/A"`.
    pub price_per_watt: String,
}
