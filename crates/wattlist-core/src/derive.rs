//! Pure derivation of classification and pricing metrics from one canonical
//! record. Every function here is total: any input, including a fully empty
//! record, produces a defined output.

use crate::products::{CanonicalProduct, DerivedFields, Price, ProductTier};
use crate::vocab::{Vocab, OTHER_BRAND};

/// Upper bound (inclusive) of the small tier, in watts.
pub const SMALL_MAX_WATTS: f64 = 500.0;
/// Upper bound (inclusive) of the medium tier, in watts.
pub const MEDIUM_MAX_WATTS: f64 = 1500.0;

/// Display literal for records with no usable price.
pub const PRICE_UNAVAILABLE: &str = "Price unavailable";
/// Display literal for an uncomputable price-per-watt.
pub const PPW_UNAVAILABLE: &str = "N/A";

/// Computes all derived fields for one record.
///
/// `ppw_decimals` controls the price-per-watt precision (2 or 3 depending on
/// the rendering target).
#[must_use]
pub fn derive(product: &CanonicalProduct, vocab: &Vocab, ppw_decimals: usize) -> DerivedFields {
    DerivedFields {
        tier: tier_for_wattage(product.running_wattage),
        brand: match_brand(vocab, product),
        fuel_type: normalize_fuel_type(vocab, &product.fuel_type),
        formatted_price: format_price(&product.price),
        price_per_watt: price_per_watt(&product.price, product.running_wattage, ppw_decimals),
    }
}

/// Buckets a running wattage. Boundaries are inclusive on the low side, so
/// exactly 500 W is `Small` and exactly 1500 W is `Medium`; a wattage of 0
/// (absent/unparseable) lands in `Small` rather than a separate bucket.
#[must_use]
pub fn tier_for_wattage(watts: f64) -> ProductTier {
    if watts <= SMALL_MAX_WATTS {
        ProductTier::Small
    } else if watts <= MEDIUM_MAX_WATTS {
        ProductTier::Medium
    } else {
        ProductTier::Large
    }
}

/// Resolves the brand token for a record.
///
/// The display name is searched first; when it yields no hit, the affiliate
/// URL and then the plain link are tried, since retailer URL slugs usually
/// carry the vendor name. First matching keyword in table order wins.
#[must_use]
pub fn match_brand(vocab: &Vocab, product: &CanonicalProduct) -> String {
    match_brand_in(vocab, &product.display_name)
        .or_else(|| {
            product
                .affiliate_url
                .as_deref()
                .and_then(|url| match_brand_in(vocab, url))
        })
        .or_else(|| {
            product
                .link
                .as_deref()
                .and_then(|url| match_brand_in(vocab, url))
        })
        .unwrap_or_else(|| OTHER_BRAND.to_string())
}

fn match_brand_in(vocab: &Vocab, text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    let lower = text.to_lowercase();
    vocab
        .brands
        .iter()
        .find(|rule| lower.contains(&rule.keyword.to_lowercase()))
        .map(|rule| rule.brand.clone())
}

/// Maps a free-text fuel value onto the closed vocabulary by exact
/// case-insensitive lookup of the trimmed value. Unmapped or absent values
/// resolve to the vocabulary's default (not an "unknown" bucket).
#[must_use]
pub fn normalize_fuel_type(vocab: &Vocab, raw: &str) -> String {
    let needle = raw.trim();
    if needle.is_empty() {
        return vocab.default_fuel.clone();
    }
    vocab
        .fuel_types
        .iter()
        .find(|rule| rule.from.eq_ignore_ascii_case(needle))
        .map_or_else(|| vocab.default_fuel.clone(), |rule| rule.to.clone())
}

/// Formats a price for display. The unavailable sentinel becomes the
/// `"Price unavailable"` literal; text already `$`-prefixed passes through
/// unchanged; everything else is rendered as `$` + two-decimal fixed
/// notation.
#[must_use]
pub fn format_price(price: &Price) -> String {
    match price {
        Price::Unavailable => PRICE_UNAVAILABLE.to_string(),
        Price::Text(s) if s.starts_with('$') => s.clone(),
        other => match other.amount() {
            Some(v) => format!("${v:.2}"),
            None => PRICE_UNAVAILABLE.to_string(),
        },
    }
}

/// Dollars per watt at the given precision, or `"N/A"`.
///
/// The wattage check comes first so the division is never evaluated for a
/// zero or negative wattage.
#[must_use]
pub fn price_per_watt(price: &Price, watts: f64, decimals: usize) -> String {
    if watts <= 0.0 {
        return PPW_UNAVAILABLE.to_string();
    }
    match price.amount() {
        Some(amount) => format!("${:.prec$}", amount / watts, prec = decimals),
        None => PPW_UNAVAILABLE.to_string(),
    }
}
