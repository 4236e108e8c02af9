//! Normalization from the raw catalog table to [`wattlist_core::CanonicalProduct`].
//!
//! Historical catalog exports disagree on column names (`output_wattage` vs
//! `running_wattage`, `price` vs `price_amount`, ...). That drift is absorbed
//! by [`AliasTable`] as data, not branching code, so a new export version is
//! a table edit, never a new code path.

use std::collections::HashMap;

use regex::Regex;

use wattlist_core::{CanonicalProduct, Price};

use crate::error::IngestError;
use crate::table::parse_table;

/// Ordered header aliases for each canonical field. For every field the
/// first alias present in the catalog header wins.
#[derive(Debug, Clone)]
pub struct AliasTable {
    pub id: Vec<String>,
    pub display_name: Vec<String>,
    pub link: Vec<String>,
    pub affiliate_url: Vec<String>,
    pub link_text: Vec<String>,
    pub running_wattage: Vec<String>,
    pub starting_wattage: Vec<String>,
    pub capacity_wh: Vec<String>,
    pub fuel_type: Vec<String>,
    pub engine_type: Vec<String>,
    pub condition: Vec<String>,
    pub price: Vec<String>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

impl Default for AliasTable {
    fn default() -> Self {
        AliasTable {
            id: names(&["asin", "id", "sku"]),
            display_name: names(&["title", "name", "product_name"]),
            link: names(&["link", "url", "product_url"]),
            affiliate_url: names(&["affiliate_link", "affiliate_url"]),
            link_text: names(&["link_text"]),
            running_wattage: names(&["output_wattage", "running_wattage", "wattage"]),
            starting_wattage: names(&["starting_wattage", "peak_wattage", "surge_wattage"]),
            capacity_wh: names(&["battery_capacity", "capacity_wh"]),
            fuel_type: names(&["fuel_type", "fuel"]),
            engine_type: names(&["engine_type"]),
            condition: names(&["condition"]),
            price: names(&["price", "price_amount"]),
        }
    }
}

/// Normalizes one delimited-text catalog block into canonical records.
///
/// Per-record coercion failures never error: unparseable numerics become
/// `0.0`, bad prices become the unavailable sentinel. Record identity is the
/// first available of explicit id column, listing id extracted from the
/// affiliate/product URL, or a synthesized `row-N` index.
///
/// # Errors
///
/// Returns [`IngestError::MalformedInput`] only when the header row is
/// absent or empty. Zero data rows yields an empty vector.
pub fn normalize_catalog(
    text: &str,
    aliases: &AliasTable,
) -> Result<Vec<CanonicalProduct>, IngestError> {
    let table = parse_table(text)?;

    let index: HashMap<String, usize> = table
        .headers
        .iter()
        .enumerate()
        .map(|(pos, name)| (name.to_lowercase(), pos))
        .collect();

    let resolve = |field_aliases: &[String]| -> Option<usize> {
        field_aliases
            .iter()
            .find_map(|alias| index.get(alias.as_str()).copied())
    };

    let id_col = resolve(&aliases.id);
    let name_col = resolve(&aliases.display_name);
    let link_col = resolve(&aliases.link);
    let affiliate_col = resolve(&aliases.affiliate_url);
    let link_text_col = resolve(&aliases.link_text);
    let running_col = resolve(&aliases.running_wattage);
    let starting_col = resolve(&aliases.starting_wattage);
    let capacity_col = resolve(&aliases.capacity_wh);
    let fuel_col = resolve(&aliases.fuel_type);
    let engine_col = resolve(&aliases.engine_type);
    let condition_col = resolve(&aliases.condition);
    let price_col = resolve(&aliases.price);

    let mut products = Vec::with_capacity(table.rows.len());

    for (row_idx, row) in table.rows.iter().enumerate() {
        if row.iter().all(String::is_empty) {
            continue;
        }

        let get = |col: Option<usize>| field(row, col);

        let explicit_id = get(id_col);
        let link = get(link_col);
        let affiliate = get(affiliate_col);

        let key = if explicit_id.is_empty() {
            extract_listing_id(affiliate)
                .or_else(|| extract_listing_id(link))
                .unwrap_or_else(|| format!("row-{}", row_idx + 1))
        } else {
            explicit_id.to_string()
        };

        let mut product = CanonicalProduct::new(key);

        let title = get(name_col);
        product.display_name = if title.is_empty() {
            format!("Product {}", product.key)
        } else {
            title.to_string()
        };

        product.link = non_empty(link);
        product.affiliate_url = non_empty(affiliate);

        let link_text = get(link_text_col);
        if !link_text.is_empty() {
            product.link_text = link_text.to_string();
        }

        product.running_wattage = coerce_f64(get(running_col));
        product.starting_wattage = coerce_f64(get(starting_col));
        product.capacity_wh = coerce_f64(get(capacity_col));

        product.fuel_type = get(fuel_col).to_string();
        product.engine_type = get(engine_col).to_string();

        let condition = get(condition_col);
        if !condition.is_empty() {
            product.condition = condition.to_string();
        }

        product.price = Price::parse(get(price_col));

        products.push(product);
    }

    Ok(products)
}

/// Positional zip against the header: an unresolved column or a missing
/// trailing field reads as the empty string.
fn field<'a>(row: &'a [String], col: Option<usize>) -> &'a str {
    col.and_then(|c| row.get(c)).map_or("", String::as_str)
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Numeric coercion for wattage/capacity columns: strip thousands
/// separators, parse as a float, and collapse every failure (empty string
/// included) to `0.0`. Never `NaN`, never an error.
fn coerce_f64(value: &str) -> f64 {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Extracts a 10-character retailer listing identifier from a product URL.
///
/// Recognizes the URL shapes the retailer has used over time:
/// `/dp/{id}`, `/gp/product/{id}`, `?asin={id}`, and `/product/{id}`.
fn extract_listing_id(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }

    let patterns = [
        r"/dp/([A-Z0-9]{10})",
        r"/gp/product/([A-Z0-9]{10})",
        r"[?&]asin=([A-Z0-9]{10})",
        r"/product/([A-Z0-9]{10})",
    ];

    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid listing id regex");
        if let Some(captures) = re.captures(url) {
            return Some(captures[1].to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str) -> Vec<CanonicalProduct> {
        normalize_catalog(text, &AliasTable::default()).expect("catalog should normalize")
    }

    #[test]
    fn explicit_id_column_wins() {
        let products = normalize(
            "asin,title,affiliate_link\nB00AAAAAA1,Gen One,https://www.amazon.com/dp/B00BBBBBB2",
        );
        assert_eq!(products[0].key, "B00AAAAAA1");
    }

    #[test]
    fn key_extracted_from_affiliate_url_when_id_missing() {
        let products = normalize(
            "title,affiliate_link\nGen One,https://www.amazon.com/dp/B00ABC1234?tag=site-20",
        );
        assert_eq!(products[0].key, "B00ABC1234");
    }

    #[test]
    fn key_extracted_from_gp_product_url() {
        let products =
            normalize("title,link\nGen One,https://www.amazon.com/gp/product/B00XYZ9876");
        assert_eq!(products[0].key, "B00XYZ9876");
    }

    #[test]
    fn key_synthesized_when_nothing_available() {
        let products = normalize("title,output_wattage\nGen One,800\nGen Two,900");
        assert_eq!(products[0].key, "row-1");
        assert_eq!(products[1].key, "row-2");
    }

    #[test]
    fn aliased_wattage_headers_resolve() {
        for header in ["output_wattage", "running_wattage", "wattage"] {
            let products = normalize(&format!("title,{header}\nGen,800"));
            assert_eq!(products[0].running_wattage, 800.0, "header {header}");
        }
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let products = normalize("Title,Output_Wattage\nGen,800");
        assert_eq!(products[0].display_name, "Gen");
        assert_eq!(products[0].running_wattage, 800.0);
    }

    #[test]
    fn unparseable_wattage_is_zero() {
        let products = normalize("title,output_wattage\nGen,lots");
        assert_eq!(products[0].running_wattage, 0.0);
    }

    #[test]
    fn missing_trailing_fields_read_as_empty() {
        let products = normalize("title,output_wattage,price\nGen");
        assert_eq!(products[0].display_name, "Gen");
        assert_eq!(products[0].running_wattage, 0.0);
        assert!(!products[0].has_price());
    }

    #[test]
    fn all_empty_row_skipped() {
        let products = normalize("title,price\nGen,100\n,\nOther,200");
        assert_eq!(products.len(), 2);
    }

    #[test]
    fn condition_defaults_to_new() {
        let products = normalize("title\nGen");
        assert_eq!(products[0].condition, "New");
    }

    #[test]
    fn condition_column_overrides_default() {
        let products = normalize("title,condition\nGen,Renewed");
        assert_eq!(products[0].condition, "Renewed");
    }

    #[test]
    fn display_name_falls_back_to_key() {
        let products = normalize("asin,price\nB00ABC1234,100");
        assert_eq!(products[0].display_name, "Product B00ABC1234");
    }

    #[test]
    fn price_dollar_string_kept_as_text() {
        let products = normalize("title,price\nGen,\"$1,299.00\"");
        assert_eq!(
            products[0].price,
            Price::Text("$1,299.00".to_string())
        );
    }

    #[test]
    fn price_zero_is_unavailable() {
        let products = normalize("title,price\nGen,0");
        assert!(!products[0].has_price());
    }

    #[test]
    fn empty_catalog_text_is_malformed() {
        let err = normalize_catalog("", &AliasTable::default()).unwrap_err();
        assert!(matches!(err, IngestError::MalformedInput { .. }));
    }

    #[test]
    fn header_only_catalog_is_empty_not_error() {
        let products = normalize("title,price");
        assert!(products.is_empty());
    }

    #[test]
    fn listing_id_patterns() {
        assert_eq!(
            extract_listing_id("https://www.amazon.com/dp/B00ABC1234"),
            Some("B00ABC1234".to_string())
        );
        assert_eq!(
            extract_listing_id("https://www.amazon.com/gp/product/B00ABC1234"),
            Some("B00ABC1234".to_string())
        );
        assert_eq!(
            extract_listing_id("https://example.com/search?asin=B00ABC1234"),
            Some("B00ABC1234".to_string())
        );
        assert_eq!(
            extract_listing_id("https://example.com/product/B00ABC1234"),
            Some("B00ABC1234".to_string())
        );
        assert_eq!(extract_listing_id("https://example.com/other"), None);
        assert_eq!(extract_listing_id(""), None);
    }
}
