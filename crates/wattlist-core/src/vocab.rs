use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Brand token emitted when no keyword rule matches.
pub const OTHER_BRAND: &str = "other_brand";

/// One ordered brand rule: `keyword` is searched case-insensitively as a
/// substring of the candidate text; `brand` is the canonical token emitted
/// on a hit. Earlier rules win, so more specific keywords go first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandRule {
    pub keyword: String,
    pub brand: String,
}

/// One fuel-type synonym: `from` is matched case-insensitively against the
/// whole trimmed catalog value, `to` is the canonical token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelRule {
    pub from: String,
    pub to: String,
}

/// The closed matching vocabulary consumed by the derivation engine.
///
/// Extending brand or fuel coverage is a data change here (or in the YAML
/// file this loads from), never a change to the matching loops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocab {
    pub brands: Vec<BrandRule>,
    pub fuel_types: Vec<FuelRule>,
    /// Token emitted for unmapped or absent fuel values.
    #[serde(default = "default_fuel")]
    pub default_fuel: String,
}

fn default_fuel() -> String {
    "gasoline".to_string()
}

fn brand(keyword: &str, brand: &str) -> BrandRule {
    BrandRule {
        keyword: keyword.to_string(),
        brand: brand.to_string(),
    }
}

fn fuel(from: &str, to: &str) -> FuelRule {
    FuelRule {
        from: from.to_string(),
        to: to.to_string(),
    }
}

impl Vocab {
    /// The compiled-in vocabulary, used when no YAML override is configured.
    #[must_use]
    pub fn builtin() -> Self {
        Vocab {
            brands: vec![
                brand("honda", "honda"),
                brand("generac", "generac"),
                brand("champion", "champion"),
                brand("westinghouse", "westinghouse"),
                brand("wgen", "westinghouse"),
                brand("igen", "westinghouse"),
                brand("jackery", "jackery"),
                brand("explorer", "jackery"),
                brand("ecoflow", "ecoflow"),
                brand("delta pro", "ecoflow"),
                brand("bluetti", "bluetti"),
                brand("anker", "anker"),
                brand("solix", "anker"),
                brand("duromax", "duromax"),
                brand("firman", "firman"),
                brand("pulsar", "pulsar"),
                brand("predator", "predator"),
                brand("wen ", "wen"),
                brand("a-ipower", "a-ipower"),
                brand("ryobi", "ryobi"),
            ],
            fuel_types: vec![
                fuel("gas", "gasoline"),
                fuel("gasoline", "gasoline"),
                fuel("petrol", "gasoline"),
                fuel("dual fuel", "dual_fuel"),
                fuel("dual-fuel", "dual_fuel"),
                fuel("tri fuel", "tri_fuel"),
                fuel("tri-fuel", "tri_fuel"),
                fuel("propane", "propane"),
                fuel("lpg", "propane"),
                fuel("natural gas", "natural_gas"),
                fuel("diesel", "diesel"),
                fuel("electric", "battery"),
                fuel("battery", "battery"),
                fuel("lithium", "battery"),
                fuel("solar", "solar"),
            ],
            default_fuel: default_fuel(),
        }
    }
}

/// Load and validate the matching vocabulary from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_vocab(path: &Path) -> Result<Vocab, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::VocabFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let vocab: Vocab = serde_yaml::from_str(&content).map_err(ConfigError::VocabFileParse)?;

    validate_vocab(&vocab)?;

    Ok(vocab)
}

fn validate_vocab(vocab: &Vocab) -> Result<(), ConfigError> {
    let mut seen_keywords = HashSet::new();

    for rule in &vocab.brands {
        if rule.keyword.trim().is_empty() || rule.brand.trim().is_empty() {
            return Err(ConfigError::Validation(
                "brand rule keyword and brand must be non-empty".to_string(),
            ));
        }

        let lower = rule.keyword.to_lowercase();
        if !seen_keywords.insert(lower) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand keyword: '{}'",
                rule.keyword
            )));
        }
    }

    let mut seen_synonyms = HashSet::new();

    for rule in &vocab.fuel_types {
        if rule.from.trim().is_empty() || rule.to.trim().is_empty() {
            return Err(ConfigError::Validation(
                "fuel rule from and to must be non-empty".to_string(),
            ));
        }

        let lower = rule.from.to_lowercase();
        if !seen_synonyms.insert(lower) {
            return Err(ConfigError::Validation(format!(
                "duplicate fuel synonym: '{}'",
                rule.from
            )));
        }
    }

    if vocab.default_fuel.trim().is_empty() {
        return Err(ConfigError::Validation(
            "default_fuel must be non-empty".to_string(),
        ));
    }

    Ok(())
}
