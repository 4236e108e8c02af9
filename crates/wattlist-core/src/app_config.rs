use std::path::PathBuf;

/// Resolved application configuration for one generation run.
///
/// All values come from `WATTLIST_*` environment variables with defaults
/// matching the repository layout; see [`crate::config::load_app_config`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// The delimited-text product catalog (load-bearing input).
    pub catalog_path: PathBuf,
    /// The JSON price feed (optional input; the run degrades without it).
    pub feed_path: PathBuf,
    /// The host HTML document carrying the anchor markers.
    pub site_path: PathBuf,
    /// Where the mutated document is written. Defaults to `site_path`, i.e.
    /// in-place regeneration.
    pub output_path: PathBuf,
    /// Optional JSON artifact of the merged records (canonical + derived).
    pub data_path: Option<PathBuf>,
    /// Optional YAML vocabulary override; the compiled-in vocabulary is used
    /// when unset.
    pub vocab_path: Option<PathBuf>,
    /// Price-per-watt precision: 2 or 3 decimal places.
    pub ppw_decimals: usize,
    pub log_level: String,
}
