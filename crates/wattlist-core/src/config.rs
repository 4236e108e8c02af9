use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a set variable holds an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a set variable holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let catalog_path = PathBuf::from(or_default("WATTLIST_CATALOG_PATH", "./products.csv"));
    let feed_path = PathBuf::from(or_default("WATTLIST_FEED_PATH", "./prices.json"));
    let site_path = PathBuf::from(or_default("WATTLIST_SITE_PATH", "./public/index.html"));
    let output_path = lookup("WATTLIST_OUTPUT_PATH")
        .map_or_else(|_| site_path.clone(), PathBuf::from);
    let data_path = lookup("WATTLIST_DATA_PATH").ok().map(PathBuf::from);
    let vocab_path = lookup("WATTLIST_VOCAB_PATH").ok().map(PathBuf::from);
    let log_level = or_default("WATTLIST_LOG_LEVEL", "info");

    let raw_decimals = or_default("WATTLIST_PPW_DECIMALS", "3");
    let ppw_decimals = raw_decimals
        .parse::<usize>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "WATTLIST_PPW_DECIMALS".to_string(),
            reason: e.to_string(),
        })?;
    if ![2, 3].contains(&ppw_decimals) {
        return Err(ConfigError::InvalidEnvVar {
            var: "WATTLIST_PPW_DECIMALS".to_string(),
            reason: format!("must be 2 or 3, got {ppw_decimals}"),
        });
    }

    Ok(AppConfig {
        catalog_path,
        feed_path,
        site_path,
        output_path,
        data_path,
        vocab_path,
        ppw_decimals,
        log_level,
    })
}
