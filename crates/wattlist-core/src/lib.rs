pub mod app_config;
pub mod config;
pub mod derive;
pub mod error;
mod parse;
pub mod products;
pub mod vocab;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use derive::{derive, format_price, price_per_watt, tier_for_wattage};
pub use error::ConfigError;
pub use products::{CanonicalProduct, DerivedFields, Price, ProductTier};
pub use vocab::{load_vocab, BrandRule, FuelRule, Vocab};
