pub mod catalog;
pub mod error;
pub mod pricefeed;
pub mod reconcile;
pub mod table;

pub use catalog::{normalize_catalog, AliasTable};
pub use error::IngestError;
pub use pricefeed::{load_or_default, parse_price_feed, FeedPrice, RawPriceEntry};
pub use reconcile::{reconcile, ReconcileReport};
pub use table::{parse_table, RawTable};
