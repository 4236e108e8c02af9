use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// The catalog header row is missing or empty. Fatal: without a header
    /// no column can be identified, so the whole run aborts.
    #[error("malformed catalog input: {reason}")]
    MalformedInput { reason: String },

    /// The price feed could not be parsed. Recoverable: the caller proceeds
    /// with catalog-only prices.
    #[error("price feed unavailable: {reason}")]
    PriceFeedUnavailable { reason: String },
}
