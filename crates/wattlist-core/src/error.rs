use thiserror::Error;

/// Errors raised while loading application or vocabulary configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was set to a value that cannot be parsed.
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    /// The vocabulary file could not be read from disk.
    #[error("failed to read vocabulary file {path}: {source}")]
    VocabFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The vocabulary file is not valid YAML for the expected shape.
    #[error("failed to parse vocabulary file: {0}")]
    VocabFileParse(#[from] serde_yaml::Error),

    /// The vocabulary parsed but failed a consistency check.
    #[error("invalid vocabulary: {0}")]
    Validation(String),
}
