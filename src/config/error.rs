use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Configuration failures. All fatal at startup.
pub enum ConfigError {
    /// Port value did not parse.
    #[error("invalid port '{value}': {source}")]
    PortParseError {
        /// Raw value.
        value: String,
        /// Parse failure.
        source: std::num::ParseIntError,
    },

    /// Port 0 is reserved.
    #[error("invalid port '{value}': must be 1-65535")]
    InvalidPort {
        /// Raw value.
        value: String,
    },

    /// Bind address did not parse.
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        /// Raw value.
        value: String,
        /// Parse failure.
        source: std::net::AddrParseError,
    },

    /// The API key is missing; no remote call can be made without it.
    #[error("missing required environment variable {var}")]
    MissingApiKey {
        /// The variable name.
        var: &'static str,
    },

    /// A corpus artifact path does not exist.
    ///
    /// The index and metadata blobs are a linked pair; a missing half is
    /// the same startup error as a mismatched pair.
    #[error("corpus artifact not found: {path}")]
    CorpusArtifactMissing {
        /// Missing path.
        path: PathBuf,
    },

    /// A numeric setting did not parse.
    #[error("invalid value '{value}' for {var}: {reason}")]
    InvalidSetting {
        /// The variable name.
        var: &'static str,
        /// Raw value.
        value: String,
        /// What was expected.
        reason: String,
    },
}
