//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `RUBRICATE_*` environment
//! variables; the OpenAI credential is read from the conventional
//! `OPENAI_API_KEY`.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::DEFAULT_TOP_K;
use crate::schema::{Backoff, RepairPolicy};

/// Service configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RUBRICATE_*` overrides on top of
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8000`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Path to the persisted index blob. Default: `./essay_index.bin`.
    pub index_path: PathBuf,

    /// Path to the persisted metadata blob. Default: `./essay_metadata.jsonl`.
    pub metadata_path: PathBuf,

    /// OpenAI-compatible API base URL. Default: `https://api.openai.com/v1`.
    pub openai_base_url: String,

    /// API credential, from `OPENAI_API_KEY`. Required.
    pub openai_api_key: String,

    /// Embedding model name. Default: `text-embedding-ada-002`.
    pub embedding_model: String,

    /// Chat model name. Default: `gpt-3.5-turbo`.
    pub chat_model: String,

    /// Timeout applied to every remote call. Default: 30s.
    pub request_timeout: Duration,

    /// Reference essays retrieved per request. Default: 2.
    pub top_k: usize,

    /// Re-prompt policy for malformed generation output. Default: off.
    pub repair: RepairPolicy,

    /// Frontend origin allowed by CORS. Default: `http://localhost:5173`.
    pub allowed_origin: String,
}

/// Default OpenAI-compatible endpoint.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            index_path: PathBuf::from("./essay_index.bin"),
            metadata_path: PathBuf::from("./essay_metadata.jsonl"),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            openai_api_key: String::new(),
            embedding_model: "text-embedding-ada-002".to_string(),
            chat_model: "gpt-3.5-turbo".to_string(),
            request_timeout: Duration::from_secs(30),
            top_k: DEFAULT_TOP_K,
            repair: RepairPolicy::default(),
            allowed_origin: "http://localhost:5173".to_string(),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "RUBRICATE_PORT";
    const ENV_BIND_ADDR: &'static str = "RUBRICATE_BIND_ADDR";
    const ENV_INDEX_PATH: &'static str = "RUBRICATE_INDEX_PATH";
    const ENV_METADATA_PATH: &'static str = "RUBRICATE_METADATA_PATH";
    const ENV_OPENAI_BASE_URL: &'static str = "RUBRICATE_OPENAI_BASE_URL";
    const ENV_OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";
    const ENV_EMBEDDING_MODEL: &'static str = "RUBRICATE_EMBEDDING_MODEL";
    const ENV_CHAT_MODEL: &'static str = "RUBRICATE_CHAT_MODEL";
    const ENV_REQUEST_TIMEOUT_SECS: &'static str = "RUBRICATE_REQUEST_TIMEOUT_SECS";
    const ENV_TOP_K: &'static str = "RUBRICATE_TOP_K";
    const ENV_REPAIR_RETRIES: &'static str = "RUBRICATE_REPAIR_RETRIES";
    const ENV_REPAIR_BACKOFF: &'static str = "RUBRICATE_REPAIR_BACKOFF";
    const ENV_ALLOWED_ORIGIN: &'static str = "RUBRICATE_ALLOWED_ORIGIN";

    /// Loads configuration from environment variables (falling back to
    /// defaults). The API key is required.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let index_path = Self::parse_path_from_env(Self::ENV_INDEX_PATH, defaults.index_path);
        let metadata_path =
            Self::parse_path_from_env(Self::ENV_METADATA_PATH, defaults.metadata_path);
        let openai_base_url =
            Self::parse_string_from_env(Self::ENV_OPENAI_BASE_URL, defaults.openai_base_url);
        let openai_api_key = env::var(Self::ENV_OPENAI_API_KEY)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey {
                var: Self::ENV_OPENAI_API_KEY,
            })?;
        let embedding_model =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_MODEL, defaults.embedding_model);
        let chat_model = Self::parse_string_from_env(Self::ENV_CHAT_MODEL, defaults.chat_model);
        let request_timeout = Duration::from_secs(Self::parse_u64_from_env(
            Self::ENV_REQUEST_TIMEOUT_SECS,
            defaults.request_timeout.as_secs(),
        ));
        let top_k = Self::parse_top_k_from_env(defaults.top_k)?;
        let repair = Self::parse_repair_from_env(defaults.repair)?;
        let allowed_origin =
            Self::parse_string_from_env(Self::ENV_ALLOWED_ORIGIN, defaults.allowed_origin);

        Ok(Self {
            port,
            bind_addr,
            index_path,
            metadata_path,
            openai_base_url,
            openai_api_key,
            embedding_model,
            chat_model,
            request_timeout,
            top_k,
            repair,
            allowed_origin,
        })
    }

    /// Validates that the persisted corpus pair is present.
    ///
    /// Loading only half a snapshot (or none) must prevent the service
    /// from becoming ready.
    pub fn validate_corpus_paths(&self) -> Result<(), ConfigError> {
        for path in [&self.index_path, &self.metadata_path] {
            if !path.is_file() {
                return Err(ConfigError::CorpusArtifactMissing { path: path.clone() });
            }
        }
        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_top_k_from_env(default: usize) -> Result<usize, ConfigError> {
        match env::var(Self::ENV_TOP_K) {
            Ok(value) => match value.parse::<usize>() {
                Ok(k) if k > 0 => Ok(k),
                _ => Err(ConfigError::InvalidSetting {
                    var: Self::ENV_TOP_K,
                    value,
                    reason: "expected a positive integer".to_string(),
                }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_repair_from_env(default: RepairPolicy) -> Result<RepairPolicy, ConfigError> {
        let retries = Self::parse_u64_from_env(
            Self::ENV_REPAIR_RETRIES,
            u64::from(default.retries),
        ) as u32;

        let backoff = match env::var(Self::ENV_REPAIR_BACKOFF) {
            Ok(value) => match value.to_ascii_lowercase().as_str() {
                "fixed" => Backoff::Fixed,
                "exponential" => Backoff::Exponential,
                _ => {
                    return Err(ConfigError::InvalidSetting {
                        var: Self::ENV_REPAIR_BACKOFF,
                        value,
                        reason: "expected 'fixed' or 'exponential'".to_string(),
                    });
                }
            },
            Err(_) => default.backoff,
        };

        Ok(RepairPolicy {
            retries,
            backoff,
            base_delay: default.base_delay,
        })
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
