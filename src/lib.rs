//! site-mirror: a single-site mirroring crawler
//!
//! This crate mirrors one public website to local storage: it discovers every
//! in-scope page starting from a seed list, downloads each page once, and
//! follows discovered links until no new in-scope URL remains.

pub mod config;
pub mod crawler;
pub mod scope;
pub mod seed;
pub mod storage;

use thiserror::Error;

/// Main error type for site-mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Catalog decode error for {url}: {source}")]
    CatalogDecode {
        url: String,
        source: serde_json::Error,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors, raised before any crawling begins
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No site root given (pass --site-root or set MIRROR_SITE_ROOT)")]
    MissingSiteRoot,

    #[error("Invalid site root '{url}': {reason}")]
    InvalidSiteRoot { url: String, reason: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors from a single fetch attempt
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request failed for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },
}

impl FetchError {
    /// True for HTTP 429 and 5xx responses, which get exactly one retry.
    /// Transport failures (timeouts, connection errors) are never retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchError::Status { status, .. } if *status == 429 || (500..=599).contains(status)
        )
    }
}

/// Result type alias for site-mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Settings;
pub use crawler::{build_http_client, CrawlEngine, CrawlReport, Frontier};
pub use scope::{BlacklistMatcher, ScopeOutcome, ScopePolicy};
pub use seed::{SeedRules, SeedSet};
pub use storage::MirrorStore;
