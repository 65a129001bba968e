//! Runtime configuration
//!
//! The mirrorer is configured entirely from the command line and the
//! environment: the site root comes from `--site-root` or `MIRROR_SITE_ROOT`
//! (the flag wins), everything else has a default. Validation happens here,
//! before any crawling begins.

use crate::ConfigError;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Resolved and validated runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root URL of the site being mirrored
    pub site_root: Url,

    /// Directory the mirrored files are written under
    pub output_dir: PathBuf,

    /// Politeness delay between requests (zero by default)
    pub request_interval: Duration,
}

impl Settings {
    /// Builds settings from raw CLI/environment values.
    ///
    /// A missing site root is a fatal configuration error, not something the
    /// crawl engine ever has to deal with.
    pub fn new(
        site_root: Option<&str>,
        output_dir: PathBuf,
        request_interval_secs: f64,
    ) -> Result<Self, ConfigError> {
        let raw = site_root.ok_or(ConfigError::MissingSiteRoot)?;
        let site_root = validate_site_root(raw)?;

        if !request_interval_secs.is_finite() || request_interval_secs < 0.0 {
            return Err(ConfigError::Validation(format!(
                "request interval must be a non-negative number of seconds, got {}",
                request_interval_secs
            )));
        }

        Ok(Settings {
            site_root,
            output_dir,
            request_interval: Duration::from_secs_f64(request_interval_secs),
        })
    }
}

/// Validates the site root: must parse as an absolute http(s) URL with a host
fn validate_site_root(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidSiteRoot {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidSiteRoot {
            url: raw.to_string(),
            reason: format!("scheme must be http or https, got {}", url.scheme()),
        });
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidSiteRoot {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(url)
}
