//! HTTP fetching
//!
//! One GET per call; classification of failures into retryable and permanent
//! lives on [`FetchError`]. Redirects are followed by the client, and the
//! page handler checks the final host, so an off-site redirect is detected
//! after the fact rather than refused here.

use crate::FetchError;
use reqwest::Client;
use std::borrow::Cow;
use std::time::Duration;
use url::Url;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("site-mirror/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client used for the whole run
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// A successfully fetched page
#[derive(Debug)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value, empty when absent
    pub content_type: String,
    /// Raw response body
    pub body: Vec<u8>,
}

impl FetchedPage {
    /// True when the content type indicates markup worth scanning for links
    pub fn is_markup(&self) -> bool {
        self.content_type.starts_with("text/html")
            || self.content_type.starts_with("application/xhtml+xml")
    }

    /// Body as text, with invalid UTF-8 replaced
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Performs a single fetch attempt. Any non-2xx status is an error carrying
/// the status code; retry decisions belong to the caller.
pub async fn fetch(client: &Client, url: &Url) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| FetchError::Transport {
            url: url.to_string(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().clone();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = response
        .bytes()
        .await
        .map_err(|e| FetchError::Transport {
            url: url.to_string(),
            source: e,
        })?
        .to_vec();

    Ok(FetchedPage {
        final_url,
        status: status.as_u16(),
        content_type,
        body,
    })
}
