//! Catalog client
//!
//! The site publishes a JSON catalog of its content at
//! `/api/artefacts.json`. The client pages through it via the standard
//! `Link: <...>; rel="next"` header until exhausted. The whole fetch is
//! retried exactly once after a short sleep on a transient HTTP error; a
//! second failure propagates and is fatal at startup.

use crate::{FetchError, MirrorError};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// One catalog entry: where the content lives and what format it is
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub web_url: String,
    pub format: String,
}

#[derive(Debug, Deserialize)]
struct CatalogPage {
    #[serde(default)]
    results: Vec<CatalogEntry>,
}

/// Fetches the full catalog, following pagination, with one retry on a
/// transient error.
pub async fn fetch_catalog(client: &Client, api_url: &Url) -> Result<Vec<CatalogEntry>, MirrorError> {
    match fetch_all_pages(client, api_url).await {
        Err(MirrorError::Fetch(ref error)) if error.is_retryable() => {
            tracing::warn!("Transient error fetching catalog, retrying once: {}", error);
            tokio::time::sleep(RETRY_BACKOFF).await;
            fetch_all_pages(client, api_url).await
        }
        other => other,
    }
}

async fn fetch_all_pages(
    client: &Client,
    api_url: &Url,
) -> Result<Vec<CatalogEntry>, MirrorError> {
    let mut entries = Vec::new();
    let mut next = Some(api_url.clone());

    while let Some(url) = next.take() {
        tracing::debug!("Fetching catalog page {}", url);
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
            }
            .into());
        }

        let next_link = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_next_link);

        let bytes = response.bytes().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            source: e,
        })?;

        let page: CatalogPage =
            serde_json::from_slice(&bytes).map_err(|e| MirrorError::CatalogDecode {
                url: url.to_string(),
                source: e,
            })?;
        entries.extend(page.results);

        next = match next_link {
            Some(raw) => Some(Url::parse(&raw)?),
            None => None,
        };
    }

    Ok(entries)
}

/// Extracts the target of the `rel="next"` relation from a Link header value
fn parse_next_link(header: &str) -> Option<String> {
    for part in header.split(',') {
        let mut pieces = part.split(';');
        let target = pieces.next().map(str::trim)?;
        let is_next = pieces.any(|piece| {
            let piece = piece.trim();
            piece == "rel=\"next\"" || piece == "rel=next"
        });
        if is_next && target.starts_with('<') && target.ends_with('>') {
            return Some(target[1..target.len() - 1].to_string());
        }
    }
    None
}
