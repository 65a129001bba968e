//! Seed set construction
//!
//! Before crawling begins, the site's content catalog is fetched once and
//! partitioned into start URLs and blacklist path prefixes. The partition is
//! driven by [`SeedRules`]: entries whose format is blocked become blacklist
//! prefixes unless their exact path is allow-listed, everything else becomes
//! a start URL. Hardcoded start paths always come first.

mod catalog;

pub use catalog::{fetch_catalog, CatalogEntry};

use crate::MirrorError;
use reqwest::Client;
use url::Url;

/// Path of the content catalog relative to the site root
const CATALOG_PATH: &str = "/api/artefacts.json";

/// Policy inputs for seed construction
#[derive(Debug, Clone)]
pub struct SeedRules {
    /// Site-relative paths always added as start URLs, ahead of the catalog
    pub start_paths: Vec<String>,

    /// Path prefixes always blacklisted
    pub blacklist_paths: Vec<String>,

    /// Catalog formats whose entries are blacklisted instead of crawled
    pub blocked_formats: Vec<String>,

    /// Exact paths crawled even when their format is blocked
    pub allow_paths: Vec<String>,
}

impl Default for SeedRules {
    fn default() -> Self {
        SeedRules {
            start_paths: vec!["/".to_string()],
            blacklist_paths: Vec::new(),
            blocked_formats: Vec::new(),
            allow_paths: Vec::new(),
        }
    }
}

/// The initial crawl facts: start URLs and blacklist prefixes.
///
/// Immutable after construction; the frontier consumes it once.
#[derive(Debug, Clone)]
pub struct SeedSet {
    pub start_urls: Vec<Url>,
    pub blacklist_prefixes: Vec<String>,
}

impl SeedSet {
    /// Fetches the catalog from the site and builds the seed set.
    pub async fn discover(
        client: &Client,
        site_root: &Url,
        rules: &SeedRules,
    ) -> Result<Self, MirrorError> {
        let api_url = site_root.join(CATALOG_PATH)?;
        let entries = fetch_catalog(client, &api_url).await?;
        Self::from_catalog(site_root, rules, &entries)
    }

    /// Partitions catalog entries into start URLs and blacklist prefixes.
    pub fn from_catalog(
        site_root: &Url,
        rules: &SeedRules,
        entries: &[CatalogEntry],
    ) -> Result<Self, MirrorError> {
        let mut start_urls = Vec::new();
        for path in &rules.start_paths {
            start_urls.push(site_root.join(path)?);
        }

        let mut blacklist_prefixes = rules.blacklist_paths.clone();

        for entry in entries {
            let url = match Url::parse(&entry.web_url) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(
                        "Skipping catalog entry with malformed url {}: {}",
                        entry.web_url,
                        e
                    );
                    continue;
                }
            };

            let path = url.path().to_string();
            if rules.allow_paths.contains(&path) {
                start_urls.push(url);
            } else if rules.blocked_formats.contains(&entry.format) {
                blacklist_prefixes.push(path);
            } else {
                start_urls.push(url);
            }
        }

        Ok(SeedSet {
            start_urls,
            blacklist_prefixes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_root() -> Url {
        Url::parse("https://www.test.example").unwrap()
    }

    fn entry(format: &str, web_url: &str) -> CatalogEntry {
        CatalogEntry {
            format: format.to_string(),
            web_url: web_url.to_string(),
        }
    }

    fn rules() -> SeedRules {
        SeedRules {
            start_paths: vec!["/".to_string(), "/service-manual".to_string()],
            blacklist_paths: vec!["/search".to_string()],
            blocked_formats: vec!["place".to_string(), "local_transaction".to_string()],
            allow_paths: vec!["/bank-holidays".to_string()],
        }
    }

    fn start_url_strings(seeds: &SeedSet) -> Vec<String> {
        seeds.start_urls.iter().map(|u| u.to_string()).collect()
    }

    #[test]
    fn test_partitions_by_format() {
        let entries = vec![
            entry("answer", "https://www.test.example/foo"),
            entry("local_transaction", "https://www.test.example/bar/baz"),
            entry("place", "https://www.test.example/somewhere"),
            entry("guide", "https://www.test.example/vat"),
        ];
        let seeds = SeedSet::from_catalog(&site_root(), &rules(), &entries).unwrap();
        let starts = start_url_strings(&seeds);

        assert!(starts.contains(&"https://www.test.example/foo".to_string()));
        assert!(starts.contains(&"https://www.test.example/vat".to_string()));
        assert!(!starts.contains(&"https://www.test.example/bar/baz".to_string()));
        assert!(!starts.contains(&"https://www.test.example/somewhere".to_string()));

        assert!(seeds.blacklist_prefixes.contains(&"/bar/baz".to_string()));
        assert!(seeds.blacklist_prefixes.contains(&"/somewhere".to_string()));
        assert!(!seeds.blacklist_prefixes.contains(&"/foo".to_string()));
        assert!(!seeds.blacklist_prefixes.contains(&"/vat".to_string()));
    }

    #[test]
    fn test_allow_listed_path_beats_blocked_format() {
        let entries = vec![
            entry("place", "https://www.test.example/bank-holidays"),
            entry("place", "https://www.test.example/somewhere"),
        ];
        let seeds = SeedSet::from_catalog(&site_root(), &rules(), &entries).unwrap();
        let starts = start_url_strings(&seeds);

        assert!(starts.contains(&"https://www.test.example/bank-holidays".to_string()));
        assert!(!starts.contains(&"https://www.test.example/somewhere".to_string()));
        assert!(seeds.blacklist_prefixes.contains(&"/somewhere".to_string()));
        assert!(!seeds
            .blacklist_prefixes
            .contains(&"/bank-holidays".to_string()));
    }

    #[test]
    fn test_hardcoded_start_paths_come_first() {
        let entries = vec![entry("guide", "https://www.test.example/vat")];
        let seeds = SeedSet::from_catalog(&site_root(), &rules(), &entries).unwrap();
        let starts = start_url_strings(&seeds);

        assert_eq!(starts[0], "https://www.test.example/");
        assert_eq!(starts[1], "https://www.test.example/service-manual");
        assert_eq!(starts[2], "https://www.test.example/vat");
    }

    #[test]
    fn test_hardcoded_blacklist_paths_kept() {
        let seeds = SeedSet::from_catalog(&site_root(), &rules(), &[]).unwrap();
        assert!(seeds.blacklist_prefixes.contains(&"/search".to_string()));
    }

    #[test]
    fn test_malformed_catalog_url_skipped() {
        let entries = vec![
            entry("guide", "not a url"),
            entry("guide", "https://www.test.example/vat"),
        ];
        let seeds = SeedSet::from_catalog(&site_root(), &rules(), &entries).unwrap();
        let starts = start_url_strings(&seeds);

        assert!(starts.contains(&"https://www.test.example/vat".to_string()));
        assert_eq!(starts.len(), 3);
    }

    #[test]
    fn test_default_rules_start_at_root() {
        let seeds = SeedSet::from_catalog(&site_root(), &SeedRules::default(), &[]).unwrap();
        assert_eq!(start_url_strings(&seeds), vec!["https://www.test.example/"]);
        assert!(seeds.blacklist_prefixes.is_empty());
    }
}
