//! Crawl engine
//!
//! The engine drives the frontier until it is empty: one URL is fetched and
//! fully handled, including all nested enqueue side effects, before the next
//! is dequeued. No parallelism, one fetch in flight at a time, so the
//! frontier needs no locking and retry semantics stay deterministic.

use crate::config::Settings;
use crate::crawler::fetcher::{fetch, FetchedPage};
use crate::crawler::frontier::{CrawlContext, ErrorRecord, Frontier, Handler, WorkItem};
use crate::crawler::parser::extract_links;
use crate::scope::{BlacklistMatcher, ScopeOutcome, ScopePolicy};
use crate::seed::SeedSet;
use crate::storage::MirrorStore;
use crate::MirrorError;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Backoff before the single retry of a transient fetch failure
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Outcome counts for a completed run
#[derive(Debug, Clone, Copy, Default)]
pub struct CrawlReport {
    /// Pages fetched and handled
    pub fetched: usize,
    /// URLs that permanently failed
    pub failed: usize,
}

/// Orchestrates the fetch loop over the frontier for one run
pub struct CrawlEngine {
    client: Client,
    frontier: Frontier,
    policy: ScopePolicy,
    store: MirrorStore,
    request_interval: Duration,
}

impl CrawlEngine {
    /// Builds the engine and seeds the frontier.
    ///
    /// Seeds go through the normal enqueue path, so duplicates, blacklisted
    /// paths and querystringed catalog entries are rejected up front.
    pub fn new(settings: &Settings, seeds: SeedSet, client: Client) -> Result<Self, MirrorError> {
        let policy = ScopePolicy::new(&settings.site_root)?;
        let blacklist = BlacklistMatcher::new(&seeds.blacklist_prefixes);
        let mut frontier = Frontier::new(blacklist);

        for url in seeds.start_urls {
            tracing::debug!("Adding start url {}", url);
            frontier.enqueue(url, Handler::ProcessPage, CrawlContext::default());
        }

        Ok(CrawlEngine {
            client,
            frontier,
            policy,
            store: MirrorStore::new(settings.output_dir.clone()),
            request_interval: settings.request_interval,
        })
    }

    /// Runs the crawl loop until the frontier is exhausted.
    ///
    /// Per-URL failures never abort the run; the summary line always fires
    /// on normal completion.
    pub async fn run(&mut self) -> CrawlReport {
        let mut fetched = 0;

        while let Some(item) = self.frontier.pop() {
            if self.execute(item).await {
                fetched += 1;
            }
            if !self.request_interval.is_zero() {
                tokio::time::sleep(self.request_interval).await;
            }
        }

        let report = CrawlReport {
            fetched,
            failed: self.frontier.failed().len(),
        };
        tracing::info!(
            "Completed mirroring the site: {} pages fetched, {} failures",
            report.fetched,
            report.failed
        );
        report
    }

    /// URLs that permanently failed this run, with their diagnostics
    pub fn failures(&self) -> &HashMap<String, ErrorRecord> {
        self.frontier.failed()
    }

    /// Number of items still waiting in the frontier
    pub fn pending(&self) -> usize {
        self.frontier.pending()
    }

    /// One queue item: fetch with at most one retry, then hand the page to
    /// its handler. Returns whether the handler ran successfully.
    async fn execute(&mut self, item: WorkItem) -> bool {
        let mut retried = false;
        loop {
            match fetch(&self.client, &item.url).await {
                Ok(page) => {
                    tracing::debug!("Handling {}", item.url);
                    return match self.dispatch(&item, page) {
                        Ok(()) => true,
                        Err(error) => {
                            tracing::warn!(
                                "Error {} for {} (data: {:?})",
                                error,
                                item.url,
                                item.ctx
                            );
                            self.frontier.record_failure(item, error);
                            false
                        }
                    };
                }
                Err(error) if error.is_retryable() && !retried => {
                    // Same queue item, not a new enqueue
                    retried = true;
                    tracing::debug!("Transient error for {}, retrying once: {}", item.url, error);
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
                Err(error) => {
                    tracing::warn!("Error {} for {} (data: {:?})", error, item.url, item.ctx);
                    self.frontier.record_failure(item, error.into());
                    return false;
                }
            }
        }
    }

    fn dispatch(&mut self, item: &WorkItem, page: FetchedPage) -> Result<(), MirrorError> {
        match item.handler {
            Handler::ProcessPage => self.process_page(&item.ctx, page),
        }
    }

    /// Persists an on-site page and feeds its links back into the frontier.
    ///
    /// A redirect can land anywhere, so the final host is checked first; an
    /// off-site landing is logged and dropped without persistence.
    fn process_page(&mut self, ctx: &CrawlContext, page: FetchedPage) -> Result<(), MirrorError> {
        if page.final_url.host_str() != Some(self.policy.host()) {
            match &ctx.referrer {
                Some(referrer) => tracing::warn!(
                    "Ended up on non {} page {} from {}",
                    self.policy.host(),
                    page.final_url,
                    referrer
                ),
                None => tracing::warn!(
                    "Ended up on non {} page {}",
                    self.policy.host(),
                    page.final_url
                ),
            }
            return Ok(());
        }

        let path = self.store.store(&page.final_url, &page.body, page.is_markup())?;
        tracing::debug!("Saved {} to {}", page.final_url, path.display());

        if page.is_markup() {
            self.handle_links(&page);
        }
        Ok(())
    }

    fn handle_links(&mut self, page: &FetchedPage) {
        for href in extract_links(&page.body_text()) {
            match self.policy.resolve(&href, &page.final_url) {
                ScopeOutcome::InScope(url) => {
                    let ctx = CrawlContext {
                        referrer: Some(page.final_url.clone()),
                    };
                    self.frontier.enqueue(url, Handler::ProcessPage, ctx);
                }
                ScopeOutcome::OffSite => {
                    tracing::debug!(
                        "Ignoring non {} link {} on {}",
                        self.policy.host(),
                        href,
                        page.final_url
                    );
                }
                ScopeOutcome::Malformed => {
                    tracing::warn!("Error parsing url {} on page {}", href, page.final_url);
                }
            }
        }
    }
}
