//! The crawl frontier
//!
//! Owns all mutable crawl state: the FIFO work queue, the visited set, and
//! the map of permanently failed URLs. A URL enters the visited set at
//! enqueue time, before it is ever dequeued, so no URL can be queued twice
//! and nothing is ever re-added once visited or failed.

use crate::scope::BlacklistMatcher;
use crate::MirrorError;
use std::collections::{HashMap, HashSet, VecDeque};
use url::Url;

/// What to do with a fetched page.
///
/// A tagged enum rather than a callback so new handler kinds can be added
/// without changing the frontier's contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// Persist the page and feed its links back through the scope policy
    ProcessPage,
}

/// Context carried alongside a queued URL
#[derive(Debug, Clone, Default)]
pub struct CrawlContext {
    /// The page the URL was discovered on, when known
    pub referrer: Option<Url>,
}

/// One unit of crawl work
#[derive(Debug)]
pub struct WorkItem {
    pub url: Url,
    pub handler: Handler,
    pub ctx: CrawlContext,
}

/// Diagnostics for a URL that permanently failed; never re-queued
#[derive(Debug)]
pub struct ErrorRecord {
    pub error: MirrorError,
    pub handler: Handler,
    pub ctx: CrawlContext,
}

/// Work queue plus visited/failed bookkeeping, single producer and consumer
pub struct Frontier {
    queue: VecDeque<WorkItem>,
    visited: HashSet<String>,
    failed: HashMap<String, ErrorRecord>,
    blacklist: BlacklistMatcher,
}

impl Frontier {
    pub fn new(blacklist: BlacklistMatcher) -> Self {
        Frontier {
            queue: VecDeque::new(),
            visited: HashSet::new(),
            failed: HashMap::new(),
            blacklist,
        }
    }

    /// Adds a URL to the queue unless it is already known or out of policy.
    ///
    /// Rejections are expected steady-state behavior and logged at debug
    /// level only. Returns whether the URL was actually queued.
    pub fn enqueue(&mut self, url: Url, handler: Handler, ctx: CrawlContext) -> bool {
        let key = url.to_string();
        tracing::debug!("Evaluating link {}", key);

        if self.visited.contains(&key) {
            tracing::debug!("Skipping seen url {}", key);
            return false;
        }
        if self.failed.contains_key(&key) {
            tracing::debug!("Skipping previously erroring url {}", key);
            return false;
        }
        if self.blacklist.is_blacklisted(&url) {
            tracing::debug!("Skipping blacklisted url {}", key);
            return false;
        }
        if url.query().is_some() {
            tracing::debug!("Skipping querystringed url {}", key);
            return false;
        }

        match &ctx.referrer {
            Some(referrer) => tracing::debug!("Adding url {} from {}", key, referrer),
            None => tracing::debug!("Adding url {}", key),
        }
        self.visited.insert(key);
        self.queue.push_back(WorkItem { url, handler, ctx });
        true
    }

    /// Takes the next item off the head of the queue
    pub fn pop(&mut self) -> Option<WorkItem> {
        self.queue.pop_front()
    }

    /// Records a permanent failure. The URL stays in the visited set, so it
    /// will never be attempted again this run.
    pub fn record_failure(&mut self, item: WorkItem, error: MirrorError) {
        self.failed.insert(
            item.url.to_string(),
            ErrorRecord {
                error,
                handler: item.handler,
                ctx: item.ctx,
            },
        );
    }

    /// Number of items still waiting in the queue
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// URLs that permanently failed, with their diagnostics
    pub fn failed(&self) -> &HashMap<String, ErrorRecord> {
        &self.failed
    }

    /// Number of URLs ever enqueued
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
