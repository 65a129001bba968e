//! Crawling: frontier, fetching, link extraction and the run loop
//!
//! - `frontier`: the work queue with visited/failed bookkeeping
//! - `fetcher`: HTTP client construction and single fetch attempts
//! - `parser`: hyperlink extraction from markup
//! - `engine`: the sequential crawl loop and retry policy

mod engine;
mod fetcher;
mod frontier;
mod parser;

pub use engine::{CrawlEngine, CrawlReport};
pub use fetcher::{build_http_client, fetch, FetchedPage, USER_AGENT};
pub use frontier::{CrawlContext, ErrorRecord, Frontier, Handler, WorkItem};
pub use parser::extract_links;
