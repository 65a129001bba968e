//! Scope and eligibility decisions
//!
//! This module decides which discovered URLs belong to the mirrored site:
//! - Canonicalization and host restriction (`ScopePolicy`)
//! - Path-prefix blacklisting (`BlacklistMatcher`)

mod blacklist;
mod policy;

pub use blacklist::BlacklistMatcher;
pub use policy::{ScopeOutcome, ScopePolicy};
