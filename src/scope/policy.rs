//! Scope policy: link canonicalization and host restriction
//!
//! Every href discovered on a page goes through [`ScopePolicy::resolve`]
//! before it is considered for the frontier. The policy resolves relative
//! links against the referring page, restricts candidates to the configured
//! site host, forces the site's scheme, and strips fragments so the same
//! logical resource is never tracked twice under different anchors.

use crate::ConfigError;
use url::Url;

/// Decision for a single candidate href
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeOutcome {
    /// Candidate is same-site; carries the canonical URL to enqueue
    InScope(Url),

    /// Candidate points at a different host (or has no host at all)
    OffSite,

    /// Candidate could not be parsed or resolved as a URL
    Malformed,
}

/// Pure decision function over the configured site host and scheme
#[derive(Debug, Clone)]
pub struct ScopePolicy {
    host: String,
    scheme: String,
}

impl ScopePolicy {
    /// Captures the site host and required scheme from the site root.
    ///
    /// The required scheme is the root's own scheme, so an https site gets
    /// the unconditional https upgrade while an http test server stays
    /// reachable.
    pub fn new(site_root: &Url) -> Result<Self, ConfigError> {
        let host = site_root
            .host_str()
            .ok_or_else(|| ConfigError::Validation("site root has no host".to_string()))?
            .to_string();

        Ok(ScopePolicy {
            host,
            scheme: site_root.scheme().to_string(),
        })
    }

    /// The configured site host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Resolves a candidate href found on `referrer` to a scope decision.
    ///
    /// Relative links are resolved against the referring page per standard
    /// relative-URL rules, with query and fragment carried through that step.
    /// A same-host candidate with the wrong scheme is logged and upgraded,
    /// never rejected. The fragment is always stripped from the canonical
    /// form. Query strings are left in place; the frontier rejects them.
    pub fn resolve(&self, href: &str, referrer: &Url) -> ScopeOutcome {
        let mut resolved = match Url::parse(href) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => match referrer.join(href) {
                Ok(url) => url,
                Err(_) => return ScopeOutcome::Malformed,
            },
            Err(_) => return ScopeOutcome::Malformed,
        };

        if resolved.host_str() != Some(self.host.as_str()) {
            return ScopeOutcome::OffSite;
        }

        if resolved.scheme() != self.scheme {
            tracing::warn!("Link to non {} {} from {}", self.scheme, href, referrer);
            if resolved.set_scheme(&self.scheme).is_err() {
                return ScopeOutcome::Malformed;
            }
        }

        // Prevents duplicate URLs being missed
        resolved.set_fragment(None);

        ScopeOutcome::InScope(resolved)
    }
}
