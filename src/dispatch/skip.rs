//! Requests that bypass route resolution.
//!
//! # Design Decisions
//! - Prefix matching on the raw (undecoded) path, case-sensitive
//! - Any `Fn(&Request<Body>) -> bool` closure is a rule

use axum::body::Body;
use axum::http::Request;

/// Prefixes reserved for the page framework's own assets.
pub const DEFAULT_SKIP_PREFIXES: [&str; 2] = ["/_next/", "/static/"];

/// Decides whether a request goes straight to the fallback handler.
pub trait SkipRule: Send + Sync {
    /// Returns true if route resolution should be skipped.
    fn skip(&self, req: &Request<Body>) -> bool;
}

impl<F> SkipRule for F
where
    F: Fn(&Request<Body>) -> bool + Send + Sync,
{
    fn skip(&self, req: &Request<Body>) -> bool {
        self(req)
    }
}

/// Skips requests whose path starts with any of the given prefixes.
#[derive(Debug, Clone)]
pub struct PrefixSkip {
    prefixes: Vec<String>,
}

impl PrefixSkip {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for PrefixSkip {
    fn default() -> Self {
        Self::new(DEFAULT_SKIP_PREFIXES)
    }
}

impl SkipRule for PrefixSkip {
    fn skip(&self, req: &Request<Body>) -> bool {
        let path = req.uri().path();
        self.prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }
}
