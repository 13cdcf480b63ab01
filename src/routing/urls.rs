//! URL descriptors for links.
//!
//! A link needs two addresses: the internal one (page + every parameter as a
//! query entry) used to pick the view, and the public one (pretty path +
//! query + fragment) shown in the address bar.

use std::fmt;

use serde::Serialize;
use url::form_urlencoded;

use crate::routing::params::{merge_params, Params, QueryMap};
use crate::routing::pattern::ReversalError;
use crate::routing::route::Route;

/// Internal address of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InternalUrl {
    pub page: String,
    /// Query entries overwritten by route parameters.
    pub query: QueryMap,
}

/// Public address of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUrl {
    pub pathname: String,
    pub query: QueryMap,
    pub hash: String,
}

/// Both addresses of a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Urls {
    pub internal: InternalUrl,
    pub public: PublicUrl,
}

/// Build the internal and public descriptors for `route`.
///
/// Reversal errors are returned unchanged.
pub fn make_urls(
    route: &Route,
    params: &Params,
    query: &QueryMap,
    hash: &str,
) -> Result<Urls, ReversalError> {
    let pathname = route.reverse(Some(params))?;

    Ok(Urls {
        internal: InternalUrl {
            page: route.page().to_string(),
            query: merge_params(query, params),
        },
        public: PublicUrl {
            pathname,
            query: query.clone(),
            hash: hash.to_string(),
        },
    })
}

/// Form-encode a query map, repeating keys for multi-valued entries.
pub fn encode_query(query: &QueryMap) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in query {
        for v in value.values() {
            serializer.append_pair(key, v);
        }
    }
    serializer.finish()
}

fn write_query(f: &mut fmt::Formatter<'_>, query: &QueryMap) -> fmt::Result {
    if query.is_empty() {
        return Ok(());
    }
    write!(f, "?{}", encode_query(query))
}

impl fmt::Display for InternalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.page)?;
        write_query(f, &self.query)
    }
}

impl fmt::Display for PublicUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pathname)?;
        write_query(f, &self.query)?;
        match self.hash.as_str() {
            "" => Ok(()),
            hash if hash.starts_with('#') => f.write_str(hash),
            hash => write!(f, "#{hash}"),
        }
    }
}
