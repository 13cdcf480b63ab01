//! Parameter and query maps.
//!
//! Route parameters and query-string entries share one value type: a single
//! string, or a list of strings for repeatable parameters and repeated query
//! keys. Maps are ordered by key so that rendered output is deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Map of route parameters extracted from, or used to build, a path.
pub type Params = BTreeMap<String, ParamValue>;

/// Map of query-string entries.
pub type QueryMap = BTreeMap<String, ParamValue>;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// One value.
    One(String),
    /// Several values, from a repeatable parameter or a repeated query key.
    Many(Vec<String>),
}

impl ParamValue {
    /// Returns the value if this is a single string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::One(value) => Some(value),
            ParamValue::Many(_) => None,
        }
    }

    /// Returns all values as a slice-like iterator.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let values: &[String] = match self {
            ParamValue::One(value) => std::slice::from_ref(value),
            ParamValue::Many(values) => values,
        };
        values.iter().map(String::as_str)
    }

    /// Append another occurrence of the same key, promoting to `Many`.
    pub(crate) fn push(&mut self, value: String) {
        match self {
            ParamValue::One(first) => {
                let first = std::mem::take(first);
                *self = ParamValue::Many(vec![first, value]);
            }
            ParamValue::Many(values) => values.push(value),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::One(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::One(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::Many(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Overlay `params` on top of `query`: route parameters win on collision.
pub fn merge_params(query: &QueryMap, params: &Params) -> Params {
    let mut merged = query.clone();
    for (key, value) in params {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Build a map from `(key, value)` pairs.
///
/// ```
/// use minimal_routes::params;
///
/// let p = params! { "slug" => "hammer", "parts" => vec!["a", "b"] };
/// assert_eq!(p.len(), 2);
/// ```
#[macro_export]
macro_rules! params {
    () => { $crate::routing::Params::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::routing::Params::new();
        $(map.insert(::std::string::String::from($key), $crate::routing::ParamValue::from($value));)+
        map
    }};
}
