//! Request target decoding.
//!
//! # Design Decisions
//! - Path decoding is strict: a `%` must start a two-digit hex escape and
//!   the decoded bytes must be UTF-8 (same failures as `decodeURIComponent`)
//! - Query parsing is lenient (form-urlencoded); repeated keys collect into
//!   a list

use std::borrow::Cow;
use std::collections::btree_map::Entry;

use percent_encoding::percent_decode_str;
use thiserror::Error;
use url::form_urlencoded;

use crate::routing::params::{ParamValue, QueryMap};

/// A path that cannot be percent-decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed percent-escape at byte {0}")]
    MalformedEscape(usize),

    #[error("decoded path is not valid UTF-8")]
    InvalidUtf8,
}

/// Percent-decode a request path.
pub fn decode_path(raw: &str) -> Result<String, DecodeError> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                return Err(DecodeError::MalformedEscape(i));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    percent_decode_str(raw)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| DecodeError::InvalidUtf8)
}

/// Parse a raw query string.
pub fn parse_query(raw: Option<&str>) -> QueryMap {
    let mut query = QueryMap::new();
    let Some(raw) = raw else {
        return query;
    };

    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        match query.entry(key.into_owned()) {
            Entry::Occupied(mut existing) => existing.get_mut().push(value.into_owned()),
            Entry::Vacant(slot) => {
                slot.insert(ParamValue::One(value.into_owned()));
            }
        }
    }
    query
}
