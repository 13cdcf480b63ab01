//! Path pattern compiler.
//!
//! # Syntax
//! - `:name` named parameter (word characters)
//! - `:name(constraint)` named parameter with an inline regex constraint
//! - `(constraint)` unnamed parameter, keyed by its index ("0", "1", ...)
//! - `?` optional, `*` zero or more, `+` one or more
//! - `\x` literal `x`
//!
//! A `/` or `.` written directly before a parameter becomes its prefix and
//! its repetition delimiter. Without an explicit constraint a parameter
//! matches `[^<delimiter>]+?`.
//!
//! # Design Decisions
//! - Matching is anchored, strict about trailing delimiters and
//!   case-insensitive; captured values keep their case
//! - Reversal checks every encoded segment against its constraint
//!   (case-sensitive)
//! - Parameters map to capture groups by position, so a name may repeat;
//!   the last occurrence wins

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use thiserror::Error;

use crate::routing::params::{ParamValue, Params};

const DEFAULT_DELIMITER: char = '/';
const DELIMITERS: [char; 2] = ['.', '/'];

/// Characters left untouched by `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Errors raised while compiling a pattern.
#[derive(Debug, Error)]
pub enum PatternError {
    /// A constraint (or the pattern as a whole) is not a valid regex.
    #[error("invalid pattern {pattern:?}: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors raised while building a path from parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReversalError {
    /// A required parameter was not supplied.
    #[error("expected {name:?} to be {expected}")]
    Missing { name: String, expected: &'static str },

    /// A list was supplied for a parameter that does not repeat.
    #[error("expected {name:?} to not repeat, but got an array")]
    UnexpectedArray { name: String },

    /// An empty list was supplied for a required repeatable parameter.
    #[error("expected {name:?} to not be empty")]
    Empty { name: String },

    /// An encoded value does not satisfy the parameter's constraint.
    #[error("expected {name:?} to match {constraint:?}, but got {got:?}")]
    Mismatch {
        name: String,
        constraint: String,
        got: String,
    },

    /// The route's pattern could not be compiled.
    #[error("cannot reverse pattern {pattern:?}: {reason}")]
    Pattern { pattern: String, reason: String },

    /// Raised by a custom reverser.
    #[error("{0}")]
    Custom(String),
}

/// A parameter placeholder inside a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    /// Parameter name, or the index of an unnamed group.
    pub name: String,
    /// Delimiter written before the parameter, if any.
    pub prefix: String,
    /// Separator between repeated values.
    pub delimiter: String,
    pub optional: bool,
    pub repeat: bool,
    /// The prefix is followed by more literal text in the same segment.
    pub partial: bool,
    /// Regex a single value must match.
    pub constraint: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Param(Key),
}

/// A parsed path pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    tokens: Vec<Token>,
}

impl Pattern {
    /// Tokenize a pattern string.
    pub fn parse(source: &str) -> Self {
        let chars: Vec<char> = source.chars().collect();
        let mut tokens = Vec::new();
        let mut path = String::new();
        let mut path_escaped = false;
        let mut unnamed = 0usize;
        let mut i = 0;

        while i < chars.len() {
            if chars[i] == '\\' && i + 1 < chars.len() {
                path.push(chars[i + 1]);
                path_escaped = true;
                i += 2;
                continue;
            }

            let Some((name, constraint, mut end)) = read_param(&chars, i) else {
                path.push(chars[i]);
                i += 1;
                continue;
            };

            let modifier = chars.get(end).copied().filter(|c| matches!(c, '+' | '*' | '?'));
            if modifier.is_some() {
                end += 1;
            }

            let mut prev = None;
            if !path_escaped {
                if let Some(last) = path.chars().last().filter(|c| DELIMITERS.contains(c)) {
                    prev = Some(last);
                    path.pop();
                }
            }

            if !path.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut path)));
                path_escaped = false;
            }

            let next = chars.get(end).copied();
            let name = name.unwrap_or_else(|| {
                unnamed += 1;
                (unnamed - 1).to_string()
            });
            let delimiter = prev.unwrap_or(DEFAULT_DELIMITER);
            let constraint = match constraint {
                Some(group) => group.replace('$', "\\$"),
                None => format!("[^{}]+?", regex::escape(&delimiter.to_string())),
            };

            tokens.push(Token::Param(Key {
                name,
                prefix: prev.map(String::from).unwrap_or_default(),
                delimiter: delimiter.to_string(),
                optional: matches!(modifier, Some('?' | '*')),
                repeat: matches!(modifier, Some('+' | '*')),
                partial: prev.is_some() && next.is_some() && next != prev,
                constraint,
            }));

            i = end;
        }

        if !path.is_empty() {
            tokens.push(Token::Literal(path));
        }

        Self {
            source: source.to_string(),
            tokens,
        }
    }

    /// The original pattern string.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parameter placeholders in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.tokens.iter().filter_map(|token| match token {
            Token::Param(key) => Some(key),
            Token::Literal(_) => None,
        })
    }

    /// The anchored, strict, case-insensitive regex source for this pattern.
    pub fn regex_source(&self) -> String {
        let mut route = String::from("(?i)^");

        for token in &self.tokens {
            match token {
                Token::Literal(text) => route.push_str(&regex::escape(text)),
                Token::Param(key) => {
                    let capture = if key.repeat {
                        format!(
                            "(?:{c})(?:{d}(?:{c}))*",
                            c = key.constraint,
                            d = regex::escape(&key.delimiter)
                        )
                    } else {
                        key.constraint.clone()
                    };
                    let prefix = regex::escape(&key.prefix);

                    if !key.optional {
                        route.push_str(&format!("{prefix}({capture})"));
                    } else if key.partial {
                        route.push_str(&format!("{prefix}({capture})?"));
                    } else {
                        route.push_str(&format!("(?:{prefix}({capture}))?"));
                    }
                }
            }
        }

        route.push('$');
        route
    }

    /// Compile into a matcher.
    pub fn to_matcher(&self) -> Result<PathMatcher, PatternError> {
        let regex = Regex::new(&self.regex_source()).map_err(|source| PatternError::Regex {
            pattern: self.source.clone(),
            source,
        })?;

        Ok(PathMatcher {
            regex,
            keys: self.keys().cloned().collect(),
        })
    }

    /// Compile into a reverser.
    pub fn to_reverser(&self) -> Result<PathReverser, PatternError> {
        let mut segments = Vec::with_capacity(self.tokens.len());
        for token in &self.tokens {
            segments.push(match token {
                Token::Literal(text) => Segment::Literal(text.clone()),
                Token::Param(key) => {
                    let check = Regex::new(&format!("^(?:{})$", key.constraint)).map_err(|source| {
                        PatternError::Regex {
                            pattern: self.source.clone(),
                            source,
                        }
                    })?;
                    Segment::Param(key.clone(), check)
                }
            });
        }
        Ok(PathReverser { segments })
    }
}

/// Read a parameter starting at `start`: `(name, constraint, end)`.
fn read_param(chars: &[char], start: usize) -> Option<(Option<String>, Option<String>, usize)> {
    match chars[start] {
        ':' => {
            let mut end = start + 1;
            while end < chars.len() && is_word(chars[end]) {
                end += 1;
            }
            if end == start + 1 {
                return None;
            }
            let name: String = chars[start + 1..end].iter().collect();

            if chars.get(end) == Some(&'(') {
                if let Some((group, after)) = read_group(chars, end) {
                    return Some((Some(name), Some(group), after));
                }
            }
            Some((Some(name), None, end))
        }
        '(' => read_group(chars, start).map(|(group, after)| (None, Some(group), after)),
        _ => None,
    }
}

/// Read a non-empty `( ... )` group without nested parentheses.
fn read_group(chars: &[char], open: usize) -> Option<(String, usize)> {
    let mut group = String::new();
    let mut i = open + 1;

    while let Some(&c) = chars.get(i) {
        match c {
            '\\' => {
                let escaped = *chars.get(i + 1)?;
                group.push('\\');
                group.push(escaped);
                i += 2;
            }
            '(' => return None,
            ')' if group.is_empty() => return None,
            ')' => return Some((group, i + 1)),
            _ => {
                group.push(c);
                i += 1;
            }
        }
    }
    None
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Compiled path matcher.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    regex: Regex,
    keys: Vec<Key>,
}

impl PathMatcher {
    /// Parameter names declared by the pattern, in pattern order.
    pub fn key_names(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|key| key.name.as_str())
    }

    /// Match a literal path, returning its parameters.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let captures = self.regex.captures(path)?;
        let mut params = Params::new();

        for (index, key) in self.keys.iter().enumerate() {
            match captures.get(index + 1) {
                Some(m) if key.repeat => {
                    let parts = m.as_str().split(key.delimiter.as_str()).map(str::to_string).collect();
                    params.insert(key.name.clone(), ParamValue::Many(parts));
                }
                Some(m) => {
                    params.insert(key.name.clone(), ParamValue::One(m.as_str().to_string()));
                }
                None => {
                    params.remove(&key.name);
                }
            }
        }

        Some(params)
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Param(Key, Regex),
}

/// Compiled path reverser.
#[derive(Debug, Clone)]
pub struct PathReverser {
    segments: Vec<Segment>,
}

impl PathReverser {
    /// Build a percent-encoded path from `params`.
    pub fn reverse(&self, params: Option<&Params>) -> Result<String, ReversalError> {
        let mut path = String::new();

        for segment in &self.segments {
            let (key, check) = match segment {
                Segment::Literal(text) => {
                    path.push_str(text);
                    continue;
                }
                Segment::Param(key, check) => (key, check),
            };

            match params.and_then(|p| p.get(&key.name)) {
                Some(ParamValue::Many(values)) => {
                    if !key.repeat {
                        return Err(ReversalError::UnexpectedArray { name: key.name.clone() });
                    }
                    if values.is_empty() {
                        if key.optional {
                            continue;
                        }
                        return Err(ReversalError::Empty { name: key.name.clone() });
                    }
                    for (i, value) in values.iter().enumerate() {
                        let encoded = encode_segment(value);
                        if !check.is_match(&encoded) {
                            return Err(mismatch(key, encoded));
                        }
                        path.push_str(if i == 0 { &key.prefix } else { &key.delimiter });
                        path.push_str(&encoded);
                    }
                }
                Some(ParamValue::One(value)) => {
                    let encoded = encode_segment(value);
                    if !check.is_match(&encoded) {
                        return Err(mismatch(key, encoded));
                    }
                    path.push_str(&key.prefix);
                    path.push_str(&encoded);
                }
                None if key.optional => {
                    if key.partial {
                        path.push_str(&key.prefix);
                    }
                }
                None => {
                    return Err(ReversalError::Missing {
                        name: key.name.clone(),
                        expected: if key.repeat { "an array" } else { "a string" },
                    });
                }
            }
        }

        Ok(path)
    }
}

fn mismatch(key: &Key, got: String) -> ReversalError {
    ReversalError::Mismatch {
        name: key.name.clone(),
        constraint: key.constraint.clone(),
        got,
    }
}

/// Percent-encode one path segment the way `encodeURIComponent` does.
pub fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}
