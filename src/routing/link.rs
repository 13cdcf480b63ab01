//! Named routes and link building.
//!
//! Link-rendering code addresses routes by name. Two policies are offered:
//! `urls` returns every failure to the caller, `urls_or_warn` logs each
//! distinct failure once (per caller-owned [`WarnedSet`]) and yields `None`.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;

use crate::routing::params::{Params, QueryMap};
use crate::routing::pattern::ReversalError;
use crate::routing::route::{make_route, Route, RouteDeclaration, RouteError};
use crate::routing::urls::{make_urls, Urls};

/// A declaration that could not be turned into a route.
#[derive(Debug, Error)]
#[error("route {name:?}: {source}")]
pub struct DeclarationError {
    pub name: String,
    #[source]
    pub source: RouteError,
}

/// Errors raised while building a link by route name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("unknown route: {0}")]
    UnknownRoute(String),

    #[error("failed to make URLs for route '{name}': {source}")]
    Reversal {
        name: String,
        #[source]
        source: ReversalError,
    },
}

/// Messages already reported by a link builder.
#[derive(Debug, Default)]
pub struct WarnedSet {
    seen: HashSet<String>,
}

impl WarnedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log `message` unless it was logged before. Returns true if logged.
    pub fn warn_once(&mut self, message: String) -> bool {
        if self.seen.contains(&message) {
            return false;
        }
        tracing::warn!(message = %message, "Link could not be built");
        self.seen.insert(message);
        true
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Routes addressed by name, kept in declaration order.
#[derive(Debug, Default, Clone)]
pub struct RouteTable {
    by_name: IndexMap<String, Arc<Route>>,
    ordered: Vec<Arc<Route>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every declared route, failing on the first invalid one.
    pub fn from_declarations(
        declarations: &IndexMap<String, RouteDeclaration>,
    ) -> Result<Self, DeclarationError> {
        let mut table = Self::new();
        for (name, declaration) in declarations {
            let route = make_route(declaration).map_err(|source| DeclarationError {
                name: name.clone(),
                source,
            })?;
            table.insert(name.clone(), route);
        }
        Ok(table)
    }

    /// Add a route. A name that already exists is replaced in place.
    pub fn insert(&mut self, name: impl Into<String>, route: Route) {
        let route = Arc::new(route);
        let name = name.into();
        match self.by_name.get_index_of(&name) {
            Some(index) => {
                self.by_name[index] = route.clone();
                self.ordered[index] = route;
            }
            None => {
                self.by_name.insert(name, route.clone());
                self.ordered.push(route);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Route>> {
        self.by_name.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Route>)> {
        self.by_name.iter().map(|(name, route)| (name.as_str(), route))
    }

    /// Routes in resolution order.
    pub fn routes(&self) -> &[Arc<Route>] {
        &self.ordered
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Build URLs for the route called `name`.
    pub fn urls(
        &self,
        name: &str,
        params: &Params,
        query: &QueryMap,
        hash: &str,
    ) -> Result<Urls, LinkError> {
        let route = self
            .get(name)
            .ok_or_else(|| LinkError::UnknownRoute(name.to_string()))?;

        make_urls(route, params, query, hash).map_err(|source| LinkError::Reversal {
            name: name.to_string(),
            source,
        })
    }

    /// Like [`RouteTable::urls`], but failures are logged once and dropped.
    pub fn urls_or_warn(
        &self,
        name: &str,
        params: &Params,
        query: &QueryMap,
        hash: &str,
        warned: &mut WarnedSet,
    ) -> Option<Urls> {
        match self.urls(name, params, query, hash) {
            Ok(urls) => Some(urls),
            Err(e) => {
                warned.warn_once(format!("<Link>: {e}"));
                None
            }
        }
    }
}
