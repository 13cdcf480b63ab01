//! Route lookup.
//!
//! # Design Decisions
//! - Linear scan in declaration order; the first match wins
//! - Explicit `None` rather than a default route

use std::borrow::Borrow;

use crate::routing::params::Params;
use crate::routing::route::Route;

/// A matched route and the parameters extracted from the path.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: Params,
}

impl RouteMatch<'_> {
    /// Every parameter name the matched pattern declares, including
    /// optional ones the path left out.
    pub fn declared_keys(&self) -> Vec<String> {
        self.route.declared_keys()
    }
}

/// Return the first route in `routes` that matches `path`.
pub fn match_route<'a, R>(routes: impl IntoIterator<Item = &'a R>, path: &str) -> Option<RouteMatch<'a>>
where
    R: Borrow<Route> + 'a,
{
    routes.into_iter().find_map(|route| {
        let route = route.borrow();
        route.matches(path).map(|params| RouteMatch { route, params })
    })
}
