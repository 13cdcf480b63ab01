//! Per-request dispatch.
//!
//! # State Machine
//! ```text
//! request
//!   → skip rule says skip?        → app.handle        (Skipped)
//!   → path fails to decode?       → 400 Bad Request   (BadRequest)
//!   → no route matches?           → app.handle        (Handled)
//!   → route matches               → app.render        (Rendered)
//! app error at either delegation  → 500               (Failed)
//! ```
//!
//! Exactly one terminal action per request.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::dispatch::app::{AppError, PageApp};
use crate::dispatch::decode::{decode_path, parse_query};
use crate::dispatch::skip::{PrefixSkip, SkipRule};
use crate::observability::metrics;
use crate::routing::{match_route, merge_params, RouteTable};

/// What happened to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Skipped,
    BadRequest,
    Handled,
    Rendered,
    Failed,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Skipped => "skipped",
            Outcome::BadRequest => "bad_request",
            Outcome::Handled => "handled",
            Outcome::Rendered => "rendered",
            Outcome::Failed => "failed",
        }
    }
}

/// Resolves requests against a route table and delegates to a [`PageApp`].
pub struct RequestHandler<A> {
    app: Arc<A>,
    routes: Arc<RouteTable>,
    skip: Arc<dyn SkipRule>,
}

impl<A> Clone for RequestHandler<A> {
    fn clone(&self) -> Self {
        Self {
            app: self.app.clone(),
            routes: self.routes.clone(),
            skip: self.skip.clone(),
        }
    }
}

impl<A: PageApp> RequestHandler<A> {
    /// Create a handler with the default skip prefixes.
    pub fn new(app: A, routes: RouteTable) -> Self {
        Self {
            app: Arc::new(app),
            routes: Arc::new(routes),
            skip: Arc::new(PrefixSkip::default()),
        }
    }

    /// Replace the skip rule.
    pub fn with_skip(mut self, skip: impl SkipRule + 'static) -> Self {
        self.skip = Arc::new(skip);
        self
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    /// Dispatch one request.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let start = Instant::now();
        let (outcome, response) = self.dispatch(request).await;
        metrics::record_dispatch(outcome.as_str(), start);
        response
    }

    async fn dispatch(&self, request: Request<Body>) -> (Outcome, Response) {
        if self.skip.skip(&request) {
            tracing::trace!(path = %request.uri().path(), "Skipping route resolution");
            let result = self.app.handle(request).await;
            return settle(Outcome::Skipped, result);
        }

        let path = match decode_path(request.uri().path()) {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!(path = %request.uri().path(), error = %e, "Rejecting undecodable path");
                return (
                    Outcome::BadRequest,
                    (StatusCode::BAD_REQUEST, "Bad Request").into_response(),
                );
            }
        };

        let Some(found) = match_route(self.routes.routes(), &path) else {
            tracing::debug!(path = %path, "No route matched");
            let result = self.app.handle(request).await;
            return settle(Outcome::Handled, result);
        };

        // Declared parameters are never taken from the query string, even
        // when the path leaves an optional one out.
        let mut query = parse_query(request.uri().query());
        for key in found.declared_keys() {
            query.remove(&key);
        }
        let params = merge_params(&query, &found.params);
        let page = found.route.page().to_string();

        tracing::debug!(path = %path, page = %page, "Route matched");
        let result = self.app.render(request, page, params).await;
        settle(Outcome::Rendered, result)
    }
}

fn settle(outcome: Outcome, result: Result<Response, AppError>) -> (Outcome, Response) {
    match result {
        Ok(response) => (outcome, response),
        Err(e) => {
            tracing::error!(error = %e, stage = outcome.as_str(), "Page application failed");
            (
                Outcome::Failed,
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response(),
            )
        }
    }
}
