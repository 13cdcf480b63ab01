//! The page application behind the dispatcher.

use std::future::Future;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use thiserror::Error;

use crate::routing::params::Params;

/// Failure reported by a [`PageApp`].
#[derive(Debug, Error)]
pub enum AppError {
    #[error("render failed for page {page}: {reason}")]
    Render { page: String, reason: String },
}

/// Renders pages and handles everything that is not route-matched.
///
/// Both operations own the response they return.
pub trait PageApp: Send + Sync + 'static {
    /// Render `page` with route parameters merged over the query string.
    fn render(
        &self,
        request: Request<Body>,
        page: String,
        params: Params,
    ) -> impl Future<Output = Result<Response, AppError>> + Send;

    /// Serve a request that matched no route (static files, default pages, 404).
    fn handle(&self, request: Request<Body>) -> impl Future<Output = Result<Response, AppError>> + Send;
}
