//! A page application that shows what the router resolved.
//!
//! Rendering answers with a JSON document describing the page and its
//! parameters; everything else is served from an optional static directory.

use std::path::Path;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::dispatch::{AppError, PageApp};
use crate::routing::Params;

/// Body of a rendered page.
#[derive(Debug, Serialize)]
pub struct RenderedPage {
    pub page: String,
    pub path: String,
    pub params: Params,
}

/// JSON page renderer with static-file fallback.
#[derive(Debug, Clone, Default)]
pub struct DebugApp {
    static_files: Option<ServeDir>,
}

impl DebugApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve unmatched requests from `dir`.
    pub fn with_static_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.static_files = Some(ServeDir::new(dir));
        self
    }
}

impl PageApp for DebugApp {
    async fn render(
        &self,
        request: Request<Body>,
        page: String,
        params: Params,
    ) -> Result<Response, AppError> {
        let body = RenderedPage {
            page,
            path: request.uri().path().to_string(),
            params,
        };
        Ok(Json(body).into_response())
    }

    async fn handle(&self, request: Request<Body>) -> Result<Response, AppError> {
        let Some(files) = &self.static_files else {
            return Ok((StatusCode::NOT_FOUND, "Not Found").into_response());
        };

        // ServeDir's error type is Infallible.
        match files.clone().oneshot(request).await {
            Ok(response) => Ok(response.into_response()),
            Err(never) => match never {},
        }
    }
}
