//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router sending every path to the dispatcher
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Stop on the shutdown broadcast

use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::dispatch::{PageApp, PrefixSkip, RequestHandler};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::routing::{DeclarationError, RouteTable};

/// HTTP server in front of a page application.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a server for an already configured handler.
    pub fn new<A: PageApp>(config: AppConfig, handler: RequestHandler<A>) -> Self {
        let router = Self::build_router(&config, handler);
        Self { router, config }
    }

    /// Build the route table and skip rule from `config` and serve `app`.
    pub fn from_config<A: PageApp>(config: AppConfig, app: A) -> Result<Self, DeclarationError> {
        let routes = RouteTable::from_declarations(&config.routes)?;
        tracing::info!(routes = routes.len(), "Route table built");

        let skip = PrefixSkip::new(config.dispatch.skip_prefixes.clone());
        let handler = RequestHandler::new(app, routes).with_skip(skip);
        Ok(Self::new(config, handler))
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router<A: PageApp>(config: &AppConfig, handler: RequestHandler<A>) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch_handler::<A>))
            .route("/", any(dispatch_handler::<A>))
            .with_state(handler)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    uri = %req.uri(),
                    request_id = req.request_id().unwrap_or("unknown"),
                )
            }))
            .layer(set_request_id_layer())
    }

    /// A clone of the router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Every request goes through the dispatcher.
async fn dispatch_handler<A: PageApp>(
    State(handler): State<RequestHandler<A>>,
    request: Request<Body>,
) -> Response {
    handler.handle(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DebugApp;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let config: AppConfig = toml::from_str(
            r#"
            [routes.product]
            page = "/product"
            pattern = "/products/:slug"
            "#,
        )
        .unwrap();
        HttpServer::from_config(config, DebugApp::new()).unwrap()
    }

    #[tokio::test]
    async fn test_routes_through_dispatcher() {
        let response = server()
            .router()
            .oneshot(Request::builder().uri("/products/hammer").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_root_falls_back() {
        let response = server()
            .router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_client_request_id_kept() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/products/x")
                    .header("x-request-id", "client-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "client-id");
    }
}
