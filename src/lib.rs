//! Bidirectional URL routing for page applications.
//!
//! Routes are declared once, by name, and used in both directions: incoming
//! paths resolve to a page with parameters, and links are built from a route
//! name plus parameters.

// Core subsystems
pub mod routing;
pub mod dispatch;
pub mod render;

// Serving
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use dispatch::{PageApp, RequestHandler};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{make_route, make_urls, match_route, Route, RouteTable};
