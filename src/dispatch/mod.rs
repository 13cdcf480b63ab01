//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Request<Body>
//!     → skip.rs (reserved prefixes bypass routing)
//!     → decode.rs (strict path decoding, query parsing)
//!     → routing::match_route (first match wins)
//!     → handler.rs (merge params over query, delegate)
//!     → app.rs PageApp::render / PageApp::handle
//! ```
//!
//! # Design Decisions
//! - Undecodable paths end in 400 without reaching the app
//! - App failures end in 500 and are logged, never propagated to axum
//! - Route parameters take precedence over query entries

pub mod app;
pub mod decode;
pub mod handler;
pub mod skip;

pub use app::{AppError, PageApp};
pub use decode::{decode_path, parse_query, DecodeError};
pub use handler::{Outcome, RequestHandler};
pub use skip::{PrefixSkip, SkipRule, DEFAULT_SKIP_PREFIXES};
