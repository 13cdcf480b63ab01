//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route declarations (at startup):
//!     RouteDeclaration{page, pattern?, ..extra}
//!     → route.rs (validate page, keep metadata)
//!     → RouteTable (declaration order preserved)
//!
//! Incoming path:
//!     → resolver.rs (first matching route)
//!     → route.rs (lazy pattern.rs matcher)
//!     → Return: RouteMatch{route, params} or None
//!
//! Outgoing link:
//!     route + params + query + hash
//!     → urls.rs (lazy pattern.rs reverser)
//!     → Urls{internal, public}
//! ```
//!
//! # Design Decisions
//! - Routes are immutable after construction apart from compile caches
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order)

pub mod link;
pub mod params;
pub mod pattern;
pub mod resolver;
pub mod route;
pub mod urls;

pub use link::{DeclarationError, LinkError, RouteTable, WarnedSet};
pub use params::{merge_params, ParamValue, Params, QueryMap};
pub use pattern::{PatternError, ReversalError};
pub use resolver::{match_route, RouteMatch};
pub use route::{make_route, Metadata, Route, RouteBuilder, RouteDeclaration, RouteError};
pub use urls::{make_urls, InternalUrl, PublicUrl, Urls};
