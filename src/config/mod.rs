//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, every route compiled once)
//!     → AppConfig (validated, immutable)
//!     → RouteTable built at startup, shared via Arc
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; routes live for the process lifetime
//! - All fields have defaults to allow minimal configs
//! - Route tables keep declaration order (it is resolution order)
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{AppConfig, DispatchConfig, ListenerConfig, ObservabilityConfig, TimeoutConfig};
pub use validation::ValidationError;
