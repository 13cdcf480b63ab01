//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Every route has a string page and a compilable pattern
//! - Value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::routing::pattern::Pattern;
use crate::routing::{make_route, RouteError};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("route {name:?}: {source}")]
    InvalidRoute { name: String, source: RouteError },

    #[error("route {name:?}: {reason}")]
    InvalidPattern { name: String, reason: String },

    #[error("dispatch.skip_prefixes entry {0:?} must start with '/'")]
    InvalidSkipPrefix(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    for prefix in &config.dispatch.skip_prefixes {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::InvalidSkipPrefix(prefix.clone()));
        }
    }

    for (name, declaration) in &config.routes {
        let route = match make_route(declaration) {
            Ok(route) => route,
            Err(source) => {
                errors.push(ValidationError::InvalidRoute {
                    name: name.clone(),
                    source,
                });
                continue;
            }
        };

        let pattern = Pattern::parse(route.pattern());
        if let Err(e) = pattern.to_matcher().and_then(|_| pattern.to_reverser()) {
            errors.push(ValidationError::InvalidPattern {
                name: name.clone(),
                reason: e.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config: AppConfig = toml::from_str(
            r#"
            [routes.missing]
            pattern = "/x"

            [routes.numeric]
            page = 7

            [routes.bad_pattern]
            page = "/bad"
            pattern = "/bad/:x(?<=y)"

            [routes.fine]
            page = "/fine"
            "#,
        )
        .unwrap();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::ZeroTimeout));
        assert!(errors.contains(&ValidationError::InvalidRoute {
            name: "numeric".into(),
            source: RouteError::InvalidRoute("7".into()),
        }));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidPattern { name, .. } if name == "bad_pattern")));
    }

    #[test]
    fn test_skip_prefix_must_be_absolute() {
        let mut config = AppConfig::default();
        config.dispatch.skip_prefixes.push("assets/".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidSkipPrefix("assets/".into())]);
    }
}
