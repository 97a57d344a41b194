//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Validate path-shaped settings (mount prefix, introspection path)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HarnessConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::Method;
use thiserror::Error;

use crate::config::schema::HarnessConfig;
use crate::routing::harness_routes;
use crate::routing::matcher::PrefixMatcher;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single failed semantic check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: `{value}` is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("spec_runner.mount_path `{0}` must start with '/', not be '/', and not end with '/'")]
    InvalidMountPath(String),

    #[error("spec_runner.app must not be empty")]
    EmptyAppName,

    #[error("introspection.path `{0}` must be a literal path below '/'")]
    InvalidIntrospectionPath(String),

    #[error("introspection.path `{0}` is shadowed by the spec runner mount")]
    IntrospectionUnderMount(String),

    #[error("introspection.path `{0}` would hide a route that GET already resolves")]
    IntrospectionShadowsRoute(String),

    #[error("observability.log_level `{0}` is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &HarnessConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let runner = &config.spec_runner;
    let mount = PrefixMatcher::new(runner.mount_path.as_str()).ok();
    if runner.enabled {
        if mount.is_none() {
            errors.push(ValidationError::InvalidMountPath(runner.mount_path.clone()));
        }
        if runner.app.trim().is_empty() {
            errors.push(ValidationError::EmptyAppName);
        }
    }

    let introspection = &config.introspection;
    if introspection.enabled {
        if !is_literal_path(&introspection.path) {
            errors.push(ValidationError::InvalidIntrospectionPath(
                introspection.path.clone(),
            ));
        } else if mount
            .filter(|_| runner.enabled)
            .is_some_and(|mount| mount.strip(&introspection.path).is_some())
        {
            errors.push(ValidationError::IntrospectionUnderMount(
                introspection.path.clone(),
            ));
        } else if shadows_route(config, &introspection.path) {
            errors.push(ValidationError::IntrospectionShadowsRoute(
                introspection.path.clone(),
            ));
        }
    }

    let observability = &config.observability;
    if !LOG_LEVELS.contains(&observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::InvalidLogLevel(observability.log_level.clone()));
    }
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Whether `path` already resolves through the harness table for GET.
/// A table that fails to build is reported by the mount checks instead.
fn shadows_route(config: &HarnessConfig, path: &str) -> bool {
    harness_routes(&config.harness_options())
        .is_ok_and(|table| table.match_route(&Method::GET, path).is_match())
}

/// `/a/b` style path: rooted, not `/`, no empty segments or route syntax.
fn is_literal_path(path: &str) -> bool {
    path.len() > 1
        && path.starts_with('/')
        && !path.ends_with('/')
        && !path.contains("//")
        && !path.contains(['{', '}', '*', ':', '?'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&HarnessConfig::default()), Ok(()));
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = HarnessConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.timeouts.request_secs = 0;
        config.spec_runner.enabled = true;
        config.spec_runner.mount_path = "/specs/".into();
        config.spec_runner.app = " ".into();
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidAddress {
                    field: "listener.bind_address",
                    value: "nowhere".into(),
                },
                ValidationError::ZeroTimeout,
                ValidationError::InvalidMountPath("/specs/".into()),
                ValidationError::EmptyAppName,
                ValidationError::InvalidLogLevel("loud".into()),
            ]
        );
    }

    #[test]
    fn test_disabled_runner_skips_mount_checks() {
        let mut config = HarnessConfig::default();
        config.spec_runner.mount_path = "bad".into();
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_introspection_under_mount() {
        let mut config = HarnessConfig::default();
        config.spec_runner.enabled = true;
        config.introspection.path = "/specs/routes".into();
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::IntrospectionUnderMount("/specs/routes".into())])
        );
    }

    #[test]
    fn test_introspection_path_must_be_literal() {
        for bad in ["routes", "/", "/{*x}", "/a/:b", "/routes/"] {
            let mut config = HarnessConfig::default();
            config.introspection.path = bad.into();
            assert_eq!(
                validate_config(&config),
                Err(vec![ValidationError::InvalidIntrospectionPath(bad.into())]),
                "{bad}"
            );
        }

        let mut config = HarnessConfig::default();
        config.introspection.enabled = false;
        config.introspection.path = "/".into();
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_introspection_path_must_not_hide_a_route() {
        for taken in ["/css_test/routes", "/method_test/routes", "/form_test/basic/new"] {
            let mut config = HarnessConfig::default();
            config.introspection.path = taken.into();
            assert_eq!(
                validate_config(&config),
                Err(vec![ValidationError::IntrospectionShadowsRoute(taken.into())]),
                "{taken}"
            );
        }

        // POST-only routes keep working: only GET is answered by the listing.
        let mut config = HarnessConfig::default();
        config.introspection.path = "/form_test/basic".into();
        assert_eq!(validate_config(&config), Ok(()));

        config.introspection.enabled = false;
        config.introspection.path = "/css_test/routes".into();
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = HarnessConfig::default();
        config.observability.metrics_address = "bad".into();
        assert_eq!(validate_config(&config), Ok(()));

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
