//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the harness
//! server. All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};

use crate::routing::table::{HarnessOptions, SpecRunnerMount, SPEC_RUNNER_APP, SPEC_RUNNER_PATH};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct HarnessConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Optional spec runner mount.
    pub spec_runner: SpecRunnerConfig,

    /// Route listing endpoint.
    pub introspection: IntrospectionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl HarnessConfig {
    /// Resolve the table construction options. Done once, at startup.
    pub fn harness_options(&self) -> HarnessOptions {
        let spec_runner = self.spec_runner.enabled.then(|| SpecRunnerMount {
            mount_path: self.spec_runner.mount_path.clone(),
            app: self.spec_runner.app.clone(),
        });
        HarnessOptions { spec_runner }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Spec runner mount configuration.
///
/// The runner is an external sub-application; when it is not deployed
/// alongside the harness leave `enabled = false` and `/specs` returns 404.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SpecRunnerConfig {
    pub enabled: bool,

    /// Mount prefix (e.g., "/specs").
    pub mount_path: String,

    /// Sub-application name reported on dispatch.
    pub app: String,
}

impl Default for SpecRunnerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mount_path: SPEC_RUNNER_PATH.to_string(),
            app: SPEC_RUNNER_APP.to_string(),
        }
    }
}

/// Route listing endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct IntrospectionConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for IntrospectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/_harness/routes".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
