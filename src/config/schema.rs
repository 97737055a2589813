//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the navigator.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the navigator.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Path resolution settings.
    pub resolver: ResolverConfig,

    /// History stack settings.
    pub history: HistoryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Resolver configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResolverConfig {
    /// Maximum redirect hops followed by a single resolution.
    pub max_redirects: usize,

    /// Treat a trailing slash as significant (`/app/` no longer matches `/app`).
    pub strict: bool,

    /// Match static segments case-sensitively.
    pub sensitive: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_redirects: 10,
            strict: false,
            sensitive: true,
        }
    }
}

/// History configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Base path the application is mounted under (e.g., "/portal").
    pub base: String,

    /// Maximum number of entries kept in the history stack.
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            base: "/".to_string(),
            capacity: 100,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of the human-readable format.
    pub json: bool,

    /// Install the Prometheus recorder and render metrics on exit.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            metrics_enabled: false,
        }
    }
}
