//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for log output.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error or a full directive)
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Include file and line numbers in output
    pub with_locations: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "appearance-index".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            with_locations: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `IX_SERVICE_NAME`: Service name (default: appearance-index)
    /// - `IX_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `IX_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    /// - `IX_LOG_LOCATIONS`: Include file/line (default: false)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("IX_SERVICE_NAME")
                .unwrap_or_else(|_| "appearance-index".to_string()),

            log_level: env::var("IX_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs: env::var("IX_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            with_locations: env::var("IX_LOG_LOCATIONS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    /// Override the log level.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Switch JSON output on or off.
    pub fn with_json(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }
}
