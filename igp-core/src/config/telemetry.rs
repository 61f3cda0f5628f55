//! Upstream (FT) telemetry configuration.

use std::time::Duration;

/// Base URL used when none is configured.
pub const DEFAULT_FT_API_URL: &str = "https://api.fasttrack-integration.com/v1";

/// Origin tag attached to every shaped body when none is configured.
pub const DEFAULT_ORIGIN: &str = "igaming-poc";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where and how telemetry events are delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub base_url: String,
    /// `None` switches the dispatcher into mock mode.
    pub api_key: Option<String>,
    pub origin: String,
    pub timeout: Duration,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FT_API_URL.to_string(),
            api_key: None,
            origin: DEFAULT_ORIGIN.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TelemetryConfig {
    /// True when no usable API key is configured.
    pub fn is_mock(&self) -> bool {
        self.api_key
            .as_deref()
            .is_none_or(|key| key.trim().is_empty())
    }

    /// Absolute URL of an upstream path. A single trailing slash on the
    /// base URL is dropped.
    pub fn endpoint_url(&self, path: &str) -> String {
        let base = self.base_url.strip_suffix('/').unwrap_or(&self.base_url);
        format!("{base}{path}")
    }
}

/// Placeholder URL recorded for events that never left the process.
pub fn mock_url(path: &str) -> String {
    format!("mock://ft-integration{path}")
}
