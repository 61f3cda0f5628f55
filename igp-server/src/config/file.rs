//! TOML file configuration structures.
//!
//! These structs map to the `igp-config.toml` file format. Every section is
//! optional; a missing file behaves like an empty one.

use igp_core::activity::DEFAULT_ACTIVITY_CAPACITY;
use igp_core::config::{DEFAULT_FT_API_URL, DEFAULT_ORIGIN, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
    #[serde(default)]
    pub activity: ActivityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 3000))
}

/// Operator access section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Key the game provider sends in `X-API-Key`. If this is plaintext
    /// (doesn't start with `$argon2`), it will be hashed and the config file
    /// will be rewritten.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_api_key: Option<String>,
}

/// FT integration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Leave unset to run in mock mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            origin: default_origin(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_FT_API_URL.to_string()
}

fn default_origin() -> String {
    DEFAULT_ORIGIN.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

fn default_capacity() -> usize {
    DEFAULT_ACTIVITY_CAPACITY
}

/// Whether a stored secret is already an argon2 hash.
pub fn is_hashed(secret: &str) -> bool {
    secret.starts_with("$argon2")
}

impl FileConfig {
    pub fn is_operator_key_hashed(&self) -> bool {
        self.gateway
            .operator_api_key
            .as_deref()
            .is_none_or(is_hashed)
    }
}
