//! Configuration module for igp-server.
//!
//! Handles loading configuration from an optional TOML file, CLI arguments
//! and environment variables. Also handles operator key hashing.

pub mod file;
pub mod runtime;

use crate::config::file::{FileConfig, is_hashed};
use crate::config::runtime::{
    GatewayConfig, ServerConfig, SharedConfig, TelemetryConfig, WidgetConfig,
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("password hashing error: {0}")]
    HashError(String),
}

/// Values given on the command line or through the environment. They win
/// over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub listen: Option<SocketAddr>,
    pub ft_api_url: Option<String>,
    pub ft_api_key: Option<String>,
    pub platform_origin: Option<String>,
    pub operator_api_key: Option<String>,
    pub ft_jwt_secret: Option<String>,
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub telemetry: TelemetryConfig,
    pub widget: WidgetConfig,
}

impl LoadedConfig {
    pub fn into_shared(self) -> SharedConfig {
        SharedConfig::new(self.server, self.gateway, self.telemetry, self.widget)
    }

    /// Push reloadable sections into a running [`SharedConfig`].
    pub fn apply_to(self, shared: &SharedConfig) {
        shared.gateway.replace(self.gateway);
        shared.telemetry.replace(self.telemetry);
        shared.widget.replace(self.widget);
        shared.server.replace(self.server);
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    overrides: ConfigOverrides,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, overrides: ConfigOverrides) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            overrides,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file, if there is one
    /// 2. Hash a plaintext operator key found in the file (and rewrite it)
    /// 3. Apply CLI / environment overrides
    /// 4. Validate the result
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let mut file_config = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => {
                let mut file_config: FileConfig = toml::from_str(&content)?;
                if !file_config.is_operator_key_hashed() {
                    if let Some(plaintext) = file_config.gateway.operator_api_key.take() {
                        file_config.gateway.operator_api_key = Some(hash_secret(&plaintext)?);
                        self.rewrite_config(&file_config)?;
                        tracing::info!("Operator API key hashed and config file updated");
                    }
                }
                file_config
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    path = %self.config_path.display(),
                    "No config file found, using defaults and environment"
                );
                FileConfig::default()
            }
            Err(e) => return Err(e.into()),
        };

        self.apply_overrides(&mut file_config)?;
        validate(&file_config)?;
        Ok(build_loaded_config(file_config))
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    fn apply_overrides(&self, config: &mut FileConfig) -> Result<(), ConfigError> {
        let o = &self.overrides;
        if let Some(listen) = o.listen {
            config.server.listen = listen;
        }
        if let Some(url) = &o.ft_api_url {
            config.telemetry.base_url = url.clone();
        }
        if let Some(key) = &o.ft_api_key {
            config.telemetry.api_key = Some(key.clone());
        }
        if let Some(origin) = &o.platform_origin {
            config.telemetry.origin = origin.clone();
        }
        if let Some(secret) = &o.ft_jwt_secret {
            config.widget.jwt_secret = Some(secret.clone());
        }
        if let Some(key) = &o.operator_api_key {
            let hash = if is_hashed(key) {
                key.clone()
            } else {
                hash_secret(key)?
            };
            config.gateway.operator_api_key = Some(hash);
        }
        Ok(())
    }

    fn rewrite_config(&self, config: &FileConfig) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(config)?;

        // Write atomically: write to temp file, then rename
        let temp_path = self.config_path.with_extension("toml.tmp");
        std::fs::write(&temp_path, toml_string)?;
        std::fs::rename(&temp_path, &self.config_path)?;

        Ok(())
    }
}

pub(crate) fn hash_secret(plaintext: &str) -> Result<String, ConfigError> {
    use argon2::{
        Argon2, PasswordHasher,
        password_hash::{SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ConfigError::HashError(e.to_string()))
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    let base_url = url::Url::parse(&config.telemetry.base_url).map_err(|e| {
        ConfigError::ValidationError(format!(
            "telemetry.base_url {:?} is not a URL: {e}",
            config.telemetry.base_url
        ))
    })?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(ConfigError::ValidationError(format!(
            "telemetry.base_url must be http or https, got {}",
            base_url.scheme()
        )));
    }
    if config.telemetry.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "telemetry.timeout_secs must be greater than zero".to_string(),
        ));
    }
    if config.activity.capacity == 0 {
        return Err(ConfigError::ValidationError(
            "activity.capacity must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn build_loaded_config(file_config: FileConfig) -> LoadedConfig {
    let FileConfig {
        server,
        gateway,
        telemetry,
        widget,
        activity,
    } = file_config;

    LoadedConfig {
        server: ServerConfig {
            listen: server.listen,
            activity_capacity: activity.capacity,
        },
        gateway: GatewayConfig::new(gateway.operator_api_key),
        telemetry: TelemetryConfig {
            base_url: telemetry.base_url,
            api_key: telemetry.api_key.filter(|k| !k.trim().is_empty()),
            origin: telemetry.origin,
            timeout: Duration::from_secs(telemetry.timeout_secs),
        },
        widget: WidgetConfig {
            jwt_secret: widget.jwt_secret,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("igp-config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_missing_file_gives_mock_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path().join("absent.toml"), ConfigOverrides::default());
        let loaded = loader.load().unwrap();

        assert!(loaded.telemetry.is_mock());
        assert_eq!(loaded.server.listen.port(), 3000);
        assert!(loaded.gateway.operator_key_hash.is_none());
        assert!(!dir.path().join("absent.toml").exists());
    }

    #[tokio::test]
    async fn test_plaintext_operator_key_is_hashed_and_rewritten() {
        let (_dir, path) = temp_config(
            r#"
[gateway]
operator_api_key = "provider-secret"
"#,
        );
        let loaded = ConfigLoader::new(&path, ConfigOverrides::default())
            .load()
            .unwrap();

        assert!(loaded.gateway.verify_operator_key("provider-secret").await);
        let rewritten = std::fs::read_to_string(&path).unwrap();
        assert!(!rewritten.contains("provider-secret"));
        assert!(rewritten.contains("$argon2"));

        let reloaded = ConfigLoader::new(&path, ConfigOverrides::default())
            .load()
            .unwrap();
        assert!(reloaded.gateway.verify_operator_key("provider-secret").await);
    }

    #[tokio::test]
    async fn test_overrides_win_over_file() {
        let (_dir, path) = temp_config(
            r#"
[telemetry]
base_url = "https://file.example.com"
origin = "from-file"
"#,
        );
        let overrides = ConfigOverrides {
            ft_api_url: Some("https://env.example.com/v1/".to_string()),
            ft_api_key: Some("ft-key".to_string()),
            platform_origin: Some("from-env".to_string()),
            operator_api_key: Some("env-operator".to_string()),
            ..Default::default()
        };
        let loaded = ConfigLoader::new(&path, overrides).load().unwrap();

        assert_eq!(loaded.telemetry.base_url, "https://env.example.com/v1/");
        assert_eq!(loaded.telemetry.origin, "from-env");
        assert!(!loaded.telemetry.is_mock());
        assert!(loaded.gateway.verify_operator_key("env-operator").await);
        // Environment secrets never end up in the file.
        assert!(!std::fs::read_to_string(&path).unwrap().contains("env-operator"));
    }

    #[test]
    fn test_validation_errors() {
        for content in [
            "[telemetry]\nbase_url = \"not a url\"",
            "[telemetry]\nbase_url = \"ftp://ft.example.com\"",
            "[telemetry]\ntimeout_secs = 0",
            "[activity]\ncapacity = 0",
        ] {
            let (_dir, path) = temp_config(content);
            let result = ConfigLoader::new(&path, ConfigOverrides::default()).load();
            assert!(
                matches!(result, Err(ConfigError::ValidationError(_))),
                "{content}"
            );
        }
    }
}
