//! Operator (server-to-server) credentials.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use ring::hmac;
use std::sync::{Arc, OnceLock};

/// Credentials accepted through the `X-API-Key` header.
#[derive(Clone, Default)]
pub struct GatewayConfig {
    /// Argon2 hash of the operator API key. `None` disables trusted access.
    pub operator_key_hash: Option<String>,
    /// HMAC tag of the key that last passed argon2, keyed by the hash.
    verified: Arc<OnceLock<hmac::Tag>>,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("operator_key_hash", &self.operator_key_hash.as_ref().map(|_| "<argon2>"))
            .field("verified", &self.verified.get().is_some())
            .finish()
    }
}

impl PartialEq for GatewayConfig {
    fn eq(&self, other: &Self) -> bool {
        self.operator_key_hash == other.operator_key_hash
    }
}

impl Eq for GatewayConfig {}

impl GatewayConfig {
    pub fn new(operator_key_hash: Option<String>) -> Self {
        Self {
            operator_key_hash,
            verified: Arc::default(),
        }
    }

    /// Verify a presented operator key against the stored hash.
    ///
    /// The first match runs argon2 on the blocking pool and caches an HMAC
    /// tag of the key; later requests compare against the tag in constant
    /// time. A reload builds a new config and so starts with an empty cache.
    pub async fn verify_operator_key(&self, presented: &str) -> bool {
        let Some(hash) = self.operator_key_hash.clone() else {
            return false;
        };
        let cache_key = hmac::Key::new(hmac::HMAC_SHA256, hash.as_bytes());

        if let Some(tag) = self.verified.get() {
            return hmac::verify(&cache_key, presented.as_bytes(), tag.as_ref()).is_ok();
        }

        let presented = presented.to_owned();
        let outcome = tokio::task::spawn_blocking(move || {
            argon2_matches(&hash, &presented)
                .then(|| hmac::sign(&cache_key, presented.as_bytes()))
        })
        .await;

        match outcome {
            Ok(Some(tag)) => {
                let _ = self.verified.set(tag);
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::error!(error = %e, "Operator key verification task failed");
                false
            }
        }
    }
}

fn argon2_matches(hash: &str, presented: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(presented.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{
        PasswordHasher,
        password_hash::{SaltString, rand_core::OsRng},
    };

    fn hashed(key: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(key.as_bytes(), &salt)
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_verify_operator_key() {
        let config = GatewayConfig::new(Some(hashed("provider-key")));
        assert!(!config.verify_operator_key("provider-key ").await);
        assert!(!config.verify_operator_key("").await);
        assert!(config.verified.get().is_none());

        assert!(config.verify_operator_key("provider-key").await);
        assert!(config.verified.get().is_some());
    }

    #[tokio::test]
    async fn test_cached_key_still_rejects_others() {
        let config = GatewayConfig::new(Some(hashed("provider-key")));
        assert!(config.verify_operator_key("provider-key").await);

        let shared = config.clone();
        assert!(shared.verify_operator_key("provider-key").await);
        assert!(!shared.verify_operator_key("provider-kez").await);
        assert!(!shared.verify_operator_key("").await);
    }

    #[tokio::test]
    async fn test_new_config_does_not_inherit_cache() {
        let old = GatewayConfig::new(Some(hashed("old-key")));
        assert!(old.verify_operator_key("old-key").await);

        let reloaded = GatewayConfig::new(Some(hashed("new-key")));
        assert!(!reloaded.verify_operator_key("old-key").await);
        assert!(reloaded.verify_operator_key("new-key").await);
    }

    #[tokio::test]
    async fn test_no_key_rejects_everything() {
        let config = GatewayConfig::default();
        assert!(!config.verify_operator_key("").await);
        assert!(!config.verify_operator_key("anything").await);

        let broken = GatewayConfig::new(Some("not-a-hash".to_string()));
        assert!(!broken.verify_operator_key("not-a-hash").await);
    }
}
