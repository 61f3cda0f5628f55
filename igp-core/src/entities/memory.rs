//! In-process [`UserStore`] used by tests and credential-less development.

use super::user::{Balances, StoreError, SwapOutcome, User, UserStore};
use async_trait::async_trait;
use igp_sdk::objects::ProfileUpdate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Map-backed user store.
///
/// Every balance swap runs under the write lock, so the version check and
/// the write cannot interleave with another swap.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with [`demo_user`].
    pub fn seeded() -> Self {
        Self::with_users([demo_user()])
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users = users.into_iter().map(|u| (u.id.clone(), u)).collect();
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id.clone(), user);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_by_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        let token = token.trim();
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.token == token).cloned())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(first_name) = &update.first_name {
            user.first_name = Some(first_name.clone());
        }
        if let Some(last_name) = &update.last_name {
            user.last_name = Some(last_name.clone());
        }
        if let Some(email) = &update.email {
            user.email = Some(email.clone());
        }
        if let Some(brand) = &update.ft_brand_name {
            user.ft_brand_name = Some(brand.clone());
        }
        if let Some(origin) = &update.ft_origin {
            user.ft_origin = Some(origin.clone());
        }
        if let Some(secret) = &update.ft_jwt_secret {
            user.ft_jwt_secret = Some(secret.clone());
        }
        Ok(user.clone())
    }

    async fn swap_balances(
        &self,
        id: &str,
        expected_version: i64,
        balances: Balances,
    ) -> Result<SwapOutcome, StoreError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if user.version != expected_version {
            return Ok(SwapOutcome::Conflict);
        }

        user.real_balance = balances.real;
        user.bonus_balance = balances.bonus;
        user.version += 1;
        Ok(SwapOutcome::Swapped(user.clone()))
    }
}

/// The player every fresh development instance starts with.
///
/// Bearer token `valid-token`, 1000 EUR real balance, no bonus.
pub fn demo_user() -> User {
    User {
        id: "test-user".to_string(),
        username: "Test User".to_string(),
        token: "valid-token".to_string(),
        currency: "EUR".to_string(),
        real_balance: Decimal::from(1000),
        bonus_balance: Decimal::ZERO,
        version: 0,
        first_name: Some("John".to_string()),
        last_name: Some("Doe".to_string()),
        email: Some("test-user@example.com".to_string()),
        country: Some("MT".to_string()),
        language: Some("en".to_string()),
        ft_brand_name: None,
        ft_origin: None,
        ft_jwt_secret: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[tokio::test]
    async fn test_lookup_by_token_and_id() {
        let store = MemoryUserStore::seeded();

        let by_token = store.get_by_token(" valid-token ").await.unwrap().unwrap();
        assert_eq!(by_token.id, "test-user");

        let by_id = store.get_by_id("test-user").await.unwrap().unwrap();
        assert_eq!(by_id, by_token);

        assert!(store.get_by_token("nope").await.unwrap().is_none());
        assert!(store.get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_swap_checks_version() {
        let store = MemoryUserStore::seeded();

        let outcome = store
            .swap_balances("test-user", 0, Balances::new(dec!(900), dec!(5)))
            .await
            .unwrap();
        let SwapOutcome::Swapped(user) = outcome else {
            panic!("expected swap");
        };
        assert_eq!(user.version, 1);
        assert_eq!(user.balances(), Balances::new(dec!(900), dec!(5)));

        let stale = store
            .swap_balances("test-user", 0, Balances::new(dec!(1), dec!(1)))
            .await
            .unwrap();
        assert_eq!(stale, SwapOutcome::Conflict);

        let current = store.get_by_id("test-user").await.unwrap().unwrap();
        assert_eq!(current.balances(), Balances::new(dec!(900), dec!(5)));
    }

    #[tokio::test]
    async fn test_missing_user_errors() {
        let store = MemoryUserStore::new();
        assert!(matches!(
            store.swap_balances("ghost", 0, Balances::default()).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store
                .update_profile("ghost", &ProfileUpdate::default())
                .await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_profile_keeps_absent_fields() {
        let store = MemoryUserStore::seeded();
        let updated = store
            .update_profile(
                "test-user",
                &ProfileUpdate {
                    email: Some("new@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.email.as_deref(), Some("new@example.com"));
        assert_eq!(updated.first_name.as_deref(), Some("John"));
    }

    #[tokio::test]
    async fn test_update_profile_stores_widget_settings() {
        let store = MemoryUserStore::seeded();
        store
            .update_profile(
                "test-user",
                &ProfileUpdate {
                    ft_brand_name: Some("Lucky Spins".to_string()),
                    ft_origin: Some("https://luckyspins.example".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let updated = store
            .update_profile(
                "test-user",
                &ProfileUpdate {
                    ft_jwt_secret: Some("widget-secret".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.ft_brand_name.as_deref(), Some("Lucky Spins"));
        assert_eq!(updated.ft_origin.as_deref(), Some("https://luckyspins.example"));
        assert_eq!(updated.ft_jwt_secret.as_deref(), Some("widget-secret"));
    }
}
