use crate::framework::DatabaseProcessor;
use async_trait::async_trait;
use igp_sdk::objects::ProfileUpdate;
use kanau::processor::Processor;
use rust_decimal::Decimal;
use serde::Serialize;

/// A player account.
///
/// The ledger only ever writes `real_balance`, `bonus_balance` and
/// `version`; everything else is profile data carried through to FT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub token: String,
    pub currency: String,
    /// Withdrawable funds.
    #[serde(rename = "balance", with = "rust_decimal::serde::float")]
    pub real_balance: Decimal,
    /// Promotional funds, always wagered before `real_balance`.
    #[serde(with = "rust_decimal::serde::float")]
    pub bonus_balance: Decimal,
    /// Optimistic concurrency token, bumped on every balance swap.
    #[serde(skip_serializing)]
    pub version: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    /// Brand shown by the dashboard's FT widget.
    pub ft_brand_name: Option<String>,
    /// Site origin the dashboard's FT widget runs under.
    pub ft_origin: Option<String>,
    #[serde(skip_serializing)]
    pub ft_jwt_secret: Option<String>,
}

impl User {
    pub fn balances(&self) -> Balances {
        Balances {
            real: self.real_balance,
            bonus: self.bonus_balance,
        }
    }
}

/// The two wallets of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Balances {
    pub real: Decimal,
    pub bonus: Decimal,
}

impl Balances {
    pub fn new(real: Decimal, bonus: Decimal) -> Self {
        Self { real, bonus }
    }

    pub fn total(&self) -> Decimal {
        self.real.saturating_add(self.bonus)
    }
}

/// Errors raised by a [`UserStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("user not found: {0}")]
    NotFound(String),
}

/// Result of a conditional balance write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The write happened; carries the updated user.
    Swapped(User),
    /// Someone else changed the balances since they were read.
    Conflict,
}

/// Persistence boundary for player accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_by_token(&self, token: &str) -> Result<Option<User>, StoreError>;

    async fn get_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;

    /// Apply the present fields of `update`. Fails with
    /// [`StoreError::NotFound`] when the user does not exist.
    async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> Result<User, StoreError>;

    /// Replace both balances if the stored version still equals
    /// `expected_version`, bumping the version in the same step.
    async fn swap_balances(
        &self,
        id: &str,
        expected_version: i64,
        balances: Balances,
    ) -> Result<SwapOutcome, StoreError>;
}

// ---------------------------------------------------------------------------
// PostgreSQL queries
// ---------------------------------------------------------------------------

const USER_COLUMNS: &str = "id, username, token, currency, real_balance, bonus_balance, version, \
     first_name, last_name, email, country, language, ft_brand_name, ft_origin, ft_jwt_secret";

#[derive(Debug, Clone)]
/// Look a user up by bearer token.
pub struct GetUserByToken {
    pub token: String,
}

impl Processor<GetUserByToken> for DatabaseProcessor {
    type Output = Option<User>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetUserByToken")]
    async fn process(&self, query: GetUserByToken) -> Result<Option<User>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE token = $1"
        ))
        .bind(query.token.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[derive(Debug, Clone)]
/// Look a user up by id.
pub struct GetUserById {
    pub id: String,
}

impl Processor<GetUserById> for DatabaseProcessor {
    type Output = Option<User>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetUserById")]
    async fn process(&self, query: GetUserById) -> Result<Option<User>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(query.id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[derive(Debug, Clone)]
/// Overwrite the profile fields that are present; `None` keeps the old value.
pub struct UpdateUserProfile {
    pub id: String,
    pub update: ProfileUpdate,
}

impl Processor<UpdateUserProfile> for DatabaseProcessor {
    type Output = Option<User>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateUserProfile")]
    async fn process(&self, cmd: UpdateUserProfile) -> Result<Option<User>, sqlx::Error> {
        let UpdateUserProfile { id, update } = cmd;
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                ft_brand_name = COALESCE($5, ft_brand_name),
                ft_origin = COALESCE($6, ft_origin),
                ft_jwt_secret = COALESCE($7, ft_jwt_secret)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.first_name)
        .bind(update.last_name)
        .bind(update.email)
        .bind(update.ft_brand_name)
        .bind(update.ft_origin)
        .bind(update.ft_jwt_secret)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[derive(Debug, Clone)]
/// Conditionally replace both balances.
///
/// Returns `None` when no row matched `(id, expected_version)`, which is
/// either a missing user or a concurrent writer.
pub struct SwapUserBalances {
    pub id: String,
    pub expected_version: i64,
    pub balances: Balances,
}

impl Processor<SwapUserBalances> for DatabaseProcessor {
    type Output = Option<User>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SwapUserBalances")]
    async fn process(&self, cmd: SwapUserBalances) -> Result<Option<User>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET real_balance = $2,
                bonus_balance = $3,
                version = version + 1
            WHERE id = $1 AND version = $4
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(cmd.id)
        .bind(cmd.balances.real)
        .bind(cmd.balances.bonus)
        .bind(cmd.expected_version)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[derive(Debug, Clone)]
pub struct UserExists {
    pub id: String,
}

impl Processor<UserExists> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UserExists")]
    async fn process(&self, query: UserExists) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(query.id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

/// [`UserStore`] backed by the `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    processor: DatabaseProcessor,
}

impl PgUserStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self {
            processor: DatabaseProcessor { pool },
        }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get_by_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        let user = self
            .processor
            .process(GetUserByToken {
                token: token.to_string(),
            })
            .await?;
        Ok(user)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let user = self
            .processor
            .process(GetUserById { id: id.to_string() })
            .await?;
        Ok(user)
    }

    async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> Result<User, StoreError> {
        self.processor
            .process(UpdateUserProfile {
                id: id.to_string(),
                update: update.clone(),
            })
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn swap_balances(
        &self,
        id: &str,
        expected_version: i64,
        balances: Balances,
    ) -> Result<SwapOutcome, StoreError> {
        let swapped = self
            .processor
            .process(SwapUserBalances {
                id: id.to_string(),
                expected_version,
                balances,
            })
            .await?;
        if let Some(user) = swapped {
            return Ok(SwapOutcome::Swapped(user));
        }

        let exists = self
            .processor
            .process(UserExists { id: id.to_string() })
            .await?;
        if exists {
            Ok(SwapOutcome::Conflict)
        } else {
            Err(StoreError::NotFound(id.to_string()))
        }
    }
}
