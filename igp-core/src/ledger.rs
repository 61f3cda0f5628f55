//! Dual-wallet ledger.
//!
//! Every operation is split in two steps:
//! 1. a pure `plan_*` function that turns the current [`Balances`] and a
//!    requested amount into a [`WalletTransaction`], and
//! 2. [`WalletLedger`], which reads the user, plans, and commits the result
//!    through [`UserStore::swap_balances`].
//!
//! Wagers always drain the bonus wallet first. Wins and deposits only touch
//! the real wallet, bonus credits only the bonus wallet.

use crate::entities::{Balances, StoreError, SwapOutcome, User, UserStore};
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// How many times a conflicting balance swap is re-planned before giving up.
pub const MAX_SWAP_ATTEMPTS: usize = 8;

/// Bonus granted by `/bonus/credit`, where the caller does not pick an amount.
pub const DEFAULT_BONUS_AMOUNT: Decimal = Decimal::TEN;

/// Decimal places the wallet columns keep (`NUMERIC(20, 8)`).
pub const AMOUNT_SCALE: u32 = 8;

/// Largest value a wallet column holds: 999999999999.99999999.
pub const MAX_WALLET_BALANCE: Decimal =
    Decimal::from_parts(0x630F_FFFF, 0x6BC7_5E2D, 0x5, false, AMOUNT_SCALE);

/// Round an amount the way Postgres stores it in a wallet column.
pub fn normalize_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("balance update for {0} kept conflicting with concurrent writers")]
    Contention(String),

    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => LedgerError::UserNotFound(id),
            other => LedgerError::Store(other),
        }
    }
}

/// Kind of balance movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Debit,
    Credit,
    BonusCredit,
    Deposit,
}

/// Before/after snapshot of one balance movement. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletTransaction {
    pub kind: TransactionKind,
    pub amount: Decimal,
    /// Part of a debit taken from the bonus wallet.
    pub bonus_wager_amount: Decimal,
    /// Part of a debit taken from the real wallet.
    pub real_wager_amount: Decimal,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    pub bonus_balance_before: Decimal,
    pub bonus_balance_after: Decimal,
}

impl WalletTransaction {
    pub fn before(&self) -> Balances {
        Balances::new(self.balance_before, self.bonus_balance_before)
    }

    pub fn after(&self) -> Balances {
        Balances::new(self.balance_after, self.bonus_balance_after)
    }

    fn unchanged(kind: TransactionKind, amount: Decimal, balances: Balances) -> Self {
        Self {
            kind,
            amount,
            bonus_wager_amount: Decimal::ZERO,
            real_wager_amount: Decimal::ZERO,
            balance_before: balances.real,
            balance_after: balances.real,
            bonus_balance_before: balances.bonus,
            bonus_balance_after: balances.bonus,
        }
    }
}

fn require_positive(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidArgument(format!(
            "amount must be greater than zero, got {amount}"
        )));
    }
    require_in_range(amount)
}

fn require_in_range(amount: Decimal) -> Result<(), LedgerError> {
    if amount > MAX_WALLET_BALANCE {
        return Err(LedgerError::InvalidArgument(format!(
            "amount out of range, got {amount}"
        )));
    }
    Ok(())
}

/// `wallet + amount`, refused when the result no longer fits the column.
fn add_to_wallet(wallet: Decimal, amount: Decimal) -> Result<Decimal, LedgerError> {
    wallet
        .checked_add(amount)
        .filter(|after| *after <= MAX_WALLET_BALANCE)
        .ok_or_else(|| {
            LedgerError::InvalidArgument(format!(
                "amount out of range: {wallet} + {amount} exceeds the wallet limit"
            ))
        })
}

/// Plan a wager: bonus wallet first, the remainder from the real wallet.
pub fn plan_debit(balances: Balances, amount: Decimal) -> Result<WalletTransaction, LedgerError> {
    require_positive(amount)?;
    if balances.total() < amount {
        return Err(LedgerError::InsufficientFunds {
            requested: amount,
            available: balances.total(),
        });
    }

    let bonus_wager = balances.bonus.max(Decimal::ZERO).min(amount);
    let real_wager = amount - bonus_wager;

    let mut tx = WalletTransaction::unchanged(TransactionKind::Debit, amount, balances);
    tx.bonus_wager_amount = bonus_wager;
    tx.real_wager_amount = real_wager;
    tx.bonus_balance_after = balances.bonus - bonus_wager;
    tx.balance_after = balances.real - real_wager;
    Ok(tx)
}

/// Plan a win payout into the real wallet.
///
/// Zero is accepted (a losing round still closes with a credit); negative
/// amounts are rejected.
pub fn plan_credit(balances: Balances, amount: Decimal) -> Result<WalletTransaction, LedgerError> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::InvalidArgument(format!(
            "credit amount must not be negative, got {amount}"
        )));
    }
    require_in_range(amount)?;
    let mut tx = WalletTransaction::unchanged(TransactionKind::Credit, amount, balances);
    tx.balance_after = add_to_wallet(balances.real, amount)?;
    Ok(tx)
}

/// Plan a bonus grant into the bonus wallet.
pub fn plan_bonus_credit(
    balances: Balances,
    amount: Decimal,
) -> Result<WalletTransaction, LedgerError> {
    require_positive(amount)?;
    let mut tx = WalletTransaction::unchanged(TransactionKind::BonusCredit, amount, balances);
    tx.bonus_balance_after = add_to_wallet(balances.bonus, amount)?;
    Ok(tx)
}

/// Plan an external deposit into the real wallet.
pub fn plan_deposit(balances: Balances, amount: Decimal) -> Result<WalletTransaction, LedgerError> {
    require_positive(amount)?;
    let mut tx = WalletTransaction::unchanged(TransactionKind::Deposit, amount, balances);
    tx.balance_after = add_to_wallet(balances.real, amount)?;
    Ok(tx)
}

/// A committed balance movement together with the user as stored after it.
#[derive(Debug, Clone)]
pub struct LedgerOutcome {
    pub user: User,
    pub transaction: WalletTransaction,
}

/// Applies planned balance movements through a [`UserStore`].
#[derive(Clone)]
pub struct WalletLedger {
    store: Arc<dyn UserStore>,
}

impl WalletLedger {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    pub async fn debit(&self, user_id: &str, amount: Decimal) -> Result<LedgerOutcome, LedgerError> {
        self.apply(user_id, amount, plan_debit).await
    }

    pub async fn credit(&self, user_id: &str, amount: Decimal) -> Result<LedgerOutcome, LedgerError> {
        self.apply(user_id, amount, plan_credit).await
    }

    pub async fn credit_bonus(
        &self,
        user_id: &str,
        amount: Decimal,
    ) -> Result<LedgerOutcome, LedgerError> {
        self.apply(user_id, amount, plan_bonus_credit).await
    }

    pub async fn deposit(&self, user_id: &str, amount: Decimal) -> Result<LedgerOutcome, LedgerError> {
        self.apply(user_id, amount, plan_deposit).await
    }

    /// Read, plan and conditionally write until the write lands.
    ///
    /// The amount is first rounded to the column scale, so the planned
    /// before/after values are exactly what gets stored. A plan failure
    /// (bad amount, insufficient funds) aborts before any write. A version
    /// conflict re-reads the user and plans again against the fresh balances.
    #[tracing::instrument(skip(self, plan), fields(user_id = %user_id, amount = %amount))]
    async fn apply(
        &self,
        user_id: &str,
        amount: Decimal,
        plan: fn(Balances, Decimal) -> Result<WalletTransaction, LedgerError>,
    ) -> Result<LedgerOutcome, LedgerError> {
        let amount = normalize_amount(amount);
        for attempt in 1..=MAX_SWAP_ATTEMPTS {
            let user = self
                .store
                .get_by_id(user_id)
                .await?
                .ok_or_else(|| LedgerError::UserNotFound(user_id.to_string()))?;

            let transaction = plan(user.balances(), amount)?;

            match self
                .store
                .swap_balances(&user.id, user.version, transaction.after())
                .await?
            {
                SwapOutcome::Swapped(user) => {
                    info!(
                        kind = ?transaction.kind,
                        real_after = %transaction.balance_after,
                        bonus_after = %transaction.bonus_balance_after,
                        "Balance updated"
                    );
                    return Ok(LedgerOutcome { user, transaction });
                }
                SwapOutcome::Conflict => {
                    debug!(attempt, "Balance swap conflicted, re-planning");
                }
            }
        }

        warn!(attempts = MAX_SWAP_ATTEMPTS, "Giving up on contended balance update");
        Err(LedgerError::Contention(user_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{MemoryUserStore, demo_user};
    use rust_decimal::dec;

    fn balances(real: Decimal, bonus: Decimal) -> Balances {
        Balances::new(real, bonus)
    }

    #[test]
    fn test_debit_drains_bonus_first() {
        let tx = plan_debit(balances(dec!(100), dec!(30)), dec!(50)).unwrap();
        assert_eq!(tx.bonus_wager_amount, dec!(30));
        assert_eq!(tx.real_wager_amount, dec!(20));
        assert_eq!(tx.after(), balances(dec!(80), dec!(0)));
        assert_eq!(tx.before(), balances(dec!(100), dec!(30)));
    }

    #[test]
    fn test_debit_within_bonus_leaves_real_untouched() {
        let tx = plan_debit(balances(dec!(100), dec!(30)), dec!(12.5)).unwrap();
        assert_eq!(tx.bonus_wager_amount, dec!(12.5));
        assert_eq!(tx.real_wager_amount, dec!(0));
        assert_eq!(tx.after(), balances(dec!(100), dec!(17.5)));
    }

    #[test]
    fn test_debit_split_invariants() {
        let cases = [
            (dec!(0), dec!(0), dec!(0.01)),
            (dec!(10), dec!(0), dec!(10)),
            (dec!(0), dec!(10), dec!(10)),
            (dec!(5.55), dec!(4.45), dec!(10)),
            (dec!(1000), dec!(250), dec!(1)),
            (dec!(1000), dec!(250), dec!(1250)),
        ];
        for (real, bonus, amount) in cases {
            let result = plan_debit(balances(real, bonus), amount);
            if amount > real + bonus {
                assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
                continue;
            }
            let tx = result.unwrap();
            assert_eq!(tx.bonus_wager_amount, bonus.min(amount));
            assert_eq!(tx.real_wager_amount, amount - tx.bonus_wager_amount);
            assert_eq!(tx.bonus_wager_amount + tx.real_wager_amount, amount);
            assert!(tx.balance_after >= Decimal::ZERO);
            assert!(tx.bonus_balance_after >= Decimal::ZERO);
        }
    }

    #[test]
    fn test_debit_insufficient_funds() {
        let err = plan_debit(balances(dec!(10), dec!(0)), dec!(50)).unwrap_err();
        match err {
            LedgerError::InsufficientFunds {
                requested,
                available,
            } => {
                assert_eq!(requested, dec!(50));
                assert_eq!(available, dec!(10));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_debit_rejects_non_positive() {
        assert!(matches!(
            plan_debit(balances(dec!(10), dec!(0)), dec!(0)),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            plan_debit(balances(dec!(10), dec!(0)), dec!(-1)),
            Err(LedgerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_credit_touches_real_only() {
        let tx = plan_credit(balances(dec!(80), dec!(7)), dec!(20)).unwrap();
        assert_eq!(tx.after(), balances(dec!(100), dec!(7)));

        let zero = plan_credit(balances(dec!(80), dec!(7)), dec!(0)).unwrap();
        assert_eq!(zero.after(), zero.before());

        assert!(matches!(
            plan_credit(balances(dec!(80), dec!(7)), dec!(-5)),
            Err(LedgerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_bonus_and_deposit_isolation() {
        let bonus = plan_bonus_credit(balances(dec!(80), dec!(0)), dec!(10)).unwrap();
        assert_eq!(bonus.after(), balances(dec!(80), dec!(10)));

        let deposit = plan_deposit(balances(dec!(80), dec!(10)), dec!(25)).unwrap();
        assert_eq!(deposit.after(), balances(dec!(105), dec!(10)));

        assert!(plan_deposit(balances(dec!(80), dec!(10)), dec!(0)).is_err());
        assert!(plan_bonus_credit(balances(dec!(80), dec!(10)), dec!(-1)).is_err());
    }

    #[test]
    fn test_wallet_limit_matches_column() {
        assert_eq!(MAX_WALLET_BALANCE, dec!(999999999999.99999999));
        assert_eq!(MAX_WALLET_BALANCE.scale(), AMOUNT_SCALE);
    }

    #[test]
    fn test_credit_overflow_is_rejected() {
        let full = balances(MAX_WALLET_BALANCE, dec!(0));
        assert!(matches!(
            plan_credit(full, dec!(0.00000001)),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            plan_credit(balances(dec!(80), dec!(0)), Decimal::MAX),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            plan_credit(balances(Decimal::MAX, dec!(0)), Decimal::ONE),
            Err(LedgerError::InvalidArgument(_))
        ));
        let exact = plan_credit(balances(MAX_WALLET_BALANCE - dec!(1), dec!(0)), dec!(1)).unwrap();
        assert_eq!(exact.balance_after, MAX_WALLET_BALANCE);
    }

    #[test]
    fn test_bonus_credit_overflow_is_rejected() {
        assert!(matches!(
            plan_bonus_credit(balances(dec!(0), MAX_WALLET_BALANCE), dec!(10)),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            plan_bonus_credit(balances(dec!(0), dec!(0)), Decimal::MAX),
            Err(LedgerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_deposit_overflow_is_rejected() {
        assert!(matches!(
            plan_deposit(balances(MAX_WALLET_BALANCE, dec!(0)), dec!(5)),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            plan_deposit(balances(Decimal::MAX, dec!(0)), Decimal::MAX),
            Err(LedgerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_debit_with_saturated_wallets() {
        let tx = plan_debit(balances(Decimal::MAX, Decimal::MAX), dec!(10)).unwrap();
        assert_eq!(tx.bonus_wager_amount, dec!(10));
        assert!(matches!(
            plan_debit(balances(dec!(10), dec!(0)), Decimal::MAX),
            Err(LedgerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_normalize_amount_rounds_like_the_column() {
        assert_eq!(normalize_amount(dec!(1.123456785)), dec!(1.12345679));
        assert_eq!(normalize_amount(dec!(1.123456784)), dec!(1.12345678));
        assert_eq!(normalize_amount(dec!(-0.000000005)), dec!(-0.00000001));
        assert_eq!(normalize_amount(dec!(2.5)), dec!(2.5));
    }

    fn ledger_with(real: Decimal, bonus: Decimal) -> (WalletLedger, MemoryUserStore) {
        let mut user = demo_user();
        user.real_balance = real;
        user.bonus_balance = bonus;
        let store = MemoryUserStore::with_users([user]);
        (WalletLedger::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn test_ledger_debit_then_credit() {
        let (ledger, store) = ledger_with(dec!(100), dec!(30));

        let debit = ledger.debit("test-user", dec!(50)).await.unwrap();
        assert_eq!(debit.transaction.bonus_wager_amount, dec!(30));
        assert_eq!(debit.user.balances(), balances(dec!(80), dec!(0)));

        let credit = ledger.credit("test-user", dec!(20)).await.unwrap();
        assert_eq!(credit.user.balances(), balances(dec!(100), dec!(0)));

        let stored = store.get_by_id("test-user").await.unwrap().unwrap();
        assert_eq!(stored.balances(), balances(dec!(100), dec!(0)));
        assert_eq!(stored.version, 2);
    }

    #[tokio::test]
    async fn test_ledger_failed_debit_leaves_state() {
        let (ledger, store) = ledger_with(dec!(10), dec!(0));

        let err = ledger.debit("test-user", dec!(50)).await.unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));

        let stored = store.get_by_id("test-user").await.unwrap().unwrap();
        assert_eq!(stored.balances(), balances(dec!(10), dec!(0)));
        assert_eq!(stored.version, 0);
    }

    #[tokio::test]
    async fn test_ledger_unknown_user() {
        let (ledger, _) = ledger_with(dec!(10), dec!(0));
        assert!(matches!(
            ledger.credit("ghost", dec!(1)).await,
            Err(LedgerError::UserNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_ledger_huge_credit_is_an_error_not_a_panic() {
        let (ledger, store) = ledger_with(dec!(100), dec!(0));
        let handle = tokio::spawn({
            let ledger = ledger.clone();
            async move { ledger.credit("test-user", Decimal::MAX).await }
        });

        let result = handle.await.expect("credit task must not panic");
        assert!(matches!(result, Err(LedgerError::InvalidArgument(_))));

        let stored = store.get_by_id("test-user").await.unwrap().unwrap();
        assert_eq!(stored.real_balance, dec!(100));
        assert_eq!(stored.version, 0);
    }

    #[tokio::test]
    async fn test_ledger_stores_what_it_reports() {
        let (ledger, store) = ledger_with(dec!(100), dec!(0));

        let debit = ledger.debit("test-user", dec!(0.123456789)).await.unwrap();
        assert_eq!(debit.transaction.amount, dec!(0.12345679));
        assert_eq!(debit.transaction.balance_after, dec!(99.87654321));

        let stored = store.get_by_id("test-user").await.unwrap().unwrap();
        assert_eq!(stored.real_balance, debit.transaction.balance_after);

        assert!(matches!(
            ledger.deposit("test-user", dec!(0.000000001)).await,
            Err(LedgerError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_debits_never_overdraw() {
        let (ledger, store) = ledger_with(dec!(100), dec!(0));

        let mut handles = Vec::new();
        for _ in 0..20 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger.debit("test-user", dec!(10)).await
            }));
        }

        let mut succeeded = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => succeeded += 1,
                Err(LedgerError::InsufficientFunds { .. }) | Err(LedgerError::Contention(_)) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        let stored = store.get_by_id("test-user").await.unwrap().unwrap();
        assert_eq!(
            stored.real_balance,
            dec!(100) - Decimal::from(succeeded) * dec!(10)
        );
        assert!(stored.real_balance >= Decimal::ZERO);
    }
}
