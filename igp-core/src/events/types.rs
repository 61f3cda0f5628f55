//! Telemetry event definitions.
//!
//! Events are produced by handlers after a domain action commits, then
//! shaped by the translator and delivered at most once. Each record carries
//! only what the action knows; everything else is defaulted during shaping.

use crate::ledger::WalletTransaction;
use igp_sdk::objects::{Block, Consent};
use igp_sdk::upstream::{CasinoActivityType, HttpMethod, ShapedBody, UpstreamTarget};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Every event type the platform knows how to forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Login,
    Registration,
    Logout,
    UserUpdate,
    Consents,
    Blocks,
    Deposit,
    Payment,
    Bet,
    Win,
    Casino,
    Bonus,
    Balance,
}

impl EventKind {
    pub const ALL: [EventKind; 13] = [
        EventKind::Login,
        EventKind::Registration,
        EventKind::Logout,
        EventKind::UserUpdate,
        EventKind::Consents,
        EventKind::Blocks,
        EventKind::Deposit,
        EventKind::Payment,
        EventKind::Bet,
        EventKind::Win,
        EventKind::Casino,
        EventKind::Bonus,
        EventKind::Balance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Login => "login",
            EventKind::Registration => "registration",
            EventKind::Logout => "logout",
            EventKind::UserUpdate => "user_update",
            EventKind::Consents => "consents",
            EventKind::Blocks => "blocks",
            EventKind::Deposit => "deposit",
            EventKind::Payment => "payment",
            EventKind::Bet => "bet",
            EventKind::Win => "win",
            EventKind::Casino => "casino",
            EventKind::Bonus => "bonus",
            EventKind::Balance => "balance",
        }
    }

    /// Upstream endpoint of this event type.
    pub fn target(&self) -> UpstreamTarget {
        let (path, method) = match self {
            EventKind::Login => ("/v2/integration/login", HttpMethod::Post),
            EventKind::Registration => ("/v2/integration/user/registration", HttpMethod::Post),
            EventKind::Logout => ("/v2/integration/logout", HttpMethod::Post),
            EventKind::UserUpdate => ("/v2/integration/user", HttpMethod::Put),
            EventKind::Consents => ("/v2/integration/user/consents", HttpMethod::Put),
            EventKind::Blocks => ("/v2/integration/user/blocks", HttpMethod::Put),
            EventKind::Deposit | EventKind::Payment => {
                ("/v1/integration/payment", HttpMethod::Post)
            }
            EventKind::Bet | EventKind::Win | EventKind::Casino => {
                ("/v1/integration/casino", HttpMethod::Post)
            }
            EventKind::Bonus => ("/v1/integration/bonus", HttpMethod::Post),
            EventKind::Balance => ("/v1/integration/user/balances", HttpMethod::Post),
        };
        UpstreamTarget { path, method }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when an event type name is not in [`EventKind::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event type: {0}")]
pub struct UnknownEventKind(pub String);

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginEvent {
    pub session_id: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub device_type: Option<String>,
    pub is_impersonated: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistrationEvent {
    pub note: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

/// A wager or a payout, with the balances around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasinoEvent {
    pub amount: Decimal,
    pub bonus_wager_amount: Decimal,
    pub wager_amount: Decimal,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    pub bonus_balance_before: Decimal,
    pub bonus_balance_after: Decimal,
    pub currency: Option<String>,
    pub transaction_id: Option<String>,
    pub game_id: Option<String>,
    pub game_name: Option<String>,
    pub vendor_name: Option<String>,
    /// Only consulted for the generic `casino` event; `bet` and `win` fix it.
    pub activity_type: Option<CasinoActivityType>,
}

impl CasinoEvent {
    /// Describe a committed ledger movement.
    pub fn from_transaction(
        tx: &WalletTransaction,
        currency: &str,
        transaction_id: Option<String>,
        game_id: Option<String>,
    ) -> Self {
        Self {
            amount: tx.amount,
            bonus_wager_amount: tx.bonus_wager_amount,
            wager_amount: tx.real_wager_amount,
            balance_before: tx.balance_before,
            balance_after: tx.balance_after,
            bonus_balance_before: tx.bonus_balance_before,
            bonus_balance_after: tx.bonus_balance_after,
            currency: Some(currency.to_string()),
            transaction_id,
            game_id,
            game_name: None,
            vendor_name: None,
            activity_type: None,
        }
    }
}

/// Incoming funds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentEvent {
    pub amount: Decimal,
    pub currency: Option<String>,
    pub transaction_id: Option<String>,
    pub status: Option<String>,
    pub vendor_id: Option<String>,
    pub vendor_name: Option<String>,
}

impl PaymentEvent {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self {
            amount,
            currency: Some(currency.to_string()),
            transaction_id: None,
            status: None,
            vendor_id: None,
            vendor_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BonusEvent {
    pub amount: Decimal,
    pub bonus_code: Option<String>,
    pub bonus_id: Option<String>,
    pub user_bonus_id: Option<String>,
    pub bonus_type: Option<String>,
    pub status: Option<String>,
    pub currency: Option<String>,
    pub locked_amount: Option<Decimal>,
    pub required_wagering_amount: Option<Decimal>,
    pub product: Option<String>,
}

impl BonusEvent {
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount,
            bonus_code: None,
            bonus_id: None,
            user_bonus_id: None,
            bonus_type: None,
            status: None,
            currency: None,
            locked_amount: None,
            required_wagering_amount: None,
            product: None,
        }
    }
}

/// Both wallets after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub real: Decimal,
    pub bonus: Decimal,
    pub currency: Option<String>,
}

/// A domain event bound for the FT integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelemetryEvent {
    Login(LoginEvent),
    Registration(RegistrationEvent),
    Logout,
    UserUpdate,
    Consents(Vec<Consent>),
    Blocks(Vec<Block>),
    Deposit(PaymentEvent),
    Payment(PaymentEvent),
    Bet(CasinoEvent),
    Win(CasinoEvent),
    Casino(CasinoEvent),
    Bonus(BonusEvent),
    Balance(BalanceSnapshot),
}

impl TelemetryEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            TelemetryEvent::Login(_) => EventKind::Login,
            TelemetryEvent::Registration(_) => EventKind::Registration,
            TelemetryEvent::Logout => EventKind::Logout,
            TelemetryEvent::UserUpdate => EventKind::UserUpdate,
            TelemetryEvent::Consents(_) => EventKind::Consents,
            TelemetryEvent::Blocks(_) => EventKind::Blocks,
            TelemetryEvent::Deposit(_) => EventKind::Deposit,
            TelemetryEvent::Payment(_) => EventKind::Payment,
            TelemetryEvent::Bet(_) => EventKind::Bet,
            TelemetryEvent::Win(_) => EventKind::Win,
            TelemetryEvent::Casino(_) => EventKind::Casino,
            TelemetryEvent::Bonus(_) => EventKind::Bonus,
            TelemetryEvent::Balance(_) => EventKind::Balance,
        }
    }
}

/// A shaped event ready to go out.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub kind: EventKind,
    pub target: UpstreamTarget,
    pub body: ShapedBody,
}
