//! Request bodies of the FT marketing integration.
//!
//! One struct per upstream schema. Amounts are plain `f64` because that is
//! what the integration accepts; producers must never hand it a non-finite
//! value.

use serde::{Deserialize, Serialize};

/// Header carrying the FT API key on outbound calls.
pub const FT_API_KEY_HEADER: &str = "X-API-Key";

/// HTTP verb of an upstream endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed upstream endpoint of an event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct UpstreamTarget {
    pub path: &'static str,
    pub method: HttpMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginBody {
    pub user_id: String,
    pub is_impersonated: bool,
    pub ip_address: String,
    pub user_agent: String,
    pub session_id: String,
    pub device_type: String,
    pub timestamp: String,
    pub origin: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationBody {
    pub user_id: String,
    pub note: String,
    pub user_agent: String,
    pub ip_address: String,
    pub timestamp: String,
    pub origin: String,
}

/// Minimal body of `logout` and `user_update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeBody {
    pub user_id: String,
    pub timestamp: String,
    pub origin: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentsBody {
    pub user_id: String,
    pub timestamp: String,
    pub origin: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub consents: Vec<crate::objects::Consent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlocksBody {
    pub user_id: String,
    pub timestamp: String,
    pub origin: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub blocks: Vec<crate::objects::Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentBody {
    pub user_id: String,
    pub payment_id: String,
    /// Always `"Credit"`: the platform only reports incoming funds.
    #[serde(rename = "type")]
    pub payment_type: String,
    pub status: String,
    pub amount: f64,
    pub currency: String,
    pub vendor_id: String,
    pub vendor_name: String,
    pub timestamp: String,
    pub origin: String,
}

/// Distinguishes the two activities sharing the casino endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CasinoActivityType {
    Bet,
    Win,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CasinoBody {
    pub user_id: String,
    pub activity_id: String,
    #[serde(rename = "type")]
    pub activity_type: CasinoActivityType,
    pub status: String,
    pub amount: f64,
    pub bonus_wager_amount: f64,
    pub wager_amount: f64,
    pub balance_before: f64,
    pub balance_after: f64,
    pub bonus_balance_before: f64,
    pub bonus_balance_after: f64,
    pub currency: String,
    pub game_id: String,
    pub game_name: String,
    pub game_type: String,
    pub vendor_id: String,
    pub vendor_name: String,
    pub round_id: String,
    pub is_round_end: bool,
    pub timestamp: String,
    pub origin: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusBody {
    pub user_id: String,
    pub bonus_id: String,
    pub user_bonus_id: String,
    #[serde(rename = "type")]
    pub bonus_type: String,
    pub status: String,
    pub amount: f64,
    pub bonus_code: String,
    pub currency: String,
    pub locked_amount: f64,
    pub bonus_turned_real: f64,
    pub required_wagering_amount: f64,
    pub product: String,
    pub timestamp: String,
    pub origin: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub key: String,
    pub amount: f64,
    pub currency: String,
    pub exchange_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancesBody {
    pub user_id: String,
    pub balances: Vec<BalanceEntry>,
    pub timestamp: String,
    pub origin: String,
}

/// A request body ready to be sent upstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ShapedBody {
    Login(LoginBody),
    Registration(RegistrationBody),
    Envelope(EnvelopeBody),
    Consents(ConsentsBody),
    Blocks(BlocksBody),
    Payment(PaymentBody),
    Casino(CasinoBody),
    Bonus(BonusBody),
    Balances(BalancesBody),
}

impl ShapedBody {
    pub fn user_id(&self) -> &str {
        match self {
            ShapedBody::Login(b) => &b.user_id,
            ShapedBody::Registration(b) => &b.user_id,
            ShapedBody::Envelope(b) => &b.user_id,
            ShapedBody::Consents(b) => &b.user_id,
            ShapedBody::Blocks(b) => &b.user_id,
            ShapedBody::Payment(b) => &b.user_id,
            ShapedBody::Casino(b) => &b.user_id,
            ShapedBody::Bonus(b) => &b.user_id,
            ShapedBody::Balances(b) => &b.user_id,
        }
    }

    /// Serialize into a JSON value for logging and activity snapshots.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
