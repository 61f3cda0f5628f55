//! Shapes telemetry events into FT request bodies.
//!
//! Translation is pure: the clock and the seed for generated ids come from
//! the [`TranslateContext`], so equal inputs give equal outputs. Every
//! optional upstream field gets a default here, which keeps a sparse event
//! from turning into a malformed upstream call.

use crate::events::{
    BalanceSnapshot, BonusEvent, CasinoEvent, EventKind, LoginEvent, OutboundRequest,
    PaymentEvent, RegistrationEvent, TelemetryEvent,
};
use igp_sdk::objects::{Block, Consent};
use igp_sdk::upstream::{
    BalanceEntry, BalancesBody, BlocksBody, BonusBody, CasinoActivityType, CasinoBody,
    ConsentsBody, EnvelopeBody, LoginBody, PaymentBody, RegistrationBody, ShapedBody,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Value};
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

const DEFAULT_CURRENCY: &str = "EUR";
const DEFAULT_IP_ADDRESS: &str = "127.0.0.1";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
const DEFAULT_DEVICE_TYPE: &str = "Desktop";
const DEFAULT_REGISTRATION_NOTE: &str = "User registered via PoC platform";

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("unknown event type: {0}")]
    UnknownEventType(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// Everything translation needs besides the event itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateContext {
    /// Platform origin tag stamped on every body.
    pub origin: String,
    pub now: OffsetDateTime,
    /// Seed of generated ids (`sess-…`, `ctx-…`, `round-…`, `tx-…`).
    pub seed: Uuid,
}

impl TranslateContext {
    /// Context for events happening right now.
    pub fn capture(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            now: OffsetDateTime::now_utc(),
            seed: Uuid::new_v4(),
        }
    }

    fn timestamp(&self) -> Result<String, TranslateError> {
        Ok(self.now.format(&Rfc3339)?)
    }

    fn generated(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.seed)
    }
}

fn float(field: &str, value: Decimal) -> Result<f64, TranslateError> {
    value
        .to_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| TranslateError::InvalidPayload(format!("{field} is not representable")))
}

fn or_default(value: &Option<String>, default: &str) -> String {
    value.clone().unwrap_or_else(|| default.to_string())
}

/// Shape `event` for `user_id`.
pub fn translate(
    user_id: &str,
    event: &TelemetryEvent,
    ctx: &TranslateContext,
) -> Result<OutboundRequest, TranslateError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(TranslateError::InvalidPayload(
            "user id must not be empty".to_string(),
        ));
    }

    let kind = event.kind();
    let user_id = user_id.to_string();
    let timestamp = ctx.timestamp()?;
    let origin = ctx.origin.clone();

    let body = match event {
        TelemetryEvent::Login(login) => ShapedBody::Login(LoginBody {
            user_id,
            is_impersonated: login.is_impersonated.unwrap_or(false),
            ip_address: or_default(&login.ip_address, DEFAULT_IP_ADDRESS),
            user_agent: or_default(&login.user_agent, DEFAULT_USER_AGENT),
            session_id: login
                .session_id
                .clone()
                .unwrap_or_else(|| ctx.generated("sess")),
            device_type: or_default(&login.device_type, DEFAULT_DEVICE_TYPE),
            timestamp,
            origin,
        }),
        TelemetryEvent::Registration(registration) => ShapedBody::Registration(RegistrationBody {
            user_id,
            note: or_default(&registration.note, DEFAULT_REGISTRATION_NOTE),
            user_agent: or_default(&registration.user_agent, DEFAULT_USER_AGENT),
            ip_address: or_default(&registration.ip_address, DEFAULT_IP_ADDRESS),
            timestamp,
            origin,
        }),
        TelemetryEvent::Logout | TelemetryEvent::UserUpdate => ShapedBody::Envelope(EnvelopeBody {
            user_id,
            timestamp,
            origin,
        }),
        TelemetryEvent::Consents(consents) => ShapedBody::Consents(ConsentsBody {
            user_id,
            timestamp,
            origin,
            consents: consents.clone(),
        }),
        TelemetryEvent::Blocks(blocks) => ShapedBody::Blocks(BlocksBody {
            user_id,
            timestamp,
            origin,
            blocks: blocks.clone(),
        }),
        TelemetryEvent::Deposit(payment) | TelemetryEvent::Payment(payment) => {
            ShapedBody::Payment(PaymentBody {
                user_id,
                payment_id: payment
                    .transaction_id
                    .clone()
                    .unwrap_or_else(|| ctx.generated("tx")),
                payment_type: "Credit".to_string(),
                status: or_default(&payment.status, "Approved"),
                amount: float("amount", payment.amount)?,
                currency: or_default(&payment.currency, DEFAULT_CURRENCY),
                vendor_id: or_default(&payment.vendor_id, "mock-bank"),
                vendor_name: or_default(&payment.vendor_name, "MockBank"),
                timestamp,
                origin,
            })
        }
        TelemetryEvent::Bet(casino) => shape_casino(user_id, casino, CasinoActivityType::Bet, ctx)?,
        TelemetryEvent::Win(casino) => shape_casino(user_id, casino, CasinoActivityType::Win, ctx)?,
        TelemetryEvent::Casino(casino) => shape_casino(
            user_id,
            casino,
            casino.activity_type.unwrap_or(CasinoActivityType::Bet),
            ctx,
        )?,
        TelemetryEvent::Bonus(bonus) => {
            let bonus_id = bonus
                .bonus_id
                .clone()
                .unwrap_or_else(|| ctx.generated("bonus"));
            ShapedBody::Bonus(BonusBody {
                user_bonus_id: bonus
                    .user_bonus_id
                    .clone()
                    .unwrap_or_else(|| format!("{user_id}-{bonus_id}")),
                user_id,
                bonus_code: or_default(&bonus.bonus_code, &bonus_id),
                bonus_id,
                bonus_type: or_default(&bonus.bonus_type, "WelcomeBonus"),
                status: or_default(&bonus.status, "Created"),
                amount: float("amount", bonus.amount)?,
                currency: or_default(&bonus.currency, DEFAULT_CURRENCY),
                locked_amount: float("locked_amount", bonus.locked_amount.unwrap_or_default())?,
                bonus_turned_real: 0.0,
                required_wagering_amount: float(
                    "required_wagering_amount",
                    bonus.required_wagering_amount.unwrap_or_default(),
                )?,
                product: or_default(&bonus.product, "Casino"),
                timestamp,
                origin,
            })
        }
        TelemetryEvent::Balance(snapshot) => {
            let currency = or_default(&snapshot.currency, DEFAULT_CURRENCY);
            ShapedBody::Balances(BalancesBody {
                user_id,
                balances: vec![
                    BalanceEntry {
                        key: "real_money".to_string(),
                        amount: float("amount", snapshot.real)?,
                        currency: currency.clone(),
                        exchange_rate: 1.0,
                    },
                    BalanceEntry {
                        key: "bonus_money".to_string(),
                        amount: float("bonus_amount", snapshot.bonus)?,
                        currency,
                        exchange_rate: 1.0,
                    },
                ],
                timestamp,
                origin,
            })
        }
    };

    Ok(OutboundRequest {
        kind,
        target: kind.target(),
        body,
    })
}

fn shape_casino(
    user_id: String,
    casino: &CasinoEvent,
    activity_type: CasinoActivityType,
    ctx: &TranslateContext,
) -> Result<ShapedBody, TranslateError> {
    let (activity_id, round_id) = match &casino.transaction_id {
        Some(tx) => (tx.clone(), format!("round-{tx}")),
        None => (ctx.generated("ctx"), ctx.generated("round")),
    };

    Ok(ShapedBody::Casino(CasinoBody {
        user_id,
        activity_id,
        activity_type,
        status: "Approved".to_string(),
        amount: float("amount", casino.amount)?,
        bonus_wager_amount: float("bonus_wager_amount", casino.bonus_wager_amount)?,
        wager_amount: float("wager_amount", casino.wager_amount)?,
        balance_before: float("balance_before", casino.balance_before)?,
        balance_after: float("balance_after", casino.balance_after)?,
        bonus_balance_before: float("bonus_balance_before", casino.bonus_balance_before)?,
        bonus_balance_after: float("bonus_balance_after", casino.bonus_balance_after)?,
        currency: or_default(&casino.currency, DEFAULT_CURRENCY),
        game_id: or_default(&casino.game_id, "unknown"),
        game_name: or_default(
            &casino.game_name.clone().or_else(|| casino.game_id.clone()),
            "Mock Slot Game",
        ),
        game_type: "Slot".to_string(),
        vendor_id: "mock-vendor-1".to_string(),
        vendor_name: or_default(&casino.vendor_name, "MockProvider"),
        round_id,
        is_round_end: true,
        timestamp: ctx.timestamp()?,
        origin: ctx.origin.clone(),
    }))
}

/// Loosely typed payload fields. Missing and `null` are the same thing.
struct Fields<'a> {
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Fields<'a> {
    fn new(payload: &'a Value) -> Result<Self, TranslateError> {
        match payload {
            Value::Object(map) => Ok(Self { map: Some(map) }),
            Value::Null => Ok(Self { map: None }),
            other => Err(TranslateError::InvalidPayload(format!(
                "payload must be an object, got {other}"
            ))),
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map
            .and_then(|map| map.get(key))
            .filter(|value| !value.is_null())
    }

    fn string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    fn decimal(&self, key: &str) -> Result<Option<Decimal>, TranslateError> {
        self.get(key).map(|value| parse_amount(key, value)).transpose()
    }

    fn required_decimal(&self, key: &str) -> Result<Decimal, TranslateError> {
        self.decimal(key)?
            .ok_or_else(|| TranslateError::InvalidPayload(format!("{key} is required")))
    }

    fn list<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, TranslateError> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| TranslateError::InvalidPayload(format!("{key}: {e}"))),
        }
    }
}

/// Accept a JSON number or a numeric string. Anything else is rejected.
fn parse_amount(key: &str, value: &Value) -> Result<Decimal, TranslateError> {
    let invalid = || TranslateError::InvalidPayload(format!("{key} is not a number: {value}"));
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Decimal::from(i));
            }
            n.as_f64()
                .filter(|f| f.is_finite())
                .and_then(|f| Decimal::try_from(f).ok())
                .ok_or_else(invalid)
        }
        Value::String(s) => {
            let s = s.trim();
            s.parse::<Decimal>()
                .or_else(|_| Decimal::from_scientific(s))
                .map_err(|_| invalid())
        }
        _ => Err(invalid()),
    }
}

/// Parse an untyped `(event_type, payload)` pair into a [`TelemetryEvent`].
pub fn parse_event(event_type: &str, payload: &Value) -> Result<TelemetryEvent, TranslateError> {
    let kind: EventKind = event_type
        .parse()
        .map_err(|_| TranslateError::UnknownEventType(event_type.to_string()))?;
    let fields = Fields::new(payload)?;

    let event = match kind {
        EventKind::Login => TelemetryEvent::Login(LoginEvent {
            session_id: fields.string("session_id"),
            ip_address: fields.string("ip_address"),
            user_agent: fields.string("user_agent"),
            device_type: fields.string("device_type"),
            is_impersonated: fields.bool("is_impersonated"),
        }),
        EventKind::Registration => TelemetryEvent::Registration(RegistrationEvent {
            note: fields.string("note"),
            user_agent: fields.string("user_agent"),
            ip_address: fields.string("ip_address"),
        }),
        EventKind::Logout => TelemetryEvent::Logout,
        EventKind::UserUpdate => TelemetryEvent::UserUpdate,
        EventKind::Consents => TelemetryEvent::Consents(fields.list::<Consent>("consents")?),
        EventKind::Blocks => TelemetryEvent::Blocks(fields.list::<Block>("blocks")?),
        EventKind::Deposit | EventKind::Payment => {
            let payment = PaymentEvent {
                amount: fields.required_decimal("amount")?,
                currency: fields.string("currency"),
                transaction_id: fields.string("transaction_id"),
                status: fields.string("status"),
                vendor_id: fields.string("vendor_id"),
                vendor_name: fields.string("vendor_name").or(fields.string("provider")),
            };
            if kind == EventKind::Deposit {
                TelemetryEvent::Deposit(payment)
            } else {
                TelemetryEvent::Payment(payment)
            }
        }
        EventKind::Bet => TelemetryEvent::Bet(parse_casino(&fields, CasinoActivityType::Bet)?),
        EventKind::Win => TelemetryEvent::Win(parse_casino(&fields, CasinoActivityType::Win)?),
        EventKind::Casino => {
            let activity_type = match fields.string("type").as_deref() {
                None => CasinoActivityType::Bet,
                Some(t) if t.eq_ignore_ascii_case("bet") => CasinoActivityType::Bet,
                Some(t) if t.eq_ignore_ascii_case("win") => CasinoActivityType::Win,
                Some(other) => {
                    return Err(TranslateError::InvalidPayload(format!(
                        "unknown casino activity type: {other}"
                    )));
                }
            };
            let mut casino = parse_casino(&fields, activity_type)?;
            casino.activity_type = Some(activity_type);
            TelemetryEvent::Casino(casino)
        }
        EventKind::Bonus => TelemetryEvent::Bonus(BonusEvent {
            amount: fields.required_decimal("amount")?,
            bonus_code: fields.string("bonus_code"),
            bonus_id: fields.string("bonus_id"),
            user_bonus_id: fields.string("user_bonus_id"),
            bonus_type: fields.string("type"),
            status: fields.string("status"),
            currency: fields.string("currency"),
            locked_amount: fields.decimal("locked_amount")?,
            required_wagering_amount: fields.decimal("required_wagering_amount")?,
            product: fields.string("product"),
        }),
        EventKind::Balance => TelemetryEvent::Balance(BalanceSnapshot {
            real: fields.required_decimal("amount")?,
            bonus: fields.decimal("bonus_amount")?.unwrap_or_default(),
            currency: fields.string("currency"),
        }),
    };
    Ok(event)
}

/// Raw casino payloads may omit the balance snapshots; the missing "before"
/// is derived from "after" and the amount.
fn parse_casino(
    fields: &Fields<'_>,
    activity_type: CasinoActivityType,
) -> Result<CasinoEvent, TranslateError> {
    let amount = fields.required_decimal("amount")?;
    let bonus_wager_amount = fields.decimal("bonus_wager_amount")?.unwrap_or_default();
    let balance_after = fields.decimal("balance_after")?.unwrap_or_default();
    let bonus_balance_after = fields.decimal("bonus_balance_after")?.unwrap_or_default();

    let out_of_range = || TranslateError::InvalidPayload("amounts out of range".to_string());
    let (default_wager, default_before) = match activity_type {
        CasinoActivityType::Bet => (
            amount.checked_sub(bonus_wager_amount).ok_or_else(out_of_range)?,
            balance_after.checked_add(amount).ok_or_else(out_of_range)?,
        ),
        CasinoActivityType::Win => (
            Decimal::ZERO,
            balance_after.checked_sub(amount).ok_or_else(out_of_range)?,
        ),
    };

    Ok(CasinoEvent {
        amount,
        bonus_wager_amount,
        wager_amount: fields.decimal("wager_amount")?.unwrap_or(default_wager),
        balance_before: fields.decimal("balance_before")?.unwrap_or(default_before),
        balance_after,
        bonus_balance_before: fields
            .decimal("bonus_balance_before")?
            .unwrap_or(bonus_balance_after),
        bonus_balance_after,
        currency: fields.string("currency"),
        transaction_id: fields.string("transaction_id"),
        game_id: fields.string("game_id"),
        game_name: fields.string("game_name"),
        vendor_name: fields.string("game_provider"),
        activity_type: None,
    })
}

/// Parse and shape in one step.
pub fn translate_raw(
    user_id: &str,
    event_type: &str,
    payload: &Value,
    ctx: &TranslateContext,
) -> Result<OutboundRequest, TranslateError> {
    let event = parse_event(event_type, payload)?;
    translate(user_id, &event, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::plan_debit;
    use crate::entities::Balances;
    use igp_sdk::upstream::HttpMethod;
    use rust_decimal::dec;
    use serde_json::json;
    use time::macros::datetime;

    fn ctx() -> TranslateContext {
        TranslateContext {
            origin: "igaming-poc".to_string(),
            now: datetime!(2024-03-01 12:00:00 UTC),
            seed: Uuid::nil(),
        }
    }

    #[test]
    fn test_bet_from_ledger_transaction() {
        let tx = plan_debit(Balances::new(dec!(100), dec!(30)), dec!(50)).unwrap();
        let event = TelemetryEvent::Bet(CasinoEvent::from_transaction(
            &tx,
            "EUR",
            Some("t-1".to_string()),
            Some("slot-7".to_string()),
        ));

        let out = translate("test-user", &event, &ctx()).unwrap();
        assert_eq!(out.target.path, "/v1/integration/casino");
        assert_eq!(out.target.method, HttpMethod::Post);

        let body = out.body.to_value();
        assert_eq!(body["type"], "Bet");
        assert_eq!(body["activity_id"], "t-1");
        assert_eq!(body["round_id"], "round-t-1");
        assert_eq!(body["amount"], 50.0);
        assert_eq!(body["bonus_wager_amount"], 30.0);
        assert_eq!(body["wager_amount"], 20.0);
        assert_eq!(body["balance_before"], 100.0);
        assert_eq!(body["balance_after"], 80.0);
        assert_eq!(body["bonus_balance_before"], 30.0);
        assert_eq!(body["bonus_balance_after"], 0.0);
        assert_eq!(body["game_id"], "slot-7");
        assert_eq!(body["game_name"], "slot-7");
        assert_eq!(body["is_round_end"], true);
        assert_eq!(body["timestamp"], "2024-03-01T12:00:00Z");
        assert_eq!(body["origin"], "igaming-poc");
    }

    #[test]
    fn test_casino_defaults_never_overflow() {
        let huge = json!({"amount": "79228162514264337593543950335", "balance_after": "1"});
        assert!(matches!(
            parse_event("bet", &huge),
            Err(TranslateError::InvalidPayload(_))
        ));

        let negative = json!({"amount": "79228162514264337593543950335", "balance_after": "-1"});
        assert!(matches!(
            parse_event("win", &negative),
            Err(TranslateError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_game_name_falls_back_to_game_id() {
        let name_of = |payload: Value| {
            let event = parse_event("bet", &payload).unwrap();
            translate("test-user", &event, &ctx()).unwrap().body.to_value()["game_name"].clone()
        };

        assert_eq!(name_of(json!({"amount": 1})), "Mock Slot Game");
        assert_eq!(name_of(json!({"amount": 1, "game_id": "starburst"})), "starburst");
        assert_eq!(
            name_of(json!({"amount": 1, "game_id": "starburst", "game_name": "Starburst XXL"})),
            "Starburst XXL"
        );
    }

    #[test]
    fn test_translation_is_deterministic() {
        let event = parse_event("login", &json!({})).unwrap();
        let first = translate("test-user", &event, &ctx()).unwrap();
        let second = translate("test-user", &event, &ctx()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_login_defaults() {
        let out = translate_raw("test-user", "login", &Value::Null, &ctx()).unwrap();
        let body = out.body.to_value();
        assert_eq!(out.target.path, "/v2/integration/login");
        assert_eq!(body["is_impersonated"], false);
        assert_eq!(body["ip_address"], "127.0.0.1");
        assert_eq!(body["user_agent"], "Mozilla/5.0");
        assert_eq!(body["device_type"], "Desktop");
        assert_eq!(
            body["session_id"],
            "sess-00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_casino_type_distinguishes_bet_and_win() {
        let payload = json!({"amount": 5, "transaction_id": "w-1"});
        let win = translate_raw("u", "win", &payload, &ctx()).unwrap();
        let bet = translate_raw("u", "bet", &payload, &ctx()).unwrap();
        assert_eq!(win.target, bet.target);
        assert_eq!(win.body.to_value()["type"], "Win");
        assert_eq!(bet.body.to_value()["type"], "Bet");

        let casino = translate_raw("u", "casino", &json!({"amount": 5, "type": "Win"}), &ctx())
            .unwrap();
        assert_eq!(casino.kind, EventKind::Casino);
        assert_eq!(casino.body.to_value()["type"], "Win");
        assert_eq!(
            casino.body.to_value()["activity_id"],
            "ctx-00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_raw_casino_derives_missing_balances() {
        let out = translate_raw(
            "u",
            "win",
            &json!({"amount": "20", "balance_after": 100}),
            &ctx(),
        )
        .unwrap();
        let body = out.body.to_value();
        assert_eq!(body["balance_before"], 80.0);
        assert_eq!(body["wager_amount"], 0.0);
    }

    #[test]
    fn test_balance_shape() {
        let event = TelemetryEvent::Balance(BalanceSnapshot {
            real: dec!(80),
            bonus: dec!(0),
            currency: Some("USD".to_string()),
        });
        let body = translate("u", &event, &ctx()).unwrap().body.to_value();
        assert_eq!(
            body["balances"],
            json!([
                {"key": "real_money", "amount": 80.0, "currency": "USD", "exchange_rate": 1.0},
                {"key": "bonus_money", "amount": 0.0, "currency": "USD", "exchange_rate": 1.0},
            ])
        );
    }

    #[test]
    fn test_deposit_and_payment_share_shape() {
        let deposit = translate_raw("u", "deposit", &json!({"amount": 25}), &ctx()).unwrap();
        let payment = translate_raw("u", "payment", &json!({"amount": 25}), &ctx()).unwrap();
        assert_eq!(deposit.target, payment.target);
        assert_eq!(deposit.body, payment.body);

        let body = deposit.body.to_value();
        assert_eq!(body["type"], "Credit");
        assert_eq!(body["status"], "Approved");
        assert_eq!(body["vendor_name"], "MockBank");
        assert_eq!(body["payment_id"], "tx-00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn test_bonus_defaults() {
        let mut bonus = BonusEvent::new(dec!(10));
        bonus.bonus_id = Some("POC-BONUS-101".to_string());
        bonus.bonus_code = Some("WELCOME100".to_string());
        let body = translate("u", &TelemetryEvent::Bonus(bonus), &ctx())
            .unwrap()
            .body
            .to_value();
        assert_eq!(body["type"], "WelcomeBonus");
        assert_eq!(body["status"], "Created");
        assert_eq!(body["product"], "Casino");
        assert_eq!(body["user_bonus_id"], "u-POC-BONUS-101");
        assert_eq!(body["bonus_code"], "WELCOME100");
        assert_eq!(body["locked_amount"], 0.0);
        assert_eq!(body["currency"], "EUR");
    }

    #[test]
    fn test_envelope_events() {
        for event_type in ["logout", "user_update"] {
            let body = translate_raw("u", event_type, &json!({}), &ctx())
                .unwrap()
                .body
                .to_value();
            assert_eq!(
                body,
                json!({"user_id": "u", "timestamp": "2024-03-01T12:00:00Z", "origin": "igaming-poc"})
            );
        }

        let consents = translate_raw(
            "u",
            "consents",
            &json!({"consents": [{"opted_in": true, "type": "email"}]}),
            &ctx(),
        )
        .unwrap();
        assert_eq!(consents.target.method, HttpMethod::Put);
        assert_eq!(consents.body.to_value()["consents"][0]["type"], "email");
    }

    #[test]
    fn test_non_numeric_amount_is_rejected() {
        for amount in [json!("lots"), json!(true), json!({"v": 1})] {
            let err = translate_raw("u", "bet", &json!({"amount": amount}), &ctx()).unwrap_err();
            assert!(matches!(err, TranslateError::InvalidPayload(_)), "{err}");
        }
        assert!(matches!(
            translate_raw("u", "deposit", &json!({}), &ctx()),
            Err(TranslateError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let body = translate_raw("u", "deposit", &json!({"amount": " 12.50 "}), &ctx())
            .unwrap()
            .body
            .to_value();
        assert_eq!(body["amount"], 12.5);

        let body = translate_raw("u", "deposit", &json!({"amount": "1e2"}), &ctx())
            .unwrap()
            .body
            .to_value();
        assert_eq!(body["amount"], 100.0);
    }

    #[test]
    fn test_unknown_type_and_bad_payload() {
        assert!(matches!(
            translate_raw("u", "jackpot", &json!({}), &ctx()),
            Err(TranslateError::UnknownEventType(t)) if t == "jackpot"
        ));
        assert!(matches!(
            translate_raw("u", "login", &json!([1, 2]), &ctx()),
            Err(TranslateError::InvalidPayload(_))
        ));
        assert!(matches!(
            translate_raw("  ", "login", &json!({}), &ctx()),
            Err(TranslateError::InvalidPayload(_))
        ));
    }
}
