//! Wallet API request and response types.
//!
//! Request amounts accept JSON numbers or numeric strings; anything else is
//! rejected at deserialization. Response balances are plain JSON numbers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::telemetry::TelemetryRecord;

/// Body of `POST /debit` and `POST /credit`, sent by the game provider.
///
/// Fields are optional so a missing field is reported as a bad request
/// instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WagerRequest {
    pub user_id: Option<String>,
    pub amount: Option<Decimal>,
    pub transaction_id: Option<String>,
    pub game_id: Option<String>,
}

/// Body of `POST /deposit`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRequest {
    pub amount: Option<Decimal>,
}

/// Body of `POST /bonus/credit`. The platform decides the amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusCreditRequest {
    pub user_id: Option<String>,
    pub bonus_code: Option<String>,
}

/// Body of `POST /bonus/credit/funds`. The caller decides the amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusFundsRequest {
    pub user_id: Option<String>,
    pub amount: Option<Decimal>,
    pub bonus_code: Option<String>,
    pub currency: Option<String>,
}

/// Response of a debit or credit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerResponse {
    pub transaction_id: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub bonus_balance: Decimal,
    pub currency: String,
    pub origin: String,
    #[serde(rename = "_telemetry")]
    pub telemetry: Vec<TelemetryRecord>,
}

/// Response of a deposit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub currency: String,
    pub origin: String,
    #[serde(rename = "_telemetry")]
    pub telemetry: Vec<TelemetryRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_wager_request_accepts_numbers_and_strings() {
        let numeric: WagerRequest =
            serde_json::from_str(r#"{"user_id":"u1","amount":12.5}"#).unwrap();
        assert_eq!(numeric.amount, Some(dec!(12.5)));

        let textual: WagerRequest =
            serde_json::from_str(r#"{"user_id":"u1","amount":"12.5"}"#).unwrap();
        assert_eq!(textual.amount, Some(dec!(12.5)));
    }

    #[test]
    fn test_wager_request_rejects_non_numeric_amount() {
        let parsed = serde_json::from_str::<WagerRequest>(r#"{"user_id":"u1","amount":"lots"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_ledger_response_balances_are_numbers() {
        let response = LedgerResponse {
            transaction_id: Some("tx-1".to_string()),
            balance: dec!(80),
            bonus_balance: dec!(0),
            currency: "EUR".to_string(),
            origin: "igaming-poc".to_string(),
            telemetry: vec![],
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["balance"], serde_json::json!(80.0));
        assert_eq!(value["bonus_balance"], serde_json::json!(0.0));
        assert!(value["_telemetry"].as_array().unwrap().is_empty());
    }
}
