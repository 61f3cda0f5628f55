use axum::{extract::State, http::StatusCode};
use igp_core::events::TelemetryEvent;
use igp_core::ledger::DEFAULT_BONUS_AMOUNT;
use igp_core::processors::balance_event;
use igp_sdk::objects::BonusCreditRequest;
use serde_json::{Value, json};

use super::granted;
use crate::api::error::ApiError;
use crate::api::extractors::{ApiJson, Principal};
use crate::api::required_str;
use crate::state::AppState;

const BONUS_ID: &str = "POC-BONUS-101";
const BONUS_TYPE: &str = "WelcomeBonus";

/// `POST /bonus/credit`: grant the fixed welcome bonus for a bonus code.
pub(super) async fn credit_bonus(
    state: State<AppState>,
    auth: Principal,
    ApiJson(body): ApiJson<BonusCreditRequest>,
) -> Result<(StatusCode, &'static str), ApiError> {
    let request = serde_json::to_value(&body).unwrap_or(Value::Null);
    let user_id = required_str("user_id", body.user_id)?;
    let bonus_code = required_str("bonus_code", body.bonus_code)?;

    let outcome = state
        .ledger
        .credit_bonus(&user_id, DEFAULT_BONUS_AMOUNT)
        .await?;
    let user = &outcome.user;
    tracing::info!(
        caller = auth.caller(),
        user_id = %user.id,
        bonus_code = %bonus_code,
        amount = %DEFAULT_BONUS_AMOUNT,
        "Bonus credited"
    );

    let bonus = granted(
        DEFAULT_BONUS_AMOUNT,
        BONUS_ID,
        BONUS_TYPE,
        bonus_code,
        user.currency.clone(),
    );
    let telemetry = state
        .telemetry
        .emit(&user.id, [TelemetryEvent::Bonus(bonus), balance_event(user)])
        .await;
    tracing::debug!(?telemetry, "Bonus telemetry");

    state
        .activity
        .inbound("POST", "/bonus/credit", 200, request, json!("OK"));
    Ok((StatusCode::OK, "OK"))
}
