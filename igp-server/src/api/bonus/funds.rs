use axum::{extract::State, http::StatusCode};
use igp_core::events::TelemetryEvent;
use igp_core::processors::balance_event;
use igp_sdk::objects::BonusFundsRequest;
use serde_json::{Value, json};

use super::granted;
use crate::api::error::ApiError;
use crate::api::extractors::{ApiJson, Principal};
use crate::api::{required_amount, required_str};
use crate::state::AppState;

const BONUS_ID: &str = "POC-FUNDS-REWARD";
const BONUS_TYPE: &str = "ReloadBonus";
const DEFAULT_BONUS_CODE: &str = "FUNDS-REWARD";

/// `POST /bonus/credit/funds`: grant a bonus of a caller-chosen amount.
pub(super) async fn credit_funds(
    state: State<AppState>,
    auth: Principal,
    ApiJson(body): ApiJson<BonusFundsRequest>,
) -> Result<(StatusCode, &'static str), ApiError> {
    let request = serde_json::to_value(&body).unwrap_or(Value::Null);
    let user_id = required_str("user_id", body.user_id)?;
    let amount = required_amount(body.amount)?;

    let outcome = state.ledger.credit_bonus(&user_id, amount).await?;
    let user = &outcome.user;
    tracing::info!(
        caller = auth.caller(),
        user_id = %user.id,
        %amount,
        "Bonus funds credited"
    );

    let bonus = granted(
        amount,
        BONUS_ID,
        BONUS_TYPE,
        body.bonus_code
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BONUS_CODE.to_string()),
        body.currency
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| user.currency.clone()),
    );
    let telemetry = state
        .telemetry
        .emit(&user.id, [TelemetryEvent::Bonus(bonus), balance_event(user)])
        .await;
    tracing::debug!(?telemetry, "Bonus funds telemetry");

    state
        .activity
        .inbound("POST", "/bonus/credit/funds", 200, request, json!("OK"));
    Ok((StatusCode::OK, "OK"))
}
