use axum::{Json, extract::State};
use igp_core::events::{CasinoEvent, TelemetryEvent};
use igp_core::processors::balance_event;
use igp_sdk::objects::{LedgerResponse, WagerRequest};

use super::to_response;
use crate::api::error::ApiError;
use crate::api::extractors::{ApiJson, Principal};
use crate::api::{required_amount, required_str};
use crate::state::AppState;

/// `POST /credit`: pay out a win. Always lands in the real wallet.
pub(super) async fn credit(
    state: State<AppState>,
    auth: Principal,
    ApiJson(body): ApiJson<WagerRequest>,
) -> Result<Json<LedgerResponse>, ApiError> {
    let user_id = required_str("user_id", body.user_id)?;
    let amount = required_amount(body.amount)?;

    let outcome = state.ledger.credit(&user_id, amount).await?;
    tracing::info!(
        caller = auth.caller(),
        user_id = %outcome.user.id,
        %amount,
        "Credit applied"
    );

    let win = CasinoEvent::from_transaction(
        &outcome.transaction,
        &outcome.user.currency,
        body.transaction_id.clone(),
        body.game_id,
    );
    let telemetry = state
        .telemetry
        .emit(
            &outcome.user.id,
            [TelemetryEvent::Win(win), balance_event(&outcome.user)],
        )
        .await;

    Ok(Json(to_response(
        &outcome.user,
        body.transaction_id,
        state.origin(),
        telemetry,
    )))
}
