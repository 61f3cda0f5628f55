use axum::{Json, extract::State};
use igp_core::events::{PaymentEvent, TelemetryEvent};
use igp_core::processors::balance_event;
use igp_sdk::objects::{DepositRequest, DepositResponse};

use crate::api::error::ApiError;
use crate::api::extractors::{ApiJson, PlayerAuth};
use crate::api::required_amount;
use crate::state::AppState;

/// `POST /deposit`: the dashboard's "add funds" button.
pub(super) async fn deposit(
    state: State<AppState>,
    PlayerAuth(player): PlayerAuth,
    ApiJson(body): ApiJson<DepositRequest>,
) -> Result<Json<DepositResponse>, ApiError> {
    let amount = required_amount(body.amount)?;
    let outcome = state.ledger.deposit(&player.id, amount).await?;
    tracing::info!(user_id = %player.id, %amount, "Deposit applied");

    let user = &outcome.user;
    let telemetry = state
        .telemetry
        .emit(
            &user.id,
            [
                TelemetryEvent::Deposit(PaymentEvent::new(amount, &user.currency)),
                balance_event(user),
            ],
        )
        .await;

    Ok(Json(DepositResponse {
        balance: user.real_balance,
        currency: user.currency.clone(),
        origin: state.origin(),
        telemetry,
    }))
}
