//! Wallet handlers: balance movements requested by the game provider and
//! the dashboard.

use axum::{
    Router,
    routing::{get, post},
};
use igp_core::entities::User;
use igp_sdk::objects::{LedgerResponse, TelemetryRecord};

use crate::state::AppState;

mod balance;
mod credit;
mod debit;
mod deposit;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/debit", post(debit::debit))
        .route("/credit", post(credit::credit))
        .route("/deposit", post(deposit::deposit))
        .route("/balance", get(balance::balance))
}

/// Response of a debit or credit, built from the stored user.
fn to_response(
    user: &User,
    transaction_id: Option<String>,
    origin: String,
    telemetry: Vec<TelemetryRecord>,
) -> LedgerResponse {
    LedgerResponse {
        transaction_id,
        balance: user.real_balance,
        bonus_balance: user.bonus_balance,
        currency: user.currency.clone(),
        origin,
        telemetry,
    }
}
