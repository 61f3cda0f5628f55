use axum::{Json, extract::State};
use igp_sdk::objects::BalanceResponse;

use crate::api::extractors::PlayerAuth;
use crate::state::AppState;

/// `GET /balance`: both wallets of the calling player.
pub(super) async fn balance(
    state: State<AppState>,
    PlayerAuth(player): PlayerAuth,
) -> Json<BalanceResponse> {
    Json(BalanceResponse {
        amount: player.real_balance,
        bonus_amount: player.bonus_balance,
        currency: player.currency,
        origin: state.origin(),
    })
}
