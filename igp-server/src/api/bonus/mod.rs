//! Bonus handlers, called by FT when a promotion pays out.
//!
//! Credits answer with a plain `OK`, which is what FT expects.

use axum::{
    Router,
    routing::{get, post},
};
use igp_core::events::BonusEvent;
use rust_decimal::Decimal;

use crate::state::AppState;

mod credit;
mod funds;
mod list;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bonus/credit", post(credit::credit_bonus))
        .route("/bonus/credit/funds", post(funds::credit_funds))
        .route("/bonus/list", get(list::list_bonuses))
}

/// Bonus event of a freshly granted award.
fn granted(
    amount: Decimal,
    bonus_id: &str,
    bonus_type: &str,
    bonus_code: String,
    currency: String,
) -> BonusEvent {
    BonusEvent {
        bonus_code: Some(bonus_code),
        bonus_id: Some(bonus_id.to_string()),
        bonus_type: Some(bonus_type.to_string()),
        status: Some("Created".to_string()),
        currency: Some(currency),
        ..BonusEvent::new(amount)
    }
}
