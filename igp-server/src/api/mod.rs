//! Platform REST API, mounted under `/api`.
//!
//! # Endpoints
//!
//! - wallet: `POST /debit`, `POST /credit`, `POST /deposit`, `GET /balance`
//! - bonus: `POST /bonus/credit`, `POST /bonus/credit/funds`, `GET /bonus/list`
//! - player: `POST /authenticate`, `POST /registration`, `POST /logout`,
//!   `POST /user/update`, `GET /ft-token`
//! - compliance: `GET /userdetails/{id}`, `GET|PUT /userblocks/{id}`,
//!   `GET|POST|PUT /userconsents/{id}`
//! - diagnostics: `POST /events/{event_type}`, `GET /activities`

use axum::Router;
use igp_core::ledger::normalize_amount;
use rust_decimal::Decimal;

use crate::api::error::ApiError;
use crate::state::AppState;

pub mod error;
pub mod extractors;

mod bonus;
mod compliance;
mod diagnostics;
mod player;
mod wallet;

/// Build the platform API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(wallet::router())
        .merge(bonus::router())
        .merge(player::router())
        .merge(compliance::router())
        .merge(diagnostics::router())
}

/// Unwrap a mandatory body field.
fn required<T>(field: &str, value: Option<T>) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::InvalidArgument(format!("{field} is required")))
}

/// Unwrap a mandatory amount, rounded to the precision the wallets store.
fn required_amount(value: Option<Decimal>) -> Result<Decimal, ApiError> {
    required("amount", value).map(normalize_amount)
}

/// Unwrap a mandatory, non-blank string field.
fn required_str(field: &str, value: Option<String>) -> Result<String, ApiError> {
    required(field, value.filter(|v| !v.trim().is_empty()))
}
