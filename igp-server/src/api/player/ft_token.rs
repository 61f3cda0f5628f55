use axum::{Json, extract::State};
use igp_sdk::objects::TokenResponse;
use igp_sdk::widget_token::{self, WidgetClaims};
use time::OffsetDateTime;

use crate::api::error::ApiError;
use crate::api::extractors::PlayerAuth;
use crate::state::AppState;

/// `GET /ft-token`: sign a token for the FT on-site notification widget.
///
/// The player's own secret wins over the platform secret.
pub(super) async fn ft_token(
    state: State<AppState>,
    PlayerAuth(player): PlayerAuth,
) -> Result<Json<TokenResponse>, ApiError> {
    let claims = WidgetClaims::issue(player.id.clone(), OffsetDateTime::now_utc().unix_timestamp());
    let widget = state.config.widget.current();
    let secret = widget.secret_for(player.ft_jwt_secret.as_deref());
    let token = widget_token::sign(&claims, secret.as_bytes())
        .map_err(|e| ApiError::Internal(format!("failed to sign widget token: {e}")))?;

    tracing::info!(user_id = %player.id, "Widget token issued");
    Ok(Json(TokenResponse { token }))
}
