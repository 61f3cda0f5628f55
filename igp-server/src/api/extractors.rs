//! Custom Axum extractors for request authentication and bodies.
//!
//! Provides:
//! - [`Principal`]: the session gate. A valid `X-API-Key` makes the caller a
//!   trusted server (game provider, FT callbacks); otherwise an
//!   `Authorization: Bearer <token>` header must name a player.
//! - [`PlayerAuth`]: like `Principal`, but only players pass.
//! - [`TrustedAuth`]: only the operator key passes.
//! - [`ApiJson`]: `Json<T>` whose rejections are reported as
//!   `invalid_argument` in the platform error format.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use igp_core::entities::User;
use igp_sdk::API_KEY_HEADER;
use serde::de::DeserializeOwned;

use crate::api::error::ApiError;
use crate::state::AppState;

/// Who is calling.
#[derive(Debug, Clone)]
pub enum Principal {
    /// A player identified by their session token.
    User(User),
    /// A server presenting the operator API key.
    Trusted,
}

impl Principal {
    /// Label for logs.
    pub fn caller(&self) -> &str {
        match self {
            Principal::User(user) => &user.id,
            Principal::Trusted => "trusted",
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

async fn is_trusted(headers: &HeaderMap, state: &AppState) -> bool {
    let Some(presented) = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let gateway = state.config.gateway.current();
    gateway.verify_operator_key(presented).await
}

async fn resolve_player(headers: &HeaderMap, state: &AppState) -> Result<User, ApiError> {
    let token = bearer_token(headers).ok_or(ApiError::Unauthorized("missing session token"))?;
    state
        .store
        .get_by_token(token)
        .await?
        .ok_or(ApiError::Unauthorized("invalid session token"))
}

impl FromRequestParts<AppState> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if is_trusted(&parts.headers, state).await {
            return Ok(Principal::Trusted);
        }

        resolve_player(&parts.headers, state)
            .await
            .map(Principal::User)
    }
}

/// A request made by a logged-in player.
pub struct PlayerAuth(pub User);

impl FromRequestParts<AppState> for PlayerAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_player(&parts.headers, state).await.map(PlayerAuth)
    }
}

/// A request made with the operator API key.
pub struct TrustedAuth;

impl FromRequestParts<AppState> for TrustedAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if is_trusted(&parts.headers, state).await {
            Ok(TrustedAuth)
        } else {
            Err(ApiError::Unauthorized("missing or invalid API key"))
        }
    }
}

/// JSON body extractor reporting malformed bodies as `invalid_argument`.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::InvalidArgument(rejection.body_text()))?;
        Ok(ApiJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use igp_core::entities::demo_user;

    #[test]
    fn test_bearer_prefix_is_optional() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer valid-token"));
        assert_eq!(bearer_token(&headers), Some("valid-token"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("valid-token"));
        assert_eq!(bearer_token(&headers), Some("valid-token"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer  "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_caller_label() {
        assert_eq!(Principal::User(demo_user()).caller(), "test-user");
        assert_eq!(Principal::Trusted.caller(), "trusted");
    }
}
