//! The single error type of the platform API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use igp_core::entities::StoreError;
use igp_core::ledger::LedgerError;
use igp_core::translator::TranslateError;
use igp_sdk::objects::ErrorBody;

/// Errors that can occur in API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    InsufficientFunds(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("{0}")]
    Contention(String),

    /// Logged, never shown to the caller.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::InsufficientFunds(_) => StatusCode::PAYMENT_REQUIRED,
            ApiError::UserNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Contention(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::InvalidArgument(_) => "invalid_argument",
            ApiError::InsufficientFunds(_) => "insufficient_funds",
            ApiError::UserNotFound(_) => "user_not_found",
            ApiError::Contention(_) => "contention",
            ApiError::Internal(_) => "internal",
        }
    }

    pub fn body(&self) -> ErrorBody {
        let message = match self {
            ApiError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        };
        ErrorBody {
            error: self.kind().to_string(),
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(error = %detail, "API internal error");
        }
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidArgument(msg) => ApiError::InvalidArgument(msg),
            LedgerError::UserNotFound(id) => ApiError::UserNotFound(id),
            e @ LedgerError::InsufficientFunds { .. } => ApiError::InsufficientFunds(e.to_string()),
            e @ LedgerError::Contention(_) => ApiError::Contention(e.to_string()),
            LedgerError::Store(e) => e.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::UserNotFound(id),
            StoreError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<TranslateError> for ApiError {
    fn from(err: TranslateError) -> Self {
        match err {
            TranslateError::Timestamp(e) => ApiError::Internal(e.to_string()),
            other => ApiError::InvalidArgument(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_ledger_errors_map_to_statuses() {
        let cases = [
            (LedgerError::InvalidArgument("bad".into()), 400, "invalid_argument"),
            (LedgerError::UserNotFound("ghost".into()), 404, "user_not_found"),
            (
                LedgerError::InsufficientFunds {
                    requested: dec!(150),
                    available: dec!(100),
                },
                402,
                "insufficient_funds",
            ),
            (LedgerError::Contention("test-user".into()), 409, "contention"),
        ];
        for (err, status, kind) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status().as_u16(), status);
            assert_eq!(api.kind(), kind);
        }
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let api = ApiError::Internal("connection refused".into());
        let body = api.body();
        assert_eq!(body.error, "internal");
        assert_eq!(body.message, "internal server error");
    }
}
