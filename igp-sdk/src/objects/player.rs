//! Player-facing request and response types used by the dashboard.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::telemetry::TelemetryRecord;

/// Response of `GET /balance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub bonus_amount: Decimal,
    pub currency: String,
    pub origin: String,
}

/// Body of `POST /user/update`. Absent or empty fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub ft_brand_name: Option<String>,
    pub ft_origin: Option<String>,
    pub ft_jwt_secret: Option<String>,
}

impl ProfileUpdate {
    /// Drop empty strings so they are treated like missing fields.
    pub fn normalized(self) -> Self {
        fn keep(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }
        Self {
            first_name: keep(self.first_name),
            last_name: keep(self.last_name),
            email: keep(self.email),
            ft_brand_name: keep(self.ft_brand_name),
            ft_origin: keep(self.ft_origin),
            ft_jwt_secret: keep(self.ft_jwt_secret),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.ft_brand_name.is_none()
            && self.ft_origin.is_none()
            && self.ft_jwt_secret.is_none()
    }
}

/// Generic acknowledgement for event-trigger endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub origin: String,
    #[serde(rename = "_telemetry")]
    pub telemetry: Vec<TelemetryRecord>,
}

/// Response of `GET /ft-token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// One selectable bonus code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusOption {
    pub text: String,
    pub value: String,
}

/// Response of `GET /bonus/list`, in the casing FT expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BonusListResponse {
    pub data: Vec<BonusOption>,
    pub success: bool,
    pub errors: Vec<String>,
}
