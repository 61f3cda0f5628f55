//! Player profile, block and consent objects served to FT.
//!
//! Blocks and consents are static mock data; only their shape matters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Response of `GET /userdetails/{user_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDetails {
    pub user_id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub language: String,
    pub currency: String,
    pub birth_date: String,
    pub registration_date: String,
    pub mobile: String,
    pub mobile_prefix: String,
    pub sex: String,
    pub title: String,
    pub is_blocked: bool,
    pub is_excluded: bool,
    pub market: String,
    pub origin: String,
    pub roles: Vec<String>,
    pub registration_code: String,
    pub affiliate_reference: String,
    pub verified_at: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub bonus_balance: Decimal,
    pub segmentation: Segmentation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmentation {
    pub vip_level: u32,
    pub special_segmentation: String,
}

impl Default for Segmentation {
    fn default() -> Self {
        Self {
            vip_level: 1,
            special_segmentation: "PoC".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub active: bool,
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub note: String,
}

/// Blocks list, used both as `GET /userblocks` response and `PUT` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocksPayload {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl BlocksPayload {
    /// The blocks every PoC player has: none active.
    pub fn inactive() -> Self {
        Self {
            blocks: vec![
                Block {
                    active: false,
                    block_type: "Excluded".to_string(),
                    note: "Not excluded in PoC".to_string(),
                },
                Block {
                    active: false,
                    block_type: "Blocked".to_string(),
                    note: "Not blocked in PoC".to_string(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consent {
    pub opted_in: bool,
    #[serde(rename = "type")]
    pub consent_type: String,
}

/// Consents list, used both as `GET /userconsents` response and request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentsPayload {
    #[serde(default)]
    pub consents: Vec<Consent>,
}

impl ConsentsPayload {
    /// Standard marketing consents of a PoC player.
    pub fn standard() -> Self {
        let consent = |consent_type: &str, opted_in: bool| Consent {
            opted_in,
            consent_type: consent_type.to_string(),
        };
        Self {
            consents: vec![
                consent("email", true),
                consent("sms", true),
                consent("telephone", false),
                consent("postMail", true),
                consent("siteNotification", true),
                consent("pushNotification", true),
            ],
        }
    }
}
