use axum::{
    Json,
    extract::{Path, State},
};
use igp_core::entities::User;
use igp_sdk::objects::UserDetails;
use igp_sdk::objects::compliance::Segmentation;
use serde_json::{Value, json};

use crate::api::error::ApiError;
use crate::api::extractors::Principal;
use crate::state::AppState;

const PROFILE_DATE: &str = "2023-01-01T08:00:00Z";

/// `GET /userdetails/{user_id}`: the player profile as FT wants it.
///
/// Fields the platform does not store are filled with fixed PoC values.
pub(super) async fn user_details(
    state: State<AppState>,
    _auth: Principal,
    Path(user_id): Path<String>,
) -> Result<Json<UserDetails>, ApiError> {
    let user = state
        .store
        .get_by_id(&user_id)
        .await?
        .ok_or_else(|| ApiError::UserNotFound(user_id.clone()))?;

    let details = to_details(user, state.origin());
    state.activity.inbound(
        "GET",
        &format!("/userdetails/{user_id}"),
        200,
        json!({}),
        serde_json::to_value(&details).unwrap_or(Value::Null),
    );
    Ok(Json(details))
}

fn or(value: Option<String>, default: impl FnOnce() -> String) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or_else(default)
}

fn to_details(user: User, origin: String) -> UserDetails {
    let fixed = |v: &str| v.to_string();
    UserDetails {
        username: if user.username.is_empty() {
            format!("user_{}", user.id)
        } else {
            user.username
        },
        first_name: or(user.first_name, || fixed("John")),
        last_name: or(user.last_name, || fixed("Doe")),
        email: or(user.email, || format!("{}@example.com", user.id)),
        address: fixed("Tower Road, 120A"),
        city: fixed("Sliema"),
        country: or(user.country, || fixed("MT")),
        postal_code: fixed("SLM 1030"),
        language: or(user.language, || fixed("en")),
        currency: user.currency,
        birth_date: fixed("1990-01-01"),
        registration_date: fixed(PROFILE_DATE),
        mobile: fixed("21435678"),
        mobile_prefix: fixed("+356"),
        sex: fixed("Male"),
        title: fixed("Mr"),
        is_blocked: false,
        is_excluded: false,
        market: fixed("gb"),
        origin,
        roles: vec![fixed("VIP"), fixed("TEST_USER")],
        registration_code: fixed("ABC123"),
        affiliate_reference: fixed("AFF_DEFAULT"),
        verified_at: fixed(PROFILE_DATE),
        bonus_balance: user.bonus_balance,
        segmentation: Segmentation::default(),
        user_id: user.id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use igp_core::entities::demo_user;

    #[test]
    fn test_defaults_fill_missing_profile() {
        let mut user = demo_user();
        user.username = String::new();
        user.first_name = None;
        user.email = Some(String::new());
        user.country = Some("DE".to_string());

        let details = to_details(user, "igaming-poc".to_string());
        assert_eq!(details.user_id, "test-user");
        assert_eq!(details.username, "user_test-user");
        assert_eq!(details.first_name, "John");
        assert_eq!(details.email, "test-user@example.com");
        assert_eq!(details.country, "DE");
        assert_eq!(details.segmentation.vip_level, 1);
        assert_eq!(details.roles, vec!["VIP", "TEST_USER"]);
    }
}
