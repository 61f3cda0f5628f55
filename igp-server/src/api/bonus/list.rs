use axum::{Json, extract::State};
use igp_sdk::objects::{BonusListResponse, BonusOption};
use serde_json::{Value, json};

use crate::api::extractors::Principal;
use crate::state::AppState;

const CATALOGUE: [(&str, &str); 3] = [
    ("Welcome Bonus 100%", "WELCOME100"),
    ("Free Spin Reward", "FREESPIN20"),
    ("Loyalty Credit", "LOYALTY-VAL"),
];

/// `GET /bonus/list`: bonus codes FT may offer.
pub(super) async fn list_bonuses(state: State<AppState>, _auth: Principal) -> Json<BonusListResponse> {
    let response = BonusListResponse {
        data: CATALOGUE
            .iter()
            .map(|(text, value)| BonusOption {
                text: text.to_string(),
                value: value.to_string(),
            })
            .collect(),
        success: true,
        errors: Vec::new(),
    };

    state.activity.inbound(
        "GET",
        "/bonus/list",
        200,
        json!({}),
        serde_json::to_value(&response).unwrap_or(Value::Null),
    );
    Json(response)
}
