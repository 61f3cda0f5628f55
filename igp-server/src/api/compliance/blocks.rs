use axum::{
    Json,
    extract::{Path, State},
};
use igp_core::events::TelemetryEvent;
use igp_sdk::objects::{BlocksPayload, StatusResponse};
use serde_json::{Value, json};

use crate::api::extractors::{ApiJson, PlayerAuth, Principal};
use crate::state::AppState;

/// `GET /userblocks/{user_id}`: no PoC player is ever blocked.
pub(super) async fn get_blocks(
    state: State<AppState>,
    _auth: Principal,
    Path(user_id): Path<String>,
) -> Json<BlocksPayload> {
    let blocks = BlocksPayload::inactive();
    state.activity.inbound(
        "GET",
        &format!("/userblocks/{user_id}"),
        200,
        json!({}),
        serde_json::to_value(&blocks).unwrap_or(Value::Null),
    );
    Json(blocks)
}

/// `PUT /userblocks/{user_id}`: forward simulated blocks to FT.
pub(super) async fn put_blocks(
    state: State<AppState>,
    PlayerAuth(player): PlayerAuth,
    Path(user_id): Path<String>,
    ApiJson(body): ApiJson<BlocksPayload>,
) -> Json<StatusResponse> {
    tracing::info!(caller = %player.id, %user_id, blocks = body.blocks.len(), "Blocks submitted");
    let telemetry = state
        .telemetry
        .emit(&user_id, [TelemetryEvent::Blocks(body.blocks)])
        .await;

    Json(StatusResponse {
        status: "success".to_string(),
        message: None,
        origin: state.origin(),
        telemetry,
    })
}
