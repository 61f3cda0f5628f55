use axum::{
    Json,
    extract::{Path, State},
};
use igp_sdk::objects::StatusResponse;
use serde::Deserialize;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::api::extractors::{ApiJson, TrustedAuth};
use crate::api::required_str;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub(super) struct RawEventRequest {
    user_id: Option<String>,
    #[serde(default)]
    payload: Value,
}

/// `POST /events/{event_type}`: push an arbitrary event through the
/// translator, as if a domain action had produced it.
///
/// Unknown event types are skipped, not rejected.
pub(super) async fn push_event(
    state: State<AppState>,
    _auth: TrustedAuth,
    Path(event_type): Path<String>,
    ApiJson(body): ApiJson<RawEventRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let user_id = required_str("user_id", body.user_id)?;
    let payload = match body.payload {
        Value::Null => Value::Object(Default::default()),
        payload => payload,
    };

    let record = state
        .telemetry
        .emit_raw(&user_id, &event_type, &payload)
        .await?;
    tracing::info!(%event_type, %user_id, status = %record.status, "Raw event pushed");

    Ok(Json(StatusResponse {
        status: record.status.to_string(),
        message: record.note.clone(),
        origin: state.origin(),
        telemetry: vec![record],
    }))
}
