use axum::{Json, extract::State};
use igp_sdk::objects::ActivityRecord;

use crate::state::AppState;

/// `GET /activities`: recent integration traffic, newest first.
pub(super) async fn list_activities(state: State<AppState>) -> Json<Vec<ActivityRecord>> {
    Json(state.activity.snapshot())
}
