//! Debug endpoints for the dashboard's integration log.

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

mod activities;
mod events;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events/{event_type}", post(events::push_event))
        .route("/activities", get(activities::list_activities))
}
