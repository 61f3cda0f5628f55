//! Player session and profile handlers, called by the dashboard.

use axum::{
    Router,
    http::{HeaderMap, header::USER_AGENT},
    routing::{get, post},
};
use igp_sdk::objects::{StatusResponse, TelemetryRecord};

use crate::state::AppState;

mod authenticate;
mod ft_token;
mod logout;
mod registration;
mod update_profile;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/authenticate", post(authenticate::authenticate))
        .route("/registration", post(registration::registration))
        .route("/logout", post(logout::logout))
        .route("/user/update", post(update_profile::update_profile))
        .route("/ft-token", get(ft_token::ft_token))
}

fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn pushed(message: &str, origin: String, telemetry: Vec<TelemetryRecord>) -> StatusResponse {
    StatusResponse {
        status: "success".to_string(),
        message: Some(message.to_string()),
        origin,
        telemetry,
    }
}
