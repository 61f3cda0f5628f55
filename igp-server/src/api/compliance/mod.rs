//! Player profile, block and consent endpoints queried by FT.
//!
//! Every FT-facing read is recorded in the activity log as inbound traffic.

use axum::{Router, routing::get};

use crate::state::AppState;

mod blocks;
mod consents;
mod user_details;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/userdetails/{user_id}", get(user_details::user_details))
        .route(
            "/userblocks/{user_id}",
            get(blocks::get_blocks).put(blocks::put_blocks),
        )
        .route(
            "/userconsents/{user_id}",
            get(consents::get_consents)
                .post(consents::post_consents)
                .put(consents::put_consents),
        )
}
