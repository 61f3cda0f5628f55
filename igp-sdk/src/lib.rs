//! Wire types for the iGaming platform simulator.
//!
//! - [`objects`]: request and response bodies of the platform REST API.
//! - [`upstream`]: request bodies sent to the FT marketing integration.
//! - [`widget_token`]: HS256 tokens for the FT on-site notification widget.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod objects;
pub mod upstream;
pub mod widget_token;

/// Header carrying the trusted-server API key (game provider, FT callbacks).
pub const API_KEY_HEADER: &str = "X-API-Key";
