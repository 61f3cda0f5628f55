#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

pub mod activity;
pub mod config;
pub mod entities;
pub mod events;
pub mod framework;
pub mod ledger;
pub mod processors;
pub mod translator;
