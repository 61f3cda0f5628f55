//! Telemetry events.
//!
//! # Event flow
//!
//! 1. A handler commits a domain action and builds one or more
//!    [`TelemetryEvent`]s.
//! 2. The translator shapes each into an [`OutboundRequest`].
//! 3. The emitter either dispatches it inline (mock mode) or pushes it onto
//!    the telemetry queue for the worker.
//!
//! Delivery is at most once; nothing is persisted.

pub mod channels;
pub mod types;

pub use channels::{
    DEFAULT_CHANNEL_BUFFER, TelemetryReceiver, TelemetrySender, telemetry_channel,
    telemetry_channel_with_capacity,
};
pub use types::{
    BalanceSnapshot, BonusEvent, CasinoEvent, EventKind, LoginEvent, OutboundRequest,
    PaymentEvent, RegistrationEvent, TelemetryEvent, UnknownEventKind,
};
