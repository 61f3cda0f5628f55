//! Telemetry processors.
//!
//! - `TelemetryEmitter`: called by handlers; translates events and either
//!   dispatches them inline (mock mode) or queues them.
//! - `TelemetryWorker`: receives queued `OutboundRequest`s and hands them
//!   to the dispatcher.
//! - `TelemetryDispatcher`: one HTTP call per event, recorded in the
//!   activity log.

pub mod emitter;
pub mod telemetry_dispatcher;

pub use emitter::{TelemetryEmitter, balance_event};
pub use telemetry_dispatcher::{
    DispatchResult, MOCK_NOTE, TelemetryDispatcher, TelemetryWorker, UpstreamDispatchFailure,
};
