//! Telemetry queue between request handlers and the background worker.

use super::types::OutboundRequest;
use tokio::sync::mpsc;

/// Queue depth. Events beyond it are dropped rather than awaited.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

pub type TelemetrySender = mpsc::Sender<OutboundRequest>;
pub type TelemetryReceiver = mpsc::Receiver<OutboundRequest>;

pub fn telemetry_channel() -> (TelemetrySender, TelemetryReceiver) {
    telemetry_channel_with_capacity(DEFAULT_CHANNEL_BUFFER)
}

pub fn telemetry_channel_with_capacity(capacity: usize) -> (TelemetrySender, TelemetryReceiver) {
    mpsc::channel(capacity.max(1))
}
