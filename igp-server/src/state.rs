//! Application state shared across all request handlers.

use igp_core::activity::ActivityLog;
use igp_core::config::SharedConfig;
use igp_core::entities::UserStore;
use igp_core::events::{TelemetryReceiver, telemetry_channel};
use igp_core::ledger::WalletLedger;
use igp_core::processors::{TelemetryDispatcher, TelemetryEmitter};
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Player accounts.
    pub store: Arc<dyn UserStore>,
    /// Balance movements, on top of `store`.
    pub ledger: WalletLedger,
    /// Outbound FT events.
    pub telemetry: TelemetryEmitter,
    /// Recent inbound and outbound integration traffic.
    pub activity: ActivityLog,
    /// Runtime configuration (can be reloaded via SIGHUP).
    pub config: SharedConfig,
}

impl AppState {
    /// Create the state and the receiving end of the telemetry queue, which
    /// the caller hands to a [`TelemetryWorker`](igp_core::processors::TelemetryWorker).
    pub fn new(
        store: Arc<dyn UserStore>,
        config: SharedConfig,
        activity: ActivityLog,
    ) -> (Self, TelemetryReceiver) {
        let (telemetry_tx, telemetry_rx) = telemetry_channel();
        let dispatcher = TelemetryDispatcher::new(config.telemetry.clone(), activity.clone());
        let state = Self {
            ledger: WalletLedger::new(store.clone()),
            store,
            telemetry: TelemetryEmitter::new(dispatcher, telemetry_tx),
            activity,
            config,
        };
        (state, telemetry_rx)
    }

    /// Current platform origin tag.
    pub fn origin(&self) -> String {
        self.config.telemetry.current().origin.clone()
    }
}
