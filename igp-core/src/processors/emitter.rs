//! Caller-side telemetry entry point used by request handlers.

use super::telemetry_dispatcher::TelemetryDispatcher;
use crate::entities::User;
use crate::events::{BalanceSnapshot, OutboundRequest, TelemetryEvent, TelemetrySender};
use crate::translator::{TranslateContext, TranslateError, parse_event, translate};
use igp_sdk::objects::{DispatchStatus, TelemetryRecord};
use kanau::processor::Processor;
use serde_json::Value;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

/// Translates events right away, then delivers them without blocking.
///
/// In mock mode the dispatcher does no I/O, so events are dispatched inline
/// and the caller gets the final result. Otherwise they are queued for the
/// [`TelemetryWorker`](super::TelemetryWorker) and the caller gets a
/// `queued` (or `dropped`) record.
#[derive(Clone)]
pub struct TelemetryEmitter {
    dispatcher: TelemetryDispatcher,
    queue: TelemetrySender,
}

impl TelemetryEmitter {
    pub fn new(dispatcher: TelemetryDispatcher, queue: TelemetrySender) -> Self {
        Self { dispatcher, queue }
    }

    pub fn dispatcher(&self) -> &TelemetryDispatcher {
        &self.dispatcher
    }

    /// Current platform origin tag.
    pub fn origin(&self) -> String {
        self.dispatcher.config().current().origin.clone()
    }

    /// Emit the events of one domain action, in order.
    pub async fn emit(
        &self,
        user_id: &str,
        events: impl IntoIterator<Item = TelemetryEvent>,
    ) -> Vec<TelemetryRecord> {
        let origin = self.origin();
        let ctx = TranslateContext::capture(origin);

        let mut records = Vec::new();
        for event in events {
            let kind = event.kind();
            let record = match translate(user_id, &event, &ctx) {
                Ok(request) => self.deliver(request).await,
                Err(e) => {
                    warn!(event = %kind, user_id, error = %e, "Telemetry event could not be shaped");
                    skipped(kind.as_str(), Some(e.to_string()), None)
                }
            };
            records.push(record);
        }
        records
    }

    /// Emit an untyped event. Unknown event types are skipped; malformed
    /// payloads are an error.
    pub async fn emit_raw(
        &self,
        user_id: &str,
        event_type: &str,
        payload: &Value,
    ) -> Result<TelemetryRecord, TranslateError> {
        match parse_event(event_type, payload) {
            Ok(event) => {
                let ctx = TranslateContext::capture(self.origin());
                let request = translate(user_id, &event, &ctx)?;
                Ok(self.deliver(request).await)
            }
            Err(TranslateError::UnknownEventType(event_type)) => {
                warn!(event_type = %event_type, user_id, "Unknown telemetry event type, not sending");
                Ok(skipped(
                    &event_type,
                    None,
                    Some("unknown event type".to_string()),
                ))
            }
            Err(e) => Err(e),
        }
    }

    async fn deliver(&self, request: OutboundRequest) -> TelemetryRecord {
        let config = self.dispatcher.config().current();
        if config.is_mock() {
            let Ok(result) = self.dispatcher.process(request).await;
            return result.into_record();
        }

        let pending = TelemetryRecord {
            event_type: request.kind.to_string(),
            status: DispatchStatus::Queued,
            http_status: None,
            method: Some(request.target.method.to_string()),
            url: Some(config.endpoint_url(request.target.path)),
            request: Some(request.body.to_value()),
            response: None,
            error: None,
            note: None,
        };

        match self.queue.try_send(request) {
            Ok(()) => pending,
            Err(e) => {
                let reason = match e {
                    TrySendError::Full(_) => "telemetry queue full",
                    TrySendError::Closed(_) => "telemetry queue closed",
                };
                warn!(event = %pending.event_type, reason, "Dropping telemetry event");
                TelemetryRecord {
                    status: DispatchStatus::Dropped,
                    error: Some(reason.to_string()),
                    ..pending
                }
            }
        }
    }
}

fn skipped(event_type: &str, error: Option<String>, note: Option<String>) -> TelemetryRecord {
    TelemetryRecord {
        event_type: event_type.to_string(),
        status: DispatchStatus::Skipped,
        http_status: None,
        method: None,
        url: None,
        request: None,
        response: None,
        error,
        note,
    }
}

/// Shorthand for the `balance` event that follows every wallet mutation.
pub fn balance_event(user: &User) -> TelemetryEvent {
    TelemetryEvent::Balance(BalanceSnapshot {
        real: user.real_balance,
        bonus: user.bonus_balance,
        currency: Some(user.currency.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityLog;
    use crate::config::{ConfigStore, TelemetryConfig};
    use crate::entities::demo_user;
    use crate::events::{
        EventKind, TelemetryReceiver, telemetry_channel, telemetry_channel_with_capacity,
    };
    use serde_json::json;

    fn emitter(
        config: TelemetryConfig,
        capacity: usize,
    ) -> (TelemetryEmitter, TelemetryReceiver, ActivityLog) {
        let activity = ActivityLog::new(20);
        let dispatcher = TelemetryDispatcher::new(ConfigStore::new(config), activity.clone());
        let (tx, rx) = telemetry_channel_with_capacity(capacity);
        (TelemetryEmitter::new(dispatcher, tx), rx, activity)
    }

    fn live_config() -> TelemetryConfig {
        TelemetryConfig {
            base_url: "http://127.0.0.1:9/".to_string(),
            api_key: Some("ft-key".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_mock_mode_dispatches_inline() {
        let (emitter, _rx, activity) = emitter(TelemetryConfig::default(), 4);
        let user = demo_user();

        let records = emitter
            .emit(&user.id, [TelemetryEvent::Logout, balance_event(&user)])
            .await;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].event_type, "logout");
        assert_eq!(records[1].event_type, "balance");
        for record in &records {
            assert_eq!(record.status, DispatchStatus::Mocked);
            assert_eq!(record.http_status, Some(200));
        }
        assert_eq!(activity.len(), 2);
    }

    #[tokio::test]
    async fn test_live_mode_queues_without_sending() {
        let (emitter, mut rx, activity) = emitter(live_config(), 4);

        let records = emitter.emit("test-user", [TelemetryEvent::UserUpdate]).await;
        assert_eq!(records[0].status, DispatchStatus::Queued);
        assert_eq!(records[0].http_status, None);
        assert_eq!(
            records[0].url.as_deref(),
            Some("http://127.0.0.1:9/v2/integration/user")
        );
        assert_eq!(records[0].method.as_deref(), Some("PUT"));

        let queued = rx.try_recv().unwrap();
        assert_eq!(queued.kind, EventKind::UserUpdate);
        assert!(activity.is_empty());
    }

    #[tokio::test]
    async fn test_full_queue_drops() {
        let (emitter, _rx, _) = emitter(live_config(), 1);

        let records = emitter
            .emit("test-user", [TelemetryEvent::Logout, TelemetryEvent::Logout])
            .await;
        assert_eq!(records[0].status, DispatchStatus::Queued);
        assert_eq!(records[1].status, DispatchStatus::Dropped);
        assert_eq!(records[1].error.as_deref(), Some("telemetry queue full"));
    }

    #[tokio::test]
    async fn test_closed_queue_drops() {
        let (emitter, rx, _) = emitter(live_config(), 4);
        drop(rx);
        let records = emitter.emit("test-user", [TelemetryEvent::Logout]).await;
        assert_eq!(records[0].status, DispatchStatus::Dropped);
    }

    #[tokio::test]
    async fn test_raw_events() {
        let activity = ActivityLog::new(5);
        let dispatcher =
            TelemetryDispatcher::new(ConfigStore::new(TelemetryConfig::default()), activity);
        let (tx, _rx) = telemetry_channel();
        let emitter = TelemetryEmitter::new(dispatcher, tx);

        let record = emitter
            .emit_raw("test-user", "deposit", &json!({"amount": "25"}))
            .await
            .unwrap();
        assert_eq!(record.status, DispatchStatus::Mocked);
        assert_eq!(record.request.unwrap()["amount"], 25.0);

        let unknown = emitter
            .emit_raw("test-user", "jackpot", &json!({}))
            .await
            .unwrap();
        assert_eq!(unknown.status, DispatchStatus::Skipped);
        assert_eq!(unknown.event_type, "jackpot");

        assert!(matches!(
            emitter
                .emit_raw("test-user", "bet", &json!({"amount": "abc"}))
                .await,
            Err(TranslateError::InvalidPayload(_))
        ));
    }

    #[tokio::test]
    async fn test_origin_follows_reload() {
        let (emitter, _rx, _) = emitter(TelemetryConfig::default(), 1);
        assert_eq!(emitter.origin(), "igaming-poc");

        emitter.dispatcher.config().replace(TelemetryConfig {
            origin: "brand-x".to_string(),
            ..TelemetryConfig::default()
        });
        let records = emitter.emit("test-user", [TelemetryEvent::Logout]).await;
        assert_eq!(records[0].request.as_ref().unwrap()["origin"], "brand-x");
    }
}
