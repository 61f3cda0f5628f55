//! Delivery of shaped telemetry events to the FT integration.
//!
//! [`TelemetryDispatcher`] makes exactly one HTTP call per event, or none at
//! all in mock mode. Failures are absorbed into the [`DispatchResult`]; the
//! caller never sees an error and nothing is retried. Every attempt is
//! written to the [`ActivityLog`].
//!
//! [`TelemetryWorker`] drains the telemetry queue in the background.

use crate::activity::ActivityLog;
use crate::config::{ConfigStore, TelemetryConfig, mock_url};
use crate::events::{EventKind, OutboundRequest, TelemetryReceiver};
use igp_sdk::objects::{ActivityDirection, DispatchStatus, TelemetryRecord};
use igp_sdk::upstream::{FT_API_KEY_HEADER, HttpMethod};
use kanau::processor::Processor;
use serde_json::{Value, json};
use std::convert::Infallible;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Note attached to results produced without an API key.
pub const MOCK_NOTE: &str = "no FT API key configured";

/// Why an upstream call did not succeed.
#[derive(Debug, Error)]
pub enum UpstreamDispatchFailure {
    #[error("upstream responded with status {status}")]
    Status { status: u16, body: Value },

    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl UpstreamDispatchFailure {
    /// Status recorded for the failure: the upstream one, or 500 when the
    /// request never got an answer.
    pub fn status(&self) -> u16 {
        match self {
            UpstreamDispatchFailure::Status { status, .. } => *status,
            UpstreamDispatchFailure::Transport(e) => {
                e.status().map(|s| s.as_u16()).unwrap_or(500)
            }
        }
    }
}

/// Outcome of one dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResult {
    pub kind: EventKind,
    pub status: DispatchStatus,
    pub http_status: u16,
    pub method: HttpMethod,
    pub url: String,
    pub request: Value,
    pub response: Option<Value>,
    pub error: Option<String>,
    pub note: Option<String>,
}

impl DispatchResult {
    pub fn into_record(self) -> TelemetryRecord {
        TelemetryRecord {
            event_type: self.kind.to_string(),
            status: self.status,
            http_status: Some(self.http_status),
            method: Some(self.method.to_string()),
            url: Some(self.url),
            request: Some(self.request),
            response: self.response,
            error: self.error,
            note: self.note,
        }
    }
}

/// Sends [`OutboundRequest`]s upstream.
#[derive(Clone)]
pub struct TelemetryDispatcher {
    config: ConfigStore<TelemetryConfig>,
    activity: ActivityLog,
    http_client: reqwest::Client,
}

impl TelemetryDispatcher {
    pub fn new(config: ConfigStore<TelemetryConfig>, activity: ActivityLog) -> Self {
        Self {
            config,
            activity,
            http_client: reqwest::Client::builder()
                .user_agent(concat!("igp/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    pub fn config(&self) -> &ConfigStore<TelemetryConfig> {
        &self.config
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    async fn send(
        &self,
        config: &TelemetryConfig,
        url: &str,
        request: &OutboundRequest,
    ) -> Result<(u16, Value), UpstreamDispatchFailure> {
        let api_key = config.api_key.as_deref().unwrap_or_default();
        let builder = match request.target.method {
            HttpMethod::Post => self.http_client.post(url),
            HttpMethod::Put => self.http_client.put(url),
        };

        let response = builder
            .header(FT_API_KEY_HEADER, api_key)
            .timeout(config.timeout)
            .json(&request.body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        if status.is_success() {
            Ok((status.as_u16(), body))
        } else {
            Err(UpstreamDispatchFailure::Status {
                status: status.as_u16(),
                body,
            })
        }
    }

    fn log_activity(&self, result: &DispatchResult) {
        let response = match (&result.response, &result.error) {
            (Some(response), _) => response.clone(),
            (None, Some(error)) => json!({ "error": error }),
            (None, None) => Value::Null,
        };
        self.activity.record(
            ActivityDirection::Outbound,
            result.method.as_str(),
            &result.url,
            result.http_status,
            result.request.clone(),
            response,
        );
    }
}

impl Processor<OutboundRequest> for TelemetryDispatcher {
    type Output = DispatchResult;
    type Error = Infallible;
    #[tracing::instrument(skip_all, name = "FT:Dispatch", fields(event = %request.kind))]
    async fn process(&self, request: OutboundRequest) -> Result<DispatchResult, Infallible> {
        let config = self.config.current();
        let request_body = request.body.to_value();

        let result = if config.is_mock() {
            debug!(path = request.target.path, "Mock mode, not sending");
            DispatchResult {
                kind: request.kind,
                status: DispatchStatus::Mocked,
                http_status: 200,
                method: request.target.method,
                url: mock_url(request.target.path),
                request: request_body,
                response: None,
                error: None,
                note: Some(MOCK_NOTE.to_string()),
            }
        } else {
            let url = config.endpoint_url(request.target.path);
            match self.send(&config, &url, &request).await {
                Ok((status, response)) => {
                    info!(url = %url, status, "Telemetry event delivered");
                    DispatchResult {
                        kind: request.kind,
                        status: DispatchStatus::Sent,
                        http_status: status,
                        method: request.target.method,
                        url,
                        request: request_body,
                        response: Some(response),
                        error: None,
                        note: None,
                    }
                }
                Err(e) => {
                    let status = e.status();
                    warn!(url = %url, status, error = %e, "Telemetry delivery failed");
                    let response = match e {
                        UpstreamDispatchFailure::Status { ref body, .. } => Some(body.clone()),
                        UpstreamDispatchFailure::Transport(_) => None,
                    };
                    DispatchResult {
                        kind: request.kind,
                        status: DispatchStatus::Failed,
                        http_status: status,
                        method: request.target.method,
                        url,
                        request: request_body,
                        response,
                        error: Some(e.to_string()),
                        note: None,
                    }
                }
            }
        };

        self.log_activity(&result);
        Ok(result)
    }
}

/// Background consumer of the telemetry queue.
pub struct TelemetryWorker {
    dispatcher: TelemetryDispatcher,
    telemetry_rx: TelemetryReceiver,
    shutdown_rx: watch::Receiver<bool>,
}

impl TelemetryWorker {
    pub fn new(
        dispatcher: TelemetryDispatcher,
        telemetry_rx: TelemetryReceiver,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            dispatcher,
            telemetry_rx,
            shutdown_rx,
        }
    }

    /// Dispatch queued events one at a time until shutdown or until every
    /// sender is gone.
    pub async fn run(mut self) {
        info!("TelemetryWorker started");

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown_rx.changed() => {
                    if *self.shutdown_rx.borrow() {
                        info!("TelemetryWorker received shutdown signal");
                        break;
                    }
                }

                Some(request) = self.telemetry_rx.recv() => {
                    debug!(event = %request.kind, user_id = request.body.user_id(), "Dispatching queued event");
                    let Ok(result) = self.dispatcher.process(request).await;
                    debug!(status = %result.status, "Queued event processed");
                }

                else => {
                    info!("Telemetry channel closed");
                    break;
                }
            }
        }

        info!("TelemetryWorker shutdown complete");
    }
}
