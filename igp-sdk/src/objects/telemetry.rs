//! Telemetry and activity types exposed to the dashboard.

use serde::{Deserialize, Serialize};

/// What happened to one outbound FT event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    /// No API key configured; nothing left the process.
    Mocked,
    /// Handed to the background worker.
    Queued,
    /// Upstream answered with a 2xx status.
    Sent,
    /// Upstream answered with an error, or the transport failed.
    Failed,
    /// The worker queue was full or closed.
    Dropped,
    /// Unknown event type or a payload that could not be shaped.
    Skipped,
}

impl std::fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchStatus::Mocked => write!(f, "mocked"),
            DispatchStatus::Queued => write!(f, "queued"),
            DispatchStatus::Sent => write!(f, "sent"),
            DispatchStatus::Failed => write!(f, "failed"),
            DispatchStatus::Dropped => write!(f, "dropped"),
            DispatchStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Per-event telemetry summary embedded in API responses as `_telemetry`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub event_type: String,
    pub status: DispatchStatus,
    /// HTTP-like status code. `None` while queued.
    pub http_status: Option<u16>,
    pub method: Option<String>,
    pub url: Option<String>,
    /// The shaped request body.
    pub request: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Whether an activity was received by the platform or sent by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityDirection {
    Inbound,
    Outbound,
}

/// One entry of the diagnostic activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: u64,
    pub direction: ActivityDirection,
    pub method: String,
    pub endpoint: String,
    pub status: u16,
    pub request: serde_json::Value,
    pub response: serde_json::Value,
    /// RFC3339 timestamp.
    pub timestamp: String,
}
