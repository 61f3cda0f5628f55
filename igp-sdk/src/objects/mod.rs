pub mod compliance;
pub mod player;
pub mod telemetry;
pub mod wallet;

pub use compliance::{Block, BlocksPayload, Consent, ConsentsPayload, UserDetails};
pub use player::{BalanceResponse, BonusListResponse, BonusOption, ProfileUpdate, StatusResponse, TokenResponse};
pub use telemetry::{ActivityDirection, ActivityRecord, DispatchStatus, TelemetryRecord};
pub use wallet::{
    BonusCreditRequest, BonusFundsRequest, DepositRequest, DepositResponse, LedgerResponse,
    WagerRequest,
};

use serde::{Deserialize, Serialize};

/// Structured error payload returned by every failing platform endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable kind, e.g. `insufficient_funds`.
    pub error: String,
    /// Human readable message.
    pub message: String,
}
