use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shift status label as reported by the exchange.
///
/// Labels are opaque; the only meaning attached here is which of them end polling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShiftStatus {
    Waiting,
    Pending,
    Processing,
    Settling,
    Settled,
    Refund,
    Refunding,
    Refunded,
    Expired,
    Other(String),
}

impl ShiftStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ShiftStatus::Waiting => "waiting",
            ShiftStatus::Pending => "pending",
            ShiftStatus::Processing => "processing",
            ShiftStatus::Settling => "settling",
            ShiftStatus::Settled => "settled",
            ShiftStatus::Refund => "refund",
            ShiftStatus::Refunding => "refunding",
            ShiftStatus::Refunded => "refunded",
            ShiftStatus::Expired => "expired",
            ShiftStatus::Other(s) => s.as_str(),
        }
    }

    /// `settled`, `refunded` and `expired` end a shift's life
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ShiftStatus::Settled | ShiftStatus::Refunded | ShiftStatus::Expired
        )
    }
}

impl From<String> for ShiftStatus {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "waiting" => ShiftStatus::Waiting,
            "pending" => ShiftStatus::Pending,
            "processing" => ShiftStatus::Processing,
            "settling" => ShiftStatus::Settling,
            "settled" => ShiftStatus::Settled,
            "refund" => ShiftStatus::Refund,
            "refunding" => ShiftStatus::Refunding,
            "refunded" => ShiftStatus::Refunded,
            "expired" => ShiftStatus::Expired,
            _ => ShiftStatus::Other(value),
        }
    }
}

impl From<ShiftStatus> for String {
    fn from(value: ShiftStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shift (conversion order) as returned by the exchange
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,
    pub deposit_address: String,
    #[serde(default)]
    pub deposit_amount: Option<String>,
    pub deposit_coin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settle_coin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settle_network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settle_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settle_amount: Option<String>,
    pub status: ShiftStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settle_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Body of `POST /api/shift/fixed`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FixedShiftRequest {
    #[serde(default)]
    pub quote_id: String,
    #[serde(default)]
    pub settle_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_address: Option<String>,
}
