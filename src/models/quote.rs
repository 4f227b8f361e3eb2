use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How long the exchange honours a fixed-rate quote
pub const QUOTE_VALIDITY_MINUTES: i64 = 15;

/// Fixed-rate quote returned by the exchange
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    pub deposit_coin: String,
    pub deposit_network: String,
    pub settle_coin: String,
    pub settle_network: String,
    pub deposit_amount: String,
    pub settle_amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliate_id: Option<String>,
}

impl Quote {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Deposit amount as sent by the widget: either `"0.05"` or `0.05`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AmountInput {
    Text(String),
    Number(serde_json::Number),
}

impl AmountInput {
    pub fn as_string(&self) -> String {
        match self {
            AmountInput::Text(s) => s.trim().to_string(),
            AmountInput::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        AmountInput::Text(value.to_string())
    }
}

/// Body of `POST /api/quote`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(default)]
    pub deposit_coin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_network: Option<String>,
    #[serde(default)]
    pub settle_coin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settle_network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_amount: Option<AmountInput>,
}

/// Query of the older `GET /api/quote?depositAsset=..&settleAsset=..&amount=..`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyQuoteQuery {
    #[serde(default)]
    pub deposit_asset: String,
    #[serde(default)]
    pub settle_asset: String,
    #[serde(default)]
    pub amount: String,
}

impl From<LegacyQuoteQuery> for QuoteRequest {
    fn from(q: LegacyQuoteQuery) -> Self {
        Self {
            deposit_coin: q.deposit_asset,
            deposit_network: None,
            settle_coin: q.settle_asset,
            settle_network: None,
            deposit_amount: Some(AmountInput::Text(q.amount)),
        }
    }
}
