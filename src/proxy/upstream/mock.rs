// Mock exchange: deterministic placeholder answers, no network access

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::str::FromStr;

use super::Exchange;
use crate::error::{AppError, AppResult};
use crate::models::{ShiftStatus, QUOTE_VALIDITY_MINUTES};
use crate::proxy::config::ProxyMode;
use crate::proxy::mappers::{UpstreamFixedShiftRequest, UpstreamQuoteRequest};

pub const MOCK_RATE: Decimal = dec!(15.42);
/// 0.5% fee kept by the exchange
pub const MOCK_FEE_FACTOR: Decimal = dec!(0.995);
pub const MOCK_DEPOSIT_ADDRESS: &str = "mock-deposit-address";
const SETTLE_DECIMALS: u32 = 8;

#[derive(Debug, Default, Clone)]
pub struct MockExchange;

impl MockExchange {
    pub fn new() -> Self {
        Self
    }
}

/// `amount × rate × fee`, truncated to 8 decimals, trailing zeros dropped
pub fn mock_settle_amount(deposit_amount: Decimal) -> Decimal {
    (deposit_amount * MOCK_RATE * MOCK_FEE_FACTOR)
        .round_dp_with_strategy(SETTLE_DECIMALS, RoundingStrategy::ToZero)
        .normalize()
}

/// Positive decimal or an error the handler turns into a 400
pub fn parse_deposit_amount(raw: &str) -> AppResult<Decimal> {
    let amount = Decimal::from_str(raw.trim())
        .map_err(|_| AppError::InvalidRequest(format!("Invalid depositAmount: '{}'", raw)))?;
    if amount <= Decimal::ZERO {
        return Err(AppError::InvalidRequest(format!(
            "depositAmount must be positive, got {}",
            raw
        )));
    }
    Ok(amount)
}

fn mock_id(kind: &str) -> String {
    format!("mock-{}-{}", kind, uuid::Uuid::new_v4().simple())
}

fn mock_coins() -> Value {
    json!([
        {"coin": "BTC", "name": "Bitcoin", "networks": ["bitcoin"], "mainnet": "bitcoin"},
        {"coin": "ETH", "name": "Ethereum", "networks": ["ethereum", "arbitrum", "optimism", "base"], "mainnet": "ethereum"},
        {"coin": "USDT", "name": "Tether", "networks": ["ethereum", "tron", "bsc", "polygon"], "mainnet": "ethereum"},
        {"coin": "USDC", "name": "USD Coin", "networks": ["ethereum", "solana", "base", "polygon"], "mainnet": "ethereum"},
        {"coin": "SOL", "name": "Solana", "networks": ["solana"], "mainnet": "solana"},
        {"coin": "LTC", "name": "Litecoin", "networks": ["litecoin"], "mainnet": "litecoin"}
    ])
}

#[async_trait]
impl Exchange for MockExchange {
    fn mode(&self) -> ProxyMode {
        ProxyMode::Mock
    }

    async fn list_coins(&self, _user_ip: &str) -> AppResult<Value> {
        Ok(mock_coins())
    }

    async fn create_quote(&self, req: &UpstreamQuoteRequest, _user_ip: &str) -> AppResult<Value> {
        let amount = parse_deposit_amount(&req.deposit_amount)?;
        let now = Utc::now();

        let mut quote = json!({
            "id": mock_id("quote"),
            "createdAt": now,
            "depositCoin": req.deposit_coin,
            "depositNetwork": req.deposit_network,
            "settleCoin": req.settle_coin,
            "settleNetwork": req.settle_network,
            "expiresAt": now + Duration::minutes(QUOTE_VALIDITY_MINUTES),
            "depositAmount": req.deposit_amount,
            "settleAmount": mock_settle_amount(amount).to_string(),
            "rate": MOCK_RATE.to_string(),
        });
        if let Some(affiliate_id) = &req.affiliate_id {
            quote["affiliateId"] = json!(affiliate_id);
        }
        Ok(quote)
    }

    async fn create_fixed_shift(
        &self,
        req: &UpstreamFixedShiftRequest,
        _user_ip: &str,
    ) -> AppResult<Value> {
        if req.quote_id.is_empty() {
            return Err(AppError::InvalidRequest("quoteId is required".to_string()));
        }
        if req.settle_address.is_empty() {
            return Err(AppError::InvalidRequest(
                "settleAddress is required".to_string(),
            ));
        }

        // Stateless: the quote's coins and amounts are not remembered
        let mut shift = json!({
            "id": mock_id("shift"),
            "quoteId": req.quote_id,
            "type": "fixed",
            "depositAddress": MOCK_DEPOSIT_ADDRESS,
            "depositCoin": "btc",
            "depositNetwork": "bitcoin",
            "depositAmount": "0",
            "settleAddress": req.settle_address,
            "status": ShiftStatus::Waiting,
            "expiresAt": Utc::now() + Duration::minutes(QUOTE_VALIDITY_MINUTES),
        });
        if let Some(refund) = &req.refund_address {
            shift["refundAddress"] = json!(refund);
        }
        Ok(shift)
    }

    async fn get_shift(&self, shift_id: &str, _user_ip: &str) -> AppResult<Value> {
        if shift_id.trim().is_empty() {
            return Err(AppError::NotFound("Shift not found".to_string()));
        }
        Ok(json!({
            "id": shift_id,
            "depositAddress": MOCK_DEPOSIT_ADDRESS,
            "depositCoin": "btc",
            "depositNetwork": "bitcoin",
            "depositAmount": "0",
            "status": ShiftStatus::Waiting,
        }))
    }
}
