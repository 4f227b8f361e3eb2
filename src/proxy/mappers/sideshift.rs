// Client request → exchange request mapping
use serde::Serialize;

use crate::models::{FixedShiftRequest, QuoteRequest};
use crate::proxy::network_resolver::NetworkResolver;

/// Body of the exchange's `POST /quotes`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamQuoteRequest {
    pub deposit_coin: String,
    pub deposit_network: String,
    pub settle_coin: String,
    pub settle_network: String,
    pub deposit_amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_id: Option<String>,
}

/// Body of the exchange's `POST /shifts/fixed`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamFixedShiftRequest {
    pub quote_id: String,
    pub settle_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_address: Option<String>,
}

/// Lower-case coins, keep caller networks, fill missing ones from the resolver
pub fn map_quote_request(
    req: &QuoteRequest,
    resolver: &NetworkResolver,
    affiliate_id: Option<&str>,
) -> UpstreamQuoteRequest {
    let deposit_coin = req.deposit_coin.trim().to_lowercase();
    let settle_coin = req.settle_coin.trim().to_lowercase();

    UpstreamQuoteRequest {
        deposit_network: resolver
            .resolve_or(&deposit_coin, req.deposit_network.as_deref())
            .to_string(),
        settle_network: resolver
            .resolve_or(&settle_coin, req.settle_network.as_deref())
            .to_string(),
        deposit_coin,
        settle_coin,
        deposit_amount: req
            .deposit_amount
            .as_ref()
            .map(|a| a.as_string())
            .unwrap_or_default(),
        affiliate_id: affiliate_id.map(str::to_string),
    }
}

/// Refund address only travels when the caller gave a non-empty one
pub fn map_fixed_shift_request(
    req: &FixedShiftRequest,
    affiliate_id: Option<&str>,
) -> UpstreamFixedShiftRequest {
    UpstreamFixedShiftRequest {
        quote_id: req.quote_id.trim().to_string(),
        settle_address: req.settle_address.trim().to_string(),
        affiliate_id: affiliate_id.map(str::to_string),
        refund_address: req
            .refund_address
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AmountInput;
    use serde_json::json;

    #[test]
    fn test_quote_mapping_lowercases_and_keeps_networks() {
        let req = QuoteRequest {
            deposit_coin: "BTC".to_string(),
            deposit_network: Some("bitcoin".to_string()),
            settle_coin: "USDT".to_string(),
            settle_network: Some("tron".to_string()),
            deposit_amount: Some(AmountInput::from("0.05")),
        };

        let mapped = map_quote_request(&req, &NetworkResolver::builtin(), Some("aff"));
        assert_eq!(
            json!(mapped),
            json!({
                "depositCoin": "btc",
                "depositNetwork": "bitcoin",
                "settleCoin": "usdt",
                "settleNetwork": "tron",
                "depositAmount": "0.05",
                "affiliateId": "aff"
            })
        );
    }

    #[test]
    fn test_quote_mapping_resolves_missing_networks() {
        let req = QuoteRequest {
            deposit_coin: "Eth".to_string(),
            deposit_network: None,
            settle_coin: "SOL".to_string(),
            settle_network: Some(String::new()),
            deposit_amount: Some(AmountInput::from("1")),
        };

        let mapped = map_quote_request(&req, &NetworkResolver::builtin(), None);
        assert_eq!(mapped.deposit_network, "ethereum");
        assert_eq!(mapped.settle_network, "solana");
        assert!(json!(mapped).get("affiliateId").is_none());
    }

    #[test]
    fn test_shift_mapping_omits_empty_refund() {
        let req = FixedShiftRequest {
            quote_id: "q-1".to_string(),
            settle_address: "0xabc".to_string(),
            refund_address: Some("".to_string()),
        };
        let body = json!(map_fixed_shift_request(&req, Some("aff")));
        assert_eq!(
            body,
            json!({"quoteId": "q-1", "settleAddress": "0xabc", "affiliateId": "aff"})
        );

        let with_refund = FixedShiftRequest {
            refund_address: Some("bc1qrefund".to_string()),
            ..req
        };
        let body = json!(map_fixed_shift_request(&with_refund, None));
        assert_eq!(body["refundAddress"], "bc1qrefund");
    }
}
