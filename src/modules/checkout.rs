// Typed client for the gateway's own HTTP contract, as the checkout widget uses it
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::{AppError, AppResult};
use crate::models::{Coin, FixedShiftRequest, HealthStatus, Quote, QuoteRequest, Shift, ShiftStatus};
use crate::modules::poller::StatusSource;

pub struct CheckoutClient {
    http_client: Client,
    api_base: Url,
}

impl CheckoutClient {
    /// `api_base` is the gateway's `/api` root, e.g. `http://localhost:4455/api`
    pub fn new(api_base: &str, timeout_secs: u64) -> AppResult<Self> {
        let api_base = Url::parse(api_base.trim())
            .map_err(|e| AppError::Config(format!("invalid API base '{}': {}", api_base, e)))?;
        Ok(Self {
            http_client: crate::utils::http::create_client_with_proxy(timeout_secs, None),
            api_base,
        })
    }

    fn url(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("API base cannot be a base: {}", self.api_base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> AppResult<T> {
        let response = self.http_client.get(self.url(segments)?).send().await?;
        decode(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> AppResult<T> {
        let response = self
            .http_client
            .post(self.url(segments)?)
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn health(&self) -> AppResult<HealthStatus> {
        self.get(&["health"]).await
    }

    pub async fn list_coins(&self) -> AppResult<Vec<Coin>> {
        self.get(&["coins"]).await
    }

    pub async fn request_quote(&self, req: &QuoteRequest) -> AppResult<Quote> {
        self.post(&["quote"], req).await
    }

    /// Refuses to send when the quote has already expired
    pub async fn create_fixed_shift(
        &self,
        quote: &Quote,
        settle_address: &str,
        refund_address: Option<&str>,
    ) -> AppResult<Shift> {
        if quote.is_expired(Utc::now()) {
            return Err(AppError::InvalidRequest(format!(
                "Quote {} has expired, request a new one",
                quote.id
            )));
        }

        let req = FixedShiftRequest {
            quote_id: quote.id.clone(),
            settle_address: settle_address.to_string(),
            refund_address: refund_address.map(str::to_string),
        };
        self.post(&["shift", "fixed"], &req).await
    }

    pub async fn shift(&self, shift_id: &str) -> AppResult<Shift> {
        self.get(&["shifts", shift_id]).await
    }
}

/// 2xx → `T`; otherwise the gateway's `{"error": ".."}` message
async fn decode<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| format!("API Error: {}", status.as_u16()));

    Err(AppError::Upstream {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl StatusSource for CheckoutClient {
    async fn fetch_status(&self, shift_id: &str) -> AppResult<ShiftStatus> {
        Ok(self.shift(shift_id).await?.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn quote(expires_in: Duration) -> Quote {
        Quote {
            id: "q-1".to_string(),
            deposit_coin: "btc".to_string(),
            deposit_network: "bitcoin".to_string(),
            settle_coin: "eth".to_string(),
            settle_network: "ethereum".to_string(),
            deposit_amount: "0.05".to_string(),
            settle_amount: "0.76".to_string(),
            rate: None,
            expires_at: Utc::now() + expires_in,
            created_at: None,
            affiliate_id: None,
        }
    }

    #[tokio::test]
    async fn test_expired_quote_is_never_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = CheckoutClient::new(&format!("{}/api", server.uri()), 5).unwrap();
        let err = client
            .create_fixed_shift(&quote(Duration::seconds(-5)), "0xabc", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_fixed_shift_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/shift/fixed"))
            .and(body_json(json!({
                "quoteId": "q-1",
                "settleAddress": "0xabc",
                "refundAddress": "bc1qrefund"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "s-1",
                "depositAddress": "bc1qdeposit",
                "depositAmount": "0.05",
                "depositCoin": "BTC",
                "status": "waiting"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = CheckoutClient::new(&format!("{}/api", server.uri()), 5).unwrap();
        let shift = client
            .create_fixed_shift(&quote(Duration::minutes(10)), "0xabc", Some("bc1qrefund"))
            .await
            .unwrap();
        assert_eq!(shift.deposit_address, "bc1qdeposit");
        assert_eq!(shift.status, ShiftStatus::Waiting);
    }

    #[tokio::test]
    async fn test_health_and_coins() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ok": true, "mode": "live"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/coins"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"coin": "BTC", "name": "Bitcoin", "networks": ["bitcoin"], "mainnet": "bitcoin"},
                {"coin": "USDT", "name": "Tether", "networks": ["ethereum", "tron"]}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = CheckoutClient::new(&format!("{}/api", server.uri()), 5).unwrap();
        let health = client.health().await.unwrap();
        assert!(health.ok);
        assert_eq!(health.mode, crate::proxy::ProxyMode::Live);

        let coins = client.list_coins().await.unwrap();
        assert_eq!(coins.len(), 2);
        assert_eq!(coins[0].coin, "BTC");
        assert_eq!(coins[1].networks, vec!["ethereum", "tron"]);
    }

    #[tokio::test]
    async fn test_gateway_error_message_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/quote"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "Amount too low"})),
            )
            .mount(&server)
            .await;

        let client = CheckoutClient::new(&format!("{}/api/", server.uri()), 5).unwrap();
        let req = QuoteRequest {
            deposit_coin: "btc".to_string(),
            deposit_network: None,
            settle_coin: "eth".to_string(),
            settle_network: None,
            deposit_amount: Some("0".into()),
        };
        let err = client.request_quote(&req).await.unwrap_err();
        assert_eq!(err.to_string(), "Amount too low");
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
