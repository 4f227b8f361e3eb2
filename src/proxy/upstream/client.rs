// Upstream client for the SideShift v2 REST API

use async_trait::async_trait;
use reqwest::{header, Client, Method, Response};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::Exchange;
use crate::error::{AppError, AppResult};
use crate::proxy::config::{ProxyConfig, ProxyMode};
use crate::proxy::mappers::{UpstreamFixedShiftRequest, UpstreamQuoteRequest};

pub const SECRET_HEADER: &str = "x-sideshift-secret";
pub const USER_IP_HEADER: &str = "x-user-ip";

pub struct SideShiftClient {
    http_client: Client,
    base_url: Url,
    secret: header::HeaderValue,
}

impl SideShiftClient {
    pub fn new(config: &ProxyConfig) -> AppResult<Self> {
        let secret = config
            .secret()
            .ok_or_else(|| AppError::Config("live mode needs SIDESHIFT_SECRET".to_string()))?;
        let mut secret = header::HeaderValue::from_str(secret)
            .map_err(|e| AppError::Config(format!("SIDESHIFT_SECRET is not a valid header: {}", e)))?;
        secret.set_sensitive(true);

        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| AppError::Config(format!("invalid base_url: {}", e)))?;

        let http_client = crate::utils::http::create_client_with_proxy(
            config.request_timeout,
            Some(config.upstream_proxy.clone()),
        );

        Ok(Self {
            http_client,
            base_url,
            secret,
        })
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn build_url(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("base_url cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn build_headers(&self, user_ip: &str) -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(SECRET_HEADER, self.secret.clone());
        let ip = header::HeaderValue::from_str(user_ip).unwrap_or_else(|_| {
            header::HeaderValue::from_static(crate::proxy::middleware::FALLBACK_CLIENT_IP)
        });
        headers.insert(USER_IP_HEADER, ip);
        headers
    }

    async fn call<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
        user_ip: &str,
    ) -> AppResult<Value> {
        let url = self.build_url(segments)?;
        tracing::debug!("Exchange call: {} {}", method, url);

        let mut request = self
            .http_client
            .request(method, url)
            .headers(self.build_headers(user_ip));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        read_response(response).await
    }
}

/// 2xx → parsed JSON; anything else → `AppError::Upstream` with the exchange's message
async fn read_response(response: Response) -> AppResult<Value> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<Value>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AppError::Upstream {
        status: status.as_u16(),
        message: upstream_error_message(status.as_u16(), &body),
    })
}

/// `{"error": {"message": ".."}}` (or `{"error": ".."}`) → message, else `API Error: <code>`
pub fn upstream_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            let error = v.get("error")?;
            error
                .get("message")
                .and_then(Value::as_str)
                .or_else(|| error.as_str())
                .map(str::to_string)
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("API Error: {}", status))
}

#[async_trait]
impl Exchange for SideShiftClient {
    fn mode(&self) -> ProxyMode {
        ProxyMode::Live
    }

    async fn list_coins(&self, user_ip: &str) -> AppResult<Value> {
        self.call::<()>(Method::GET, &["coins"], None, user_ip).await
    }

    async fn create_quote(&self, req: &UpstreamQuoteRequest, user_ip: &str) -> AppResult<Value> {
        self.call(Method::POST, &["quotes"], Some(req), user_ip).await
    }

    async fn create_fixed_shift(
        &self,
        req: &UpstreamFixedShiftRequest,
        user_ip: &str,
    ) -> AppResult<Value> {
        self.call(Method::POST, &["shifts", "fixed"], Some(req), user_ip)
            .await
    }

    async fn get_shift(&self, shift_id: &str, user_ip: &str) -> AppResult<Value> {
        self.call::<()>(Method::GET, &["shifts", shift_id], None, user_ip)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header as header_eq, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(base_url: &str) -> ProxyConfig {
        ProxyConfig {
            base_url: base_url.to_string(),
            secret: Some("test-secret".to_string()),
            affiliate_id: Some("aff".to_string()),
            ..ProxyConfig::default()
        }
    }

    #[test]
    fn test_build_url() {
        let client = SideShiftClient::new(&config_for("https://sideshift.ai/api/v2")).unwrap();
        assert_eq!(
            client.build_url(&["coins"]).unwrap().as_str(),
            "https://sideshift.ai/api/v2/coins"
        );
        assert_eq!(
            client.build_url(&["shifts", "a/b c"]).unwrap().as_str(),
            "https://sideshift.ai/api/v2/shifts/a%2Fb%20c"
        );

        let trailing = SideShiftClient::new(&config_for("https://sideshift.ai/api/v2/")).unwrap();
        assert_eq!(
            trailing.build_url(&["shifts", "fixed"]).unwrap().as_str(),
            "https://sideshift.ai/api/v2/shifts/fixed"
        );
    }

    #[test]
    fn test_requires_secret() {
        let config = ProxyConfig::default();
        assert!(matches!(
            SideShiftClient::new(&config),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_upstream_error_message() {
        assert_eq!(
            upstream_error_message(400, r#"{"error":{"message":"Amount too low"}}"#),
            "Amount too low"
        );
        assert_eq!(
            upstream_error_message(400, r#"{"error":"Bad coin"}"#),
            "Bad coin"
        );
        assert_eq!(upstream_error_message(502, "<html>"), "API Error: 502");
        assert_eq!(upstream_error_message(500, "{}"), "API Error: 500");
    }

    #[tokio::test]
    async fn test_quote_call_sends_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/quotes"))
            .and(header_eq(SECRET_HEADER, "test-secret"))
            .and(header_eq(USER_IP_HEADER, "203.0.113.7"))
            .and(body_json(json!({
                "depositCoin": "btc",
                "depositNetwork": "bitcoin",
                "settleCoin": "eth",
                "settleNetwork": "ethereum",
                "depositAmount": "0.05",
                "affiliateId": "aff"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "q-1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = SideShiftClient::new(&config_for(&server.uri())).unwrap();
        let req = UpstreamQuoteRequest {
            deposit_coin: "btc".to_string(),
            deposit_network: "bitcoin".to_string(),
            settle_coin: "eth".to_string(),
            settle_network: "ethereum".to_string(),
            deposit_amount: "0.05".to_string(),
            affiliate_id: Some("aff".to_string()),
        };
        let quote = client.create_quote(&req, "203.0.113.7").await.unwrap();
        assert_eq!(quote["id"], "q-1");
    }

    #[tokio::test]
    async fn test_non_success_becomes_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(json!({"error": {"message": "Too many requests"}})),
            )
            .mount(&server)
            .await;

        let client = SideShiftClient::new(&config_for(&server.uri())).unwrap();
        let err = client.list_coins("1.1.1.1").await.unwrap_err();
        match err {
            AppError::Upstream { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Too many requests");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
