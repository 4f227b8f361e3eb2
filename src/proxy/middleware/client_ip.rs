// Caller IP extraction from proxy headers
use axum::{async_trait, extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use std::convert::Infallible;

/// Placeholder sent upstream when no proxy header names the caller
pub const FALLBACK_CLIENT_IP: &str = "1.1.1.1";

/// First `x-forwarded-for` hop, else `x-real-ip`, else the placeholder
pub fn client_ip_from_headers(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .unwrap_or(FALLBACK_CLIENT_IP)
        .to_string()
}

/// Extractor wrapping [`client_ip_from_headers`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientIp(client_ip_from_headers(&parts.headers)))
    }
}
