// Upstream module - exchange access behind one trait

pub mod client;
pub mod mock;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppResult;
use crate::proxy::config::ProxyMode;
use crate::proxy::mappers::{UpstreamFixedShiftRequest, UpstreamQuoteRequest};

pub use client::SideShiftClient;
pub use mock::MockExchange;

/// One call per operation; responses are relayed as raw JSON.
/// `user_ip` is the end customer's address, forwarded for the exchange's geo checks.
#[async_trait]
pub trait Exchange: Send + Sync {
    fn mode(&self) -> ProxyMode;

    async fn list_coins(&self, user_ip: &str) -> AppResult<Value>;

    async fn create_quote(&self, req: &UpstreamQuoteRequest, user_ip: &str) -> AppResult<Value>;

    async fn create_fixed_shift(
        &self,
        req: &UpstreamFixedShiftRequest,
        user_ip: &str,
    ) -> AppResult<Value>;

    async fn get_shift(&self, shift_id: &str, user_ip: &str) -> AppResult<Value>;
}
