use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Coin descriptor as listed by the exchange
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    pub coin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub networks: Vec<String>,
    /// Network the exchange flags as the coin's main chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mainnet: Option<String>,
    // Everything else the exchange sends (hasMemo, fixedOnly, tokenDetails...)
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Coin {
    /// Preferred network: the declared mainnet, else the first listed one
    pub fn default_network(&self) -> Option<&str> {
        self.mainnet
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.networks.first().map(String::as_str))
    }
}
