use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::models::Coin;

/// Network used when a coin is neither in the table nor in the exchange listing
pub const FALLBACK_NETWORK: &str = "mainnet";

/// Built-in coin → default network table
static DEFAULT_NETWORKS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("btc", "bitcoin"),
        ("eth", "ethereum"),
        ("usdt", "ethereum"),
        ("usdc", "ethereum"),
        ("dai", "ethereum"),
        ("ltc", "litecoin"),
        ("bch", "bitcoincash"),
        ("doge", "doge"),
        ("xrp", "ripple"),
        ("sol", "solana"),
        ("trx", "tron"),
        ("bnb", "bsc"),
        ("matic", "polygon"),
        ("avax", "avax"),
        ("atom", "cosmos"),
        ("xmr", "monero"),
        ("ada", "cardano"),
        ("dot", "polkadot"),
    ])
});

/// Coins the built-in table knows about
pub fn supported_coins() -> impl Iterator<Item = &'static str> {
    DEFAULT_NETWORKS.keys().copied()
}

/// Picks a network for a coin when the caller did not name one
#[derive(Debug, Clone)]
pub struct NetworkResolver {
    networks: HashMap<String, String>,
}

impl Default for NetworkResolver {
    fn default() -> Self {
        Self::builtin()
    }
}

impl NetworkResolver {
    pub fn builtin() -> Self {
        Self {
            networks: DEFAULT_NETWORKS
                .iter()
                .map(|(coin, network)| (coin.to_string(), network.to_string()))
                .collect(),
        }
    }

    /// Built-in table overlaid with the exchange's own coin list:
    /// each coin's declared mainnet, else its first network.
    pub fn from_coins(coins: &[Coin]) -> Self {
        let mut resolver = Self::builtin();
        for coin in coins {
            if let Some(network) = coin.default_network() {
                resolver
                    .networks
                    .insert(coin.coin.to_ascii_lowercase(), network.to_string());
            }
        }
        resolver
    }

    /// Default network for `coin` (case-insensitive); never empty
    pub fn resolve(&self, coin: &str) -> &str {
        self.networks
            .get(&coin.trim().to_ascii_lowercase())
            .map(String::as_str)
            .unwrap_or(FALLBACK_NETWORK)
    }

    /// Caller's network when given, the resolved default otherwise
    pub fn resolve_or<'a>(&'a self, coin: &str, requested: Option<&'a str>) -> &'a str {
        match requested.map(str::trim) {
            Some(network) if !network.is_empty() => network,
            _ => self.resolve(coin),
        }
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_supported_coin_has_a_network() {
        let resolver = NetworkResolver::builtin();
        for coin in supported_coins() {
            assert!(!resolver.resolve(coin).is_empty(), "{coin}");
        }
        assert_eq!(resolver.len(), supported_coins().count());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let resolver = NetworkResolver::builtin();
        assert_eq!(resolver.resolve("BTC"), "bitcoin");
        assert_eq!(resolver.resolve(" Eth "), "ethereum");
        assert_eq!(resolver.resolve("unknowncoin"), FALLBACK_NETWORK);
        assert_eq!(resolver.resolve(""), FALLBACK_NETWORK);
    }

    #[test]
    fn test_requested_network_wins() {
        let resolver = NetworkResolver::builtin();
        assert_eq!(resolver.resolve_or("usdt", Some("tron")), "tron");
        assert_eq!(resolver.resolve_or("usdt", Some("  ")), "ethereum");
        assert_eq!(resolver.resolve_or("usdt", None), "ethereum");
    }

    #[test]
    fn test_from_coins_overrides_table() {
        let coins: Vec<Coin> = serde_json::from_value(json!([
            {"coin": "USDT", "networks": ["tron", "ethereum"], "mainnet": "tron"},
            {"coin": "PEPE", "networks": ["ethereum"]},
            {"coin": "GHOST", "networks": []}
        ]))
        .unwrap();

        let resolver = NetworkResolver::from_coins(&coins);
        assert_eq!(resolver.resolve("usdt"), "tron");
        assert_eq!(resolver.resolve("pepe"), "ethereum");
        assert_eq!(resolver.resolve("ghost"), FALLBACK_NETWORK);
        assert_eq!(resolver.resolve("btc"), "bitcoin");
    }
}
