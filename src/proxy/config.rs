use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AppError, AppResult};

pub const DEFAULT_BASE_URL: &str = "https://sideshift.ai/api/v2";

/// Whether the proxy talks to the real exchange or fabricates answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyMode {
    Mock,
    Live,
}

impl fmt::Display for ProxyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyMode::Mock => f.write_str("mock"),
            ProxyMode::Live => f.write_str("live"),
        }
    }
}

/// Gateway configuration, built once at startup
#[derive(Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Listening port
    #[serde(default = "default_port")]
    pub port: u16,

    /// - false: bind 127.0.0.1 only
    /// - true: bind 0.0.0.0
    #[serde(default)]
    pub allow_lan_access: bool,

    /// Exchange API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Shared secret sent as `x-sideshift-secret`; absent means mock mode
    #[serde(default)]
    pub secret: Option<String>,

    /// Affiliate id attached to quotes and shifts
    #[serde(default)]
    pub affiliate_id: Option<String>,

    /// Mock mode must be asked for explicitly
    #[serde(default)]
    pub allow_mock: bool,

    /// Upstream request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Refresh the coin→network table from the exchange's coin list at startup
    #[serde(default = "default_true")]
    pub refresh_networks: bool,

    /// Outbound proxy for exchange calls
    #[serde(default)]
    pub upstream_proxy: UpstreamProxyConfig,

    /// Directory for rolling log files; console only when unset
    #[serde(default)]
    pub log_dir: Option<String>,
}

/// Outbound proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpstreamProxyConfig {
    pub enabled: bool,
    /// Proxy address (http://, https://, socks5://)
    pub url: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            allow_lan_access: false,
            base_url: default_base_url(),
            secret: None,
            affiliate_id: None,
            allow_mock: false,
            request_timeout: default_request_timeout(),
            refresh_networks: true,
            upstream_proxy: UpstreamProxyConfig::default(),
            log_dir: None,
        }
    }
}

fn default_port() -> u16 {
    4455
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl ProxyConfig {
    pub fn get_bind_address(&self) -> &str {
        if self.allow_lan_access {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        }
    }

    /// Configured secret, with blank values treated as absent
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn affiliate_id(&self) -> Option<&str> {
        self.affiliate_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn mode(&self) -> ProxyMode {
        if self.secret().is_some() {
            ProxyMode::Live
        } else {
            ProxyMode::Mock
        }
    }

    /// Reject configurations that would start in a surprising state
    pub fn validate(&self) -> AppResult<()> {
        if self.port == 0 {
            return Err(AppError::Config("port must be non-zero".to_string()));
        }

        let url = url::Url::parse(self.base_url.trim()).map_err(|e| {
            AppError::Config(format!("invalid base_url '{}': {}", self.base_url, e))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(AppError::Config(format!(
                "base_url must be http(s), got '{}'",
                url.scheme()
            )));
        }

        if self.mode() == ProxyMode::Mock && !self.allow_mock {
            return Err(AppError::Config(
                "SIDESHIFT_SECRET is not set; set it, or enable mock mode explicitly with ALLOW_MOCK=true / --mock"
                    .to_string(),
            ));
        }

        if self.mode() == ProxyMode::Live && self.affiliate_id().is_none() {
            tracing::warn!("No AFFILIATE_ID configured, exchange calls will carry no affiliate attribution");
        }

        Ok(())
    }
}

// Keep the secret out of logs
impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("port", &self.port)
            .field("allow_lan_access", &self.allow_lan_access)
            .field("base_url", &self.base_url)
            .field("secret", &self.secret().map(|_| "<redacted>"))
            .field("affiliate_id", &self.affiliate_id)
            .field("allow_mock", &self.allow_mock)
            .field("request_timeout", &self.request_timeout)
            .field("refresh_networks", &self.refresh_networks)
            .field("upstream_proxy", &self.upstream_proxy)
            .field("log_dir", &self.log_dir)
            .finish()
    }
}
