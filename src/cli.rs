use clap::Parser;
use std::path::PathBuf;

use crate::proxy::ProxyConfig;

/// Checkout gateway for the SideShift exchange API
#[derive(Debug, Parser)]
#[command(name = "shiftpay", version, about)]
pub struct Cli {
    /// JSON config file (env: SHIFTPAY_CONFIG)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Listening port, overrides PORT
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Allow running without SIDESHIFT_SECRET (fabricated responses)
    #[arg(long)]
    pub mock: bool,

    /// Bind 0.0.0.0 instead of 127.0.0.1
    #[arg(long)]
    pub lan: bool,
}

impl Cli {
    /// Command-line flags win over file and environment
    pub fn apply(&self, config: &mut ProxyConfig) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.mock {
            config.allow_mock = true;
        }
        if self.lan {
            config.allow_lan_access = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from(["shiftpay", "--port", "8080", "--mock"]).unwrap();
        let mut config = ProxyConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.port, 8080);
        assert!(config.allow_mock);
        assert!(!config.allow_lan_access);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::try_parse_from(["shiftpay"]).unwrap();
        let mut config = ProxyConfig {
            port: 9999,
            ..ProxyConfig::default()
        };
        cli.apply(&mut config);
        assert_eq!(config.port, 9999);
        assert!(!config.allow_mock);
    }
}
