use std::fs;
use std::path::Path;

use crate::error::{AppError, AppResult};
use crate::proxy::ProxyConfig;

/// Env var pointing at an optional JSON config file
pub const CONFIG_PATH_ENV: &str = "SHIFTPAY_CONFIG";

/// Load gateway config: JSON file (when given) first, then environment overrides
pub fn load_app_config(path: Option<&Path>) -> AppResult<ProxyConfig> {
    let env_path = std::env::var(CONFIG_PATH_ENV).ok();
    let path = path.or_else(|| env_path.as_deref().map(Path::new));

    let mut config = match path {
        Some(p) => load_config_file(p)?,
        None => ProxyConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Read a JSON config file
pub fn load_config_file(path: &Path) -> AppResult<ProxyConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    serde_json::from_str(&content)
        .map_err(|e| AppError::Config(format!("Failed to parse config file: {}", e)))
}

/// Apply `PORT`, `SIDESHIFT_*`, `AFFILIATE_ID`... on top of `config`.
/// `lookup` abstracts the environment so tests don't touch process state.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F) -> AppResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(port) = get("PORT") {
        config.port = port
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("PORT is not a valid port: {}", port)))?;
    }
    if let Some(flag) = get("ALLOW_LAN_ACCESS") {
        config.allow_lan_access = parse_bool("ALLOW_LAN_ACCESS", &flag)?;
    }
    if let Some(url) = get("SIDESHIFT_BASE_URL") {
        config.base_url = url.trim().trim_end_matches('/').to_string();
    }
    if let Some(secret) = get("SIDESHIFT_SECRET") {
        config.secret = Some(secret);
    }
    if let Some(affiliate) = get("AFFILIATE_ID") {
        config.affiliate_id = Some(affiliate);
    }
    if let Some(flag) = get("ALLOW_MOCK") {
        config.allow_mock = parse_bool("ALLOW_MOCK", &flag)?;
    }
    if let Some(timeout) = get("REQUEST_TIMEOUT") {
        config.request_timeout = timeout.trim().parse().map_err(|_| {
            AppError::Config(format!("REQUEST_TIMEOUT must be seconds: {}", timeout))
        })?;
    }
    if let Some(flag) = get("REFRESH_NETWORKS") {
        config.refresh_networks = parse_bool("REFRESH_NETWORKS", &flag)?;
    }
    if let Some(proxy) = get("UPSTREAM_PROXY_URL") {
        config.upstream_proxy.enabled = true;
        config.upstream_proxy.url = proxy;
    }
    if let Some(dir) = get("LOG_DIR") {
        config.log_dir = Some(dir);
    }

    Ok(())
}

fn parse_bool(key: &str, value: &str) -> AppResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::Config(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}
