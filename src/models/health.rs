use serde::{Deserialize, Serialize};

use crate::proxy::config::ProxyMode;

/// Body of `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub ok: bool,
    pub mode: ProxyMode,
}

impl HealthStatus {
    pub fn new(mode: ProxyMode) -> Self {
        Self { ok: true, mode }
    }
}
