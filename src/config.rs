//! # Configuration
//!
//! Application configuration is read from a YAML file, then selected runtime knobs are
//! overridden from the environment.
//!
//! ```yaml
//! runtime:
//!   slow_dispatch_ms: 250
//!   expose_request_id: true
//! auth:
//!   token: s3cret
//! cors:
//!   allowed_origins: ["https://example.com"]
//!   allowed_headers: ["Content-Type", "Authorization"]
//!   allowed_methods: ["GET", "POST"]
//! ```
//!
//! Every section is optional. Without `auth` or `cors` the corresponding named
//! middleware is not registered.
//!
//! ## Environment Variables
//!
//! - `SWITCHYARD_SLOW_DISPATCH_MS`: dispatches slower than this are logged at `warn`
//! - `SWITCHYARD_EXPOSE_REQUEST_ID`: `false` to stop echoing `x-request-id`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_SLOW_DISPATCH_MS: u64 = 250;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub runtime: RuntimeConfig,
    pub auth: Option<AuthConfig>,
    pub cors: Option<CorsConfig>,
}

/// Knobs read by the dispatcher on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Dispatches taking longer than this many milliseconds are logged at `warn`
    pub slow_dispatch_ms: u64,
    /// Echo the request id as `x-request-id` on every response
    pub expose_request_id: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            slow_dispatch_ms: DEFAULT_SLOW_DISPATCH_MS,
            expose_request_id: true,
        }
    }
}

impl RuntimeConfig {
    /// Defaults with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `SWITCHYARD_*` overrides. Unparseable values are ignored with a warning.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = env::var("SWITCHYARD_SLOW_DISPATCH_MS") {
            match val.trim().parse::<u64>() {
                Ok(ms) => self.slow_dispatch_ms = ms,
                Err(_) => warn!(value = %val, "Ignoring invalid SWITCHYARD_SLOW_DISPATCH_MS"),
            }
        }
        if let Ok(val) = env::var("SWITCHYARD_EXPOSE_REQUEST_ID") {
            match val.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => self.expose_request_id = true,
                "0" | "false" | "no" => self.expose_request_id = false,
                _ => warn!(value = %val, "Ignoring invalid SWITCHYARD_EXPOSE_REQUEST_ID"),
            }
        }
        self
    }

    #[must_use]
    pub fn slow_dispatch_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_dispatch_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Expected bearer token
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allowed_methods: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_headers: vec!["Content-Type".to_string(), "Authorization".to_string()],
            allowed_methods: ["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"]
                .iter()
                .map(|m| (*m).to_string())
                .collect(),
        }
    }
}

/// Load YAML configuration from `path` and apply environment overrides.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let mut config: AppConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    config.runtime = config.runtime.with_env_overrides();

    info!(
        path = %path.display(),
        slow_dispatch_ms = config.runtime.slow_dispatch_ms,
        auth = config.auth.is_some(),
        cors = config.cors.is_some(),
        "Configuration loaded"
    );
    Ok(config)
}
