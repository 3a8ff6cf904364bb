use crate::config::Config;
use crate::errors::{PlatformError, Result};
use exchange::binance::consts::{DEFAULT_API_TIMEOUT_MILLI_SECS, SPOT_BASE_URL};
use rate_limiter::RateLimiter;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc, time::Duration};

fn default_api_base_url() -> String {
    SPOT_BASE_URL.to_string()
}

fn default_api_timeout_milli_secs() -> u64 {
    DEFAULT_API_TIMEOUT_MILLI_SECS
}

fn default_balance_cache_ttl_secs() -> u64 {
    30
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    pub api_key: String,
    pub secret_key: String,

    pub proxy_url: Option<String>,

    #[serde(default = "default_api_timeout_milli_secs")]
    pub api_timeout_milli_secs: u64,
    // [[窗口毫秒, 最大权重], ...]
    pub api_rate_limits: Option<Vec<(u64, u64)>>,

    #[serde(default)]
    pub enable_alpha: bool, // Alpha 2.0 流动性划转
    #[serde(default)]
    pub enable_margin: bool,

    #[serde(default = "default_balance_cache_ttl_secs")]
    pub balance_cache_ttl_secs: u64,
    // 未配置时不启动后台时间同步
    pub time_sync_interval_secs: Option<u64>,
}

impl fmt::Debug for ConnectorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorConfig")
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &"***")
            .field("secret_key", &"***")
            .field("proxy_url", &self.proxy_url)
            .field("api_timeout_milli_secs", &self.api_timeout_milli_secs)
            .field("api_rate_limits", &self.api_rate_limits)
            .field("enable_alpha", &self.enable_alpha)
            .field("enable_margin", &self.enable_margin)
            .field("balance_cache_ttl_secs", &self.balance_cache_ttl_secs)
            .field("time_sync_interval_secs", &self.time_sync_interval_secs)
            .finish()
    }
}

impl ConnectorConfig {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            proxy_url: None,
            api_timeout_milli_secs: default_api_timeout_milli_secs(),
            api_rate_limits: None,
            enable_alpha: false,
            enable_margin: false,
            balance_cache_ttl_secs: default_balance_cache_ttl_secs(),
            time_sync_interval_secs: None,
        }
    }

    pub fn from_config(config: &Config, section: &str) -> Result<Self> {
        let connector_config: ConnectorConfig =
            config
                .get(section)
                .map_err(|e| PlatformError::ConfigError {
                    message: format!("get connector config {} err: {}", section, e),
                })?;
        connector_config.validate()?;
        Ok(connector_config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() || self.secret_key.is_empty() {
            return Err(PlatformError::ConfigError {
                message: "api_key and secret_key are required".to_string(),
            });
        }
        if self.api_base_url.is_empty() {
            return Err(PlatformError::ConfigError {
                message: "api_base_url is empty".to_string(),
            });
        }
        if self.balance_cache_ttl_secs == 0 {
            return Err(PlatformError::ConfigError {
                message: "balance_cache_ttl_secs must be positive".to_string(),
            });
        }
        if self.time_sync_interval_secs == Some(0) {
            return Err(PlatformError::ConfigError {
                message: "time_sync_interval_secs must be positive".to_string(),
            });
        }
        if let Some(limits) = &self.api_rate_limits
            && let Some((window, weight)) = limits.iter().find(|(w, m)| *w == 0 || *m == 0)
        {
            return Err(PlatformError::ConfigError {
                message: format!("invalid api rate limit: [{}, {}]", window, weight),
            });
        }
        Ok(())
    }

    pub fn balance_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.balance_cache_ttl_secs)
    }

    pub fn time_sync_interval(&self) -> Option<Duration> {
        self.time_sync_interval_secs.map(Duration::from_secs)
    }

    pub fn rate_limiters(&self) -> Option<Arc<Vec<RateLimiter>>> {
        self.api_rate_limits.as_ref().map(|limits| {
            Arc::new(
                limits
                    .iter()
                    .map(|(duration, max_weight)| {
                        RateLimiter::new(Duration::from_millis(*duration), *max_weight)
                    })
                    .collect(),
            )
        })
    }
}
