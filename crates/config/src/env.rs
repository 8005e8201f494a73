use anyhow::bail;
use tracing::warn;

use crate::schema::{EnvMode, GatewayConfig, RateLimitConfig};

/// Secret used when none is configured in local mode. Never accepted
/// outside local.
const LOCAL_DEV_SECRET: &str = "portico-local-dev-secret";

impl GatewayConfig {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source. Used by
    /// `from_env` and directly by tests, which must not mutate process
    /// environment shared across threads.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = GatewayConfig::default();

        let env_mode = var("PORTICO_ENV")
            .map(|v| EnvMode::parse(&v))
            .unwrap_or_default();

        let jwt_secret = match var("PORTICO_JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None if env_mode == EnvMode::Local => {
                warn!("PORTICO_JWT_SECRET not set, using the local development secret");
                LOCAL_DEV_SECRET.into()
            },
            None => bail!("PORTICO_JWT_SECRET must be set in {} mode", env_mode.as_str()),
        };

        let rate_limit = RateLimitConfig {
            max_tracked_ips: var("PORTICO_MAX_TRACKED_IPS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rate_limit.max_tracked_ips),
            per_minute: var("PORTICO_RATE_LIMIT_PER_MINUTE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rate_limit.per_minute),
        };

        Ok(Self {
            env_mode,
            instance_id: var("PORTICO_INSTANCE_ID").unwrap_or(defaults.instance_id),
            database_url: var("DATABASE_URL").unwrap_or(defaults.database_url),
            cache_url: var("CACHE_URL").filter(|s| !s.is_empty()),
            jwt_secret,
            rate_limit,
        })
    }
}
