use serde::{Deserialize, Serialize};

/// Base CORS allow-list shared by every environment mode. The front-end
/// clients depend on this exact table.
const BASE_ORIGINS: &[&str] = &[
    "https://www.portico.dev",
    "https://portico.dev",
    "https://staging.portico.dev",
    "http://localhost:3000",
];

/// Extra origin appended in staging and local modes. Appended as-is even
/// though the base list already carries it; duplicates are harmless to
/// the CORS layer and the table stays a faithful copy of the policy.
const LOCAL_DEV_ORIGIN: &str = "http://localhost:3000";

// ── Environment mode ─────────────────────────────────────────────────────────

/// Deployment environment, selected via `PORTICO_ENV`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvMode {
    #[default]
    Local,
    Staging,
    Production,
}

impl EnvMode {
    /// Parse a mode name case-insensitively. Unknown values fall back to
    /// `Local` with a warning rather than aborting startup.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "local" => Self::Local,
            "staging" => Self::Staging,
            "production" => Self::Production,
            other => {
                tracing::warn!(mode = other, "unknown PORTICO_ENV value, assuming local");
                Self::Local
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

// ── Rate limiting ────────────────────────────────────────────────────────────

/// Admission-control settings for the per-IP request tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum number of client IPs tracked at once. Inserting beyond the
    /// bound evicts the oldest-inserted entry.
    pub max_tracked_ips: usize,
    /// Requests allowed per IP per 60-second window.
    pub per_minute: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_tracked_ips: 25,
            per_minute: 60,
        }
    }
}

// ── Gateway configuration ────────────────────────────────────────────────────

/// Root gateway configuration, assembled from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub env_mode: EnvMode,
    /// Process instance identifier reported by the health endpoint.
    pub instance_id: String,
    pub database_url: String,
    /// Cache endpoint. Absent means the gateway runs without caching.
    pub cache_url: Option<String>,
    /// HS256 secret for bearer-token verification.
    pub jwt_secret: String,
    pub rate_limit: RateLimitConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            env_mode: EnvMode::Local,
            instance_id: "single".into(),
            database_url: "sqlite:portico.db?mode=rwc".into(),
            cache_url: None,
            jwt_secret: String::new(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Effective CORS allow-list for this environment mode: the fixed base
    /// table plus the mode-specific extension, in order, without
    /// deduplication.
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = BASE_ORIGINS.iter().map(|o| (*o).to_string()).collect();
        match self.env_mode {
            EnvMode::Staging | EnvMode::Local => origins.push(LOCAL_DEV_ORIGIN.to_string()),
            EnvMode::Production => {},
        }
        origins
    }
}
