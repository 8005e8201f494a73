//! Gateway configuration: environment mode, collaborator endpoints, and
//! the CORS origin policy table.
//!
//! Everything is driven by environment variables (`PORTICO_*`,
//! `DATABASE_URL`, `CACHE_URL`); the CLI loads `.env` via dotenvy before
//! calling [`GatewayConfig::from_env`].

pub mod env;
pub mod schema;

pub use schema::{EnvMode, GatewayConfig, RateLimitConfig};
