//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! optional TOML files, `PRESENCE__`-prefixed environment variables, and the
//! flat variables (`PORT`, `DISCORD_TOKEN`, ...) used by existing
//! deployments. Each sub-module represents a logical configuration section.

pub mod app;
pub mod cache;
pub mod discord;
pub mod logging;
pub mod proxy;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::cache::ActivityCacheConfig;
pub use self::discord::{DiscordConfig, GatewayCredentials};
pub use self::logging::LoggingConfig;
pub use self::proxy::{ProxyAuth, ProxyConfig, ProxySettings};

use crate::error::AppError;
use crate::result::AppResult;

/// Flat environment variables and the configuration keys they override.
const FLAT_VARIABLES: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("PROXY", "proxy.url"),
    ("PROXY_AUTH", "proxy.auth"),
    ("DISCORD_TOKEN", "discord.token"),
    ("DISCORD_CHANNEL_ID", "discord.channel_id"),
    ("DISCORD_ACTIVITY_CACHE_DURATION", "cache.activity_ttl_seconds"),
];

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Gateway connection settings.
    #[serde(default)]
    pub discord: DiscordConfig,
    /// Outbound proxy settings.
    #[serde(default)]
    pub proxy: ProxyConfig,
    /// Activity cache settings.
    #[serde(default)]
    pub cache: ActivityCacheConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `config/` and the process environment.
    pub fn load(env: &str) -> AppResult<Self> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::load_from(Path::new("config"), env, &vars)
    }

    /// Load configuration from an explicit directory and variable set.
    ///
    /// Precedence, lowest first: `{dir}/default.*`, `{dir}/{env}.*`,
    /// `PRESENCE__SECTION__KEY` variables, then the flat variables.
    /// Blank flat variables count as unset.
    pub fn load_from(dir: &Path, env: &str, vars: &HashMap<String, String>) -> AppResult<Self> {
        let source: config::Map<String, String> =
            vars.iter().map(|(k, v)| (k.clone(), v.clone())).collect();

        let mut builder = config::Config::builder()
            .add_source(
                config::File::with_name(&dir.join("default").to_string_lossy()).required(false),
            )
            .add_source(config::File::with_name(&dir.join(env).to_string_lossy()).required(false))
            .add_source(
                config::Environment::with_prefix("PRESENCE")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(source)),
            );

        for (variable, key) in FLAT_VARIABLES {
            let value = vars
                .get(*variable)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string);
            builder = builder.set_override_option(*key, value)?;
        }

        let config = builder
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
