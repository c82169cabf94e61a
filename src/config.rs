use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::StoreConfig;

/// Main configuration structure for the actions-check plugin
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PluginConfig {
    /// Handshake negotiated with the host before any operation is served
    pub handshake: HandshakeConfig,
    /// Execution store reachable through the step reporter
    pub store: StoreConfig,
    /// RPC listener settings
    pub listen: ListenConfig,
}

/// Version/cookie triple the host and plugin must agree on. Fixed at process
/// start; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HandshakeConfig {
    pub protocol_version: u32,
    pub magic_cookie_key: String,
    pub magic_cookie_value: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    /// Bind address; port 0 picks an ephemeral port reported on stdout
    pub addr: String,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            protocol_version: 1,
            magic_cookie_key: "PLUGIN_MAGIC_COOKIE".to_string(),
            magic_cookie_value: "hello".to_string(),
        }
    }
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:0".to_string(),
        }
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            handshake: HandshakeConfig::default(),
            store: StoreConfig {
                api_url: "http://127.0.0.1:8080".to_string(),
                token: String::new(),
            },
            listen: ListenConfig::default(),
        }
    }
}

impl PluginConfig {
    /// Load configuration with precedence:
    /// 1. Default values
    /// 2. Configuration file (actions-check.toml)
    /// 3. Environment variables (prefixed with ACTIONS_CHECK_)
    pub fn load() -> Result<Self> {
        let defaults = PluginConfig::default();

        let mut builder = Config::builder()
            .set_default("handshake.protocol_version", defaults.handshake.protocol_version)?
            .set_default("handshake.magic_cookie_key", defaults.handshake.magic_cookie_key)?
            .set_default(
                "handshake.magic_cookie_value",
                defaults.handshake.magic_cookie_value,
            )?
            .set_default("store.api_url", defaults.store.api_url)?
            .set_default("store.token", defaults.store.token)?
            .set_default("listen.addr", defaults.listen.addr)?;

        if Path::new("actions-check.toml").exists() {
            builder = builder.add_source(File::with_name("actions-check"));
        }

        builder = builder.add_source(
            Environment::with_prefix("ACTIONS_CHECK")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}
