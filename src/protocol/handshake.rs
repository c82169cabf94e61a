use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::HandshakeConfig;

/// Handshake offered by the host on a fresh connection. All three fields
/// must match the plugin's configuration before any operation is callable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handshake {
    pub protocol_version: u32,
    pub magic_cookie_key: String,
    pub magic_cookie_value: String,
}

impl Handshake {
    pub fn from_config(config: &HandshakeConfig) -> Self {
        Self {
            protocol_version: config.protocol_version,
            magic_cookie_key: config.magic_cookie_key.clone(),
            magic_cookie_value: config.magic_cookie_value.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("protocol version mismatch: host offered {offered}, plugin speaks {expected}")]
    VersionMismatch { offered: u32, expected: u32 },
    // The expected cookie never appears in error output.
    #[error("magic cookie mismatch")]
    CookieMismatch,
    #[error("magic cookie {key} not present in plugin environment; refusing to serve")]
    MissingEnvironmentCookie { key: String },
}

/// Check an offered handshake against the plugin's immutable configuration.
pub fn verify_handshake(
    config: &HandshakeConfig,
    offered: &Handshake,
) -> Result<(), HandshakeError> {
    if offered.protocol_version != config.protocol_version {
        return Err(HandshakeError::VersionMismatch {
            offered: offered.protocol_version,
            expected: config.protocol_version,
        });
    }
    if offered.magic_cookie_key != config.magic_cookie_key
        || offered.magic_cookie_value != config.magic_cookie_value
    {
        return Err(HandshakeError::CookieMismatch);
    }
    Ok(())
}

/// Confirm the host launched us: the magic cookie must be present in the
/// process environment with the configured value.
pub fn verify_environment(config: &HandshakeConfig) -> Result<(), HandshakeError> {
    match std::env::var(&config.magic_cookie_key) {
        Ok(value) if value == config.magic_cookie_value => Ok(()),
        Ok(_) => Err(HandshakeError::CookieMismatch),
        Err(_) => Err(HandshakeError::MissingEnvironmentCookie {
            key: config.magic_cookie_key.clone(),
        }),
    }
}
