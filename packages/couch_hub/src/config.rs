use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// =============================================================================
// Unified config (figment-deserialized from defaults / config.toml / env vars)
// =============================================================================
//
// Three equivalent ways to configure:
//
//   config.toml:     [server]
//                    port = 4000
//
//   env var:         COUCH_SERVER__PORT=4000   (double underscore = nesting)
//
//   CLI flags override both for the keys they cover.

/// Top-level tunable configuration, deserialized by figment.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerFileConfig,
    #[serde(default)]
    pub relay: RelayFileConfig,
}

/// Bind address (lives under `[server]` in config.toml).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerFileConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerFileConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Relay tuning knobs (lives under `[relay]` in config.toml).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RelayFileConfig {
    /// Outbound queue depth per connection. Best-effort events are dropped
    /// once a host's queue is full.
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,
    /// Room-name generation retry budget before a handshake fails.
    #[serde(default = "default_name_attempts")]
    pub name_attempts: usize,
}

impl Default for RelayFileConfig {
    fn default() -> Self {
        Self {
            outbound_queue: default_outbound_queue(),
            name_attempts: default_name_attempts(),
        }
    }
}

fn default_host() -> String {
    // Controllers connect from other devices on the LAN.
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_outbound_queue() -> usize {
    64
}

fn default_name_attempts() -> usize {
    32
}

/// Build the layered config: defaults → config.toml → COUCH_* env vars.
pub fn load_config(config_path: Option<&Path>) -> Result<FileConfig> {
    use figment::{
        Figment,
        providers::{Env, Format, Serialized, Toml},
    };

    let path = config_path.unwrap_or_else(|| Path::new("config.toml"));
    Figment::from(Serialized::defaults(FileConfig::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("COUCH_").split("__"))
        .extract()
        .context("invalid configuration")
}
