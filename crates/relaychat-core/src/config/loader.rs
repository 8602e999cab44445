//! Config loader: reads `~/.relaychat/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.relaychat/config.json`
//! 3. Environment variables `RELAYCHAT_<SECTION>__<FIELD>` (override JSON)
//! 4. `CLAUDE_API_KEY`, when the relay key is still unset

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Legacy credential variable honoured by the relay.
pub const LEGACY_API_KEY_ENV: &str = "CLAUDE_API_KEY";

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    apply_env_overrides(load_config_from_path(&config_path))
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Supported overrides:
/// - `RELAYCHAT_RELAY__HOST` → `relay.host`
/// - `RELAYCHAT_RELAY__PORT` → `relay.port`
/// - `RELAYCHAT_RELAY__API_KEY` → `relay.api_key`
/// - `RELAYCHAT_RELAY__UPSTREAM_URL` → `relay.upstream_url`
/// - `RELAYCHAT_CLIENT__RELAY_URL` → `client.relay_url`
/// - `RELAYCHAT_CLIENT__MODEL` → `client.model`
/// - `RELAYCHAT_CLIENT__MAX_TOKENS` → `client.max_tokens`
/// - `RELAYCHAT_CLIENT__CONTEXT_SIZE` → `client.context_size`
/// - `RELAYCHAT_CLIENT__SNAPSHOT_PATH` → `client.snapshot_path`
/// - `CLAUDE_API_KEY` → `relay.api_key` (only if still empty)
fn apply_env_overrides(mut config: Config) -> Config {
    // Relay
    if let Ok(val) = std::env::var("RELAYCHAT_RELAY__HOST") {
        config.relay.host = val;
    }
    if let Ok(val) = std::env::var("RELAYCHAT_RELAY__PORT") {
        if let Ok(p) = val.parse::<u16>() {
            config.relay.port = p;
        }
    }
    if let Ok(val) = std::env::var("RELAYCHAT_RELAY__API_KEY") {
        config.relay.api_key = val;
    }
    if let Ok(val) = std::env::var("RELAYCHAT_RELAY__UPSTREAM_URL") {
        config.relay.upstream_url = val;
    }
    if config.relay.api_key.is_empty() {
        if let Ok(val) = std::env::var(LEGACY_API_KEY_ENV) {
            config.relay.api_key = val;
        }
    }

    // Client
    if let Ok(val) = std::env::var("RELAYCHAT_CLIENT__RELAY_URL") {
        config.client.relay_url = val;
    }
    if let Ok(val) = std::env::var("RELAYCHAT_CLIENT__MODEL") {
        config.client.model = val;
    }
    if let Ok(val) = std::env::var("RELAYCHAT_CLIENT__MAX_TOKENS") {
        if let Ok(n) = val.parse::<u32>() {
            config.client.max_tokens = n;
        }
    }
    if let Ok(val) = std::env::var("RELAYCHAT_CLIENT__CONTEXT_SIZE") {
        if let Ok(n) = val.parse::<usize>() {
            config.client.context_size = n;
        }
    }
    if let Ok(val) = std::env::var("RELAYCHAT_CLIENT__SNAPSHOT_PATH") {
        config.client.snapshot_path = Some(val);
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
