//! Configuration system: schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use relaychat_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("Relay: {}", cfg.client.relay_url);
//! ```

pub mod loader;
pub mod schema;

// Re-export key types
pub use loader::{get_config_path, load_config, save_config, LEGACY_API_KEY_ENV};
pub use schema::{ClientConfig, Config, RelayConfig};
