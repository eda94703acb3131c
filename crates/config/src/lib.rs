//! Configuration for the forcelink gateway.
//!
//! Settings come from built-in defaults, an optional `forcelink.toml`, and
//! `SALESFORCE_*` / `FORCELINK_*` environment variables, in that order of
//! increasing precedence.

pub mod error;
pub mod loader;
pub mod schema;

pub use {
    error::ConfigError,
    loader::{CONFIG_FILE_NAME, default_config_path, load, load_with},
    schema::{ForcelinkConfig, SalesforceConfig, ServerConfig},
};
