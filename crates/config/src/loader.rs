use std::path::{Path, PathBuf};

use {secrecy::SecretString, tracing::debug};

use crate::{error::ConfigError, schema::ForcelinkConfig};

pub const CONFIG_FILE_NAME: &str = "forcelink.toml";

/// `forcelink.toml` inside the platform config directory, if one can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "forcelink")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Load configuration from `path` (or the default location) and the process environment.
pub fn load(path: Option<&Path>) -> Result<ForcelinkConfig, ConfigError> {
    let file = match path {
        Some(p) => Some(p.to_path_buf()),
        None => default_config_path().filter(|p| p.is_file()),
    };
    load_with(file.as_deref(), |key| std::env::var(key).ok())
}

/// Load configuration using `lookup` in place of the process environment.
pub fn load_with(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ForcelinkConfig, ConfigError> {
    let mut config = match path {
        Some(p) => read_file(p)?,
        None => ForcelinkConfig::default(),
    };
    apply_env(&mut config, &lookup)?;
    config.validate()?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<ForcelinkConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

fn apply_env(
    config: &mut ForcelinkConfig,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let sf = &mut config.salesforce;

    if let Some(v) = get("SALESFORCE_CLIENT_ID") {
        sf.client_id = v;
    }
    if let Some(v) = get("SALESFORCE_CLIENT_SECRET") {
        sf.client_secret = SecretString::new(v);
    }
    if let Some(v) = get("SALESFORCE_CALLBACK_URL") {
        sf.callback_url = v;
    }
    if let Some(v) = get("SALESFORCE_AUTHORIZATION_URL") {
        sf.authorization_url = v;
    }
    if let Some(v) = get("SALESFORCE_TOKEN_URL") {
        sf.token_url = v;
    }
    if let Some(v) = get("SALESFORCE_SCOPES") {
        sf.scopes = split_scopes(&v);
    }
    if let Some(v) = get("SALESFORCE_API_VERSION") {
        sf.api_version = v.trim().trim_start_matches('v').to_string();
    }
    if let Some(v) = get("SALESFORCE_HTTP_TIMEOUT_SECS") {
        sf.http_timeout_secs = parse_number("SALESFORCE_HTTP_TIMEOUT_SECS", &v)?;
    }
    if let Some(v) = get("SALESFORCE_STATE_TTL_SECS") {
        sf.state_ttl_secs = parse_number("SALESFORCE_STATE_TTL_SECS", &v)?;
    }

    let server = &mut config.server;
    if let Some(v) = get("FORCELINK_BIND") {
        server.bind = v;
    }
    if let Some(v) = get("FORCELINK_PORT") {
        server.port = parse_number("FORCELINK_PORT", &v)?;
    }
    if let Some(v) = get("FORCELINK_SECURE_COOKIES") {
        server.secure_cookies = parse_bool("FORCELINK_SECURE_COOKIES", &v)?;
    }
    Ok(())
}

/// Scopes may be separated by whitespace or commas.
pub(crate) fn split_scopes(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| ConfigError::Invalid {
        key,
        reason: format!("'{value}': {e}"),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            key,
            reason: format!("'{other}' is not a boolean"),
        }),
    }
}
