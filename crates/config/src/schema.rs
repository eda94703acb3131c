use {
    secrecy::{ExposeSecret, SecretString},
    serde::Deserialize,
    url::Url,
};

use crate::error::ConfigError;

pub const DEFAULT_AUTHORIZATION_URL: &str = "https://login.salesforce.com/services/oauth2/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://login.salesforce.com/services/oauth2/token";
pub const DEFAULT_API_VERSION: &str = "59.0";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForcelinkConfig {
    pub server: ServerConfig,
    pub salesforce: SalesforceConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Mark session cookies `Secure`. Enable when served over TLS.
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 3000,
            secure_cookies: false,
        }
    }
}

/// Connected-app credentials and endpoints.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SalesforceConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    pub callback_url: String,
    pub authorization_url: String,
    pub token_url: String,
    pub scopes: Vec<String>,
    /// REST API version used for queries, without the leading `v`.
    pub api_version: String,
    pub http_timeout_secs: u64,
    /// How long an issued authorization `state` stays redeemable.
    pub state_ttl_secs: u64,
}

impl Default for SalesforceConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: SecretString::new(String::new()),
            callback_url: String::new(),
            authorization_url: DEFAULT_AUTHORIZATION_URL.into(),
            token_url: DEFAULT_TOKEN_URL.into(),
            scopes: vec!["api".into(), "refresh_token".into()],
            api_version: DEFAULT_API_VERSION.into(),
            http_timeout_secs: 10,
            state_ttl_secs: 600,
        }
    }
}

impl ForcelinkConfig {
    /// Check required settings and URL syntax.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sf = &self.salesforce;
        if sf.client_id.trim().is_empty() {
            return Err(ConfigError::Missing("SALESFORCE_CLIENT_ID"));
        }
        if sf.client_secret.expose_secret().trim().is_empty() {
            return Err(ConfigError::Missing("SALESFORCE_CLIENT_SECRET"));
        }
        if sf.callback_url.trim().is_empty() {
            return Err(ConfigError::Missing("SALESFORCE_CALLBACK_URL"));
        }

        check_url("SALESFORCE_CALLBACK_URL", &sf.callback_url)?;
        check_url("SALESFORCE_AUTHORIZATION_URL", &sf.authorization_url)?;
        check_url("SALESFORCE_TOKEN_URL", &sf.token_url)?;

        if sf.api_version.trim().is_empty() {
            return Err(ConfigError::Missing("SALESFORCE_API_VERSION"));
        }
        if sf.http_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "SALESFORCE_HTTP_TIMEOUT_SECS",
                reason: "must be greater than zero".into(),
            });
        }
        if sf.state_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "SALESFORCE_STATE_TTL_SECS",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// Effective configuration as JSON with the client secret masked.
    pub fn redacted(&self) -> serde_json::Value {
        let sf = &self.salesforce;
        let secret = if sf.client_secret.expose_secret().is_empty() {
            ""
        } else {
            "********"
        };
        serde_json::json!({
            "server": {
                "bind": self.server.bind,
                "port": self.server.port,
                "secure_cookies": self.server.secure_cookies,
            },
            "salesforce": {
                "client_id": sf.client_id,
                "client_secret": secret,
                "callback_url": sf.callback_url,
                "authorization_url": sf.authorization_url,
                "token_url": sf.token_url,
                "scopes": sf.scopes,
                "api_version": sf.api_version,
                "http_timeout_secs": sf.http_timeout_secs,
                "state_ttl_secs": sf.state_ttl_secs,
            },
        })
    }
}

fn check_url(key: &'static str, value: &str) -> Result<(), ConfigError> {
    Url::parse(value).map(|_| ()).map_err(|e| ConfigError::Invalid {
        key,
        reason: format!("'{value}' is not a valid URL ({e})"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ForcelinkConfig {
        ForcelinkConfig {
            salesforce: SalesforceConfig {
                client_id: "client".into(),
                client_secret: SecretString::new("secret".into()),
                callback_url: "http://localhost:3000/callback".into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_point_at_production_login() {
        let cfg = SalesforceConfig::default();
        assert_eq!(cfg.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(cfg.authorization_url, DEFAULT_AUTHORIZATION_URL);
        assert_eq!(cfg.scopes, vec!["api", "refresh_token"]);
        assert_eq!(cfg.http_timeout_secs, 10);
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_missing_keys() {
        let mut cfg = valid();
        cfg.salesforce.client_secret = SecretString::new("  ".into());
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Missing("SALESFORCE_CLIENT_SECRET"))
        ));

        let mut cfg = valid();
        cfg.salesforce.client_id.clear();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Missing("SALESFORCE_CLIENT_ID"))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_urls_and_zero_timeouts() {
        let mut cfg = valid();
        cfg.salesforce.token_url = "not a url".into();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Invalid {
                key: "SALESFORCE_TOKEN_URL",
                ..
            })
        ));

        let mut cfg = valid();
        cfg.salesforce.http_timeout_secs = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_redacted_masks_secret() {
        let json = valid().redacted();
        assert_eq!(json["salesforce"]["client_secret"], "********");
        assert_eq!(json["salesforce"]["client_id"], "client");
        assert!(!json.to_string().contains("\"secret\""));
    }
}
