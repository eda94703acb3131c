use std::fmt;

use {secrecy::SecretString, serde::Deserialize};

/// OAuth 2.0 connected-app configuration.
#[derive(Debug)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    pub auth_url: String,
    pub token_url: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

/// Tokens obtained from an authorization-code exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: String,
    /// Tenant-specific API base URL.
    pub instance_url: String,
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"[redacted]")
            .field("refresh_token", &"[redacted]")
            .field("instance_url", &self.instance_url)
            .finish()
    }
}

/// Result of a refresh-token grant.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshedToken {
    pub access_token: String,
    /// Present when the identity provider moved the org to another instance.
    pub instance_url: Option<String>,
}

impl fmt::Debug for RefreshedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshedToken")
            .field("access_token", &"[redacted]")
            .field("instance_url", &self.instance_url)
            .finish()
    }
}

/// Raw token endpoint payload. Every field is optional so that a missing one
/// can be reported by name instead of as a generic decode error.
#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub instance_url: Option<String>,
}

/// RFC 6749 section 5.2 error body.
#[derive(Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: Option<String>,
    pub error_description: Option<String>,
}
