use forcelink_oauth::OAuthError;

#[derive(Debug, thiserror::Error)]
pub enum SalesforceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("session expired or invalid: {0}")]
    Unauthorized(String),

    #[error("query failed with HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("token refresh failed: {0}")]
    Refresh(#[source] OAuthError),

    #[error("unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),
}
