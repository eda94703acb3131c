use std::{fmt, sync::Arc};

use {forcelink_oauth::OAuthConfig, serde::Deserialize};

/// Tokens held by the browser session.
#[derive(Clone)]
pub struct Credentials {
    /// May be absent; the connection then refreshes before its first request.
    pub access_token: Option<String>,
    pub refresh_token: String,
    pub instance_url: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("has_access_token", &self.access_token.is_some())
            .field("instance_url", &self.instance_url)
            .finish_non_exhaustive()
    }
}

/// Everything a [`Connection`](crate::Connection) needs to authenticate and refresh.
pub struct ConnectionOptions {
    pub credentials: Credentials,
    /// Connected-app settings used for the refresh-token grant.
    pub oauth2: Arc<OAuthConfig>,
    /// REST API version, e.g. `59.0`.
    pub api_version: String,
}

/// Body of `GET /services/data/vXX.X/query`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult<T> {
    pub total_size: u64,
    pub done: bool,
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
    pub next_records_url: Option<String>,
}

/// One element of the error array returned by the REST API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiErrorItem {
    pub message: String,
    pub error_code: Option<String>,
}
