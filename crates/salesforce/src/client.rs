use std::sync::Arc;

use {
    forcelink_oauth::{OAuthConfig, TokenRefreshRequest, refresh_access_token},
    reqwest::StatusCode,
    serde::de::DeserializeOwned,
    tracing::{debug, info},
};

use crate::{
    error::SalesforceError,
    types::{ApiErrorItem, ConnectionOptions, QueryResult},
};

/// An authenticated REST session.
///
/// When the API rejects the access token (HTTP 401), or no access token is
/// held at all, the connection performs a refresh-token grant and repeats the
/// request once. The new token is kept so the caller can persist it; see
/// [`Connection::take_refreshed_access_token`].
pub struct Connection {
    client: reqwest::Client,
    oauth2: Arc<OAuthConfig>,
    api_version: String,
    access_token: Option<String>,
    refresh_token: String,
    instance_url: String,
    refreshed: Option<String>,
}

impl Connection {
    pub fn new(client: reqwest::Client, options: ConnectionOptions) -> Self {
        let ConnectionOptions {
            credentials,
            oauth2,
            api_version,
        } = options;
        Self {
            client,
            oauth2,
            api_version,
            access_token: credentials.access_token.filter(|t| !t.is_empty()),
            refresh_token: credentials.refresh_token,
            instance_url: credentials.instance_url,
            refreshed: None,
        }
    }

    /// Access token obtained by a refresh during this connection's lifetime,
    /// kept even when the request that followed the refresh failed.
    pub fn take_refreshed_access_token(&mut self) -> Option<String> {
        self.refreshed.take()
    }

    /// Run a SOQL query.
    pub async fn query<T: DeserializeOwned>(
        &mut self,
        soql: &str,
    ) -> Result<QueryResult<T>, SalesforceError> {
        let mut refreshed = false;
        let token = match self.access_token.clone() {
            Some(token) => token,
            None => {
                refreshed = true;
                self.refresh().await?
            },
        };

        match self.send_query(&token, soql).await {
            Err(SalesforceError::Unauthorized(reason)) if !refreshed => {
                debug!(%reason, "session rejected, refreshing access token");
                let token = self.refresh().await?;
                self.send_query(&token, soql).await
            },
            other => other,
        }
    }

    fn query_url(&self) -> String {
        format!(
            "{}/services/data/v{}/query",
            self.instance_url.trim_end_matches('/'),
            self.api_version
        )
    }

    async fn send_query<T: DeserializeOwned>(
        &self,
        token: &str,
        soql: &str,
    ) -> Result<QueryResult<T>, SalesforceError> {
        let resp = self
            .client
            .get(self.query_url())
            .bearer_auth(token)
            .query(&[("q", soql)])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(SalesforceError::Unauthorized(api_error_message(&body)));
        }
        if !status.is_success() {
            return Err(SalesforceError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }
        serde_json::from_str(&body).map_err(SalesforceError::Decode)
    }

    async fn refresh(&mut self) -> Result<String, SalesforceError> {
        let refreshed = refresh_access_token(&self.client, &TokenRefreshRequest {
            token_url: &self.oauth2.token_url,
            client_id: &self.oauth2.client_id,
            client_secret: &self.oauth2.client_secret,
            refresh_token: &self.refresh_token,
        })
        .await
        .map_err(SalesforceError::Refresh)?;

        if let Some(url) = refreshed.instance_url {
            self.instance_url = url;
        }
        self.access_token = Some(refreshed.access_token.clone());
        self.refreshed = Some(refreshed.access_token.clone());
        info!(instance_url = %self.instance_url, "salesforce access token refreshed");
        Ok(refreshed.access_token)
    }
}

/// Flatten the REST API's `[{"message", "errorCode"}]` error array.
fn api_error_message(body: &str) -> String {
    if let Ok(items) = serde_json::from_str::<Vec<ApiErrorItem>>(body)
        && !items.is_empty()
    {
        return items
            .iter()
            .map(|item| match &item.error_code {
                Some(code) => format!("{code}: {}", item.message),
                None => item.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; ");
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "empty response body".into()
    } else {
        trimmed.chars().take(200).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_joins_items() {
        let body = r#"[{"message":"Session expired or invalid","errorCode":"INVALID_SESSION_ID"},
                      {"message":"second"}]"#;
        assert_eq!(
            api_error_message(body),
            "INVALID_SESSION_ID: Session expired or invalid; second"
        );
    }

    #[test]
    fn test_api_error_message_falls_back_to_body() {
        assert_eq!(api_error_message("[]"), "[]");
        assert_eq!(api_error_message(""), "empty response body");
        assert_eq!(api_error_message("upstream timeout"), "upstream timeout");
    }
}
