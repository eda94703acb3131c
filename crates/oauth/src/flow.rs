use std::sync::Arc;

use {
    reqwest::header::ACCEPT,
    secrecy::{ExposeSecret, SecretString},
    tracing::{debug, info, warn},
    url::Url,
};

use crate::{
    error::OAuthError,
    types::{ErrorResponse, OAuthConfig, RefreshedToken, TokenResponse, TokenSet},
};

/// Build the authorization redirect for `state`.
///
/// Parameters are appended in the order `client_id`, `redirect_uri`,
/// `response_type`, `state`, `scope`; each value is form-urlencoded.
pub fn build_authorization_url(config: &OAuthConfig, state: &str) -> Result<Url, OAuthError> {
    let mut url = parse_url(&config.auth_url)?;
    append_authorization_params(&mut url, config, state);
    Ok(url)
}

fn append_authorization_params(url: &mut Url, config: &OAuthConfig, state: &str) {
    let mut query = url.query_pairs_mut();
    query
        .append_pair("client_id", &config.client_id)
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("state", state);
    if !config.scopes.is_empty() {
        query.append_pair("scope", &config.scopes.join(" "));
    }
}

fn parse_url(raw: &str) -> Result<Url, OAuthError> {
    Url::parse(raw).map_err(|source| OAuthError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

/// Parameters for a `refresh_token` grant.
pub struct TokenRefreshRequest<'a> {
    pub token_url: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a SecretString,
    pub refresh_token: &'a str,
}

/// Exchange a refresh token for a new access token.
pub async fn refresh_access_token(
    client: &reqwest::Client,
    req: &TokenRefreshRequest<'_>,
) -> Result<RefreshedToken, OAuthError> {
    let body = post_form(client, req.token_url, &[
        ("grant_type", "refresh_token"),
        ("refresh_token", req.refresh_token),
        ("client_id", req.client_id),
        ("client_secret", req.client_secret.expose_secret().as_str()),
    ])
    .await?;

    let parsed: TokenResponse = serde_json::from_str(&body).map_err(OAuthError::Decode)?;
    let refreshed = RefreshedToken {
        access_token: required(parsed.access_token, "access_token")?,
        instance_url: parsed.instance_url.filter(|u| !u.is_empty()),
    };
    debug!("access token refreshed");
    Ok(refreshed)
}

/// Authorization-code client for a single connected app.
pub struct OAuthFlow {
    config: Arc<OAuthConfig>,
    auth_url: Url,
    client: reqwest::Client,
}

impl OAuthFlow {
    /// Fails if the configured authorization endpoint is not a valid URL.
    pub fn new(config: Arc<OAuthConfig>, client: reqwest::Client) -> Result<Self, OAuthError> {
        let auth_url = parse_url(&config.auth_url)?;
        parse_url(&config.token_url)?;
        Ok(Self {
            config,
            auth_url,
            client,
        })
    }

    pub fn authorization_url(&self, state: &str) -> Url {
        let mut url = self.auth_url.clone();
        append_authorization_params(&mut url, &self.config, state);
        url
    }

    /// Redeem an authorization code. Issues exactly one request and never retries.
    pub async fn exchange(&self, code: &str) -> Result<TokenSet, OAuthError> {
        let cfg = &self.config;
        let body = post_form(&self.client, &cfg.token_url, &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", cfg.client_id.as_str()),
            ("client_secret", cfg.client_secret.expose_secret().as_str()),
            ("redirect_uri", cfg.redirect_uri.as_str()),
        ])
        .await?;

        let parsed: TokenResponse = serde_json::from_str(&body).map_err(OAuthError::Decode)?;
        let tokens = TokenSet {
            access_token: required(parsed.access_token, "access_token")?,
            refresh_token: required(parsed.refresh_token, "refresh_token")?,
            instance_url: required(parsed.instance_url, "instance_url")?,
        };
        info!(instance_url = %tokens.instance_url, "authorization code exchanged");
        Ok(tokens)
    }

    /// Revoke `token` at `{instance_url}/services/oauth2/revoke`.
    pub async fn revoke(&self, instance_url: &str, token: &str) -> Result<(), OAuthError> {
        let endpoint = revoke_endpoint(instance_url);
        post_form(&self.client, &endpoint, &[("token", token)]).await?;
        info!(%instance_url, "token revoked");
        Ok(())
    }
}

pub(crate) fn revoke_endpoint(instance_url: &str) -> String {
    format!(
        "{}/services/oauth2/revoke",
        instance_url.trim_end_matches('/')
    )
}

fn required(value: Option<String>, field: &'static str) -> Result<String, OAuthError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(OAuthError::MissingField(field))
}

/// POST a form-encoded body and return the response text of a 2xx reply.
async fn post_form(
    client: &reqwest::Client,
    endpoint: &str,
    form: &[(&str, &str)],
) -> Result<String, OAuthError> {
    let http_err = |source| OAuthError::Http {
        endpoint: endpoint.to_string(),
        source,
    };

    let resp = client
        .post(endpoint)
        .header(ACCEPT, "application/json")
        .form(form)
        .send()
        .await
        .map_err(http_err)?;

    let status = resp.status();
    let body = resp.text().await.map_err(http_err)?;

    if !status.is_success() {
        let message = error_message(&body);
        warn!(%endpoint, status = status.as_u16(), %message, "oauth endpoint rejected request");
        return Err(OAuthError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message,
        });
    }
    Ok(body)
}

fn error_message(body: &str) -> String {
    if let Ok(ErrorResponse {
        error,
        error_description,
    }) = serde_json::from_str(body)
    {
        match (error, error_description) {
            (Some(code), Some(description)) => return format!("{code}: {description}"),
            (Some(msg), None) | (None, Some(msg)) => return msg,
            (None, None) => {},
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "empty response body".into()
    } else {
        trimmed.chars().take(200).collect()
    }
}
