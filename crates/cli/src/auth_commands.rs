use std::{path::Path, sync::Arc, time::Duration};

use {
    anyhow::Result,
    clap::Subcommand,
    forcelink_config::ForcelinkConfig,
    forcelink_gateway::state::oauth_config,
    forcelink_oauth::{OAuthFlow, build_authorization_url, generate_state},
    url::Url,
};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Print an authorization URL for the configured connected app.
    ///
    /// The embedded state is not known to any running gateway, so the
    /// callback will reject it. Use this to check redirect and scope setup.
    Url {
        /// Also open the URL in the system browser.
        #[arg(long)]
        open: bool,
    },
    /// Revoke a token without going through a browser session.
    Revoke {
        /// Org instance URL, e.g. `https://na1.salesforce.com`.
        #[arg(long)]
        instance_url: String,
        /// Access or refresh token to revoke.
        #[arg(long, env = "SALESFORCE_REVOKE_TOKEN", hide_env_values = true)]
        token: String,
    },
}

pub async fn handle_auth(action: AuthAction, config_path: Option<&Path>) -> Result<()> {
    let config = forcelink_config::load(config_path)?;
    match action {
        AuthAction::Url { open: launch } => print_url(&config, launch),
        AuthAction::Revoke {
            instance_url,
            token,
        } => revoke(&config, &instance_url, &token).await,
    }
}

fn authorization_url(config: &ForcelinkConfig) -> Result<Url> {
    let oauth = oauth_config(&config.salesforce);
    Ok(build_authorization_url(&oauth, &generate_state())?)
}

fn print_url(config: &ForcelinkConfig, launch: bool) -> Result<()> {
    let url = authorization_url(config)?;
    println!("{url}");
    if launch && open::that(url.as_str()).is_err() {
        println!("Could not open browser. Please visit the URL above.");
    }
    Ok(())
}

async fn revoke(config: &ForcelinkConfig, instance_url: &str, token: &str) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.salesforce.http_timeout_secs))
        .build()?;
    let flow = OAuthFlow::new(Arc::new(oauth_config(&config.salesforce)), client)?;
    flow.revoke(instance_url, token).await?;
    println!("Token revoked");
    Ok(())
}

#[cfg(test)]
mod tests {
    use {forcelink_config::load_with, secrecy::SecretString};

    use super::*;

    #[test]
    fn test_authorization_url_uses_config() {
        let mut config = load_with(None, |key: &str| match key {
            "SALESFORCE_CLIENT_ID" => Some("cid".into()),
            "SALESFORCE_CLIENT_SECRET" => Some("secret".into()),
            "SALESFORCE_CALLBACK_URL" => Some("http://localhost:3000/callback".into()),
            "SALESFORCE_SCOPES" => Some("api".into()),
            _ => None,
        })
        .unwrap();
        config.salesforce.client_secret = SecretString::new("rotated".into());

        let url = authorization_url(&config).unwrap();
        assert!(
            url.as_str()
                .starts_with("https://login.salesforce.com/services/oauth2/authorize?")
        );
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("client_id".into(), "cid".into())));
        assert!(pairs.contains(&("scope".into(), "api".into())));
        assert!(!url.as_str().contains("rotated"));
    }
}
