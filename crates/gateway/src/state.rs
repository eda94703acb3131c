use std::{sync::Arc, time::Duration};

use {
    forcelink_config::{ForcelinkConfig, SalesforceConfig},
    forcelink_oauth::{OAuthConfig, OAuthFlow, PendingStates},
    secrecy::{ExposeSecret, SecretString},
};

use crate::{
    services::{CrmService, LiveCrmService},
    session::CookiePolicy,
};

/// Shared, read-mostly state handed to every request.
pub struct GatewayState {
    pub flow: OAuthFlow,
    pub pending: PendingStates,
    pub crm: Arc<dyn CrmService>,
    pub cookies: CookiePolicy,
}

impl GatewayState {
    pub fn from_config(config: &ForcelinkConfig) -> anyhow::Result<Self> {
        let sf = &config.salesforce;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(sf.http_timeout_secs))
            .user_agent(concat!("forcelink/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let oauth = Arc::new(oauth_config(sf));
        let flow = OAuthFlow::new(Arc::clone(&oauth), client.clone())?;
        let crm = Arc::new(LiveCrmService::new(client, oauth, sf.api_version.clone()));

        Ok(Self {
            flow,
            pending: PendingStates::new(Duration::from_secs(sf.state_ttl_secs)),
            crm,
            cookies: CookiePolicy {
                secure: config.server.secure_cookies,
            },
        })
    }

    /// Replace the downstream CRM service.
    pub fn with_crm_service(mut self, crm: Arc<dyn CrmService>) -> Self {
        self.crm = crm;
        self
    }
}

/// Connected-app settings in the shape the OAuth client expects.
pub fn oauth_config(sf: &SalesforceConfig) -> OAuthConfig {
    OAuthConfig {
        client_id: sf.client_id.clone(),
        client_secret: SecretString::new(sf.client_secret.expose_secret().clone()),
        auth_url: sf.authorization_url.clone(),
        token_url: sf.token_url.clone(),
        redirect_uri: sf.callback_url.clone(),
        scopes: sf.scopes.clone(),
    }
}
