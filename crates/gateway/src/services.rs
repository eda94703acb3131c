use std::sync::Arc;

use {
    async_trait::async_trait,
    forcelink_oauth::OAuthConfig,
    forcelink_salesforce::{ConnectionOptions, ContactLoad, Credentials},
};

/// Downstream CRM reads performed on behalf of a browser session.
#[async_trait]
pub trait CrmService: Send + Sync {
    /// Count the org's contacts. A refreshed access token is reported even
    /// when the count itself failed.
    async fn load_contacts(&self, credentials: Credentials) -> ContactLoad;
}

/// Live service backed by the Salesforce REST API.
pub struct LiveCrmService {
    client: reqwest::Client,
    oauth2: Arc<OAuthConfig>,
    api_version: String,
}

impl LiveCrmService {
    pub fn new(client: reqwest::Client, oauth2: Arc<OAuthConfig>, api_version: String) -> Self {
        Self {
            client,
            oauth2,
            api_version,
        }
    }
}

#[async_trait]
impl CrmService for LiveCrmService {
    async fn load_contacts(&self, credentials: Credentials) -> ContactLoad {
        forcelink_salesforce::load_contacts(self.client.clone(), ConnectionOptions {
            credentials,
            oauth2: Arc::clone(&self.oauth2),
            api_version: self.api_version.clone(),
        })
        .await
    }
}
