use std::fmt;

use {serde_json::Value, tracing::debug};

use crate::{
    client::Connection,
    error::SalesforceError,
    types::{ConnectionOptions, QueryResult},
};

pub const CONTACT_COUNT_QUERY: &str = "SELECT count() FROM Contact";

/// Successful contact count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSummary {
    pub total: u64,
}

impl fmt::Display for ContactSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Success! Loaded {} contacts from SFDC", self.total)
    }
}

/// Outcome of [`load_contacts`].
///
/// `refreshed_access_token` is set whenever a refresh succeeded, including
/// when the query that followed it failed. The caller must store it in place
/// of the old token either way.
pub struct ContactLoad {
    pub result: Result<ContactSummary, SalesforceError>,
    pub refreshed_access_token: Option<String>,
}

impl fmt::Debug for ContactLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactLoad")
            .field("result", &self.result)
            .field("refreshed", &self.refreshed_access_token.is_some())
            .finish()
    }
}

/// Count the org's Contact records.
pub async fn load_contacts(client: reqwest::Client, options: ConnectionOptions) -> ContactLoad {
    let mut conn = Connection::new(client, options);
    let result = conn
        .query::<Value>(CONTACT_COUNT_QUERY)
        .await
        .map(|counted: QueryResult<Value>| {
            debug!(total = counted.total_size, "contact count loaded");
            ContactSummary {
                total: counted.total_size,
            }
        });
    ContactLoad {
        result,
        refreshed_access_token: conn.take_refreshed_access_token(),
    }
}
