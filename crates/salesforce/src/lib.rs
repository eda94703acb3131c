//! Minimal Salesforce REST client: one authenticated session, SOQL queries,
//! and transparent access-token refresh.

pub mod client;
pub mod contacts;
pub mod error;
pub mod types;

pub use {
    client::Connection,
    contacts::{CONTACT_COUNT_QUERY, ContactLoad, ContactSummary, load_contacts},
    error::SalesforceError,
    types::{ConnectionOptions, Credentials, QueryResult},
};
