pub mod error;
pub mod flow;
pub mod state;
pub mod types;

pub use {
    error::OAuthError,
    flow::{OAuthFlow, TokenRefreshRequest, build_authorization_url, refresh_access_token},
    state::{PendingStates, generate_state},
    types::{OAuthConfig, RefreshedToken, TokenSet},
};
