#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("invalid endpoint URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("token response is missing '{0}'")]
    MissingField(&'static str),

    #[error("token response is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),
}
