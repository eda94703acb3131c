use {
    axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    tracing::warn,
};

/// Request-terminating failures. None of them is retried.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The identity provider redirected back with an `error` parameter.
    #[error("Got an error:{0}")]
    AuthorizationDenied(String),

    #[error("Invalid state")]
    InvalidState,

    #[error("Invalid code")]
    MissingAuthorizationCode,

    #[error("Failed to exchange authorization code: {0}")]
    TokenExchangeFailed(String),

    #[error("Failed to load contacts from Salesforce, reason: {0}")]
    DownstreamQueryFailed(String),

    #[error("Failed to revoke access, missing refresh_token")]
    MissingRefreshToken,

    #[error("{0}")]
    RevocationFailed(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::DownstreamQueryFailed(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Stable identifier used in logs and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AuthorizationDenied(_) => "authorization_denied",
            Self::InvalidState => "invalid_state",
            Self::MissingAuthorizationCode => "missing_authorization_code",
            Self::TokenExchangeFailed(_) => "token_exchange_failed",
            Self::DownstreamQueryFailed(_) => "downstream_query_failed",
            Self::MissingRefreshToken => "missing_refresh_token",
            Self::RevocationFailed(_) => "revocation_failed",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(kind = self.kind(), error = %self, "request failed");
        match &self {
            // Structured bodies keep `status: 400` even when the HTTP status is 403.
            Self::DownstreamQueryFailed(_) | Self::MissingRefreshToken => {
                let body = serde_json::json!({
                    "status": StatusCode::BAD_REQUEST.as_u16(),
                    "error": self.to_string(),
                });
                (status, Json(body)).into_response()
            },
            _ => (status, self.to_string()).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_wire_contract() {
        assert_eq!(
            GatewayError::AuthorizationDenied("access_denied".into()).to_string(),
            "Got an error:access_denied"
        );
        assert_eq!(GatewayError::InvalidState.to_string(), "Invalid state");
        assert_eq!(
            GatewayError::MissingAuthorizationCode.to_string(),
            "Invalid code"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GatewayError::DownstreamQueryFailed("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        for err in [
            GatewayError::InvalidState,
            GatewayError::MissingRefreshToken,
            GatewayError::RevocationFailed("x".into()),
            GatewayError::TokenExchangeFailed("x".into()),
        ] {
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{}", err.kind());
        }
    }

    #[test]
    fn test_into_response_status() {
        let resp = GatewayError::MissingRefreshToken.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = GatewayError::DownstreamQueryFailed("boom".into()).into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
