use {
    axum::{
        extract::{Query, State},
        http::{StatusCode, header},
        response::{IntoResponse, Response},
    },
    axum_extra::extract::cookie::CookieJar,
    forcelink_salesforce::Credentials,
    serde::Deserialize,
    tracing::{debug, info},
};

use crate::{
    error::GatewayError,
    server::AppState,
    session::SessionTokens,
    telemetry::{self, AUTHORIZE_REDIRECTS, CALLBACKS, REVOCATIONS, TOKEN_EXCHANGES, TOKEN_REFRESHES},
};

/// `301 Moved Permanently` that browsers must not cache; every target here
/// depends on the session.
pub(crate) fn redirect(location: &str) -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [
            (header::LOCATION, location.to_string()),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
    )
        .into_response()
}

/// `GET /authorize`
pub async fn authorize(State(state): State<AppState>, jar: CookieJar) -> Response {
    if SessionTokens::from_jar(&jar).refresh_token.is_some() {
        debug!("refresh token present, skipping authorization");
        return redirect("/");
    }

    let nonce = state.pending.issue();
    let url = state.flow.authorization_url(&nonce);
    telemetry::count(AUTHORIZE_REDIRECTS, "redirected");
    info!(pending = state.pending.len(), "redirecting to authorization endpoint");
    redirect(url.as_str())
}

/// Query parameters of the identity provider's redirect back to us.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// `GET /callback`
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Response), GatewayError> {
    let result = handle_callback(&state, jar, params).await;
    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    telemetry::count(CALLBACKS, outcome);
    result
}

async fn handle_callback(
    state: &AppState,
    jar: CookieJar,
    params: CallbackParams,
) -> Result<(CookieJar, Response), GatewayError> {
    if SessionTokens::from_jar(&jar).is_established() {
        debug!("session already established, ignoring callback");
        return Ok((jar, redirect("/")));
    }

    if let Some(error) = params.error.filter(|e| !e.is_empty()) {
        if let Some(description) = params.error_description.as_deref() {
            debug!(%error, %description, "authorization denied by identity provider");
        }
        return Err(GatewayError::AuthorizationDenied(error));
    }

    let state_ok = params
        .state
        .as_deref()
        .is_some_and(|nonce| state.pending.consume(nonce));
    if !state_ok {
        return Err(GatewayError::InvalidState);
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return Err(GatewayError::MissingAuthorizationCode);
    };

    let tokens = match state.flow.exchange(&code).await {
        Ok(tokens) => {
            telemetry::count(TOKEN_EXCHANGES, "ok");
            tokens
        },
        Err(e) => {
            telemetry::count(TOKEN_EXCHANGES, "error");
            return Err(GatewayError::TokenExchangeFailed(e.to_string()));
        },
    };

    let jar = state.cookies.store_tokens(jar, &tokens);
    Ok((jar, redirect("/")))
}

/// `GET /`
///
/// A refreshed access token is written back to its cookie on success and on
/// failure alike.
pub async fn index(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Response) {
    let session = SessionTokens::from_jar(&jar);
    let Some(refresh_token) = session.refresh_token else {
        return (jar, redirect("/authorize"));
    };
    let Some(instance_url) = session.instance_url else {
        let err = GatewayError::DownstreamQueryFailed("missing instance cookie".into());
        return (jar, err.into_response());
    };

    let load = state
        .crm
        .load_contacts(Credentials {
            access_token: session.access_token,
            refresh_token,
            instance_url,
        })
        .await;

    let jar = match load.refreshed_access_token {
        Some(access_token) => {
            telemetry::count(TOKEN_REFRESHES, "ok");
            state.cookies.store_access_token(jar, access_token)
        },
        None => jar,
    };
    let resp = match load.result {
        Ok(summary) => (StatusCode::OK, summary.to_string()).into_response(),
        Err(e) => GatewayError::DownstreamQueryFailed(e.to_string()).into_response(),
    };
    (jar, resp)
}

/// `GET /revoke`
pub async fn revoke(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, &'static str), GatewayError> {
    let session = SessionTokens::from_jar(&jar);
    let Some(refresh_token) = session.refresh_token else {
        telemetry::count(REVOCATIONS, "missing_refresh_token");
        return Err(GatewayError::MissingRefreshToken);
    };
    let Some(instance_url) = session.instance_url else {
        telemetry::count(REVOCATIONS, "error");
        return Err(GatewayError::RevocationFailed(
            "missing instance cookie, cannot locate the revoke endpoint".into(),
        ));
    };

    if let Err(e) = state.flow.revoke(&instance_url, &refresh_token).await {
        telemetry::count(REVOCATIONS, "error");
        return Err(GatewayError::RevocationFailed(e.to_string()));
    }

    telemetry::count(REVOCATIONS, "ok");
    Ok((state.cookies.clear_tokens(jar), "Token revoked"))
}

pub async fn health() -> &'static str {
    "ok"
}
