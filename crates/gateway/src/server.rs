use std::sync::Arc;

use {
    axum::{Router, routing::get},
    forcelink_config::ForcelinkConfig,
    tower_http::trace::TraceLayer,
    tracing::{info, warn},
};

use crate::{routes, state::GatewayState};

pub type AppState = Arc<GatewayState>;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/authorize", get(routes::authorize))
        .route("/callback", get(routes::callback))
        .route("/revoke", get(routes::revoke))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server and run until ctrl-c.
pub async fn start_gateway(config: &ForcelinkConfig, bind: &str, port: u16) -> anyhow::Result<()> {
    config.validate()?;
    let state = Arc::new(GatewayState::from_config(config)?);

    if !config.server.secure_cookies {
        warn!("session cookies are sent without the Secure flag");
    }
    warn!("tokens are stored unencrypted in browser cookies; use for local demos only");

    let app = build_router(state);
    #[cfg(feature = "prometheus")]
    let app = app.merge(crate::telemetry::prometheus_router()?);

    let addr = format!("{bind}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        addr = %listener.local_addr()?,
        callback_url = %config.salesforce.callback_url,
        "gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}
