//! Counters for the login flow. Compiled to no-ops without the `metrics` feature.

pub const AUTHORIZE_REDIRECTS: &str = "forcelink_authorize_redirects_total";
pub const CALLBACKS: &str = "forcelink_callbacks_total";
pub const TOKEN_EXCHANGES: &str = "forcelink_token_exchanges_total";
pub const TOKEN_REFRESHES: &str = "forcelink_token_refreshes_total";
pub const REVOCATIONS: &str = "forcelink_revocations_total";

#[cfg(feature = "metrics")]
pub(crate) fn count(name: &'static str, outcome: &'static str) {
    metrics::counter!(name, "outcome" => outcome).increment(1);
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn count(_name: &'static str, _outcome: &'static str) {}

/// Install the Prometheus recorder and expose it at `/metrics`.
#[cfg(feature = "prometheus")]
pub fn prometheus_router() -> anyhow::Result<axum::Router> {
    use axum::routing::get;

    let handle = metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;
    Ok(axum::Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    ))
}
