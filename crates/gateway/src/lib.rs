//! HTTP gateway: the authorization-code login flow, the contact-count page,
//! and token revocation, with tokens kept in browser cookies.

pub mod error;
pub mod routes;
pub mod server;
pub mod services;
pub mod session;
pub mod state;
pub mod telemetry;

pub use {
    error::GatewayError,
    server::{AppState, build_router, start_gateway},
    services::{CrmService, LiveCrmService},
    state::GatewayState,
};
