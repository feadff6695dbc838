//! Bagy Bridge Server - relays Bagy catalog webhooks into Shopify.
//!
//! # Architecture
//!
//! - Axum web framework; one webhook endpoint plus a liveness probe
//! - Pure translation in `bagy-bridge-core`
//! - Shopify Admin REST API client, every call rate-limited and
//!   throttle-retried by the process-wide call governor
//! - No persistence: a failed event is lost unless Bagy redelivers it
//!
//! # Security
//!
//! The `SHOPIFY_ADMIN_TOKEN` grants full catalog access; it is held as a
//! secret and never logged.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod governor;
mod routes;
mod shopify;
mod state;
mod sync;

use config::Config;
use governor::CallGovernor;
use shopify::ShopifyClient;
use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bagy_bridge_server=info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(store = %config.shopify.store, "configuration loaded");

    let shopify = ShopifyClient::new(&config.shopify, CallGovernor::new())
        .expect("Failed to build Shopify client");

    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { shopify });

    let addr = SocketAddr::from((config.host, config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    tracing::info!(%addr, "server online");

    axum::serve(listener, app).await.expect("Server error");
}
