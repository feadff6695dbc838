//! Webhook routes.
//!
//! One endpoint receives every Bagy event; classification decides whether it
//! is a full product upsert or a variant-level stock adjustment. A liveness
//! probe at `/` serves uptime monitoring.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde_json::Value;
use tracing::instrument;

use bagy_bridge_core::bagy::{WebhookEvent, classify};
use bagy_bridge_core::translate::translate_product;

use crate::error::AppError;
use crate::state::AppState;
use crate::sync::{update_variant_stock, upsert_product};

/// Build the application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
        .route("/webhook/products", post(handle_catalog_event))
}

async fn health() -> &'static str {
    "Server online"
}

/// Handle a Bagy catalog event.
///
/// Malformed bodies are rejected before any outbound call. The sender gets a
/// plain-text acknowledgment either way; processing detail lives in the logs.
#[instrument(skip_all)]
async fn handle_catalog_event(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<&'static str, AppError> {
    let event = classify(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;

    match event {
        WebhookEvent::Stock { sku, quantity } => {
            tracing::info!(sku, quantity, "variant stock event received");
            update_variant_stock(&state.shopify, &sku, quantity).await?;
            Ok("Variant stock updated.")
        }
        WebhookEvent::Product(product) => {
            tracing::info!(
                name = product.name.as_deref().or(product.slug.as_deref()).unwrap_or("[unnamed]"),
                "product event received"
            );
            let canonical = translate_product(&product);
            upsert_product(&state.shopify, &canonical).await?;
            Ok("Product processed.")
        }
    }
}
