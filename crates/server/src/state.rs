//! Shared application state.

use crate::shopify::ShopifyClient;

/// State shared across request handlers.
///
/// The Shopify client (and the call governor inside it) is the only shared
/// resource; each event's translation is self-contained.
#[derive(Clone, Debug)]
pub struct AppState {
    pub shopify: ShopifyClient,
}
