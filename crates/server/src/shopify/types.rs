//! Wire types for Admin REST lookups and inventory writes.
//!
//! Lookup responses are deserialized only as far as the sync paths need:
//! identifiers, SKUs, and inventory item references.

use serde::{Deserialize, Serialize};

/// Response envelope for `GET products.json?handle=...`.
#[derive(Debug, Deserialize)]
pub struct ProductsResponse {
    #[serde(default)]
    pub products: Vec<ProductRecord>,
}

/// Response envelope for `POST products.json` / `PUT products/{id}.json`.
#[derive(Debug, Deserialize)]
pub struct ProductEnvelope {
    pub product: ProductRecord,
}

/// An existing product on the Shopify side.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    pub id: i64,
}

/// Response envelope for `GET variants.json?sku=...`.
#[derive(Debug, Deserialize)]
pub struct VariantsResponse {
    #[serde(default)]
    pub variants: Vec<VariantRecord>,
}

/// An existing variant on the Shopify side.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantRecord {
    pub id: i64,
    /// The stockable unit addressed by inventory operations.
    pub inventory_item_id: i64,
}

/// Response envelope for `GET locations.json`.
#[derive(Debug, Deserialize)]
pub struct LocationsResponse {
    #[serde(default)]
    pub locations: Vec<LocationRecord>,
}

/// A stock location; only the first one is ever used.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationRecord {
    pub id: i64,
    pub name: Option<String>,
}

/// Request body for `POST inventory_levels/set.json` (absolute quantity).
#[derive(Debug, Serialize)]
pub struct InventoryLevelSet {
    pub location_id: i64,
    pub inventory_item_id: i64,
    pub available: i64,
}
