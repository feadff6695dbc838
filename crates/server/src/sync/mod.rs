//! Reconciliation of translated products and variant stock against Shopify.
//!
//! Two independent paths, both issuing their calls through the governed
//! client: full product payloads go through [`upsert_product`], variant-level
//! stock events through [`update_variant_stock`]. Nothing is persisted
//! locally; the only state consulted is what Shopify returns on lookup.

use bagy_bridge_core::shopify::Product;
use tracing::instrument;

use crate::shopify::types::{LocationRecord, VariantRecord};
use crate::shopify::{ShopifyClient, ShopifyError};

/// What a sync pass decided to do, carrying the destination identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    /// No matching handle existed; a new product was created.
    Create(i64),
    /// The handle matched an existing product; it was replaced in full.
    Update(i64),
    /// Only the stock level of an existing variant was adjusted.
    StockOnly(i64),
}

/// The catalog operations the sync paths need from Shopify.
///
/// Implemented by [`ShopifyClient`]; tests drive the paths with a recording
/// fake instead.
pub(crate) trait CatalogApi {
    async fn find_product_by_handle(&self, handle: &str) -> Result<Option<i64>, ShopifyError>;
    async fn create_product(&self, product: &Product) -> Result<i64, ShopifyError>;
    async fn update_product(&self, id: i64, product: &Product) -> Result<(), ShopifyError>;
    async fn find_variant_by_sku(&self, sku: &str) -> Result<Option<VariantRecord>, ShopifyError>;
    async fn first_location(&self) -> Result<Option<LocationRecord>, ShopifyError>;
    async fn set_inventory_level(
        &self,
        location_id: i64,
        inventory_item_id: i64,
        available: i64,
    ) -> Result<(), ShopifyError>;
}

// The trait's `async fn`s leave the returned futures' `Send`-ness opaque,
// which the axum handlers need; this impl refines each return type to
// `impl Future + Send` so callers generic over `CatalogApi` stay `Send`
// when instantiated with the real client.
#[allow(refining_impl_trait)]
impl CatalogApi for ShopifyClient {
    fn find_product_by_handle(
        &self,
        handle: &str,
    ) -> impl Future<Output = Result<Option<i64>, ShopifyError>> + Send {
        Self::find_product_by_handle(self, handle)
    }

    fn create_product(
        &self,
        product: &Product,
    ) -> impl Future<Output = Result<i64, ShopifyError>> + Send {
        Self::create_product(self, product)
    }

    fn update_product(
        &self,
        id: i64,
        product: &Product,
    ) -> impl Future<Output = Result<(), ShopifyError>> + Send {
        Self::update_product(self, id, product)
    }

    fn find_variant_by_sku(
        &self,
        sku: &str,
    ) -> impl Future<Output = Result<Option<VariantRecord>, ShopifyError>> + Send {
        Self::find_variant_by_sku(self, sku)
    }

    fn first_location(
        &self,
    ) -> impl Future<Output = Result<Option<LocationRecord>, ShopifyError>> + Send {
        Self::first_location(self)
    }

    fn set_inventory_level(
        &self,
        location_id: i64,
        inventory_item_id: i64,
        available: i64,
    ) -> impl Future<Output = Result<(), ShopifyError>> + Send {
        Self::set_inventory_level(self, location_id, inventory_item_id, available)
    }
}

/// Create or fully replace the product with this handle.
///
/// One lookup decides the branch: a match means `PUT` with the existing
/// identifier merged in, a miss means `POST`. Redelivering the same payload
/// therefore never creates a duplicate.
///
/// # Errors
///
/// Any lookup or write failure, including governor retry exhaustion,
/// surfaces unchanged; no additional retry happens at this layer.
#[instrument(skip_all, fields(handle = %product.handle))]
pub(crate) async fn upsert_product<A: CatalogApi>(
    api: &A,
    product: &Product,
) -> Result<SyncDecision, ShopifyError> {
    match api.find_product_by_handle(&product.handle).await? {
        Some(id) => {
            api.update_product(id, product).await?;
            tracing::info!(product_id = id, "product updated");
            Ok(SyncDecision::Update(id))
        }
        None => {
            let id = api.create_product(product).await?;
            tracing::info!(product_id = id, "product created");
            Ok(SyncDecision::Create(id))
        }
    }
}

/// Set the absolute stock quantity for the variant with this SKU.
///
/// A sequential three-call chain: variant lookup, first location, inventory
/// set. No compensation runs if a later step fails after an earlier one
/// succeeded. An unknown SKU is an expected no-op (`None`), not an error.
///
/// # Errors
///
/// Returns an error if any API call fails or no stock location exists.
#[instrument(skip(api))]
pub(crate) async fn update_variant_stock<A: CatalogApi>(
    api: &A,
    sku: &str,
    quantity: i64,
) -> Result<Option<SyncDecision>, ShopifyError> {
    if sku.trim().is_empty() {
        tracing::warn!("stock event without a SKU, skipping");
        return Ok(None);
    }

    let Some(variant) = api.find_variant_by_sku(sku).await? else {
        tracing::warn!("no Shopify variant matches this SKU, nothing to update");
        return Ok(None);
    };

    let location = api
        .first_location()
        .await?
        .ok_or_else(|| ShopifyError::NotFound("no stock locations configured".to_string()))?;

    api.set_inventory_level(location.id, variant.inventory_item_id, quantity)
        .await?;
    tracing::info!(
        variant_id = variant.id,
        location_id = location.id,
        location = location.name.as_deref().unwrap_or("unnamed"),
        quantity,
        "variant stock set"
    );
    Ok(Some(SyncDecision::StockOnly(variant.id)))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use bagy_bridge_core::bagy::SourceProduct;
    use bagy_bridge_core::translate::translate_product;

    use super::*;

    /// In-memory Shopify standing in for the REST API, recording every call.
    #[derive(Default)]
    struct FakeShopify {
        calls: RefCell<Vec<String>>,
        /// handle → product id
        products: RefCell<HashMap<String, i64>>,
        /// sku → variant
        variants: HashMap<String, VariantRecord>,
        locations: Vec<LocationRecord>,
    }

    impl FakeShopify {
        fn record(&self, call: impl Into<String>) {
            self.calls.borrow_mut().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl CatalogApi for FakeShopify {
        async fn find_product_by_handle(&self, handle: &str) -> Result<Option<i64>, ShopifyError> {
            self.record(format!("find_product {handle}"));
            Ok(self.products.borrow().get(handle).copied())
        }

        async fn create_product(&self, product: &Product) -> Result<i64, ShopifyError> {
            self.record(format!("create {}", product.handle));
            let id = 1000 + i64::try_from(self.products.borrow().len()).expect("small");
            self.products.borrow_mut().insert(product.handle.clone(), id);
            Ok(id)
        }

        async fn update_product(&self, id: i64, product: &Product) -> Result<(), ShopifyError> {
            self.record(format!("update {id} {}", product.handle));
            Ok(())
        }

        async fn find_variant_by_sku(
            &self,
            sku: &str,
        ) -> Result<Option<VariantRecord>, ShopifyError> {
            self.record(format!("find_variant {sku}"));
            Ok(self.variants.get(sku).cloned())
        }

        async fn first_location(&self) -> Result<Option<LocationRecord>, ShopifyError> {
            self.record("locations");
            Ok(self.locations.first().cloned())
        }

        async fn set_inventory_level(
            &self,
            location_id: i64,
            inventory_item_id: i64,
            available: i64,
        ) -> Result<(), ShopifyError> {
            self.record(format!("set_inventory {location_id} {inventory_item_id} {available}"));
            Ok(())
        }
    }

    fn ring_product() -> Product {
        translate_product(&SourceProduct {
            name: Some("Ring".into()),
            slug: Some("ring-1".into()),
            ..SourceProduct::default()
        })
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates_never_duplicates() {
        let fake = FakeShopify::default();
        let product = ring_product();

        let first = upsert_product(&fake, &product).await.expect("first run");
        assert_eq!(first, SyncDecision::Create(1000));

        let second = upsert_product(&fake, &product).await.expect("second run");
        assert_eq!(second, SyncDecision::Update(1000));

        assert_eq!(
            fake.calls(),
            vec![
                "find_product ring-1",
                "create ring-1",
                "find_product ring-1",
                "update 1000 ring-1",
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_sku_stops_after_lookup() {
        let fake = FakeShopify {
            locations: vec![LocationRecord {
                id: 77,
                name: Some("Main".into()),
            }],
            ..FakeShopify::default()
        };

        let outcome = update_variant_stock(&fake, "SKU1", 5)
            .await
            .expect("no-op succeeds");
        assert_eq!(outcome, None);
        assert_eq!(fake.calls(), vec!["find_variant SKU1"]);
    }

    #[tokio::test]
    async fn test_stock_chain_sets_absolute_quantity() {
        let mut variants = HashMap::new();
        variants.insert(
            "SKU1".to_string(),
            VariantRecord {
                id: 9,
                inventory_item_id: 900,
            },
        );
        let fake = FakeShopify {
            variants,
            locations: vec![LocationRecord {
                id: 77,
                name: Some("Main".into()),
            }],
            ..FakeShopify::default()
        };

        let outcome = update_variant_stock(&fake, "SKU1", 5)
            .await
            .expect("chain succeeds");
        assert_eq!(outcome, Some(SyncDecision::StockOnly(9)));
        assert_eq!(
            fake.calls(),
            vec!["find_variant SKU1", "locations", "set_inventory 77 900 5"]
        );
    }

    #[tokio::test]
    async fn test_no_locations_is_a_processing_failure() {
        let mut variants = HashMap::new();
        variants.insert(
            "SKU1".to_string(),
            VariantRecord {
                id: 9,
                inventory_item_id: 900,
            },
        );
        let fake = FakeShopify {
            variants,
            ..FakeShopify::default()
        };

        let result = update_variant_stock(&fake, "SKU1", 5).await;
        assert!(matches!(result, Err(ShopifyError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_blank_sku_skips_all_calls() {
        let fake = FakeShopify::default();
        let outcome = update_variant_stock(&fake, "  ", 5).await.expect("no-op");
        assert_eq!(outcome, None);
        assert!(fake.calls().is_empty());
    }
}
