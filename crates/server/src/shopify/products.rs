//! Product lookup and write operations.

use bagy_bridge_core::shopify::Product;
use serde::Serialize;
use tracing::instrument;

use super::types::{ProductEnvelope, ProductsResponse};
use super::{ShopifyClient, ShopifyError};

/// Request envelope the REST API expects around a product body.
#[derive(Debug, Serialize)]
struct ProductRequest<'a> {
    product: &'a Product,
}

impl ShopifyClient {
    /// Look up an existing product by handle.
    ///
    /// Returns the product's destination identifier, or `None` when no
    /// product with that handle exists (the create branch, not an error).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn find_product_by_handle(&self, handle: &str) -> Result<Option<i64>, ShopifyError> {
        let response: ProductsResponse = self
            .get_json("products.json", &[("handle", handle)])
            .await?;
        Ok(response.products.into_iter().next().map(|p| p.id))
    }

    /// Create a new product and return its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or is rejected.
    #[instrument(skip_all, fields(handle = %product.handle))]
    pub async fn create_product(&self, product: &Product) -> Result<i64, ShopifyError> {
        let response: ProductEnvelope = self
            .post_json("products.json", &ProductRequest { product })
            .await?;
        Ok(response.product.id)
    }

    /// Replace an existing product in full.
    ///
    /// Every field is resent; nothing is patched.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or is rejected.
    #[instrument(skip_all, fields(product_id = id, handle = %product.handle))]
    pub async fn update_product(&self, id: i64, product: &Product) -> Result<(), ShopifyError> {
        let mut body = product.clone();
        body.id = Some(id);
        let _: ProductEnvelope = self
            .put_json(
                &format!("products/{id}.json"),
                &ProductRequest { product: &body },
            )
            .await?;
        Ok(())
    }
}
