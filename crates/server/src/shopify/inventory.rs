//! Variant, location, and inventory-level operations for the stock path.

use tracing::instrument;

use super::types::{InventoryLevelSet, LocationRecord, LocationsResponse, VariantRecord, VariantsResponse};
use super::{ShopifyClient, ShopifyError};

impl ShopifyClient {
    /// Look up a variant by SKU.
    ///
    /// Returns `None` when no variant matches; expected for SKUs that have
    /// not been synced as full products yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn find_variant_by_sku(
        &self,
        sku: &str,
    ) -> Result<Option<VariantRecord>, ShopifyError> {
        let response: VariantsResponse = self.get_json("variants.json", &[("sku", sku)]).await?;
        Ok(response.variants.into_iter().next())
    }

    /// Fetch the first stock location.
    ///
    /// The bridge assumes a single relevant location; any further entries
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn first_location(&self) -> Result<Option<LocationRecord>, ShopifyError> {
        let response: LocationsResponse = self.get_json("locations.json", &[]).await?;
        Ok(response.locations.into_iter().next())
    }

    /// Set the absolute available quantity for an inventory item at a
    /// location.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or is rejected.
    #[instrument(skip(self))]
    pub async fn set_inventory_level(
        &self,
        location_id: i64,
        inventory_item_id: i64,
        available: i64,
    ) -> Result<(), ShopifyError> {
        let body = InventoryLevelSet {
            location_id,
            inventory_item_id,
            available,
        };
        let _: serde_json::Value = self.post_json("inventory_levels/set.json", &body).await?;
        Ok(())
    }
}
