//! Mapping of source variations onto flattened option axes.

use rust_decimal::Decimal;

use crate::bagy::{SourceProduct, SourceVariation, non_empty};
use crate::options::attribute_value;
use crate::shopify::{DEFAULT_OPTION_VALUE, MAX_OPTIONS, ProductOption, ProductVariant, WEIGHT_UNIT};

/// Weight applied when neither the variation nor the parent carries one, in kg.
fn default_weight() -> Decimal {
    Decimal::new(1, 1) // 0.1
}

/// Format a price as the fixed two-decimal string Shopify expects.
fn format_price(price: Decimal) -> String {
    format!("{:.2}", price.round_dp(2))
}

/// Build one variant per source variation, in input order, aligned to the
/// given option axes.
///
/// A product with no variations yields exactly one variant synthesized from
/// the parent's own price, SKU, stock, and weight, carrying the placeholder
/// option value.
#[must_use]
pub fn map_variants(
    product: &SourceProduct,
    options: &[ProductOption],
    handle: &str,
) -> Vec<ProductVariant> {
    if product.variations.is_empty() {
        return vec![synthetic_variant(product, handle)];
    }

    product
        .variations
        .iter()
        .enumerate()
        .map(|(index, variation)| map_variant(product, variation, options, handle, index))
        .collect()
}

fn map_variant(
    product: &SourceProduct,
    variation: &SourceVariation,
    options: &[ProductOption],
    handle: &str,
    index: usize,
) -> ProductVariant {
    let mut slots = options
        .iter()
        .take(MAX_OPTIONS)
        .map(|axis| {
            attribute_value(variation, &axis.name)
                .unwrap_or(DEFAULT_OPTION_VALUE)
                .to_owned()
        })
        .map(Some);

    let price = variation.price.or(product.price).unwrap_or_default();
    let weight = variation
        .weight
        .or(product.weight)
        .unwrap_or_else(default_weight);

    ProductVariant {
        option1: slots.next().flatten(),
        option2: slots.next().flatten(),
        option3: slots.next().flatten(),
        price: format_price(price),
        sku: resolve_sku(variation, handle, index),
        inventory_quantity: variation.balance.unwrap_or(0),
        inventory_management: "shopify",
        weight,
        weight_unit: WEIGHT_UNIT,
    }
}

/// Resolve a variation's SKU through the ordered fallback chain:
/// `reference` → `sku` → variation id → `<handle>-<position>`.
///
/// The synthesized tail carries the product handle so that placeholder SKUs
/// from unrelated products can never collide.
fn resolve_sku(variation: &SourceVariation, handle: &str, index: usize) -> String {
    non_empty(variation.reference.as_deref())
        .or_else(|| non_empty(variation.sku.as_deref()))
        .map(ToOwned::to_owned)
        .or_else(|| variation.id.map(|id| id.to_string()))
        .unwrap_or_else(|| format!("{handle}-{}", index + 1))
}

fn synthetic_variant(product: &SourceProduct, handle: &str) -> ProductVariant {
    let sku = non_empty(product.reference.as_deref())
        .or_else(|| non_empty(product.sku.as_deref()))
        .map(ToOwned::to_owned)
        .or_else(|| product.id.map(|id| id.to_string()))
        .unwrap_or_else(|| format!("{handle}-1"));

    ProductVariant {
        option1: Some(DEFAULT_OPTION_VALUE.to_owned()),
        option2: None,
        option3: None,
        price: format_price(product.price.unwrap_or_default()),
        sku,
        inventory_quantity: product.balance.unwrap_or(0),
        inventory_management: "shopify",
        weight: product.weight.unwrap_or_else(default_weight),
        weight_unit: WEIGHT_UNIT,
    }
}
