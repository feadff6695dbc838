//! Shopify Admin REST product bodies.
//!
//! These are the shapes sent to `POST/PUT products.json`. Shopify's variant
//! model is fixed at three positional option slots; the invariants here
//! (at least one option axis, at least one variant, populated slots matching
//! the axis count) are upheld by [`crate::translate`].

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Hard Shopify limit on option axes per product.
pub const MAX_OPTIONS: usize = 3;

/// Synthetic axis name used when a product has no variation attributes.
pub const DEFAULT_OPTION_NAME: &str = "Title";

/// Placeholder option value for the synthetic axis and for unmatched slots.
pub const DEFAULT_OPTION_VALUE: &str = "Default Title";

/// All weights are normalized to kilograms.
pub const WEIGHT_UNIT: &str = "kg";

/// A named option axis with its ordered, deduplicated values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductOption {
    pub name: String,
    pub values: Vec<String>,
}

/// One purchasable variant, aligned to the product's option axes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductVariant {
    pub option1: Option<String>,
    pub option2: Option<String>,
    pub option3: Option<String>,
    /// Price as a fixed two-decimal string.
    pub price: String,
    pub sku: String,
    pub inventory_quantity: i64,
    pub inventory_management: &'static str,
    pub weight: Decimal,
    pub weight_unit: &'static str,
}

/// A product image by URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductImage {
    pub src: String,
}

/// A product metafield; used for the SEO title/description pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metafield {
    pub namespace: &'static str,
    pub key: &'static str,
    pub value: String,
    #[serde(rename = "type")]
    pub value_type: &'static str,
}

impl Metafield {
    /// The SEO page title metafield.
    #[must_use]
    pub fn seo_title(value: String) -> Self {
        Self {
            namespace: "global",
            key: "title_tag",
            value,
            value_type: "single_line_text_field",
        }
    }

    /// The SEO meta description metafield.
    #[must_use]
    pub fn seo_description(value: String) -> Self {
        Self {
            namespace: "global",
            key: "description_tag",
            value,
            value_type: "single_line_text_field",
        }
    }
}

/// The full product body for create/update calls.
///
/// Updates resend every field (full replace); `id` is set only when updating
/// an existing product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub handle: String,
    pub body_html: String,
    pub vendor: String,
    pub product_type: String,
    /// Serialized as the comma-joined string the REST API expects.
    #[serde(serialize_with = "join_tags")]
    pub tags: Vec<String>,
    pub images: Vec<ProductImage>,
    pub status: &'static str,
    pub published: bool,
    pub options: Vec<ProductOption>,
    pub variants: Vec<ProductVariant>,
    pub metafields: Vec<Metafield>,
}

fn join_tags<S: Serializer>(tags: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&tags.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_serialize_comma_joined() {
        let product = Product {
            id: None,
            title: "Ring".into(),
            handle: "ring-1".into(),
            body_html: String::new(),
            vendor: "Revenda Biju".into(),
            product_type: "Geral".into(),
            tags: vec!["prata".into(), "aneis".into()],
            images: vec![],
            status: "active",
            published: true,
            options: vec![],
            variants: vec![],
            metafields: vec![],
        };
        let value = serde_json::to_value(&product).expect("serializable");
        assert_eq!(value["tags"], "prata, aneis");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_metafield_constructors() {
        let m = Metafield::seo_description("desc".into());
        assert_eq!(m.namespace, "global");
        assert_eq!(m.key, "description_tag");
    }
}
