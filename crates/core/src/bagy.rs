//! Inbound Bagy webhook payload models.
//!
//! Bagy delivers partially-populated, loosely-typed records: any field may be
//! absent, numbers sometimes arrive as strings, and the same logical field
//! shows up under different names depending on the event. Every field here is
//! optional; fallback chains are resolved explicitly at translation time,
//! never by truthiness.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while interpreting an inbound webhook body.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The body (after envelope unwrapping) is not a JSON object.
    #[error("payload is not a JSON object")]
    NotAnObject,

    /// The record could not be deserialized into a product.
    #[error("malformed product record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A named attribute on a variation (e.g. `color: blue`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceAttribute {
    pub name: Option<String>,
    pub value: Option<String>,
}

/// One variation of a source product.
///
/// Carries at most two attribute slots; the SKU-like reference may live in
/// either `reference` or `sku`, in that order of preference.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceVariation {
    pub id: Option<i64>,
    #[serde(alias = "attribute_value_1")]
    pub attribute: Option<SourceAttribute>,
    #[serde(alias = "attribute_value_2")]
    pub attribute_secondary: Option<SourceAttribute>,
    pub price: Option<Decimal>,
    pub weight: Option<Decimal>,
    /// Absolute stock quantity.
    pub balance: Option<i64>,
    pub reference: Option<String>,
    pub sku: Option<String>,
}

/// An image reference; the URL key differs between Bagy event shapes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceImage {
    pub src: Option<String>,
    pub url: Option<String>,
}

impl SourceImage {
    /// Resolve the image URL, preferring `src` over `url`.
    #[must_use]
    pub fn resolved_url(&self) -> Option<&str> {
        non_empty(self.src.as_deref()).or_else(|| non_empty(self.url.as_deref()))
    }
}

/// A full product record from a Bagy webhook.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceProduct {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub price: Option<Decimal>,
    pub weight: Option<Decimal>,
    /// Comma-delimited tag string.
    pub tags: Option<String>,
    pub category: Option<NamedRef>,
    pub brand: Option<NamedRef>,
    pub vendor: Option<String>,
    #[serde(default)]
    pub images: Vec<SourceImage>,
    #[serde(default)]
    pub variations: Vec<SourceVariation>,
    pub reference: Option<String>,
    pub sku: Option<String>,
    pub balance: Option<i64>,
    pub active: Option<bool>,
}

/// A nested `{ name }` object (category, brand).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedRef {
    pub name: Option<String>,
}

/// A classified inbound event.
#[derive(Debug, Clone)]
pub enum WebhookEvent {
    /// Full product payload: translate and upsert.
    Product(Box<SourceProduct>),
    /// Variant-level stock event: adjust inventory only.
    Stock { sku: String, quantity: i64 },
}

/// Unwrap the `{ "data": ... }` envelope (or accept a bare record) and
/// classify the event.
///
/// A record with no name and no slug but a non-empty `reference` or `sku` is
/// a stock-only event. This rule can misroute a malformed full-product event
/// onto the stock path; it is kept as-is because the upstream platform emits
/// exactly this shape for variant stock changes.
///
/// # Errors
///
/// Returns [`PayloadError`] when the body is not an object or a full product
/// record fails to deserialize.
pub fn classify(body: &Value) -> Result<WebhookEvent, PayloadError> {
    let record = body.get("data").unwrap_or(body);
    if !record.is_object() {
        return Err(PayloadError::NotAnObject);
    }

    let has_name = field_present(record, "name");
    let has_slug = field_present(record, "slug");
    let sku = scalar_string(record.get("reference")).or_else(|| scalar_string(record.get("sku")));

    if !has_name && !has_slug && let Some(sku) = sku {
        let quantity = record.get("balance").and_then(Value::as_i64).unwrap_or(0);
        return Ok(WebhookEvent::Stock { sku, quantity });
    }

    let product: SourceProduct = serde_json::from_value(record.clone())?;
    Ok(WebhookEvent::Product(Box::new(product)))
}

/// A string that is `Some` and not blank.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn field_present(record: &Value, key: &str) -> bool {
    match record.get(key) {
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    }
}

/// Extract a SKU-like value, tolerating numeric references.
fn scalar_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => non_empty(Some(s)).map(ToOwned::to_owned),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_unwraps_data_envelope() {
        let body = json!({ "data": { "name": "Ring", "slug": "ring-1" } });
        match classify(&body).expect("valid payload") {
            WebhookEvent::Product(p) => assert_eq!(p.name.as_deref(), Some("Ring")),
            WebhookEvent::Stock { .. } => panic!("expected product event"),
        }
    }

    #[test]
    fn test_classify_accepts_bare_record() {
        let body = json!({ "name": "Ring" });
        assert!(matches!(
            classify(&body).expect("valid payload"),
            WebhookEvent::Product(_)
        ));
    }

    #[test]
    fn test_classify_stock_event() {
        let body = json!({ "data": { "reference": "SKU1", "balance": 5 } });
        match classify(&body).expect("valid payload") {
            WebhookEvent::Stock { sku, quantity } => {
                assert_eq!(sku, "SKU1");
                assert_eq!(quantity, 5);
            }
            WebhookEvent::Product(_) => panic!("expected stock event"),
        }
    }

    #[test]
    fn test_classify_stock_event_numeric_reference_and_default_quantity() {
        let body = json!({ "data": { "sku": 987 } });
        match classify(&body).expect("valid payload") {
            WebhookEvent::Stock { sku, quantity } => {
                assert_eq!(sku, "987");
                assert_eq!(quantity, 0);
            }
            WebhookEvent::Product(_) => panic!("expected stock event"),
        }
    }

    #[test]
    fn test_classify_named_record_with_sku_is_a_product() {
        // A name forces the full product path even when a SKU is present.
        let body = json!({ "data": { "name": "Ring", "sku": "SKU1", "balance": 2 } });
        assert!(matches!(
            classify(&body).expect("valid payload"),
            WebhookEvent::Product(_)
        ));
    }

    #[test]
    fn test_classify_rejects_non_object() {
        let body = json!([1, 2, 3]);
        assert!(matches!(classify(&body), Err(PayloadError::NotAnObject)));
    }

    #[test]
    fn test_variation_attribute_aliases() {
        let v: SourceVariation = serde_json::from_value(json!({
            "id": 10,
            "attribute_value_1": { "name": "color", "value": "blue" }
        }))
        .expect("valid variation");
        let attr = v.attribute.expect("primary attribute");
        assert_eq!(attr.name.as_deref(), Some("color"));
        assert_eq!(attr.value.as_deref(), Some("blue"));
    }

    #[test]
    fn test_image_url_fallback() {
        let img = SourceImage {
            src: None,
            url: Some("https://cdn.example/a.jpg".into()),
        };
        assert_eq!(img.resolved_url(), Some("https://cdn.example/a.jpg"));
        let blank = SourceImage {
            src: Some("  ".into()),
            url: None,
        };
        assert_eq!(blank.resolved_url(), None);
    }
}
