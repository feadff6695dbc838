//! Flattening of variation attributes into Shopify option axes.
//!
//! Bagy variations carry up to two free-form `{ name, value }` attributes;
//! Shopify products carry up to three named option axes. The flattener scans
//! all variations, keeps the first three distinct axis names it sees, and
//! collects each axis's distinct values in input order. Excess axes are
//! silently dropped, never merged.

use crate::bagy::{SourceVariation, non_empty};
use crate::shopify::{DEFAULT_OPTION_NAME, DEFAULT_OPTION_VALUE, MAX_OPTIONS, ProductOption};

/// Derive the option axes for a set of variations.
///
/// Always returns at least one axis: with no attributes anywhere, a single
/// synthetic `Title` axis with the value `Default Title` satisfies Shopify's
/// requirement that every product have an option.
#[must_use]
pub fn flatten_options(variations: &[SourceVariation]) -> Vec<ProductOption> {
    let mut axes: Vec<&str> = Vec::new();
    for variation in variations {
        for attribute in [&variation.attribute, &variation.attribute_secondary] {
            let Some(name) = attribute.as_ref().and_then(|a| non_empty(a.name.as_deref())) else {
                continue;
            };
            if axes.len() < MAX_OPTIONS && !axes.contains(&name) {
                axes.push(name);
            }
        }
    }

    if axes.is_empty() {
        return vec![ProductOption {
            name: DEFAULT_OPTION_NAME.to_owned(),
            values: vec![DEFAULT_OPTION_VALUE.to_owned()],
        }];
    }

    axes.into_iter()
        .map(|axis| {
            let mut values: Vec<String> = Vec::new();
            for variation in variations {
                if let Some(value) = attribute_value(variation, axis)
                    && !values.iter().any(|v| v == value)
                {
                    values.push(value.to_owned());
                }
            }
            ProductOption {
                name: axis.to_owned(),
                values,
            }
        })
        .collect()
}

/// The variation's value on the given axis: primary slot first, then
/// secondary.
pub(crate) fn attribute_value<'a>(variation: &'a SourceVariation, axis: &str) -> Option<&'a str> {
    [&variation.attribute, &variation.attribute_secondary]
        .into_iter()
        .flatten()
        .find(|a| non_empty(a.name.as_deref()) == Some(axis))
        .and_then(|a| non_empty(a.value.as_deref()))
}
