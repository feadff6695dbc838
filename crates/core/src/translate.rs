//! Assembly of the full Shopify product representation.

use crate::bagy::{SourceImage, SourceProduct, non_empty};
use crate::options::flatten_options;
use crate::shopify::{Metafield, Product, ProductImage};
use crate::variants::map_variants;

/// Title applied when the source record carries none.
const DEFAULT_TITLE: &str = "Produto sem nome";

/// Vendor applied when neither brand nor vendor is present.
const DEFAULT_VENDOR: &str = "Revenda Biju";

/// Product type applied when the category is absent.
const DEFAULT_PRODUCT_TYPE: &str = "Geral";

/// Shopify rejects overlong handles; cap well below the platform limit.
const MAX_HANDLE_LEN: usize = 100;

/// Character budget for the SEO meta description.
const MAX_SEO_DESCRIPTION_LEN: usize = 320;

/// Translate a Bagy product record into the Shopify product body.
///
/// Pure and total: every absent field resolves through its fallback chain,
/// and the result always satisfies Shopify's structural requirements (at
/// least one option axis and at least one variant).
#[must_use]
pub fn translate_product(source: &SourceProduct) -> Product {
    let title = non_empty(source.name.as_deref())
        .unwrap_or(DEFAULT_TITLE)
        .to_owned();
    let handle = resolve_handle(source, &title);

    let body_html = non_empty(source.description.as_deref())
        .or_else(|| non_empty(source.short_description.as_deref()))
        .unwrap_or_default()
        .to_owned();

    let vendor = source
        .brand
        .as_ref()
        .and_then(|b| non_empty(b.name.as_deref()))
        .or_else(|| non_empty(source.vendor.as_deref()))
        .unwrap_or(DEFAULT_VENDOR)
        .to_owned();

    let product_type = source
        .category
        .as_ref()
        .and_then(|c| non_empty(c.name.as_deref()))
        .unwrap_or(DEFAULT_PRODUCT_TYPE)
        .to_owned();

    let tags = source
        .tags
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    let images = source
        .images
        .iter()
        .filter_map(SourceImage::resolved_url)
        .map(|src| ProductImage {
            src: src.to_owned(),
        })
        .collect();

    let options = flatten_options(&source.variations);
    let variants = map_variants(source, &options, &handle);

    let seo_description = truncate_chars(&strip_html(&body_html), MAX_SEO_DESCRIPTION_LEN);

    Product {
        id: None,
        metafields: vec![
            Metafield::seo_title(title.clone()),
            Metafield::seo_description(seo_description),
        ],
        title,
        handle,
        body_html,
        vendor,
        product_type,
        tags,
        images,
        status: "active",
        published: source.active.unwrap_or(true),
        options,
        variants,
    }
}

/// Handle from the source slug when present, else a slugified title.
fn resolve_handle(source: &SourceProduct, title: &str) -> String {
    non_empty(source.slug.as_deref()).map_or_else(|| slugify(title), ToOwned::to_owned)
}

/// Lowercase, spaces to hyphens, everything else non-alphanumeric dropped,
/// runs of hyphens collapsed, capped at [`MAX_HANDLE_LEN`].
fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if (c.is_whitespace() || c == '-') && !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug: String = slug.chars().take(MAX_HANDLE_LEN).collect();
    slug.trim_end_matches('-').to_owned()
}

/// Remove HTML tags, leaving plain text for the SEO description.
fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.trim().to_owned()
}

/// Truncate on a character boundary without splitting a code point.
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
