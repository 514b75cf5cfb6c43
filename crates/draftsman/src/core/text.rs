//! Shared text utilities for diagram processing
//!
//! Label measurement and the small string transforms used when turning
//! prose into diagram identifiers.

use unicode_width::UnicodeWidthStr;

use super::{DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH};

/// Approximate pixel width of one display column in a node label
pub const PIXELS_PER_COLUMN: f64 = 8.0;

/// Horizontal padding added around a measured label
pub const LABEL_PADDING: f64 = 40.0;

/// Display width of a label in terminal columns
///
/// Wide characters (CJK, most emoji) count as two columns.
pub fn label_width(label: &str) -> usize {
    UnicodeWidthStr::width(label)
}

/// Node box size that fits a label, never smaller than the default size
///
/// # Example
/// ```
/// use draftsman::core::node_size_for_label;
///
/// assert_eq!(node_size_for_label("API"), (120.0, 100.0));
/// let (wide, _) = node_size_for_label("Customer Notification Dispatcher");
/// assert!(wide > 120.0);
/// ```
pub fn node_size_for_label(label: &str) -> (f64, f64) {
    let measured = label_width(label) as f64 * PIXELS_PER_COLUMN + LABEL_PADDING;
    (measured.max(DEFAULT_NODE_WIDTH), DEFAULT_NODE_HEIGHT)
}

/// Turn a display name into an identifier matching `[a-z0-9_]+`
///
/// Returns `"node"` when nothing alphanumeric survives.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    if slug.is_empty() {
        "node".to_string()
    } else {
        slug
    }
}

/// Capitalize the first letter of every whitespace-separated word
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_width_ascii() {
        assert_eq!(label_width("Database"), 8);
        assert_eq!(label_width(""), 0);
    }

    #[test]
    fn test_label_width_unicode() {
        // Japanese characters are typically 2 columns wide
        assert_eq!(label_width("日本"), 4);
    }

    #[test]
    fn test_short_labels_keep_default_size() {
        assert_eq!(node_size_for_label("DB"), (120.0, 100.0));
        assert_eq!(node_size_for_label(""), (120.0, 100.0));
    }

    #[test]
    fn test_long_labels_widen_node() {
        let (width, height) = node_size_for_label("Payment Reconciliation Service");
        assert_eq!(width, 30.0 * 8.0 + 40.0);
        assert_eq!(height, 100.0);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("API Gateway"), "api_gateway");
        assert_eq!(slugify("  Order -- Service "), "order_service");
        assert_eq!(slugify("S3"), "s3");
        assert_eq!(slugify("RAG / LLM"), "rag_llm");
        assert_eq!(slugify("!!!"), "node");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("order service"), "Order Service");
        assert_eq!(title_case("inventory"), "Inventory");
        assert_eq!(title_case(""), "");
    }
}
