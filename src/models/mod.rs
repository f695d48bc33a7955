use serde::{Deserialize, Serialize};

/// Placeholder written whenever an optional field has no matching element.
/// Kept as a literal string (never null) so every exported row carries the
/// full column set.
pub const NOT_AVAILABLE: &str = "Not available";

// ── Product record ────────────────────────────────────────────────────────────

/// One extracted listing entry. Field names are renamed on serialization to
/// match the export column headers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecord {
    #[serde(rename = "Product Name")]
    pub name: String,

    #[serde(rename = "Product Price")]
    pub price: String,

    /// Reserved: the listing markup currently exposes no discount element,
    /// so this always holds the sentinel.
    #[serde(rename = "Sale Discount")]
    pub discount: String,

    #[serde(rename = "Best Seller Rating")]
    pub rating: String,

    /// Image source URLs in DOM order. Entries whose `src` attribute was
    /// missing are kept as empty strings so the count still matches the DOM.
    #[serde(rename = "Images")]
    pub images: Vec<String>,
}

impl ProductRecord {
    /// A record with the given name and every optional field at its sentinel.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: NOT_AVAILABLE.to_string(),
            discount: NOT_AVAILABLE.to_string(),
            rating: NOT_AVAILABLE.to_string(),
            images: Vec::new(),
        }
    }
}

// ── Result set ────────────────────────────────────────────────────────────────

/// Ordered, append-only pool of records across all categories in a run.
/// Repeats across categories are preserved as-is; there is no merge key.
pub type ResultSet = Vec<ProductRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_record_defaults_to_sentinels() {
        let r = ProductRecord::named("Widget");
        assert_eq!(r.name, "Widget");
        assert_eq!(r.price, NOT_AVAILABLE);
        assert_eq!(r.discount, NOT_AVAILABLE);
        assert_eq!(r.rating, NOT_AVAILABLE);
        assert!(r.images.is_empty());
    }

    #[test]
    fn serialized_keys_match_export_headers() {
        let r = ProductRecord::named("Widget");
        let v = serde_json::to_value(&r).unwrap();
        let obj = v.as_object().unwrap();
        assert!(obj.contains_key("Product Name"));
        assert!(obj.contains_key("Product Price"));
        assert!(obj.contains_key("Sale Discount"));
        assert!(obj.contains_key("Best Seller Rating"));
        assert!(obj.contains_key("Images"));
        assert_eq!(obj.len(), 5);
    }
}
