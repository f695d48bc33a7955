//! Per-item field extraction.

use crate::models::{ProductRecord, NOT_AVAILABLE};
use crate::session::{Session, SessionError};

/// Fixed selector schema for best-seller listing pages.
pub mod selectors {
    /// One listing item container.
    pub const ITEM: &str = "div.zg-grid-general-faceout";
    /// Product name link. Required: an item without it yields no record.
    pub const NAME: &str = "span.zg-text-center-align a.a-link-normal";
    pub const PRICE: &str = "span.p13n-sc-price";
    /// Star rating carried in the icon alt-text span.
    pub const RATING: &str = "span.a-icon-alt";
    pub const IMAGE: &str = "img";
    /// Next-page control in the pagination bar.
    pub const NEXT: &str = "li.a-last a";
}

/// Extract one record from an item handle.
///
/// Returns `Ok(None)` when the required name element is missing: a record
/// without a name is not useful, so the item is skipped whole. Optional
/// fields fall back to the sentinel; image entries with no `src` stay in
/// place as empty strings to keep DOM-order count parity.
pub async fn extract_record<S: Session>(
    session: &S,
    item: &S::Node,
) -> Result<Option<ProductRecord>, SessionError> {
    let name = match session.find_optional(item, selectors::NAME).await? {
        Some(el) => session.text(&el).await?,
        None => return Ok(None),
    };

    let price = match session.find_optional(item, selectors::PRICE).await? {
        Some(el) => session.text(&el).await?,
        None => NOT_AVAILABLE.to_string(),
    };

    let rating = match session.find_optional(item, selectors::RATING).await? {
        Some(el) => session.text(&el).await?,
        None => NOT_AVAILABLE.to_string(),
    };

    let mut images = Vec::new();
    for img in session.find_within(item, selectors::IMAGE).await? {
        images.push(session.attr(&img, "src").await?.unwrap_or_default());
    }

    Ok(Some(ProductRecord {
        name,
        price,
        // No discount element in the current markup; field stays reserved.
        discount: NOT_AVAILABLE.to_string(),
        rating,
        images,
    }))
}
