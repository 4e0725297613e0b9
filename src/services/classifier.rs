//! Stock availability classifier.
//!
//! Decides from a page's HTML whether a product can be bought. Sold-out text
//! on the page is checked first, but an enabled add-to-cart submit button
//! always wins over it. Without such a button the page is unavailable.

use crate::models::{Assessment, StockVerdict, VerdictReason};
use crate::services::page::PageDocument;

/// Visible-text phrases that suggest the product cannot be bought.
pub const SOLD_OUT_PHRASES: [&str; 4] = [
    "sold out",
    "out of stock",
    "currently unavailable",
    "notify me",
];

/// Button-text phrases that suggest a live purchase action.
pub const ADD_TO_CART_PHRASES: [&str; 3] = ["add to cart", "add to bag", "add to basket"];

/// Classify a page as available or unavailable.
pub fn classify(html: &str) -> StockVerdict {
    assess(html).verdict
}

/// Classify a page and report which signal decided it.
pub fn assess(html: &str) -> Assessment {
    assess_document(&PageDocument::parse(html))
}

/// Classify an already parsed page.
pub fn assess_document(page: &PageDocument) -> Assessment {
    let sold_out = contains_any(&page.visible_text(), &SOLD_OUT_PHRASES);
    let can_add = has_live_add_to_cart(page);

    match (sold_out, can_add) {
        (true, true) => Assessment::new(
            StockVerdict::Available,
            VerdictReason::ButtonOverridesSoldOut,
        ),
        (true, false) => Assessment::new(StockVerdict::Unavailable, VerdictReason::SoldOutPhrase),
        (false, true) => Assessment::new(StockVerdict::Available, VerdictReason::AddToCartButton),
        (false, false) => {
            Assessment::new(StockVerdict::Unavailable, VerdictReason::NoPurchaseSignal)
        }
    }
}

/// True if the first submit button reads like add-to-cart and is not disabled.
pub fn has_live_add_to_cart(page: &PageDocument) -> bool {
    page.first_submit_button().is_some_and(|button| {
        contains_any(&button.text(), &ADD_TO_CART_PHRASES) && !button.is_disabled()
    })
}

fn contains_any(haystack: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| haystack.contains(phrase))
}
