// src/models/verdict.rs

//! Stock classification results.

use std::fmt;

/// Whether a product page looks purchasable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockVerdict {
    Available,
    Unavailable,
}

impl StockVerdict {
    pub fn is_available(self) -> bool {
        matches!(self, StockVerdict::Available)
    }
}

impl fmt::Display for StockVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockVerdict::Available => write!(f, "AVAILABLE"),
            StockVerdict::Unavailable => write!(f, "UNAVAILABLE"),
        }
    }
}

/// The evidence that decided a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictReason {
    /// No sold-out text and a live add-to-cart button
    AddToCartButton,
    /// Sold-out text present, but a live add-to-cart button wins
    ButtonOverridesSoldOut,
    /// Sold-out text present and no live add-to-cart button
    SoldOutPhrase,
    /// Neither sold-out text nor a live add-to-cart button
    NoPurchaseSignal,
}

impl VerdictReason {
    pub fn describe(self) -> &'static str {
        match self {
            VerdictReason::AddToCartButton => "enabled add-to-cart button",
            VerdictReason::ButtonOverridesSoldOut => {
                "sold-out text, overridden by enabled add-to-cart button"
            }
            VerdictReason::SoldOutPhrase => "sold-out text without enabled add-to-cart button",
            VerdictReason::NoPurchaseSignal => "no enabled add-to-cart button",
        }
    }
}

/// A verdict together with the reason it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub verdict: StockVerdict,
    pub reason: VerdictReason,
}

impl Assessment {
    pub fn new(verdict: StockVerdict, reason: VerdictReason) -> Self {
        Self { verdict, reason }
    }
}
