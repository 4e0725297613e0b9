// src/models/product.rs

//! Tracked product definition.

use serde::{Deserialize, Serialize};

/// A product page being watched for restocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedProduct {
    /// Display name used in logs and emails
    pub name: String,

    /// Product page URL
    pub url: String,
}

impl TrackedProduct {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}
