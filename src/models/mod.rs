// src/models/mod.rs

//! Domain models for the stock watcher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod product;
mod verdict;

// Re-export all public types
pub use config::{
    Config, FetcherConfig, MailConfig, NotifyConfig, ScheduleConfig, parse_recipients,
};
pub use product::TrackedProduct;
pub use verdict::{Assessment, StockVerdict, VerdictReason};
