//! Service layer for the stock watcher.
//!
//! This module contains:
//! - Page classification (`classify`, `assess`)
//! - Typed page queries (`PageDocument`, `SubmitButton`)
//! - Page fetching (`PageFetcher`, `HttpFetcher`)
//! - Restock notifications (`Notifier`, `SmtpNotifier`)

pub mod classifier;
mod fetcher;
mod notifier;
mod page;

pub use classifier::{ADD_TO_CART_PHRASES, SOLD_OUT_PHRASES, assess, classify};
pub use fetcher::{HttpFetcher, PageFetcher};
pub use notifier::{Notifier, RestockEmail, SmtpNotifier, build_message};
pub use page::{PageDocument, SubmitButton};
