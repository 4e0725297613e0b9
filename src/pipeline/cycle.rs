// src/pipeline/cycle.rs

//! One polling cycle over all tracked products.

use crate::models::{StockVerdict, TrackedProduct};
use crate::pipeline::NotifyLatch;
use crate::services::{Notifier, PageFetcher, classify};

/// What happened to a single product during a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductOutcome {
    /// The page could not be loaded; counted as unavailable
    FetchFailed,
    /// Classified unavailable
    SoldOut,
    /// Classified available and the notification went out
    Notified,
    /// Classified available but the notification failed
    NotifyFailed,
    /// Classified available but already announced
    Suppressed,
}

impl ProductOutcome {
    /// The verdict recorded for the product.
    pub fn verdict(self) -> StockVerdict {
        match self {
            ProductOutcome::FetchFailed | ProductOutcome::SoldOut => StockVerdict::Unavailable,
            ProductOutcome::Notified | ProductOutcome::NotifyFailed | ProductOutcome::Suppressed => {
                StockVerdict::Available
            }
        }
    }
}

/// Counters for one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub checked: usize,
    pub available: usize,
    pub unavailable: usize,
    pub fetch_failures: usize,
    pub notified: usize,
    pub notify_failures: usize,
    pub suppressed: usize,
}

impl CycleReport {
    fn record(&mut self, outcome: ProductOutcome) {
        self.checked += 1;
        match outcome.verdict() {
            StockVerdict::Available => self.available += 1,
            StockVerdict::Unavailable => self.unavailable += 1,
        }
        match outcome {
            ProductOutcome::FetchFailed => self.fetch_failures += 1,
            ProductOutcome::Notified => self.notified += 1,
            ProductOutcome::NotifyFailed => self.notify_failures += 1,
            ProductOutcome::Suppressed => self.suppressed += 1,
            ProductOutcome::SoldOut => {}
        }
    }
}

/// Check every product in order: fetch, classify, notify when available.
///
/// Failures for one product are logged and never stop the others.
pub async fn run_cycle(
    products: &[TrackedProduct],
    fetcher: &dyn PageFetcher,
    notifier: &dyn Notifier,
    latch: &mut NotifyLatch,
) -> CycleReport {
    let mut report = CycleReport::default();

    for product in products {
        let outcome = check_product(product, fetcher, notifier, latch).await;
        report.record(outcome);
    }

    log::info!(
        "Cycle done: {} checked, {} available, {} unavailable ({} fetch errors), {} notified, {} notify errors",
        report.checked,
        report.available,
        report.unavailable,
        report.fetch_failures,
        report.notified,
        report.notify_failures
    );

    report
}

/// Check a single product.
pub async fn check_product(
    product: &TrackedProduct,
    fetcher: &dyn PageFetcher,
    notifier: &dyn Notifier,
    latch: &mut NotifyLatch,
) -> ProductOutcome {
    log::info!("🔍 Checking {}...", product.name);

    let html = match fetcher.fetch(&product.url).await {
        Ok(html) => html,
        Err(e) => {
            log::warn!("⚠️ Error checking {}: {}", product.name, e);
            return ProductOutcome::FetchFailed;
        }
    };

    if !classify(&html).is_available() {
        latch.release(&product.url);
        log::info!("❌ {} still sold out.", product.name);
        return ProductOutcome::SoldOut;
    }

    if !latch.should_notify(&product.url) {
        log::info!("{} is in stock (already notified)", product.name);
        return ProductOutcome::Suppressed;
    }

    match notifier.notify(product).await {
        Ok(()) => {
            latch.mark_notified(&product.url);
            ProductOutcome::Notified
        }
        Err(e) => {
            log::error!("[EMAIL ERROR] {}: {}", product.name, e);
            ProductOutcome::NotifyFailed
        }
    }
}
