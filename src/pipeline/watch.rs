// src/pipeline/watch.rs

//! The polling loop.

use std::time::Duration;

use chrono::{Local, NaiveTime};

use crate::models::Config;
use crate::pipeline::{CycleReport, NotifyLatch, run_cycle};
use crate::services::{Notifier, PageFetcher};

/// Result of one loop iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Outside the active window; nothing was fetched
    Skipped,
    /// A cycle ran
    Ran(CycleReport),
}

/// Drives cycles on an interval within the active window.
pub struct Watcher<'a> {
    config: &'a Config,
    fetcher: &'a dyn PageFetcher,
    notifier: &'a dyn Notifier,
    latch: NotifyLatch,
}

impl<'a> Watcher<'a> {
    pub fn new(
        config: &'a Config,
        fetcher: &'a dyn PageFetcher,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            config,
            fetcher,
            notifier,
            latch: NotifyLatch::new(config.notify.once_per_restock),
        }
    }

    /// Run a cycle if `now` falls inside the active window.
    pub async fn tick(&mut self, now: NaiveTime) -> TickOutcome {
        let window = self.config.schedule.window();
        if !window.contains_time(now) {
            log::info!("[SKIP {}] Outside window {}", now.format("%H:%M"), window);
            return TickOutcome::Skipped;
        }

        TickOutcome::Ran(self.run_cycle_now().await)
    }

    /// Run a cycle immediately, ignoring the active window.
    pub async fn run_cycle_now(&mut self) -> CycleReport {
        run_cycle(
            &self.config.products,
            self.fetcher,
            self.notifier,
            &mut self.latch,
        )
        .await
    }

    /// Loop forever: tick, then sleep for the configured interval.
    pub async fn run(&mut self) {
        let interval = Duration::from_secs(self.config.schedule.interval_secs);
        log::info!(
            "Watching {} products every {}s, active {}, {}",
            self.config.products.len(),
            interval.as_secs(),
            self.config.schedule.window(),
            if self.latch.is_enabled() {
                "notifying once per restock"
            } else {
                "notifying every cycle while available"
            }
        );

        loop {
            self.tick(Local::now().time()).await;
            log::info!("Waiting {} seconds before next check...", interval.as_secs());
            tokio::time::sleep(interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::Result;
    use crate::models::TrackedProduct;

    #[derive(Default)]
    struct CountingFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PageFetcher for CountingFetcher {
        async fn fetch(&self, _url: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(r#"<button type="submit">Add to Cart</button>"#.to_string())
        }
    }

    #[derive(Default)]
    struct CountingNotifier {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        async fn notify(&self, _product: &TrackedProduct) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.schedule.start_hour = 3;
        config.schedule.end_hour = 9;
        config.products = vec![
            TrackedProduct::new("A", "https://shop.example.com/a"),
            TrackedProduct::new("B", "https://shop.example.com/b"),
        ];
        config
    }

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[tokio::test]
    async fn runs_on_last_window_hour() {
        let config = config();
        let fetcher = CountingFetcher::default();
        let notifier = CountingNotifier::default();
        let mut watcher = Watcher::new(&config, &fetcher, &notifier);

        let outcome = watcher.tick(at(9, 45)).await;

        assert!(matches!(outcome, TickOutcome::Ran(ref r) if r.checked == 2));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn skips_outside_window_without_fetching() {
        let config = config();
        let fetcher = CountingFetcher::default();
        let notifier = CountingNotifier::default();
        let mut watcher = Watcher::new(&config, &fetcher, &notifier);

        assert_eq!(watcher.tick(at(10, 0)).await, TickOutcome::Skipped);
        assert_eq!(watcher.tick(at(2, 59)).await, TickOutcome::Skipped);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn latch_setting_carries_across_ticks() {
        let mut config = config();
        config.notify.once_per_restock = true;
        let fetcher = CountingFetcher::default();
        let notifier = CountingNotifier::default();
        let mut watcher = Watcher::new(&config, &fetcher, &notifier);
        assert!(watcher.latch.is_enabled());

        watcher.tick(at(4, 0)).await;
        let second = watcher.tick(at(4, 5)).await;

        assert!(matches!(second, TickOutcome::Ran(ref r) if r.suppressed == 2));
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn run_cycle_now_ignores_window() {
        let config = config();
        let fetcher = CountingFetcher::default();
        let notifier = CountingNotifier::default();
        let mut watcher = Watcher::new(&config, &fetcher, &notifier);

        let report = watcher.run_cycle_now().await;

        assert_eq!(report.checked, 2);
    }
}
