// src/pipeline/latch.rs

//! Optional once-per-restock notification latch.

use std::collections::HashSet;

/// Remembers which product URLs were already announced.
///
/// When disabled, every available verdict is announced. When enabled, a URL
/// is announced once and stays quiet until it is seen unavailable again.
/// State lives in memory only.
#[derive(Debug, Default)]
pub struct NotifyLatch {
    enabled: bool,
    notified: HashSet<String>,
}

impl NotifyLatch {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            notified: HashSet::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True if an available verdict for `url` should be announced.
    pub fn should_notify(&self, url: &str) -> bool {
        !self.enabled || !self.notified.contains(url)
    }

    /// Record a successful announcement.
    pub fn mark_notified(&mut self, url: &str) {
        if self.enabled {
            self.notified.insert(url.to_string());
        }
    }

    /// Re-arm `url` after it was classified unavailable.
    pub fn release(&mut self, url: &str) -> bool {
        self.notified.remove(url)
    }
}
