// src/pipeline/window.rs

//! Daily active-hours gate.

use std::fmt;

use chrono::{NaiveTime, Timelike};

/// Inclusive range of local wall-clock hours in which checks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl ActiveWindow {
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    /// True if `hour` lies within `[start_hour, end_hour]`.
    pub fn contains(&self, hour: u32) -> bool {
        self.start_hour <= hour && hour <= self.end_hour
    }

    /// True if the hour of `time` lies within the window.
    pub fn contains_time(&self, time: NaiveTime) -> bool {
        self.contains(time.hour())
    }
}

impl fmt::Display for ActiveWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00-{:02}:00", self.start_hour, self.end_hour)
    }
}
