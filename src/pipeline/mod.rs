//! Pipeline entry points for the stock watcher.
//!
//! - `run_cycle`: Check every tracked product once
//! - `Watcher`: Repeat cycles on an interval within the active window

pub mod cycle;
mod latch;
pub mod watch;
mod window;

pub use cycle::{CycleReport, ProductOutcome, check_product, run_cycle};
pub use latch::NotifyLatch;
pub use watch::{TickOutcome, Watcher};
pub use window::ActiveWindow;
