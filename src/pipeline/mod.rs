//! Pipeline entry points for watcher operations.
//!
//! - `finalize`: Deduplicate and number one cycle's parsed records
//! - `Watcher::run_cycle`: Poll, collect, finalize and deliver once
//! - `run_watch`: Repeat cycles until stopped

pub mod cycle;
pub mod sequence;
pub mod watch;

pub use cycle::{CycleReport, PollOutcome, Watcher};
pub use sequence::{Finalized, finalize};
pub use watch::{WatchExit, run_watch};
