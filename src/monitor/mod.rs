//! The periodic polling loop.

mod monitor;

pub use monitor::{CycleReport, Monitor};
