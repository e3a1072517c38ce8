//! Actor boundary around the single-threaded [`crate::sim::Engine`]: one task
//! owns the engine and serves commands from a mailbox, another drives ticks.

pub mod dispatcher;
pub mod error;
pub mod model;
pub mod ticker;
