//! Deterministic colony simulation: calendar, stockpile, roster,
//! construction and the greedy worker scheduler, driven one tick at a time.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod clock;
pub mod construction;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod roster;
pub mod scheduler;
pub mod snapshot;

pub use engine::{Engine, TickReport};
pub use error::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub u32);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Running,
    Paused,
}
