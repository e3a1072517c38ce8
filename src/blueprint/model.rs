use serde::{Deserialize, Serialize};

use crate::sim::inventory::Cost;

/// Immutable catalog entry describing a building type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingTemplate {
    pub name: String,
    pub cost: Cost,
    /// Labor units required to finish one site.
    pub workload: f64,
    pub max_workers: usize,
}

impl BuildingTemplate {
    pub fn new(name: &str, cost: &[(&str, u64)], workload: f64, max_workers: usize) -> Self {
        Self {
            name: name.to_string(),
            cost: cost.iter().map(|(n, v)| (n.to_string(), *v)).collect(),
            workload,
            max_workers,
        }
    }
}
