use serde::Serialize;

use crate::sim::clock::CalendarTime;
use crate::sim::construction::{Building, ConstructionSite, to_units};
use crate::sim::inventory::{Cost, Resource};
use crate::sim::roster::{Character, Status};
use crate::sim::{CharacterId, EngineState, SiteId};

/// Read-only copy of the whole simulation for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub time: CalendarTime,
    pub state: EngineState,
    pub resources: Vec<Resource>,
    pub characters: Vec<CharacterView>,
    pub sites: Vec<SiteView>,
    pub buildings: Vec<Building>,
}

impl Snapshot {
    pub fn building_names(&self) -> Vec<&str> {
        self.buildings.iter().map(|b| b.name.as_str()).collect()
    }

    pub fn resource(&self, name: &str) -> u64 {
        self.resources
            .iter()
            .find(|r| r.name == name)
            .map_or(0, |r| r.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterView {
    pub id: CharacterId,
    pub name: String,
    pub gender: String,
    pub age: u32,
    pub status: Status,
}

impl From<&Character> for CharacterView {
    fn from(character: &Character) -> Self {
        Self {
            id: character.id(),
            name: character.name().to_string(),
            gender: character.gender().to_string(),
            age: character.age(),
            status: character.status(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteView {
    pub id: SiteId,
    pub name: String,
    pub cost: Cost,
    pub workload: f64,
    pub target: f64,
    pub max_workers: usize,
    pub workers: Vec<CharacterId>,
}

impl From<&ConstructionSite> for SiteView {
    fn from(site: &ConstructionSite) -> Self {
        Self {
            id: site.id(),
            name: site.name().to_string(),
            cost: site.cost().clone(),
            workload: to_units(site.progress()),
            target: to_units(site.target()),
            max_workers: site.max_workers(),
            workers: site.workers().to_vec(),
        }
    }
}
