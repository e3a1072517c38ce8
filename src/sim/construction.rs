use serde::{Deserialize, Serialize};

use crate::blueprint::model::BuildingTemplate;
use crate::sim::clock::CalendarTime;
use crate::sim::error::SimError;
use crate::sim::inventory::{Cost, Inventory};
use crate::sim::roster::Roster;
use crate::sim::{CharacterId, SiteId};

/// Work points per labor unit. Progress is tracked in whole points so that
/// accrual is exact.
pub const WORK_SCALE: f64 = 10_000.0;

/// Default labor units contributed by one worker in one tick.
pub const DEFAULT_WORK_RATE: f64 = 0.01;

pub fn to_work_points(units: f64) -> u64 {
    (units * WORK_SCALE).round().max(0.0) as u64
}

/// Whole work points for `units`, or `None` when the amount is not a
/// positive multiple of one point.
pub fn exact_work_points(units: f64) -> Option<u64> {
    let scaled = units * WORK_SCALE;
    if !scaled.is_finite() || scaled < 1.0 - 1e-6 || (scaled - scaled.round()).abs() > 1e-6 {
        return None;
    }
    Some(scaled.round() as u64)
}

pub fn to_units(points: u64) -> f64 {
    points as f64 / WORK_SCALE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub site: SiteId,
    pub name: String,
    pub completed_at: CalendarTime,
}

/// An in-progress instance of a template. Holds its own copy of cost and
/// target so concurrent sites of one template stay independent.
#[derive(Debug, Clone)]
pub struct ConstructionSite {
    id: SiteId,
    name: String,
    cost: Cost,
    target: u64,
    progress: u64,
    max_workers: usize,
    workers: Vec<CharacterId>,
}

impl ConstructionSite {
    fn from_template(id: SiteId, template: &BuildingTemplate) -> Self {
        Self {
            id,
            name: template.name.clone(),
            cost: template.cost.clone(),
            target: to_work_points(template.workload),
            progress: 0,
            max_workers: template.max_workers,
            workers: Vec::new(),
        }
    }

    pub fn id(&self) -> SiteId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost(&self) -> &Cost {
        &self.cost
    }

    pub fn progress(&self) -> u64 {
        self.progress
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn workers(&self) -> &[CharacterId] {
        &self.workers
    }

    pub fn is_full(&self) -> bool {
        self.workers.len() >= self.max_workers
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= self.target
    }

    /// Accrues `rate` work points per assigned worker and reports whether the
    /// target has been reached. Unstaffed sites never progress.
    pub fn advance(&mut self, rate: u64) -> bool {
        if self.workers.is_empty() {
            return false;
        }
        let gained = rate.saturating_mul(self.workers.len() as u64);
        self.progress = self.progress.saturating_add(gained);
        self.is_complete()
    }

    pub(crate) fn bind(&mut self, character: CharacterId) {
        self.workers.push(character);
    }

    fn unbind(&mut self, character: CharacterId) -> bool {
        let before = self.workers.len();
        self.workers.retain(|&c| c != character);
        self.workers.len() != before
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    sites: Vec<ConstructionSite>,
    buildings: Vec<Building>,
    next_site: u64,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sites(&self) -> &[ConstructionSite] {
        &self.sites
    }

    pub(crate) fn sites_mut(&mut self) -> &mut [ConstructionSite] {
        &mut self.sites
    }

    pub fn site(&self, id: SiteId) -> Option<&ConstructionSite> {
        self.sites.iter().find(|s| s.id == id)
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn start_build(
        &mut self,
        template: &BuildingTemplate,
        inventory: &mut Inventory,
    ) -> Result<SiteId, SimError> {
        inventory.debit(&template.cost)?;

        let id = SiteId(self.next_site);
        self.next_site += 1;
        self.sites.push(ConstructionSite::from_template(id, template));

        tracing::info!("Construction of {} started as site {}", template.name, id);
        Ok(id)
    }

    /// Advances every site, then promotes the finished ones to buildings and
    /// releases their workers. Returns the buildings completed this call.
    pub fn advance_all(&mut self, rate: u64, roster: &mut Roster, now: CalendarTime) -> Vec<Building> {
        let mut finished = Vec::new();
        self.sites = std::mem::take(&mut self.sites)
            .into_iter()
            .filter_map(|mut site| {
                if site.advance(rate) {
                    finished.push(site);
                    None
                } else {
                    Some(site)
                }
            })
            .collect();

        let mut completed = Vec::with_capacity(finished.len());
        for site in finished {
            for &worker in &site.workers {
                if let Some(character) = roster.get_mut(worker) {
                    character.release(now.hour);
                }
            }

            tracing::info!("{} completed at site {} on {}", site.name, site.id, now);
            let building = Building {
                site: site.id,
                name: site.name,
                completed_at: now,
            };
            self.buildings.push(building.clone());
            completed.push(building);
        }

        completed
    }

    pub fn assign(
        &mut self,
        site: SiteId,
        character: CharacterId,
        roster: &mut Roster,
    ) -> Result<(), SimError> {
        let target = self
            .sites
            .iter_mut()
            .find(|s| s.id == site)
            .ok_or(SimError::UnknownSite(site))?;
        let worker = roster
            .get_mut(character)
            .ok_or(SimError::UnknownCharacter(character))?;

        if target.is_full() {
            return Err(SimError::SiteFull(site));
        }
        if !worker.is_idle() {
            return Err(SimError::CharacterUnavailable(character));
        }

        target.bind(character);
        worker.assign(site);
        Ok(())
    }

    pub fn unassign(
        &mut self,
        site: SiteId,
        character: CharacterId,
        roster: &mut Roster,
        hour: u8,
    ) -> Result<(), SimError> {
        let target = self
            .sites
            .iter_mut()
            .find(|s| s.id == site)
            .ok_or(SimError::UnknownSite(site))?;

        if !target.unbind(character) {
            return Err(SimError::NotAssigned { site, character });
        }
        if let Some(worker) = roster.get_mut(character) {
            worker.release(hour);
        }
        Ok(())
    }
}
