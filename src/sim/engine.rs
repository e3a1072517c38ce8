use serde::Serialize;

use crate::blueprint::catalog::Catalog;
use crate::blueprint::model::BuildingTemplate;
use crate::sim::clock::{CalendarTime, Clock};
use crate::sim::construction::{Building, DEFAULT_WORK_RATE, Pipeline, to_work_points};
use crate::sim::error::SimError;
use crate::sim::inventory::{Category, Inventory};
use crate::sim::roster::Roster;
use crate::sim::scheduler;
use crate::sim::snapshot::{CharacterView, SiteView, Snapshot};
use crate::sim::{CharacterId, EngineState, SiteId};

/// What changed during one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub time: CalendarTime,
    pub completed: Vec<Building>,
    pub assigned: Vec<(SiteId, CharacterId)>,
}

/// Owns all simulation state. The only mutators are [`Engine::tick`] and the
/// command methods; callers are expected to serialize access.
#[derive(Debug, Clone)]
pub struct Engine {
    clock: Clock,
    inventory: Inventory,
    roster: Roster,
    pipeline: Pipeline,
    catalog: Catalog,
    work_rate: u64,
}

impl Engine {
    pub fn new(start: CalendarTime, catalog: Catalog) -> Self {
        Self {
            clock: Clock::new(start),
            inventory: Inventory::new(),
            roster: Roster::new(),
            pipeline: Pipeline::new(),
            catalog,
            work_rate: to_work_points(DEFAULT_WORK_RATE),
        }
    }

    /// Labor units one worker contributes per tick.
    pub fn with_work_rate(mut self, units: f64) -> Self {
        self.work_rate = to_work_points(units);
        self
    }

    pub fn stock(&mut self, name: &str, category: Category, amount: u64) {
        self.inventory.credit(name, category, amount);
    }

    pub fn recruit(&mut self, name: &str, gender: &str, age: u32) -> CharacterId {
        self.roster.recruit(name, gender, age, self.clock.hour())
    }

    pub fn state(&self) -> EngineState {
        if self.clock.is_paused() {
            EngineState::Paused
        } else {
            EngineState::Running
        }
    }

    pub fn pause(&mut self) {
        if !self.clock.is_paused() {
            tracing::info!("Simulation paused at {}", self.clock.now());
        }
        self.clock.pause();
    }

    pub fn resume(&mut self) {
        if self.clock.is_paused() {
            tracing::info!("Simulation resumed at {}", self.clock.now());
        }
        self.clock.resume();
    }

    /// Runs one simulation step. Returns `None` while paused.
    pub fn tick(&mut self) -> Option<TickReport> {
        if !self.clock.tick() {
            return None;
        }
        let now = self.clock.now();

        self.roster.refresh_all(now.hour);
        let completed = self
            .pipeline
            .advance_all(self.work_rate, &mut self.roster, now);
        let assigned = scheduler::assign_idle(self.pipeline.sites_mut(), &mut self.roster);

        tracing::trace!(
            "Tick {}: {} completed, {} assigned",
            now,
            completed.len(),
            assigned.len()
        );
        Some(TickReport {
            time: now,
            completed,
            assigned,
        })
    }

    pub fn start_build(&mut self, template: &str) -> Result<SiteId, SimError> {
        let template = self
            .catalog
            .get(template)
            .ok_or_else(|| SimError::UnknownTemplate(template.to_string()))?;

        self.pipeline
            .start_build(template, &mut self.inventory)
            .inspect_err(|e| tracing::warn!("Cannot build {}: {}", template.name, e))
    }

    pub fn assign_character(&mut self, site: SiteId, character: CharacterId) -> Result<(), SimError> {
        self.pipeline
            .assign(site, character, &mut self.roster)
            .inspect(|_| tracing::info!("Assigned {} to site {}", character, site))
            .inspect_err(|e| tracing::warn!("Assignment rejected: {}", e))
    }

    pub fn unassign_character(&mut self, site: SiteId, character: CharacterId) -> Result<(), SimError> {
        self.pipeline
            .unassign(site, character, &mut self.roster, self.clock.hour())
            .inspect(|_| tracing::info!("Released {} from site {}", character, site))
            .inspect_err(|e| tracing::warn!("Release rejected: {}", e))
    }

    pub fn catalog(&self) -> &[BuildingTemplate] {
        self.catalog.templates()
    }

    pub fn now(&self) -> CalendarTime {
        self.clock.now()
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.clock.now(),
            state: self.state(),
            resources: self.inventory.snapshot(),
            characters: self.roster.iter().map(CharacterView::from).collect(),
            sites: self.pipeline.sites().iter().map(SiteView::from).collect(),
            buildings: self.pipeline.buildings().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::roster::Status;

    fn engine() -> Engine {
        let catalog = Catalog::new(vec![
            BuildingTemplate::new("House", &[("Wood", 10), ("Stone", 5)], 100.0, 2),
            BuildingTemplate::new("Farm", &[("Wood", 5), ("Stone", 2)], 50.0, 1),
        ]);
        let mut engine = Engine::new(CalendarTime::new(1, 3, 1, 10, 0).unwrap(), catalog);
        engine.stock("Wood", Category::Material, 100);
        engine.stock("Stone", Category::Material, 50);
        engine.recruit("John", "Male", 25);
        engine.recruit("Alice", "Female", 22);
        engine
    }

    #[test]
    fn test_paused_engine_does_nothing() {
        let mut engine = engine();
        engine.start_build("Farm").unwrap();
        engine.pause();
        let before = engine.snapshot();

        assert!(engine.tick().is_none());
        assert_eq!(engine.snapshot(), before);
        assert_eq!(engine.state(), EngineState::Paused);

        engine.resume();
        assert!(engine.tick().is_some());
        assert_eq!(engine.state(), EngineState::Running);
    }

    #[test]
    fn test_build_is_staffed_on_next_tick() {
        let mut engine = engine();
        let site = engine.start_build("Farm").unwrap();

        let report = engine.tick().unwrap();

        assert_eq!(report.assigned, [(site, CharacterId(0))]);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.sites[0].workload, 0.0);
        assert_eq!(snapshot.sites[0].cost.get("Wood"), Some(&5));
        assert_eq!(snapshot.characters[0].status, Status::Assigned);
        assert_eq!(snapshot.characters[1].status, Status::Idle);
    }

    #[test]
    fn test_unknown_template() {
        let mut engine = engine();
        assert_eq!(
            engine.start_build("Castle"),
            Err(SimError::UnknownTemplate("Castle".to_string()))
        );
    }

    #[test]
    fn test_night_falls_on_idle_characters_only() {
        let mut engine = engine();
        engine.start_build("Farm").unwrap();
        engine.tick();

        // 10:01 -> 21:00
        for _ in 0..659 {
            engine.tick();
        }

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.time.hour, 21);
        assert_eq!(snapshot.characters[0].status, Status::Assigned);
        assert_eq!(snapshot.characters[1].status, Status::Sleeping);
    }

    #[test]
    fn test_manual_unassign_frees_slot_for_scheduler() {
        let mut engine = engine();
        let site = engine.start_build("Farm").unwrap();
        engine.tick();

        engine.unassign_character(site, CharacterId(0)).unwrap();
        assert!(engine.roster().get(CharacterId(0)).unwrap().is_idle());

        engine.assign_character(site, CharacterId(1)).unwrap();
        assert_eq!(
            engine.assign_character(site, CharacterId(0)),
            Err(SimError::SiteFull(site))
        );
    }
}
