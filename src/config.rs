//! Scenario configuration: starting calendar, stockpile, roster, building
//! catalog and driver cadence. Defaults reproduce the reference colony.

use std::path::Path;

use serde::Deserialize;

use crate::blueprint::catalog::Catalog;
use crate::blueprint::model::BuildingTemplate;
use crate::sim::clock::{CalendarTime, ClockError};
use crate::sim::construction::{WORK_SCALE, exact_work_points};
use crate::sim::inventory::Resource;
use crate::sim::Engine;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid start time: {0}")]
    Clock(#[from] ClockError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StartTime {
    pub year: u32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
}

impl Default for StartTime {
    fn default() -> Self {
        Self {
            year: 1,
            month: 3,
            day: 1,
            hour: 10,
            minute: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CharacterConfig {
    pub name: String,
    pub gender: String,
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub start: StartTime,
    /// Wall-clock milliseconds between ticks issued by the driver.
    pub tick_interval_ms: u64,
    /// Labor units one worker contributes per tick.
    pub work_rate: f64,
    pub resources: Vec<Resource>,
    pub characters: Vec<CharacterConfig>,
    pub buildings: Vec<BuildingTemplate>,
}

impl Default for SimConfig {
    fn default() -> Self {
        use crate::sim::inventory::Category::{Food, Material, Weapon};

        let resource = |name: &str, category, quantity| Resource {
            name: name.to_string(),
            category,
            quantity,
        };
        let character = |name: &str, gender: &str, age| CharacterConfig {
            name: name.to_string(),
            gender: gender.to_string(),
            age,
        };

        Self {
            start: StartTime::default(),
            tick_interval_ms: 200,
            work_rate: crate::sim::construction::DEFAULT_WORK_RATE,
            resources: vec![
                resource("Wood", Material, 100),
                resource("Stone", Material, 50),
                resource("Bread", Food, 20),
                resource("Sword", Weapon, 5),
            ],
            characters: vec![
                character("John", "Male", 25),
                character("Alice", "Female", 22),
            ],
            buildings: vec![
                BuildingTemplate::new("House", &[("Wood", 10), ("Stone", 5)], 100.0, 2),
                BuildingTemplate::new("Farm", &[("Wood", 5), ("Stone", 2)], 50.0, 1),
            ],
        }
    }
}

impl SimConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be at least 1".to_string()));
        }
        if exact_work_points(self.work_rate).is_none() {
            return Err(ConfigError::Invalid(format!(
                "work_rate must be a positive multiple of {}, got {}",
                1.0 / WORK_SCALE,
                self.work_rate
            )));
        }
        for building in &self.buildings {
            if building.max_workers == 0 {
                return Err(ConfigError::Invalid(format!("{} allows no workers", building.name)));
            }
            if building.workload != 0.0 && exact_work_points(building.workload).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "{} workload must be zero or a positive multiple of {}, got {}",
                    building.name,
                    1.0 / WORK_SCALE,
                    building.workload
                )));
            }
        }
        for (i, building) in self.buildings.iter().enumerate() {
            if self.buildings[..i].iter().any(|b| b.name == building.name) {
                return Err(ConfigError::Invalid(format!("duplicate building {}", building.name)));
            }
        }
        Ok(())
    }

    pub fn start_time(&self) -> Result<CalendarTime, ConfigError> {
        let s = &self.start;
        Ok(CalendarTime::new(s.year, s.month, s.day, s.hour, s.minute)?)
    }

    pub fn build_engine(&self) -> Result<Engine, ConfigError> {
        self.validate()?;

        let catalog = Catalog::new(self.buildings.clone());
        let mut engine = Engine::new(self.start_time()?, catalog).with_work_rate(self.work_rate);
        for res in &self.resources {
            engine.stock(&res.name, res.category, res.quantity);
        }
        for character in &self.characters {
            engine.recruit(&character.name, &character.gender, character.age);
        }

        tracing::info!(
            "Colony ready at {}: {} resources, {} characters, {} building types",
            engine.now(),
            self.resources.len(),
            self.characters.len(),
            self.buildings.len()
        );
        Ok(engine)
    }
}
