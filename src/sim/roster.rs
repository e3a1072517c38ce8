use serde::{Deserialize, Serialize};

use crate::sim::{CharacterId, SiteId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Sleeping,
    Leisure,
    Idle,
    Assigned,
}

impl Status {
    /// Status of an unassigned character at `hour`.
    pub fn for_hour(hour: u8) -> Self {
        match hour {
            21..=23 | 0..=4 => Status::Sleeping,
            5..=6 | 17..=20 => Status::Leisure,
            _ => Status::Idle,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Character {
    id: CharacterId,
    name: String,
    gender: String,
    age: u32,
    assignment: Option<SiteId>,
    status: Status,
}

impl Character {
    pub fn new(id: CharacterId, name: &str, gender: &str, age: u32) -> Self {
        Self {
            id,
            name: name.to_string(),
            gender: gender.to_string(),
            age,
            assignment: None,
            status: Status::Idle,
        }
    }

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn assignment(&self) -> Option<SiteId> {
        self.assignment
    }

    pub fn is_idle(&self) -> bool {
        self.status == Status::Idle
    }

    pub fn refresh_status(&mut self, hour: u8) {
        self.status = match self.assignment {
            Some(_) => Status::Assigned,
            None => Status::for_hour(hour),
        };
    }

    pub(crate) fn assign(&mut self, site: SiteId) {
        self.assignment = Some(site);
        self.status = Status::Assigned;
    }

    pub(crate) fn release(&mut self, hour: u8) {
        self.assignment = None;
        self.refresh_status(hour);
    }
}

/// Owns every character. Roster order is recruitment order and is the
/// order the scheduler scans in.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    characters: Vec<Character>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recruit(&mut self, name: &str, gender: &str, age: u32, hour: u8) -> CharacterId {
        let id = CharacterId(self.characters.len() as u32);
        let mut character = Character::new(id, name, gender, age);
        character.refresh_status(hour);
        self.characters.push(character);
        tracing::debug!("Recruited {} as {}", name, id);
        id
    }

    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(id.0 as usize)
    }

    pub(crate) fn get_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.get_mut(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter()
    }

    pub fn refresh_all(&mut self, hour: u8) {
        for character in &mut self.characters {
            character.refresh_status(hour);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_windows() {
        let expected = [
            (0, Status::Sleeping),
            (4, Status::Sleeping),
            (5, Status::Leisure),
            (6, Status::Leisure),
            (7, Status::Idle),
            (16, Status::Idle),
            (17, Status::Leisure),
            (20, Status::Leisure),
            (21, Status::Sleeping),
            (23, Status::Sleeping),
        ];
        for (hour, status) in expected {
            assert_eq!(Status::for_hour(hour), status, "hour {hour}");
        }
    }

    #[test]
    fn test_assigned_character_ignores_hour() {
        let mut roster = Roster::new();
        let id = roster.recruit("John", "Male", 25, 10);
        let john = roster.get_mut(id).unwrap();

        john.assign(SiteId(0));
        for hour in 0..24 {
            john.refresh_status(hour);
            assert_eq!(john.status(), Status::Assigned);
        }

        john.release(22);
        assert_eq!(john.status(), Status::Sleeping);
        assert_eq!(john.assignment(), None);
    }

    #[test]
    fn test_recruit_sets_status_for_hour() {
        let mut roster = Roster::new();
        let a = roster.recruit("John", "Male", 25, 10);
        let b = roster.recruit("Alice", "Female", 22, 10);

        assert_eq!(a, CharacterId(0));
        assert_eq!(b, CharacterId(1));
        assert!(roster.get(b).unwrap().is_idle());

        roster.refresh_all(3);
        assert!(roster.iter().all(|c| c.status() == Status::Sleeping));
    }
}
