use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sim::error::SimError;

/// Resource name → amount, as listed by a template or a site.
pub type Cost = BTreeMap<String, u64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Material,
    Food,
    Weapon,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    #[serde(default)]
    pub category: Category,
    pub quantity: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Inventory {
    resources: BTreeMap<String, Resource>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unknown resources simply hold zero.
    pub fn quantity(&self, name: &str) -> u64 {
        self.resources.get(name).map_or(0, |res| res.quantity)
    }

    pub fn can_afford(&self, cost: &Cost) -> bool {
        self.shortfall(cost).is_none()
    }

    /// Withdraws every listed amount, or nothing at all.
    pub fn debit(&mut self, cost: &Cost) -> Result<(), SimError> {
        if let Some(err) = self.shortfall(cost) {
            tracing::debug!("Debit rejected: {}", err);
            return Err(err);
        }

        for (name, amount) in cost {
            if let Some(res) = self.resources.get_mut(name) {
                res.quantity -= amount;
            }
        }

        tracing::debug!("Debited {:?}", cost);
        Ok(())
    }

    pub fn credit(&mut self, name: &str, category: Category, amount: u64) {
        self.resources
            .entry(name.to_string())
            .and_modify(|res| res.quantity += amount)
            .or_insert_with(|| Resource {
                name: name.to_string(),
                category,
                quantity: amount,
            });
    }

    pub fn snapshot(&self) -> Vec<Resource> {
        self.resources.values().cloned().collect()
    }

    fn shortfall(&self, cost: &Cost) -> Option<SimError> {
        cost.iter().find_map(|(name, &required)| {
            let available = self.quantity(name);
            (available < required).then(|| SimError::InsufficientResources {
                resource: name.clone(),
                required,
                available,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stocked() -> Inventory {
        let mut inventory = Inventory::new();
        inventory.credit("Wood", Category::Material, 10);
        inventory.credit("Stone", Category::Material, 5);
        inventory
    }

    fn cost(items: &[(&str, u64)]) -> Cost {
        items.iter().map(|(n, v)| (n.to_string(), *v)).collect()
    }

    #[test]
    fn test_unknown_resource_is_zero() {
        assert_eq!(stocked().quantity("Gold"), 0);
    }

    #[test]
    fn test_debit_success() {
        let mut inventory = stocked();
        inventory
            .debit(&cost(&[("Wood", 10), ("Stone", 5)]))
            .unwrap();

        assert_eq!(inventory.quantity("Wood"), 0);
        assert_eq!(inventory.quantity("Stone"), 0);
    }

    #[test]
    fn test_debit_is_all_or_nothing() {
        let mut inventory = stocked();
        let res = inventory.debit(&cost(&[("Wood", 4), ("Stone", 6)]));

        assert_eq!(
            res,
            Err(SimError::InsufficientResources {
                resource: "Stone".to_string(),
                required: 6,
                available: 5,
            })
        );
        assert_eq!(inventory.quantity("Wood"), 10);
        assert_eq!(inventory.quantity("Stone"), 5);
    }

    #[test]
    fn test_debit_of_unknown_resource_fails() {
        let mut inventory = stocked();
        assert!(!inventory.can_afford(&cost(&[("Wood", 1), ("Iron", 1)])));
        assert!(inventory.debit(&cost(&[("Wood", 1), ("Iron", 1)])).is_err());
        assert_eq!(inventory.quantity("Wood"), 10);
    }

    #[test]
    fn test_credit_accumulates() {
        let mut inventory = stocked();
        inventory.credit("Wood", Category::Material, 7);
        inventory.credit("Bread", Category::Food, 20);

        let snapshot = inventory.snapshot();
        let names: Vec<_> = snapshot.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Bread", "Stone", "Wood"]);
        assert_eq!(inventory.quantity("Wood"), 17);
        assert_eq!(snapshot[0].category, Category::Food);
    }
}
