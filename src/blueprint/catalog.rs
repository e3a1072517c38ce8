use crate::blueprint::model::BuildingTemplate;

/// Buildings the colony knows how to construct, in menu order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    templates: Vec<BuildingTemplate>,
}

impl Catalog {
    pub fn new(templates: Vec<BuildingTemplate>) -> Self {
        Self { templates }
    }

    pub fn get(&self, name: &str) -> Option<&BuildingTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn templates(&self) -> &[BuildingTemplate] {
        &self.templates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        let catalog = Catalog::new(vec![
            BuildingTemplate::new("House", &[("Wood", 10), ("Stone", 5)], 100.0, 2),
            BuildingTemplate::new("Farm", &[("Wood", 5), ("Stone", 2)], 50.0, 1),
        ]);

        assert_eq!(catalog.get("Farm").map(|t| t.max_workers), Some(1));
        assert!(catalog.get("Castle").is_none());
        assert_eq!(catalog.templates()[0].name, "House");
    }
}
