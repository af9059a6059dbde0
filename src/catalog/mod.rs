mod persistence;
mod repository;

pub use persistence::{import_foods_csv, load_catalog, save_catalog};
pub use repository::{FoodRepository, FoodTable};

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PlanError, Result};
use crate::models::{
    Fill, FoodEntry, MealComponent, Role, SlotKind, SlotTemplate, SubstitutionGroup,
};
use crate::planner::PlannerConfig;

/// Catalog bundled with the crate.
const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

/// Serialized form of the catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    pub foods: Vec<FoodEntry>,
    #[serde(default)]
    pub components: Vec<MealComponent>,
    #[serde(default)]
    pub substitution_groups: Vec<SubstitutionGroup>,
    #[serde(default)]
    pub slot_templates: Vec<SlotTemplate>,
}

/// Reference tables used by plan generation, validated for referential integrity.
#[derive(Debug, Clone)]
pub struct Catalog {
    foods: FoodTable,
    components: BTreeMap<String, MealComponent>,
    groups: Vec<SubstitutionGroup>,
    templates: HashMap<SlotKind, SlotTemplate>,
    /// Lowercase ids the planner loads directly; `delete` refuses these.
    planner_foods: BTreeSet<String>,
}

impl Catalog {
    /// The catalog embedded at compile time.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let data: CatalogData = serde_json::from_str(text)?;
        Self::from_data(data)
    }

    pub fn from_data(data: CatalogData) -> Result<Self> {
        let foods = FoodTable::new(data.foods)?;

        let mut components = BTreeMap::new();
        for component in data.components {
            let id = component.id.clone();
            if components.insert(id.clone(), component).is_some() {
                return Err(PlanError::IntegrityViolation(format!(
                    "duplicate component id '{}'",
                    id
                )));
            }
        }

        let mut templates = HashMap::new();
        for template in data.slot_templates {
            let slot = template.slot;
            if templates.insert(slot, template).is_some() {
                return Err(PlanError::IntegrityViolation(format!(
                    "duplicate slot template for {:?}",
                    slot
                )));
            }
        }

        let catalog = Self {
            foods,
            components,
            groups: data.substitution_groups,
            templates,
            planner_foods: BTreeSet::new(),
        };
        catalog.validate()?;

        debug!(
            foods = catalog.foods.len(),
            components = catalog.components.len(),
            groups = catalog.groups.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Check every ingredient, group member and template entry resolves.
    pub fn validate(&self) -> Result<()> {
        for component in self.components.values() {
            if component.ingredients.is_empty() {
                return Err(PlanError::IntegrityViolation(format!(
                    "component '{}' has no ingredients",
                    component.id
                )));
            }
            for ingredient in &component.ingredients {
                if !self.foods.contains(&ingredient.food_id) {
                    return Err(PlanError::IntegrityViolation(format!(
                        "component '{}' references unknown food '{}'",
                        component.id, ingredient.food_id
                    )));
                }
                if ingredient.quantity <= 0.0 {
                    return Err(PlanError::IntegrityViolation(format!(
                        "component '{}' has a non-positive quantity for '{}'",
                        component.id, ingredient.food_id
                    )));
                }
            }
        }

        for group in &self.groups {
            for member in &group.members {
                if !self.components.contains_key(member) {
                    return Err(PlanError::IntegrityViolation(format!(
                        "substitution group '{}' references unknown component '{}'",
                        group.id, member
                    )));
                }
            }
        }

        for template in self.templates.values() {
            for entry in &template.entries {
                if !self.foods.contains(&entry.food_id) {
                    return Err(PlanError::IntegrityViolation(format!(
                        "{:?} template references unknown food '{}'",
                        template.slot, entry.food_id
                    )));
                }
                if let Fill::Target { step, min, max, .. } = entry.fill {
                    if step <= 0.0 || min < 0.0 || min > max {
                        return Err(PlanError::IntegrityViolation(format!(
                            "{:?} template entry '{}' has an invalid fill range",
                            template.slot, entry.food_id
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// `validate` plus the foods `config` makes the planner load by id.
    pub fn validate_for(&self, config: &PlannerConfig) -> Result<()> {
        self.validate()?;
        for id in config.required_food_ids() {
            if !self.foods.contains(id) {
                return Err(PlanError::IntegrityViolation(format!(
                    "planner needs food '{}', which is not in the catalog",
                    id
                )));
            }
        }
        Ok(())
    }

    /// Validate against `config` and protect its foods from deletion.
    pub fn bind_planner(&mut self, config: &PlannerConfig) -> Result<()> {
        self.validate_for(config)?;
        self.planner_foods = config
            .required_food_ids()
            .into_iter()
            .map(str::to_lowercase)
            .collect();
        Ok(())
    }

    pub fn foods(&self) -> &FoodTable {
        &self.foods
    }

    pub fn food(&self, id: &str) -> Result<&FoodEntry> {
        self.foods.require(id)
    }

    pub fn component(&self, id: &str) -> Result<&MealComponent> {
        self.components
            .get(id)
            .ok_or_else(|| PlanError::ComponentNotFound(id.to_string()))
    }

    pub fn components(&self) -> impl Iterator<Item = &MealComponent> {
        self.components.values()
    }

    pub fn template(&self, slot: SlotKind) -> Result<&SlotTemplate> {
        self.templates.get(&slot).ok_or_else(|| {
            PlanError::IntegrityViolation(format!("no slot template for {:?}", slot))
        })
    }

    /// Food ids that play `role` in the slot's template, in template order.
    pub fn template_foods(&self, slot: SlotKind, role: Role) -> Vec<&str> {
        self.templates
            .get(&slot)
            .map(|t| {
                t.entries
                    .iter()
                    .filter(|e| e.role == role)
                    .map(|e| e.food_id.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Substitution groups that apply to a slot kind.
    pub fn groups_for(&self, slot: SlotKind) -> impl Iterator<Item = &SubstitutionGroup> {
        self.groups.iter().filter(move |g| g.slot == slot)
    }

    /// Ids of components whose ingredients reference a food.
    pub fn components_using(&self, food_id: &str) -> Vec<&str> {
        let food_id = food_id.to_lowercase();
        self.components
            .values()
            .filter(|c| c.ingredients.iter().any(|i| i.food_id.to_lowercase() == food_id))
            .map(|c| c.id.as_str())
            .collect()
    }

    fn referenced_by_template(&self, food_id: &str) -> bool {
        let food_id = food_id.to_lowercase();
        self.templates
            .values()
            .flat_map(|t| t.entries.iter())
            .any(|e| e.food_id.to_lowercase() == food_id)
    }

    /// Serializable form, with deterministic ordering.
    pub fn to_data(&self) -> CatalogData {
        let mut templates: Vec<SlotTemplate> = self.templates.values().cloned().collect();
        templates.sort_by_key(|t| t.slot);
        CatalogData {
            foods: self.foods.to_foods(),
            components: self.components.values().cloned().collect(),
            substitution_groups: self.groups.clone(),
            slot_templates: templates,
        }
    }
}

impl FoodRepository for Catalog {
    fn get(&self, id: &str) -> Option<&FoodEntry> {
        self.foods.get(id)
    }

    fn list(&self) -> Vec<&FoodEntry> {
        self.foods.list()
    }

    fn upsert(&mut self, food: FoodEntry) -> Result<Option<FoodEntry>> {
        self.foods.upsert(food)
    }

    /// Refuses to delete a food still referenced by a recipe, a template or
    /// the bound planner config.
    fn delete(&mut self, id: &str) -> Result<FoodEntry> {
        let users = self.components_using(id);
        if !users.is_empty() {
            return Err(PlanError::IntegrityViolation(format!(
                "food '{}' is used by components: {}",
                id,
                users.join(", ")
            )));
        }
        if self.referenced_by_template(id) {
            return Err(PlanError::IntegrityViolation(format!(
                "food '{}' is used by a slot template",
                id
            )));
        }
        if self.planner_foods.contains(&id.to_lowercase()) {
            return Err(PlanError::IntegrityViolation(format!(
                "food '{}' is required by the planner",
                id
            )));
        }
        self.foods.delete(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.foods().len() > 20);
        assert!(catalog.template(SlotKind::Lunch).is_ok());
        assert!(catalog.component("crepioca").is_ok());
        assert_eq!(catalog.groups_for(SlotKind::Dinner).count(), 1);
        assert_eq!(
            catalog.template_foods(SlotKind::Breakfast, Role::Protein),
            vec!["ovo_galinha_inteiro", "clara_ovo"]
        );
        assert!(catalog.template_foods(SlotKind::NightSnack, Role::Protein).is_empty());
    }

    #[test]
    fn test_unknown_ingredient_fails_fast() {
        let json = r#"{
            "foods": [],
            "components": [{"id": "x", "name": "X", "category": "pancake",
                            "ingredients": [{"food_id": "nada", "quantity": 10}]}]
        }"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(PlanError::IntegrityViolation(_))
        ));
    }

    #[test]
    fn test_unknown_group_member_fails_fast() {
        let json = r#"{
            "foods": [],
            "substitution_groups": [{"id": "g", "slot": "dinner", "members": ["fantasma"]}]
        }"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(PlanError::IntegrityViolation(_))
        ));
    }

    #[test]
    fn test_delete_referenced_food_refused() {
        let mut catalog = Catalog::builtin().unwrap();
        assert!(matches!(
            catalog.delete("goma_tapioca"),
            Err(PlanError::IntegrityViolation(_))
        ));
        assert!(catalog.delete("maca").is_ok());
        assert!(matches!(
            catalog.component("nada"),
            Err(PlanError::ComponentNotFound(_))
        ));
    }

    #[test]
    fn test_to_data_roundtrip_keeps_references() {
        let catalog = Catalog::builtin().unwrap();
        let reloaded = Catalog::from_data(catalog.to_data()).unwrap();
        assert_eq!(reloaded.foods().len(), catalog.foods().len());
    }

    #[test]
    fn test_delete_planner_food_refused() {
        let mut catalog = Catalog::builtin().unwrap();
        catalog.bind_planner(&PlannerConfig::default()).unwrap();

        for id in [
            "maltodextrina",
            "whey_protein_isolado",
            "morango",
            "semente_chia",
            "iogurte_natural_desnatado",
        ] {
            assert!(
                matches!(catalog.delete(id), Err(PlanError::IntegrityViolation(_))),
                "deleted {}",
                id
            );
        }
        assert!(catalog.get("maltodextrina").is_some());
    }

    #[test]
    fn test_missing_planner_food_fails_validation() {
        let mut catalog = Catalog::builtin().unwrap();
        catalog.delete("maltodextrina").unwrap();

        assert!(catalog.validate().is_ok());
        assert!(matches!(
            catalog.validate_for(&PlannerConfig::default()),
            Err(PlanError::IntegrityViolation(_))
        ));
        assert!(catalog.bind_planner(&PlannerConfig::default()).is_err());
    }

    #[test]
    fn test_custom_powder_must_exist() {
        let catalog = Catalog::builtin().unwrap();
        let config = PlannerConfig {
            protein_powder_id: "caseina".to_string(),
            ..PlannerConfig::default()
        };
        assert!(matches!(
            catalog.validate_for(&config),
            Err(PlanError::IntegrityViolation(_))
        ));
    }
}
