use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{PlanError, Result};
use crate::models::food::{round1, round2};
use crate::models::{
    Basis, Fill, FoodEntry, Macro, MealComponent, MealLineItem, MealSlot, RecipeCard, SlotKind,
};
use crate::planner::constants::*;
use crate::planner::distribution::SlotAllocation;

/// Tunable assembly settings. Defaults come from `planner::constants`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub protein_powder_id: String,
    pub pre_workout_food_id: String,
    pub night_snack_powder_min_g: f64,
    pub night_snack_powder_max_g: f64,
    pub precision_tolerance_kcal: f64,
    pub protein_keywords: Vec<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            protein_powder_id: PROTEIN_POWDER_ID.to_string(),
            pre_workout_food_id: PRE_WORKOUT_FOOD_ID.to_string(),
            night_snack_powder_min_g: NIGHT_SNACK_POWDER_MIN_G,
            night_snack_powder_max_g: NIGHT_SNACK_POWDER_MAX_G,
            precision_tolerance_kcal: PRECISION_TOLERANCE_KCAL,
            protein_keywords: PROTEIN_SOURCE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl PlannerConfig {
    /// Check ranges and food ids before the config reaches the assembler.
    pub fn validate(&self) -> Result<()> {
        for (field, id) in [
            ("protein_powder_id", &self.protein_powder_id),
            ("pre_workout_food_id", &self.pre_workout_food_id),
        ] {
            if id.trim().is_empty() {
                return Err(PlanError::InvalidInput(format!("planner.{} is empty", field)));
            }
        }
        if self.night_snack_powder_min_g < 0.0 {
            return Err(PlanError::InvalidInput(format!(
                "planner.night_snack_powder_min_g must be >= 0, got {}",
                self.night_snack_powder_min_g
            )));
        }
        if self.night_snack_powder_min_g > self.night_snack_powder_max_g {
            return Err(PlanError::InvalidInput(format!(
                "planner.night_snack_powder_min_g ({}) is above night_snack_powder_max_g ({})",
                self.night_snack_powder_min_g, self.night_snack_powder_max_g
            )));
        }
        if self.precision_tolerance_kcal < 0.0 {
            return Err(PlanError::InvalidInput(format!(
                "planner.precision_tolerance_kcal must be >= 0, got {}",
                self.precision_tolerance_kcal
            )));
        }
        Ok(())
    }

    /// Foods the assembler loads by id rather than through a template.
    pub fn required_food_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = NIGHT_SNACK_FIXED.iter().map(|(id, _)| *id).collect();
        ids.push(&self.protein_powder_id);
        ids.push(&self.pre_workout_food_id);
        ids
    }
}

/// Per-slot macro goals in grams.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotMacroTargets {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl SlotMacroTargets {
    pub fn for_slot(kind: SlotKind, kcal: f64) -> Self {
        let ratio = ratio_preset(kind);
        Self {
            protein: kcal * ratio.protein / Macro::Protein.kcal_per_gram(),
            carbs: kcal * ratio.carbs / Macro::Carbs.kcal_per_gram(),
            fat: kcal * ratio.fat / Macro::Fat.kcal_per_gram(),
        }
    }

    fn get(&self, m: Macro) -> f64 {
        match m {
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fat => self.fat,
        }
    }
}

fn realized(slot: &MealSlot, m: Macro) -> f64 {
    match m {
        Macro::Protein => slot.protein,
        Macro::Carbs => slot.carbs,
        Macro::Fat => slot.fat,
    }
}

fn per_quantity(food: &FoodEntry, m: Macro) -> f64 {
    match m {
        Macro::Protein => food.protein_per_quantity(),
        Macro::Carbs => food.carbs_per_quantity(),
        Macro::Fat => food.fat_per_quantity(),
    }
}

/// Snap a quantity to `step` and clamp it to `[min, max]`.
fn snap(raw: f64, step: f64, min: f64, max: f64) -> f64 {
    ((raw / step).round() * step).clamp(min, max)
}

/// Builds meal slots from the catalog.
pub struct MealAssembler<'a> {
    catalog: &'a Catalog,
    config: &'a PlannerConfig,
}

impl<'a> MealAssembler<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a PlannerConfig) -> Self {
        Self { catalog, config }
    }

    /// Build one slot, before the protein rule is applied.
    pub fn build_slot(
        &self,
        allocation: &SlotAllocation,
        special_dinner: Option<&str>,
    ) -> Result<MealSlot> {
        let slot = match (allocation.kind, special_dinner) {
            (SlotKind::PreWorkout, _) => self.pre_workout(allocation.target_kcal)?,
            (SlotKind::NightSnack, _) => self.night_snack(allocation.target_kcal)?,
            (SlotKind::Dinner, Some(component_id)) => {
                let component = self.catalog.component(component_id)?;
                let mut slot = MealSlot::new(SlotKind::Dinner, allocation.target_kcal);
                slot.items = self.scale_component(component, allocation.target_kcal)?;
                slot.recompute_totals();
                slot
            }
            (kind, _) => self.from_template(kind, allocation.target_kcal)?,
        };

        debug!(
            slot = ?slot.kind,
            target = slot.target_kcal,
            kcal = slot.calories,
            items = slot.items.len(),
            "assembled slot"
        );
        Ok(slot)
    }

    /// Greedy fill from the slot template.
    ///
    /// Entries are taken in order. Target entries cover what remains of their
    /// macro after the items already placed.
    fn from_template(&self, kind: SlotKind, target_kcal: f64) -> Result<MealSlot> {
        let template = self.catalog.template(kind)?;
        let goals = SlotMacroTargets::for_slot(kind, target_kcal);
        let mut slot = MealSlot::new(kind, target_kcal);

        for entry in &template.entries {
            let food = self.catalog.food(&entry.food_id)?;
            let quantity = match entry.fill {
                Fill::Fixed { quantity } => quantity,
                Fill::Target {
                    target,
                    step,
                    min,
                    max,
                } => {
                    let deficit = (goals.get(target) - realized(&slot, target)).max(0.0);
                    let density = per_quantity(food, target);
                    let raw = if density > 0.0 { deficit / density } else { 0.0 };
                    snap(raw, step, min, max)
                }
            };

            if quantity > 0.0 {
                slot.push(MealLineItem::new(food, quantity));
            }
        }

        Ok(slot)
    }

    /// Fixed yogurt, fruit and chia plus powder sized to the remaining calories.
    fn night_snack(&self, target_kcal: f64) -> Result<MealSlot> {
        let mut slot = MealSlot::new(SlotKind::NightSnack, target_kcal);
        for (food_id, quantity) in NIGHT_SNACK_FIXED {
            let food = self.catalog.food(food_id)?;
            slot.push(MealLineItem::new(food, quantity));
        }

        let powder = self.catalog.food(&self.config.protein_powder_id)?;
        let remaining = target_kcal - slot.calories;
        let grams = (remaining / powder.kcal_per_quantity())
            .round()
            .clamp(
                self.config.night_snack_powder_min_g,
                self.config.night_snack_powder_max_g,
            );
        slot.push(MealLineItem::new(powder, grams));
        Ok(slot)
    }

    /// A single carbohydrate item sized to the allocation.
    fn pre_workout(&self, target_kcal: f64) -> Result<MealSlot> {
        let food = self.catalog.food(&self.config.pre_workout_food_id)?;
        let mut slot = MealSlot::new(SlotKind::PreWorkout, target_kcal);
        let per_quantity = food.kcal_per_quantity();
        if per_quantity > 0.0 {
            slot.push(MealLineItem::new(food, round1(target_kcal / per_quantity)));
        }
        Ok(slot)
    }

    /// Scale a recipe so its calories match `target_kcal`.
    ///
    /// Per-unit ingredients round to half units, gram ingredients to whole grams.
    pub fn scale_component(
        &self,
        component: &MealComponent,
        target_kcal: f64,
    ) -> Result<Vec<MealLineItem>> {
        let mut resolved = Vec::with_capacity(component.ingredients.len());
        for ingredient in &component.ingredients {
            resolved.push((self.catalog.food(&ingredient.food_id)?, ingredient.quantity));
        }

        let base_kcal: f64 = resolved
            .iter()
            .map(|(food, qty)| food.macros_for(*qty).calories)
            .sum();
        let factor = if base_kcal > 0.0 {
            target_kcal / base_kcal
        } else {
            1.0
        };

        Ok(resolved
            .into_iter()
            .map(|(food, qty)| {
                let scaled = match food.basis {
                    Basis::PerUnit { .. } => ((qty * factor * 2.0).round() / 2.0).max(0.5),
                    Basis::Per100g => (qty * factor).round().max(1.0),
                };
                MealLineItem::new(food, scaled)
            })
            .collect())
    }

    /// Apply the protein >= carbohydrate rule once.
    ///
    /// Tops up (or adds) the protein powder by `(carbs - protein) / 0.8` grams,
    /// rounded up to 0.1 g. The slot is not re-checked afterwards. Returns the
    /// grams of powder added.
    pub fn enforce_protein_rule(&self, slot: &mut MealSlot) -> Result<Option<f64>> {
        if slot.kind.is_exempt() || slot.protein >= slot.carbs {
            return Ok(None);
        }

        let powder = self.catalog.food(&self.config.protein_powder_id)?;
        let gap = slot.carbs - slot.protein + ROUNDING_SLACK_G;
        let grams = (gap / POWDER_PROTEIN_PER_GRAM * 10.0).ceil() / 10.0;

        match slot.items.iter_mut().find(|i| i.food_id == powder.id) {
            Some(item) => {
                let quantity = round1(item.quantity + grams);
                item.set_quantity(powder, quantity);
            }
            None => slot.items.push(MealLineItem::new(powder, grams)),
        }
        slot.recompute_totals();

        debug!(slot = ?slot.kind, grams, "protein powder added to satisfy protein rule");
        Ok(Some(grams))
    }

    /// Scaled recipes for every substitution group of the given slots.
    pub fn recipe_cards(&self, slots: &[MealSlot]) -> Result<Vec<RecipeCard>> {
        let mut cards = Vec::new();
        for slot in slots.iter().filter(|s| !s.kind.is_exempt()) {
            for group in self.catalog.groups_for(slot.kind) {
                for member in &group.members {
                    let component = self.catalog.component(member)?;
                    let items = self.scale_component(component, slot.target_kcal)?;
                    let calories = round2(items.iter().map(|i| i.calories).sum());
                    cards.push(RecipeCard {
                        component_id: component.id.clone(),
                        name: component.name.clone(),
                        category: component.category.clone(),
                        slot: slot.kind,
                        calories,
                        items,
                    });
                }
            }
        }
        Ok(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;

    fn allocation(kind: SlotKind, kcal: f64) -> SlotAllocation {
        SlotAllocation {
            kind,
            target_kcal: kcal,
        }
    }

    #[test]
    fn test_snap() {
        assert!((snap(175.0, 10.0, 80.0, 250.0) - 180.0).abs() < 1e-9);
        assert!((snap(5.2, 1.0, 1.0, 2.0) - 2.0).abs() < 1e-9);
        assert!((snap(0.0, 5.0, 0.0, 20.0)).abs() < 1e-9);
    }

    #[test]
    fn test_slot_macro_targets() {
        let t = SlotMacroTargets::for_slot(SlotKind::Lunch, 640.0);
        assert!((t.protein - 56.0).abs() < 1e-9);
        assert!((t.carbs - 72.0).abs() < 1e-9);
        assert!((t.fat - 640.0 * 0.20 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_lunch_from_template() {
        let catalog = Catalog::builtin().unwrap();
        let config = PlannerConfig::default();
        let assembler = MealAssembler::new(&catalog, &config);

        let slot = assembler
            .build_slot(&allocation(SlotKind::Lunch, 600.0), None)
            .unwrap();
        let chicken = slot
            .items
            .iter()
            .find(|i| i.food_id == "peito_frango_grelhado")
            .unwrap();
        // 52.5 g protein / 0.32 g per g = 164 g, snapped to 160 g.
        assert!((chicken.quantity - 160.0).abs() < 1e-9);
        assert!(slot.items.iter().any(|i| i.food_id == "feijao_carioca_cozido"));
    }

    #[test]
    fn test_night_snack_powder_bounds() {
        let catalog = Catalog::builtin().unwrap();
        let config = PlannerConfig::default();
        let assembler = MealAssembler::new(&catalog, &config);

        let small = assembler
            .build_slot(&allocation(SlotKind::NightSnack, 100.0), None)
            .unwrap();
        let powder = small.items.last().unwrap();
        assert_eq!(powder.food_id, PROTEIN_POWDER_ID);
        assert!((powder.quantity - NIGHT_SNACK_POWDER_MIN_G).abs() < 1e-9);

        let large = assembler
            .build_slot(&allocation(SlotKind::NightSnack, 600.0), None)
            .unwrap();
        assert!((large.items.last().unwrap().quantity - NIGHT_SNACK_POWDER_MAX_G).abs() < 1e-9);
    }

    #[test]
    fn test_pre_workout_single_carb_item() {
        let catalog = Catalog::builtin().unwrap();
        let config = PlannerConfig::default();
        let assembler = MealAssembler::new(&catalog, &config);

        let slot = assembler
            .build_slot(&allocation(SlotKind::PreWorkout, 150.0), None)
            .unwrap();
        assert_eq!(slot.items.len(), 1);
        assert_eq!(slot.items[0].food_id, PRE_WORKOUT_FOOD_ID);
        assert!((slot.calories - 150.0).abs() < 1.0);
        assert!(slot.carbs > slot.protein);
        assert!(slot.satisfies_protein_rule());
    }

    #[test]
    fn test_protein_rule_adds_powder() {
        let catalog = Catalog::builtin().unwrap();
        let config = PlannerConfig::default();
        let assembler = MealAssembler::new(&catalog, &config);

        let mut slot = MealSlot::new(SlotKind::Breakfast, 300.0);
        slot.push(MealLineItem::new(catalog.food("pao_integral").unwrap(), 100.0));
        assert!(slot.protein < slot.carbs);

        let added = assembler.enforce_protein_rule(&mut slot).unwrap();
        assert!(added.is_some());
        assert!(slot.protein >= slot.carbs);
        assert!(slot.items.iter().any(|i| i.food_id == PROTEIN_POWDER_ID));
    }

    #[test]
    fn test_protein_rule_tops_up_existing_powder() {
        let catalog = Catalog::builtin().unwrap();
        let config = PlannerConfig::default();
        let assembler = MealAssembler::new(&catalog, &config);

        let mut slot = MealSlot::new(SlotKind::Snack, 300.0);
        slot.push(MealLineItem::new(catalog.food(PROTEIN_POWDER_ID).unwrap(), 10.0));
        slot.push(MealLineItem::new(catalog.food("banana_prata").unwrap(), 150.0));

        assembler.enforce_protein_rule(&mut slot).unwrap();
        let powder_items = slot
            .items
            .iter()
            .filter(|i| i.food_id == PROTEIN_POWDER_ID)
            .count();
        assert_eq!(powder_items, 1);
        assert!(slot.protein >= slot.carbs);
    }

    #[test]
    fn test_protein_rule_skips_pre_workout() {
        let catalog = Catalog::builtin().unwrap();
        let config = PlannerConfig::default();
        let assembler = MealAssembler::new(&catalog, &config);

        let mut slot = assembler
            .build_slot(&allocation(SlotKind::PreWorkout, 150.0), None)
            .unwrap();
        assert_eq!(assembler.enforce_protein_rule(&mut slot).unwrap(), None);
        assert_eq!(slot.items.len(), 1);
    }

    #[test]
    fn test_special_dinner_scaled_to_target() {
        let catalog = Catalog::builtin().unwrap();
        let config = PlannerConfig::default();
        let assembler = MealAssembler::new(&catalog, &config);

        let slot = assembler
            .build_slot(&allocation(SlotKind::Dinner, 460.0), Some("omelete_legumes"))
            .unwrap();
        assert_eq!(slot.items.len(), 4);
        assert!((slot.calories - 460.0).abs() < 60.0);
    }

    #[test]
    fn test_unknown_special_dinner() {
        let catalog = Catalog::builtin().unwrap();
        let config = PlannerConfig::default();
        let assembler = MealAssembler::new(&catalog, &config);

        let err = assembler
            .build_slot(&allocation(SlotKind::Dinner, 460.0), Some("lasanha"))
            .unwrap_err();
        assert!(matches!(err, PlanError::ComponentNotFound(_)));
    }
}
