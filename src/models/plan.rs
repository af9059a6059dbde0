use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::food::{round1, round2, FoodCategory, FoodEntry};
use crate::models::profile::{PatientProfile, PlanGoals};

/// A named meal occasion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    Breakfast,
    Lunch,
    Snack,
    PreWorkout,
    Dinner,
    NightSnack,
}

impl SlotKind {
    pub fn label(&self) -> &'static str {
        match self {
            SlotKind::Breakfast => "Café da manhã",
            SlotKind::Lunch => "Almoço",
            SlotKind::Snack => "Lanche da tarde",
            SlotKind::PreWorkout => "Pré-treino",
            SlotKind::Dinner => "Jantar",
            SlotKind::NightSnack => "Ceia",
        }
    }

    /// Default clock time shown in the slot header.
    pub fn default_time(&self) -> &'static str {
        match self {
            SlotKind::Breakfast => "07:00",
            SlotKind::Lunch => "12:00",
            SlotKind::Snack => "16:00",
            SlotKind::PreWorkout => "17:30",
            SlotKind::Dinner => "20:00",
            SlotKind::NightSnack => "22:00",
        }
    }

    /// Main meals get category substitutions; the rest get per-ingredient ones.
    pub fn is_main_meal(&self) -> bool {
        matches!(
            self,
            SlotKind::Breakfast | SlotKind::Lunch | SlotKind::Dinner
        )
    }

    /// Slots exempt from the protein >= carbohydrate rule.
    pub fn is_exempt(&self) -> bool {
        matches!(self, SlotKind::PreWorkout)
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One food at one quantity inside a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealLineItem {
    pub food_id: String,
    pub name: String,
    pub category: FoodCategory,
    pub quantity: f64,
    pub unit: String,
    pub display_unit: String,
    pub display_quantity: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
}

impl MealLineItem {
    pub fn new(food: &FoodEntry, quantity: f64) -> Self {
        let macros = food.macros_for(quantity).rounded();
        let (display_unit, display_quantity) = food.display_quantity(quantity);
        Self {
            food_id: food.id.clone(),
            name: food.name.clone(),
            category: food.category,
            quantity,
            unit: food.unit_label().to_string(),
            display_unit,
            display_quantity,
            calories: food.kcal_for(quantity),
            protein: macros.protein,
            carbs: macros.carbs,
            fat: macros.fat,
            fiber: macros.fiber,
        }
    }

    /// Recompute all derived values for a new quantity.
    pub fn set_quantity(&mut self, food: &FoodEntry, quantity: f64) {
        *self = MealLineItem::new(food, quantity);
    }
}

/// A meal occasion with its items and realized totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSlot {
    pub kind: SlotKind,
    pub time: String,
    pub target_kcal: f64,
    pub items: Vec<MealLineItem>,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
}

impl MealSlot {
    pub fn new(kind: SlotKind, target_kcal: f64) -> Self {
        Self {
            kind,
            time: kind.default_time().to_string(),
            target_kcal,
            items: Vec::new(),
            calories: 0.0,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
            fiber: 0.0,
        }
    }

    /// Sum item values into the slot totals.
    pub fn recompute_totals(&mut self) {
        self.calories = round2(self.items.iter().map(|i| i.calories).sum());
        self.protein = round2(self.items.iter().map(|i| i.protein).sum());
        self.carbs = round2(self.items.iter().map(|i| i.carbs).sum());
        self.fat = round2(self.items.iter().map(|i| i.fat).sum());
        self.fiber = round2(self.items.iter().map(|i| i.fiber).sum());
    }

    pub fn push(&mut self, item: MealLineItem) {
        self.items.push(item);
        self.recompute_totals();
    }

    pub fn satisfies_protein_rule(&self) -> bool {
        self.kind.is_exempt() || self.protein >= self.carbs
    }
}

/// Derived daily targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionTargets {
    pub total_kcal: f64,
    pub protein_g: f64,
    pub protein_kcal: f64,
    pub carbs_g: f64,
    pub carbs_kcal: f64,
    pub fat_g: f64,
    pub fat_kcal: f64,
    pub fiber_g: f64,
}

impl NutritionTargets {
    pub fn macro_kcal_sum(&self) -> f64 {
        self.protein_kcal + self.carbs_kcal + self.fat_kcal
    }
}

/// Substitution sentences for one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSubstitutions {
    pub slot: SlotKind,
    pub lines: Vec<String>,
}

/// A recipe scaled to a slot's calorie target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeCard {
    pub component_id: String,
    pub name: String,
    pub category: String,
    pub slot: SlotKind,
    pub calories: f64,
    pub items: Vec<MealLineItem>,
}

/// Record of the single precision adjustment pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecisionAdjustment {
    pub slot: SlotKind,
    pub food_id: String,
    pub previous_quantity: f64,
    pub new_quantity: f64,
    /// True when the change was limited to keep protein >= carbohydrate.
    pub clamped: bool,
}

/// Realized totals compared against targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub calorie_deviation: f64,
    pub within_tolerance: bool,
    pub protein_rule_ok: bool,
    pub adjustment: Option<PrecisionAdjustment>,
}

impl PlanSummary {
    pub fn from_slots(slots: &[MealSlot], target_kcal: f64, tolerance: f64) -> Self {
        let calories = round2(slots.iter().map(|s| s.calories).sum());
        let deviation = round2(calories - target_kcal);
        Self {
            calories,
            protein_g: round1(slots.iter().map(|s| s.protein).sum()),
            carbs_g: round1(slots.iter().map(|s| s.carbs).sum()),
            fat_g: round1(slots.iter().map(|s| s.fat).sum()),
            fiber_g: round1(slots.iter().map(|s| s.fiber).sum()),
            calorie_deviation: deviation,
            within_tolerance: deviation.abs() <= tolerance,
            protein_rule_ok: slots.iter().all(MealSlot::satisfies_protein_rule),
            adjustment: None,
        }
    }
}

/// A complete generated plan. Built per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub profile: PatientProfile,
    pub goals: PlanGoals,
    pub targets: NutritionTargets,
    pub slots: Vec<MealSlot>,
    pub substitutions: Vec<SlotSubstitutions>,
    pub recipes: Vec<RecipeCard>,
    pub summary: PlanSummary,
}
