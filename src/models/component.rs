use serde::{Deserialize, Serialize};

use crate::models::plan::SlotKind;
use crate::planner::constants::{KCAL_PER_G_CARBS, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN};

/// A reference to a food and its base quantity inside a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub food_id: String,
    /// Grams for per-100g foods, unit count for per-unit foods.
    pub quantity: f64,
}

/// A named recipe built from nutrition table entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealComponent {
    pub id: String,
    pub name: String,
    /// Free-form tag such as "pancake" or "solid-meal".
    pub category: String,
    pub ingredients: Vec<Ingredient>,
}

/// Components considered interchangeable for one meal slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionGroup {
    pub id: String,
    pub slot: SlotKind,
    pub members: Vec<String>,
}

/// One of the three energy-bearing macronutrients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Macro {
    Protein,
    Carbs,
    Fat,
}

impl Macro {
    /// Energy density in kcal per gram.
    pub fn kcal_per_gram(&self) -> f64 {
        match self {
            Macro::Protein => KCAL_PER_G_PROTEIN,
            Macro::Carbs => KCAL_PER_G_CARBS,
            Macro::Fat => KCAL_PER_G_FAT,
        }
    }
}

/// Role an item plays in a slot template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Protein,
    Starch,
    Legume,
    Vegetable,
    Fruit,
    Fat,
}

/// How the assembler sizes a template entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fill {
    /// Always added at this quantity.
    Fixed { quantity: f64 },
    /// Sized from the remaining deficit of `target`, snapped to `step`.
    Target {
        target: Macro,
        step: f64,
        min: f64,
        max: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub food_id: String,
    pub role: Role,
    pub fill: Fill,
}

/// Ordered catalog the greedy assembler draws from for one slot kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotTemplate {
    pub slot: SlotKind,
    pub entries: Vec<TemplateEntry>,
}
