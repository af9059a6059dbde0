use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Round to two decimal places.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to one decimal place.
#[inline]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Category tag used for substitution lookups and table filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    Protein,
    Carbohydrate,
    Legume,
    Vegetable,
    Fruit,
    Fat,
    Dairy,
    Supplement,
}

impl FoodCategory {
    pub const ALL: [FoodCategory; 8] = [
        FoodCategory::Protein,
        FoodCategory::Carbohydrate,
        FoodCategory::Legume,
        FoodCategory::Vegetable,
        FoodCategory::Fruit,
        FoodCategory::Fat,
        FoodCategory::Dairy,
        FoodCategory::Supplement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FoodCategory::Protein => "protein",
            FoodCategory::Carbohydrate => "carbohydrate",
            FoodCategory::Legume => "legume",
            FoodCategory::Vegetable => "vegetable",
            FoodCategory::Fruit => "fruit",
            FoodCategory::Fat => "fat",
            FoodCategory::Dairy => "dairy",
            FoodCategory::Supplement => "supplement",
        }
    }

    /// Parse a category tag (case-insensitive).
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == tag)
    }
}

impl fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the nutritional values of a food refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Basis {
    /// Values are per 100 g; quantities are in grams.
    Per100g,
    /// Values are per countable unit; quantities are unit counts.
    PerUnit { unit: String },
}

/// Macro and calorie values for some quantity of food.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
}

impl Macros {
    pub fn rounded(&self) -> Self {
        Self {
            calories: round2(self.calories),
            protein: round2(self.protein),
            carbs: round2(self.carbs),
            fat: round2(self.fat),
            fiber: round2(self.fiber),
        }
    }
}

impl std::ops::Add for Macros {
    type Output = Macros;

    fn add(self, other: Macros) -> Macros {
        Macros {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
            fiber: self.fiber + other.fiber,
        }
    }
}

impl std::iter::Sum for Macros {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Macros::default(), |acc, m| acc + m)
    }
}

/// A row of the nutrition table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: String,
    pub name: String,
    pub basis: Basis,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default)]
    pub fiber: f64,
    pub category: FoodCategory,
    /// Measure name to grams, e.g. "fatia" = 25.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub household_measures: BTreeMap<String, f64>,
}

impl FoodEntry {
    /// Fraction of the stated values that one quantity unit represents.
    #[inline]
    fn factor(&self) -> f64 {
        match self.basis {
            Basis::Per100g => 0.01,
            Basis::PerUnit { .. } => 1.0,
        }
    }

    /// Calories for a quantity (grams or units), rounded to 2 decimals.
    pub fn kcal_for(&self, quantity: f64) -> f64 {
        round2(self.calories * self.factor() * quantity)
    }

    /// Unrounded macros for a quantity.
    pub fn macros_for(&self, quantity: f64) -> Macros {
        let k = self.factor() * quantity;
        Macros {
            calories: self.calories * k,
            protein: self.protein * k,
            carbs: self.carbs * k,
            fat: self.fat * k,
            fiber: self.fiber * k,
        }
    }

    /// Calories per single quantity unit (gram or unit).
    pub fn kcal_per_quantity(&self) -> f64 {
        self.calories * self.factor()
    }

    pub fn protein_per_quantity(&self) -> f64 {
        self.protein * self.factor()
    }

    pub fn carbs_per_quantity(&self) -> f64 {
        self.carbs * self.factor()
    }

    pub fn fat_per_quantity(&self) -> f64 {
        self.fat * self.factor()
    }

    /// Unit label for quantities of this food.
    pub fn unit_label(&self) -> &str {
        match &self.basis {
            Basis::Per100g => "g",
            Basis::PerUnit { unit } => unit,
        }
    }

    /// Display unit and quantity, preferring a household measure that divides
    /// the quantity into a whole count.
    pub fn display_quantity(&self, quantity: f64) -> (String, String) {
        if let Basis::Per100g = self.basis {
            for (measure, grams) in &self.household_measures {
                if *grams <= 0.0 {
                    continue;
                }
                let count = quantity / grams;
                if count >= 1.0 && (count - count.round()).abs() < 1e-9 {
                    return (measure.clone(), format_quantity(count.round()));
                }
            }
        }
        (self.unit_label().to_string(), format_quantity(quantity))
    }

    /// Basic validation: non-negative values and a non-empty id.
    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty()
            && self.calories >= 0.0
            && self.protein >= 0.0
            && self.carbs >= 0.0
            && self.fat >= 0.0
            && self.fiber >= 0.0
            && self.household_measures.values().all(|g| *g > 0.0)
    }

    /// Canonical key for lookups.
    pub fn key(&self) -> String {
        self.id.to_lowercase()
    }
}

/// Format a quantity without trailing zeros: 150 → "150", 2.5 → "2.5".
pub fn format_quantity(quantity: f64) -> String {
    let rounded = round2(quantity);
    if (rounded - rounded.round()).abs() < 1e-9 {
        format!("{:.0}", rounded)
    } else {
        let s = format!("{:.2}", rounded);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
