use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::SlotKind;

/// Energy density of protein and carbohydrate (kcal/g).
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBS: f64 = 4.0;

/// Energy density of fat (kcal/g).
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Fat band applied after the residual estimate (g per kg body weight).
pub const FAT_MIN_G_PER_KG: f64 = 0.6;
pub const FAT_MAX_G_PER_KG: f64 = 0.9;

/// Fiber grows by this many grams per 100 kcal of goal.
pub const FIBER_G_PER_100_KCAL: f64 = 1.5;

// ─────────────────────────────────────────────────────────────────────────────
// Request defaults
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_PROTEIN_MIN_G_PER_KG: f64 = 2.0;
pub const DEFAULT_CARBS_MAX_PCT: f64 = 50.0;
pub const DEFAULT_FAT_MAX_PCT: f64 = 30.0;
pub const DEFAULT_FIBER_MIN_G: f64 = 25.0;
pub const DEFAULT_MEAL_COUNT: u8 = 5;
pub const DEFAULT_PRE_WORKOUT_KCAL: f64 = 150.0;

// ─────────────────────────────────────────────────────────────────────────────
// Assembly
// ─────────────────────────────────────────────────────────────────────────────

/// Grams of protein delivered by one gram of protein powder.
pub const POWDER_PROTEIN_PER_GRAM: f64 = 0.8;

/// Margin kept on protein >= carbohydrate so 2-decimal item rounding cannot undo it.
pub const ROUNDING_SLACK_G: f64 = 0.02;

pub const PROTEIN_POWDER_ID: &str = "whey_protein_isolado";
pub const PRE_WORKOUT_FOOD_ID: &str = "maltodextrina";

/// Fixed night-snack items (food id, quantity).
pub const NIGHT_SNACK_FIXED: [(&str, f64); 3] = [
    ("iogurte_natural_desnatado", 100.0),
    ("morango", 50.0),
    ("semente_chia", 5.0),
];

/// Powder bounds for the night snack (g).
pub const NIGHT_SNACK_POWDER_MIN_G: f64 = 15.0;
pub const NIGHT_SNACK_POWDER_MAX_G: f64 = 35.0;

/// Sum of slot calories may deviate this much from the goal before adjusting.
pub const PRECISION_TOLERANCE_KCAL: f64 = 10.0;

/// Name fragments identifying the primary protein item of a slot.
pub const PROTEIN_SOURCE_KEYWORDS: [&str; 6] =
    ["frango", "patinho", "tilápia", "carne", "peixe", "salmão"];

/// Protein/carbohydrate/fat share of a slot's calories.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroRatio {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroRatio {
    const fn new(protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            protein,
            carbs,
            fat,
        }
    }
}

/// Ratio preset for a slot kind; any slot without its own preset uses 33/34/33.
pub fn ratio_preset(kind: SlotKind) -> MacroRatio {
    match kind {
        SlotKind::Breakfast => MacroRatio::new(0.30, 0.50, 0.20),
        SlotKind::Lunch => MacroRatio::new(0.35, 0.45, 0.20),
        SlotKind::Dinner => MacroRatio::new(0.40, 0.35, 0.25),
        _ => MacroRatio::new(0.33, 0.34, 0.33),
    }
}

/// Percentage split of daily calories per meal count.
pub static MEAL_DISTRIBUTIONS: LazyLock<HashMap<u8, Vec<(SlotKind, f64)>>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    m.insert(
        3,
        vec![
            (SlotKind::Breakfast, 30.0),
            (SlotKind::Lunch, 40.0),
            (SlotKind::Dinner, 30.0),
        ],
    );
    m.insert(
        4,
        vec![
            (SlotKind::Breakfast, 25.0),
            (SlotKind::Lunch, 35.0),
            (SlotKind::Snack, 15.0),
            (SlotKind::Dinner, 25.0),
        ],
    );
    m.insert(
        5,
        vec![
            (SlotKind::Breakfast, 22.0),
            (SlotKind::Lunch, 32.0),
            (SlotKind::Snack, 18.0),
            (SlotKind::Dinner, 23.0),
            (SlotKind::NightSnack, 5.0),
        ],
    );
    m
});

/// Get the distribution for a meal count, if one is defined.
pub fn meal_distribution(meal_count: u8) -> Option<&'static [(SlotKind, f64)]> {
    MEAL_DISTRIBUTIONS.get(&meal_count).map(Vec::as_slice)
}
