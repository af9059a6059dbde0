use tracing::debug;

use crate::error::{PlanError, Result};
use crate::models::food::round1;
use crate::models::{NutritionTargets, PatientProfile, PlanGoals};
use crate::planner::constants::*;

/// Inputs to the macro target calculation.
#[derive(Debug, Clone)]
pub struct TargetInputs {
    pub weight_kg: f64,
    pub total_kcal: f64,
    pub protein_min_g_per_kg: f64,
    pub carbs_max_pct: f64,
    pub fat_max_pct: f64,
    pub fiber_min_g: f64,
}

impl TargetInputs {
    pub fn from_request(profile: &PatientProfile, goals: &PlanGoals) -> Self {
        Self {
            weight_kg: profile.weight_kg,
            total_kcal: goals.total_kcal,
            protein_min_g_per_kg: goals.protein_min_g_per_kg,
            carbs_max_pct: goals.carbs_max_pct,
            fat_max_pct: goals.fat_max_pct,
            fiber_min_g: goals.fiber_min_g,
        }
    }
}

/// Fiber goal: the larger of the floor and 1.5 g per 100 kcal.
pub fn fiber_target(total_kcal: f64, fiber_min_g: f64) -> f64 {
    round1(fiber_min_g.max((total_kcal / 100.0).round() * FIBER_G_PER_100_KCAL))
}

/// Derive protein, fat, carbohydrate and fiber goals.
///
/// Protein comes first from body weight. Fat is the residual after protein and
/// a provisional carbohydrate share, capped by the fat percentage and clamped
/// to 0.6-0.9 g/kg. Carbohydrate takes whatever calories remain, uncapped.
/// A negative remainder is rejected.
pub fn calculate_targets(inputs: &TargetInputs) -> Result<NutritionTargets> {
    if !(inputs.weight_kg > 0.0) {
        return Err(PlanError::InvalidInput(format!(
            "weight must be positive, got {}",
            inputs.weight_kg
        )));
    }
    if !(inputs.total_kcal > 0.0) {
        return Err(PlanError::InvalidInput(format!(
            "calorie goal must be positive, got {}",
            inputs.total_kcal
        )));
    }

    let total = inputs.total_kcal;
    let weight = inputs.weight_kg;

    let protein_g = round1(weight * inputs.protein_min_g_per_kg);
    let protein_kcal = (protein_g * KCAL_PER_G_PROTEIN).round();

    let provisional_carb_kcal = total * inputs.carbs_max_pct / 100.0;
    let residual_fat_g = (total - protein_kcal - provisional_carb_kcal) / KCAL_PER_G_FAT;
    let fat_cap_g = total * inputs.fat_max_pct / 100.0 / KCAL_PER_G_FAT;
    let fat_g = round1(
        residual_fat_g
            .min(fat_cap_g)
            .clamp(FAT_MIN_G_PER_KG * weight, FAT_MAX_G_PER_KG * weight),
    );
    let fat_kcal = (fat_g * KCAL_PER_G_FAT).round();

    let carbs_kcal = (total - protein_kcal - fat_kcal).round();
    if carbs_kcal < 0.0 {
        return Err(PlanError::InvalidInput(format!(
            "protein ({} kcal) and minimum fat ({} kcal) exceed the calorie goal ({} kcal)",
            protein_kcal, fat_kcal, total
        )));
    }
    let carbs_g = round1(carbs_kcal / KCAL_PER_G_CARBS);

    let targets = NutritionTargets {
        total_kcal: total,
        protein_g,
        protein_kcal,
        carbs_g,
        carbs_kcal,
        fat_g,
        fat_kcal,
        fiber_g: fiber_target(total, inputs.fiber_min_g),
    };

    debug!(
        protein_g = targets.protein_g,
        carbs_g = targets.carbs_g,
        fat_g = targets.fat_g,
        fiber_g = targets.fiber_g,
        "calculated nutrition targets"
    );

    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(weight: f64, total: f64, protein: f64) -> TargetInputs {
        TargetInputs {
            weight_kg: weight,
            total_kcal: total,
            protein_min_g_per_kg: protein,
            carbs_max_pct: 50.0,
            fat_max_pct: 30.0,
            fiber_min_g: 25.0,
        }
    }

    #[test]
    fn test_reference_case() {
        let t = calculate_targets(&inputs(75.0, 2000.0, 2.3)).unwrap();
        assert!((t.protein_g - 172.5).abs() < 1e-9);
        assert!((t.protein_kcal - 690.0).abs() < 1e-9);
        // Residual 34.4 g is below the 0.6 g/kg floor of 45 g.
        assert!((t.fat_g - 45.0).abs() < 1e-9);
        assert!((t.carbs_kcal - 905.0).abs() < 1e-9);
        assert!((t.carbs_g - 226.3).abs() < 1e-9);
        assert!((t.fiber_g - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_fat_capped_by_upper_band() {
        // Low protein leaves a large residual; fat stops at 0.9 g/kg.
        let t = calculate_targets(&inputs(60.0, 3000.0, 1.0)).unwrap();
        assert!((t.fat_g - 54.0).abs() < 1e-9);
    }

    #[test]
    fn test_macro_kcal_sum_matches_total() {
        for (w, kcal, p) in [(75.0, 2000.0, 2.3), (58.5, 1650.0, 1.8), (102.0, 3125.0, 2.0)] {
            let t = calculate_targets(&inputs(w, kcal, p)).unwrap();
            assert!((t.macro_kcal_sum() - kcal).abs() <= 2.0);
        }
    }

    #[test]
    fn test_negative_carbohydrate_rejected() {
        let err = calculate_targets(&inputs(120.0, 1000.0, 2.5)).unwrap_err();
        assert!(matches!(err, PlanError::InvalidInput(_)));
    }

    #[test]
    fn test_non_positive_inputs_rejected() {
        assert!(calculate_targets(&inputs(0.0, 2000.0, 2.0)).is_err());
        assert!(calculate_targets(&inputs(70.0, 0.0, 2.0)).is_err());
    }

    #[test]
    fn test_fiber_floor() {
        assert!((fiber_target(1200.0, 25.0) - 25.0).abs() < 1e-9);
        assert!((fiber_target(2500.0, 25.0) - 37.5).abs() < 1e-9);
    }
}
