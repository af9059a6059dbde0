use crate::error::{PlanError, Result};
use crate::models::SlotKind;
use crate::planner::constants::meal_distribution;

/// Calorie target for one slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotAllocation {
    pub kind: SlotKind,
    pub target_kcal: f64,
}

/// Split daily calories across meal slots.
///
/// The optional pre-workout allocation is carved out first and the remainder
/// split by the fixed percentages for `meal_count`. Each slot is rounded on its
/// own, so the sum may miss the remainder by a few kcal.
pub fn distribute_calories(
    total_kcal: f64,
    meal_count: u8,
    pre_workout_kcal: Option<f64>,
) -> Result<Vec<SlotAllocation>> {
    let split = meal_distribution(meal_count).ok_or_else(|| {
        PlanError::InvalidInput(format!("meal_count must be 3, 4 or 5, got {}", meal_count))
    })?;

    let carve_out = pre_workout_kcal.unwrap_or(0.0);
    let remaining = total_kcal - carve_out;
    if remaining <= 0.0 {
        return Err(PlanError::InvalidInput(format!(
            "pre-workout allocation {} leaves no calories from {}",
            carve_out, total_kcal
        )));
    }

    let mut slots: Vec<SlotAllocation> = split
        .iter()
        .map(|(kind, pct)| SlotAllocation {
            kind: *kind,
            target_kcal: (remaining * pct / 100.0).round(),
        })
        .collect();

    if let Some(kcal) = pre_workout_kcal {
        let anchor = if slots.iter().any(|s| s.kind == SlotKind::Snack) {
            SlotKind::Snack
        } else {
            SlotKind::Lunch
        };
        let position = slots
            .iter()
            .position(|s| s.kind == anchor)
            .map(|i| i + 1)
            .unwrap_or(slots.len());
        slots.insert(
            position,
            SlotAllocation {
                kind: SlotKind::PreWorkout,
                target_kcal: kcal.round(),
            },
        );
    }

    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_meals() {
        let slots = distribute_calories(2000.0, 5, None).unwrap();
        let kcal: Vec<f64> = slots.iter().map(|s| s.target_kcal).collect();
        assert_eq!(kcal, vec![440.0, 640.0, 360.0, 460.0, 100.0]);
        assert_eq!(slots[4].kind, SlotKind::NightSnack);
    }

    #[test]
    fn test_pre_workout_carve_out_after_snack() {
        let slots = distribute_calories(2150.0, 4, Some(150.0)).unwrap();
        let kinds: Vec<SlotKind> = slots.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SlotKind::Breakfast,
                SlotKind::Lunch,
                SlotKind::Snack,
                SlotKind::PreWorkout,
                SlotKind::Dinner
            ]
        );
        assert!((slots[0].target_kcal - 500.0).abs() < 1e-9);
        assert!((slots[3].target_kcal - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_pre_workout_after_lunch_without_snack() {
        let slots = distribute_calories(1800.0, 3, Some(150.0)).unwrap();
        assert_eq!(slots[2].kind, SlotKind::PreWorkout);
    }

    #[test]
    fn test_rounding_deviation_is_small() {
        let slots = distribute_calories(2333.0, 5, None).unwrap();
        let sum: f64 = slots.iter().map(|s| s.target_kcal).sum();
        assert!((sum - 2333.0).abs() <= 3.0);
    }

    #[test]
    fn test_invalid_meal_count() {
        assert!(distribute_calories(2000.0, 2, None).is_err());
    }
}
