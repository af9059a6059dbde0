use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::models::{Basis, MealLineItem, MealSlot, PrecisionAdjustment, Role, SlotKind};
use crate::planner::assembler::PlannerConfig;
use crate::planner::constants::ROUNDING_SLACK_G;

/// Index of the slot with the most calories, ignoring pre-workout.
fn largest_slot(slots: &[MealSlot]) -> Option<usize> {
    slots
        .iter()
        .enumerate()
        .filter(|(_, s)| s.kind != SlotKind::PreWorkout)
        .fold(None, |best: Option<(usize, f64)>, (i, s)| match best {
            Some((_, kcal)) if kcal >= s.calories => best,
            _ => Some((i, s.calories)),
        })
        .map(|(i, _)| i)
}

/// First item whose name contains a protein-source keyword, else the first
/// item the slot template lists in the protein role.
fn primary_protein_item(
    slot: &MealSlot,
    keywords: &[String],
    protein_ids: &[&str],
) -> Option<usize> {
    slot.items
        .iter()
        .position(|item| {
            let name = item.name.to_lowercase();
            keywords.iter().any(|k| name.contains(&k.to_lowercase()))
        })
        .or_else(|| {
            slot.items.iter().position(|item| {
                protein_ids
                    .iter()
                    .any(|id| item.food_id.eq_ignore_ascii_case(id))
            })
        })
}

/// Single-pass correction of the plan's calorie total.
///
/// When the slot sum misses `target_kcal` by more than the tolerance, the
/// primary protein item of the largest slot absorbs the difference at its
/// calories-per-gram rate. The change never takes that slot below
/// protein >= carbohydrate; when that limit bites the adjustment is marked as
/// clamped. There is no second pass.
pub fn adjust_precision(
    slots: &mut [MealSlot],
    target_kcal: f64,
    catalog: &Catalog,
    config: &PlannerConfig,
) -> Result<Option<PrecisionAdjustment>> {
    let total: f64 = slots.iter().map(|s| s.calories).sum();
    let difference = target_kcal - total;
    if difference.abs() <= config.precision_tolerance_kcal {
        debug!(total, target_kcal, "plan within calorie tolerance");
        return Ok(None);
    }

    let Some(slot_idx) = largest_slot(slots) else {
        return Ok(None);
    };
    let slot = &mut slots[slot_idx];
    let protein_ids = catalog.template_foods(slot.kind, Role::Protein);
    let Some(item_idx) = primary_protein_item(slot, &config.protein_keywords, &protein_ids) else {
        debug!(slot = ?slot.kind, "no primary protein item to adjust");
        return Ok(None);
    };

    let food = catalog.food(&slot.items[item_idx].food_id)?;
    let kcal_per_quantity = food.kcal_per_quantity();
    if kcal_per_quantity <= 0.0 {
        return Ok(None);
    }

    let previous = slot.items[item_idx].quantity;
    let snap = |q: f64| match food.basis {
        Basis::PerUnit { .. } => (q * 2.0).round() / 2.0,
        Basis::Per100g => q.round(),
    };
    let mut quantity = snap(previous + difference / kcal_per_quantity).max(0.0);

    let mut clamped = false;
    let protein_rate = food.protein_per_quantity();
    let carb_rate = food.carbs_per_quantity();
    if !slot.kind.is_exempt() && protein_rate > carb_rate && quantity < previous {
        let floor = previous
            + (slot.carbs - slot.protein + ROUNDING_SLACK_G) / (protein_rate - carb_rate);
        let floor = match food.basis {
            Basis::PerUnit { .. } => (floor * 2.0).ceil() / 2.0,
            Basis::Per100g => floor.ceil(),
        };
        if quantity < floor {
            quantity = floor.min(previous);
            clamped = true;
        }
    }

    if quantity > 0.0 {
        slot.items[item_idx] = MealLineItem::new(food, quantity);
    } else {
        slot.items.remove(item_idx);
    }
    slot.recompute_totals();

    let adjustment = PrecisionAdjustment {
        slot: slot.kind,
        food_id: food.id.clone(),
        previous_quantity: previous,
        new_quantity: quantity,
        clamped,
    };

    if clamped {
        warn!(
            slot = ?adjustment.slot,
            food = %adjustment.food_id,
            difference,
            "calorie adjustment limited by the protein rule"
        );
    } else {
        debug!(
            slot = ?adjustment.slot,
            food = %adjustment.food_id,
            from = previous,
            to = quantity,
            "adjusted primary protein item"
        );
    }

    Ok(Some(adjustment))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot_with(catalog: &Catalog, kind: SlotKind, items: &[(&str, f64)]) -> MealSlot {
        let mut slot = MealSlot::new(kind, 0.0);
        for (id, qty) in items {
            slot.push(MealLineItem::new(catalog.food(id).unwrap(), *qty));
        }
        slot
    }

    #[test]
    fn test_within_tolerance_is_noop() {
        let catalog = Catalog::builtin().unwrap();
        let config = PlannerConfig::default();
        let mut slots = vec![slot_with(&catalog, SlotKind::Lunch, &[("peito_frango_grelhado", 100.0)])];

        let result = adjust_precision(&mut slots, 165.0, &catalog, &config).unwrap();
        assert!(result.is_none());
        assert!((slots[0].items[0].quantity - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_adjusts_largest_slot_protein() {
        let catalog = Catalog::builtin().unwrap();
        let config = PlannerConfig::default();
        let mut slots = vec![
            slot_with(&catalog, SlotKind::Breakfast, &[("ovo_galinha_inteiro", 2.0)]),
            slot_with(
                &catalog,
                SlotKind::Lunch,
                &[("arroz_integral_cozido", 100.0), ("peito_frango_grelhado", 150.0)],
            ),
        ];
        let before: f64 = slots.iter().map(|s| s.calories).sum();

        // Ask for 159 kcal more: 100 g of chicken.
        let result = adjust_precision(&mut slots, before + 159.0, &catalog, &config)
            .unwrap()
            .unwrap();
        assert_eq!(result.slot, SlotKind::Lunch);
        assert_eq!(result.food_id, "peito_frango_grelhado");
        assert!((result.new_quantity - 250.0).abs() < 1e-9);
        assert!(!result.clamped);

        let after: f64 = slots.iter().map(|s| s.calories).sum();
        assert!((after - (before + 159.0)).abs() <= 10.0);
    }

    #[test]
    fn test_reduction_clamped_by_protein_rule() {
        let catalog = Catalog::builtin().unwrap();
        let config = PlannerConfig::default();
        // 200 g chicken (64 g protein) against 200 g rice (51.6 g carbs).
        let mut slots = vec![slot_with(
            &catalog,
            SlotKind::Lunch,
            &[("peito_frango_grelhado", 200.0), ("arroz_integral_cozido", 200.0)],
        )];

        let result = adjust_precision(&mut slots, 100.0, &catalog, &config)
            .unwrap()
            .unwrap();
        assert!(result.clamped);
        assert!(result.new_quantity < 200.0);
        assert!(slots[0].protein >= slots[0].carbs);
    }

    #[test]
    fn test_pre_workout_never_adjusted() {
        let catalog = Catalog::builtin().unwrap();
        let config = PlannerConfig::default();
        let mut slots = vec![
            slot_with(&catalog, SlotKind::PreWorkout, &[("maltodextrina", 200.0)]),
            slot_with(&catalog, SlotKind::Snack, &[("peito_frango_grelhado", 50.0)]),
        ];

        let result = adjust_precision(&mut slots, 1200.0, &catalog, &config)
            .unwrap()
            .unwrap();
        assert_eq!(result.slot, SlotKind::Snack);
        assert!((slots[0].items[0].quantity - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_protein_item_is_noop() {
        let catalog = Catalog::builtin().unwrap();
        let config = PlannerConfig::default();
        let mut slots = vec![slot_with(&catalog, SlotKind::Snack, &[("banana_prata", 100.0)])];

        assert!(adjust_precision(&mut slots, 500.0, &catalog, &config)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_template_protein_role_used_without_keyword() {
        let catalog = Catalog::builtin().unwrap();
        let config = PlannerConfig::default();
        let mut slots = vec![slot_with(
            &catalog,
            SlotKind::Breakfast,
            &[("pao_integral", 50.0), ("ovo_galinha_inteiro", 2.0)],
        )];
        let before = slots[0].calories;

        // Two more eggs.
        let result = adjust_precision(&mut slots, before + 154.98, &catalog, &config)
            .unwrap()
            .unwrap();
        assert_eq!(result.food_id, "ovo_galinha_inteiro");
        assert!((result.new_quantity - 4.0).abs() < 1e-9);
        assert!(!result.clamped);
    }
}
