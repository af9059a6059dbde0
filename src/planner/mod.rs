pub mod assembler;
pub mod constants;
pub mod distribution;
pub mod precision;
pub mod substitutions;
pub mod targets;

pub use assembler::{MealAssembler, PlannerConfig, SlotMacroTargets};
pub use distribution::{distribute_calories, SlotAllocation};
pub use precision::adjust_precision;
pub use substitutions::build_substitutions;
pub use targets::{calculate_targets, fiber_target, TargetInputs};

use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::models::{MealSlot, PatientProfile, PlanGoals, PlanRecord, PlanSummary};

/// Generate a complete plan for a validated profile and goals.
///
/// Runs targets, distribution, slot assembly, the protein rule, one precision
/// pass, then builds the substitution and recipe appendices.
pub fn generate_plan(
    catalog: &Catalog,
    profile: &PatientProfile,
    goals: &PlanGoals,
    config: &PlannerConfig,
) -> Result<PlanRecord> {
    config.validate()?;
    let targets = calculate_targets(&TargetInputs::from_request(profile, goals))?;

    let pre_workout = goals.pre_workout.then_some(goals.pre_workout_kcal);
    let allocations = distribute_calories(goals.total_kcal, goals.meal_count, pre_workout)?;

    let assembler = MealAssembler::new(catalog, config);
    let mut slots: Vec<MealSlot> = Vec::with_capacity(allocations.len());
    for allocation in &allocations {
        let mut slot = assembler.build_slot(allocation, goals.special_dinner.as_deref())?;
        assembler.enforce_protein_rule(&mut slot)?;
        slots.push(slot);
    }

    let adjustment = adjust_precision(&mut slots, goals.total_kcal, catalog, config)?;

    let substitutions = build_substitutions(&slots, config);
    let recipes = assembler.recipe_cards(&slots)?;

    let mut summary =
        PlanSummary::from_slots(&slots, goals.total_kcal, config.precision_tolerance_kcal);
    summary.adjustment = adjustment;

    if !summary.within_tolerance {
        warn!(
            deviation = summary.calorie_deviation,
            "plan calories outside tolerance after adjustment"
        );
    }
    debug!(
        slots = slots.len(),
        kcal = summary.calories,
        target = goals.total_kcal,
        "plan generated"
    );

    Ok(PlanRecord {
        profile: profile.clone(),
        goals: goals.clone(),
        targets,
        slots,
        substitutions,
        recipes,
        summary,
    })
}
