#[macro_use]
extern crate assert_float_eq;

use meal_plan_maker_rs::catalog::Catalog;
use meal_plan_maker_rs::error::PlanError;
use meal_plan_maker_rs::models::{PlanGoals, PlanRecord, PlanRequest, SlotKind};
use meal_plan_maker_rs::planner::{calculate_targets, generate_plan, PlannerConfig, TargetInputs};

fn request(total_kcal: f64, meal_count: u8, pre_workout: bool) -> PlanRequest {
    let json = format!(
        r#"{{
            "patient": {{
                "name": "Maria Souza",
                "weight_kg": 75,
                "height_cm": 178,
                "age": 30,
                "sex": "M",
                "activity_level": "moderate",
                "goal": "maintenance"
            }},
            "goals": {{
                "total_kcal": {},
                "protein_min_g_per_kg": 2.3,
                "meal_count": {},
                "pre_workout": {}
            }}
        }}"#,
        total_kcal, meal_count, pre_workout
    );
    PlanRequest::from_json(&json).unwrap()
}

fn plan_for(total_kcal: f64, meal_count: u8, pre_workout: bool) -> PlanRecord {
    let catalog = Catalog::builtin().unwrap();
    let (profile, goals) = request(total_kcal, meal_count, pre_workout)
        .validate()
        .unwrap();
    generate_plan(&catalog, &profile, &goals, &PlannerConfig::default()).unwrap()
}

#[test]
fn test_reference_protein_target() {
    let record = plan_for(2000.0, 5, false);
    assert_float_absolute_eq!(record.targets.protein_g, 172.5, 1e-9);
}

#[test]
fn test_macro_kcal_sum_matches_goal() {
    for total in [1500.0, 2000.0, 2500.0, 3200.0] {
        let inputs = TargetInputs {
            weight_kg: 75.0,
            total_kcal: total,
            protein_min_g_per_kg: 2.0,
            carbs_max_pct: 50.0,
            fat_max_pct: 30.0,
            fiber_min_g: 25.0,
        };
        let targets = calculate_targets(&inputs).unwrap();
        assert_float_absolute_eq!(targets.macro_kcal_sum(), total, 2.0);
    }
}

#[test]
fn test_slot_order_five_meals() {
    let record = plan_for(2000.0, 5, false);
    let kinds: Vec<SlotKind> = record.slots.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SlotKind::Breakfast,
            SlotKind::Lunch,
            SlotKind::Snack,
            SlotKind::Dinner,
            SlotKind::NightSnack
        ]
    );
}

#[test]
fn test_pre_workout_follows_snack() {
    let record = plan_for(2000.0, 5, true);
    let kinds: Vec<SlotKind> = record.slots.iter().map(|s| s.kind).collect();
    let snack = kinds.iter().position(|k| *k == SlotKind::Snack).unwrap();
    assert_eq!(kinds[snack + 1], SlotKind::PreWorkout);

    let pre = &record.slots[snack + 1];
    assert_eq!(pre.items.len(), 1);
    assert_float_absolute_eq!(pre.calories, 150.0, 1.0);
}

#[test]
fn test_protein_rule_holds_for_every_slot() {
    for (total, meals, pre) in [
        (2000.0, 5, false),
        (2000.0, 5, true),
        (1500.0, 4, false),
        (2500.0, 3, false),
        (2800.0, 4, true),
    ] {
        let record = plan_for(total, meals, pre);
        for slot in &record.slots {
            if slot.kind == SlotKind::PreWorkout {
                continue;
            }
            assert!(
                slot.protein >= slot.carbs,
                "{:?} at {} kcal: protein {} < carbs {}",
                slot.kind,
                total,
                slot.protein,
                slot.carbs
            );
        }
        assert!(record.summary.protein_rule_ok);
    }
}

#[test]
fn test_calorie_total_within_tolerance_or_flagged() {
    for (total, meals, pre) in [
        (2000.0, 5, false),
        (2000.0, 5, true),
        (1500.0, 4, false),
        (2500.0, 3, false),
    ] {
        let record = plan_for(total, meals, pre);
        let sum: f64 = record.slots.iter().map(|s| s.calories).sum();
        let within = (sum - total).abs() <= 10.0;
        let clamped = record
            .summary
            .adjustment
            .as_ref()
            .is_some_and(|a| a.clamped);
        assert!(
            within || clamped,
            "{} kcal plan off by {} without a clamped adjustment",
            total,
            sum - total
        );
        assert_eq!(record.summary.within_tolerance, within);
    }
}

#[test]
fn test_reference_plan_lands_within_tolerance() {
    let record = plan_for(2000.0, 5, false);
    assert!(record.summary.within_tolerance);

    let adjustment = record.summary.adjustment.as_ref().unwrap();
    assert_eq!(adjustment.slot, SlotKind::Lunch);
    assert_eq!(adjustment.food_id, "peito_frango_grelhado");
    assert!(!adjustment.clamped);
}

#[test]
fn test_item_calories_scale_linearly() {
    let catalog = Catalog::builtin().unwrap();
    let egg = catalog.food("ovo_galinha_inteiro").unwrap();
    assert_float_absolute_eq!(egg.kcal_for(2.0), 154.98, 1e-9);

    for id in ["peito_frango_grelhado", "arroz_integral_cozido", "whey_protein_isolado"] {
        let food = catalog.food(id).unwrap();
        assert_float_absolute_eq!(food.kcal_for(240.0), 2.0 * food.kcal_for(120.0), 0.01);
    }
}

#[test]
fn test_appendices_present() {
    let record = plan_for(2000.0, 5, false);
    assert!(record
        .substitutions
        .iter()
        .any(|s| s.slot == SlotKind::Lunch));
    assert_eq!(
        record
            .recipes
            .iter()
            .filter(|r| r.slot == SlotKind::Dinner)
            .count(),
        3
    );
}

#[test]
fn test_special_dinner_uses_recipe() {
    let catalog = Catalog::builtin().unwrap();
    let (profile, mut goals) = request(2000.0, 5, false).validate().unwrap();
    goals.special_dinner = Some("crepioca".to_string());

    let record = generate_plan(&catalog, &profile, &goals, &PlannerConfig::default()).unwrap();
    let dinner = record
        .slots
        .iter()
        .find(|s| s.kind == SlotKind::Dinner)
        .unwrap();
    assert!(dinner.items.iter().any(|i| i.food_id == "goma_tapioca"));
    assert!(dinner.protein >= dinner.carbs);
}

#[test]
fn test_unknown_special_dinner_fails_loudly() {
    let catalog = Catalog::builtin().unwrap();
    let (profile, goals) = request(2000.0, 5, false).validate().unwrap();
    let goals = PlanGoals {
        special_dinner: Some("feijoada".to_string()),
        ..goals
    };

    let result = generate_plan(&catalog, &profile, &goals, &PlannerConfig::default());
    assert!(matches!(result, Err(PlanError::ComponentNotFound(_))));
}

#[test]
fn test_missing_weight_rejected() {
    let mut req = request(2000.0, 5, false);
    req.patient.weight_kg = None;
    assert!(matches!(
        req.validate(),
        Err(PlanError::MissingField("weight_kg"))
    ));
}

#[test]
fn test_estimated_calories_when_goal_absent() {
    let mut req = request(2000.0, 5, false);
    req.goals.total_kcal = None;
    let (_, goals) = req.validate().unwrap();
    assert_float_absolute_eq!(goals.total_kcal, 2660.0, 1e-9);
}

#[test]
fn test_inverted_powder_bounds_rejected_before_assembly() {
    let catalog = Catalog::builtin().unwrap();
    let (profile, goals) = request(2000.0, 5, false).validate().unwrap();
    let config = PlannerConfig {
        night_snack_powder_min_g: 40.0,
        ..PlannerConfig::default()
    };

    let result = generate_plan(&catalog, &profile, &goals, &config);
    assert!(matches!(result, Err(PlanError::InvalidInput(_))));
}
