use crate::models::food::format_quantity;
use crate::models::{Basis, FoodEntry, PlanRecord};
use crate::report::{ProcessedReport, ReportStatus};

/// Print a processed report, with the continuation part when present.
pub fn display_report(report: &ProcessedReport) {
    println!("{}", report.formatted_text);

    if let (ReportStatus::Partial, Some(rest)) = (report.status, &report.continuation_text) {
        println!();
        println!("----- continuação -----");
        println!();
        println!("{}", rest);
    }
}

/// One-line summary of the plan's totals against its targets.
pub fn display_plan_summary(record: &PlanRecord) {
    let s = &record.summary;
    println!(
        "Total: {:.0} kcal (target {:.0}, deviation {:+.0}) | P {:.1} g C {:.1} g F {:.1} g Fiber {:.1} g",
        s.calories,
        record.targets.total_kcal,
        s.calorie_deviation,
        s.protein_g,
        s.carbs_g,
        s.fat_g,
        s.fiber_g
    );
}

/// Display a list of foods with their nutrition values.
pub fn display_food_list(foods: &[&FoodEntry], title: &str) {
    if foods.is_empty() {
        println!("{}: (none)", title);
        return;
    }

    println!();
    println!("=== {} ({} items) ===", title, foods.len());
    println!();

    let max_id_len = foods.iter().map(|f| f.id.chars().count()).max().unwrap_or(10);

    for food in foods {
        println!(
            "  {:<width$}  {:>7.2} kcal/{:<8} P:{:<6} C:{:<6} F:{:<6} [{}]",
            food.id,
            food.calories,
            basis_label(food),
            food.protein,
            food.carbs,
            food.fat,
            food.category,
            width = max_id_len
        );
    }

    println!();
}

fn basis_label(food: &FoodEntry) -> String {
    match &food.basis {
        Basis::Per100g => "100g".to_string(),
        Basis::PerUnit { unit } => unit.clone(),
    }
}

/// Display every field of one food.
pub fn display_food(food: &FoodEntry) {
    println!();
    println!("{} ({})", food.name, food.id);
    println!("  Category: {}", food.category);
    println!("  Per {}:", basis_label(food));
    println!("    Calories: {:.2} kcal", food.calories);
    println!("    Protein:  {} g", format_quantity(food.protein));
    println!("    Carbs:    {} g", format_quantity(food.carbs));
    println!("    Fat:      {} g", format_quantity(food.fat));
    println!("    Fiber:    {} g", format_quantity(food.fiber));
    if !food.household_measures.is_empty() {
        println!("  Household measures:");
        for (name, grams) in &food.household_measures {
            println!("    {} = {} g", name, format_quantity(*grams));
        }
    }
    println!();
}
