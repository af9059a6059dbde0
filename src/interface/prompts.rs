use dialoguer::{Confirm, Input, Select};

use crate::catalog::Catalog;
use crate::error::{PlanError, Result};
use crate::models::{FoodEntry, GoalsInput, PatientInput, PlanRequest};

fn parse_number(input: &str, what: &str) -> Result<f64> {
    input
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| PlanError::InvalidInput(format!("Invalid number for {}", what)))
}

fn prompt_number(prompt: &str, default: Option<&str>) -> Result<f64> {
    let mut input = Input::<String>::new().with_prompt(prompt);
    if let Some(d) = default {
        input = input.default(d.to_string());
    }
    parse_number(&input.interact_text()?, prompt)
}

/// Pick one of `options`, returning the value in the second tuple position.
fn prompt_choice(prompt: &str, options: &[(&str, &str)], default: usize) -> Result<String> {
    let labels: Vec<&str> = options.iter().map(|(label, _)| *label).collect();
    let selection = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(default)
        .interact()?;
    Ok(options[selection].1.to_string())
}

/// Collect the patient's data.
pub fn prompt_patient() -> Result<PatientInput> {
    let name: String = Input::new().with_prompt("Patient name").interact_text()?;
    let weight_kg = prompt_number("Weight (kg)", None)?;
    let height_cm = prompt_number("Height (cm)", None)?;
    let age: u32 = Input::new().with_prompt("Age").interact_text()?;

    let sex = prompt_choice("Sex", &[("Male", "male"), ("Female", "female")], 0)?;
    let activity_level = prompt_choice(
        "Activity level",
        &[
            ("Sedentary", "sedentary"),
            ("Light", "light"),
            ("Moderate", "moderate"),
            ("Very active", "very_active"),
            ("Extra active", "extra_active"),
        ],
        2,
    )?;
    let goal = prompt_choice(
        "Goal",
        &[
            ("Maintenance", "maintenance"),
            ("Muscle gain", "gain"),
            ("Fat loss", "loss"),
        ],
        0,
    )?;

    Ok(PatientInput {
        name: Some(name),
        weight_kg: Some(weight_kg),
        height_cm: Some(height_cm),
        age: Some(age),
        sex: Some(sex),
        activity_level: Some(activity_level),
        goal: Some(goal),
    })
}

/// Collect plan goals. An empty calorie answer means "estimate from profile".
pub fn prompt_goals(catalog: &Catalog) -> Result<GoalsInput> {
    let kcal: String = Input::new()
        .with_prompt("Daily calories (empty to estimate)")
        .allow_empty(true)
        .interact_text()?;
    let total_kcal = if kcal.trim().is_empty() {
        None
    } else {
        Some(parse_number(&kcal, "daily calories")?)
    };

    let protein = prompt_number("Minimum protein (g/kg)", Some("2.0"))?;

    let meal_count = prompt_choice("Meals per day", &[("3", "3"), ("4", "4"), ("5", "5")], 2)?;
    let meal_count: u8 = meal_count
        .parse()
        .map_err(|_| PlanError::InvalidInput("Invalid meal count".to_string()))?;

    let pre_workout = prompt_yes_no("Include a pre-workout meal?", false)?;
    let pre_workout_kcal = if pre_workout {
        Some(prompt_number("Pre-workout calories", Some("150"))?)
    } else {
        None
    };

    let special_dinner = if prompt_yes_no("Use a recipe for dinner?", false)? {
        let components: Vec<(&str, &str)> = catalog
            .components()
            .map(|c| (c.name.as_str(), c.id.as_str()))
            .collect();
        Some(prompt_choice("Dinner recipe", &components, 0)?)
    } else {
        None
    };

    Ok(GoalsInput {
        total_kcal,
        protein_min_g_per_kg: Some(protein),
        meal_count: Some(meal_count),
        pre_workout,
        pre_workout_kcal,
        special_dinner,
        ..Default::default()
    })
}

/// Collect a full plan request interactively.
pub fn prompt_plan_request(catalog: &Catalog) -> Result<PlanRequest> {
    let patient = prompt_patient()?;
    let goals = prompt_goals(catalog)?;
    Ok(PlanRequest { patient, goals })
}

/// Resolve a possibly misspelled food id, offering close matches.
pub fn prompt_food_match<'a>(catalog: &'a Catalog, query: &str) -> Result<Option<&'a FoodEntry>> {
    let candidates = catalog.foods().suggest(query);

    match candidates.len() {
        0 => Ok(None),
        1 => {
            let food = candidates[0];
            let confirm = Confirm::new()
                .with_prompt(format!("Did you mean '{}' ({})?", food.name, food.id))
                .default(true)
                .interact()?;
            Ok(confirm.then_some(food))
        }
        _ => {
            let mut labels: Vec<String> = candidates
                .iter()
                .map(|f| format!("{} ({})", f.name, f.id))
                .collect();
            labels.push("None of these".to_string());

            let selection = Select::new()
                .with_prompt("Which did you mean?")
                .items(&labels)
                .default(0)
                .interact()?;
            Ok(candidates.get(selection).copied())
        }
    }
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
