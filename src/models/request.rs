use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::models::profile::{ActivityLevel, Goal, PatientProfile, PlanGoals, Sex};
use crate::planner::constants::{
    DEFAULT_CARBS_MAX_PCT, DEFAULT_FAT_MAX_PCT, DEFAULT_FIBER_MIN_G, DEFAULT_MEAL_COUNT,
    DEFAULT_PRE_WORKOUT_KCAL, DEFAULT_PROTEIN_MIN_G_PER_KG,
};

/// Patient fields as received from the caller, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientInput {
    pub name: Option<String>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age: Option<u32>,
    pub sex: Option<String>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
}

/// Goal fields as received from the caller. Absent values take defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalsInput {
    pub total_kcal: Option<f64>,
    pub protein_min_g_per_kg: Option<f64>,
    pub carbs_max_pct: Option<f64>,
    pub fat_max_pct: Option<f64>,
    pub fiber_min_g: Option<f64>,
    pub meal_count: Option<u8>,
    #[serde(default)]
    pub pre_workout: bool,
    pub pre_workout_kcal: Option<f64>,
    pub special_dinner: Option<String>,
}

/// A plan-generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(default)]
    pub patient: PatientInput,
    #[serde(default)]
    pub goals: GoalsInput,
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or(PlanError::MissingField(field))
}

fn require_positive(value: Option<f64>, field: &'static str) -> Result<f64> {
    let v = require(value, field)?;
    if !v.is_finite() || v <= 0.0 {
        return Err(PlanError::InvalidInput(format!(
            "{} must be positive, got {}",
            field, v
        )));
    }
    Ok(v)
}

fn percent(value: Option<f64>, default: f64, field: &str) -> Result<f64> {
    let v = value.unwrap_or(default);
    if !(v > 0.0 && v <= 100.0) {
        return Err(PlanError::InvalidInput(format!(
            "{} must be within (0, 100], got {}",
            field, v
        )));
    }
    Ok(v)
}

impl PlanRequest {
    /// Parse a request from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Validate the request into a profile and goals record.
    pub fn validate(&self) -> Result<(PatientProfile, PlanGoals)> {
        let p = &self.patient;

        let name = require(p.name.clone(), "name")?;
        if name.trim().is_empty() {
            return Err(PlanError::MissingField("name"));
        }
        let weight_kg = require_positive(p.weight_kg, "weight_kg")?;
        let height_cm = require_positive(p.height_cm, "height_cm")?;
        let age = require(p.age, "age")?;
        if !(1..=120).contains(&age) {
            return Err(PlanError::InvalidInput(format!(
                "age must be between 1 and 120, got {}",
                age
            )));
        }
        let sex = Sex::parse(&require(p.sex.clone(), "sex")?)?;
        let activity_level = ActivityLevel::parse(&require(p.activity_level.clone(), "activity_level")?)?;
        let goal = Goal::parse(&require(p.goal.clone(), "goal")?)?;

        let profile = PatientProfile {
            name: name.trim().to_string(),
            weight_kg,
            height_cm,
            age,
            sex,
            activity_level,
            goal,
        };

        let g = &self.goals;
        let total_kcal = match g.total_kcal {
            Some(_) => require_positive(g.total_kcal, "total_kcal")?,
            None => profile.estimated_energy(),
        };
        let protein_min_g_per_kg = require_positive(
            Some(g.protein_min_g_per_kg.unwrap_or(DEFAULT_PROTEIN_MIN_G_PER_KG)),
            "protein_min_g_per_kg",
        )?;
        let carbs_max_pct = percent(g.carbs_max_pct, DEFAULT_CARBS_MAX_PCT, "carbs_max_pct")?;
        let fat_max_pct = percent(g.fat_max_pct, DEFAULT_FAT_MAX_PCT, "fat_max_pct")?;
        let fiber_min_g = g.fiber_min_g.unwrap_or(DEFAULT_FIBER_MIN_G);
        if fiber_min_g < 0.0 {
            return Err(PlanError::InvalidInput(
                "fiber_min_g must not be negative".to_string(),
            ));
        }

        let meal_count = g.meal_count.unwrap_or(DEFAULT_MEAL_COUNT);
        if !(3..=5).contains(&meal_count) {
            return Err(PlanError::InvalidInput(format!(
                "meal_count must be 3, 4 or 5, got {}",
                meal_count
            )));
        }

        let pre_workout_kcal = g.pre_workout_kcal.unwrap_or(DEFAULT_PRE_WORKOUT_KCAL);
        if g.pre_workout && !(pre_workout_kcal > 0.0 && pre_workout_kcal < total_kcal) {
            return Err(PlanError::InvalidInput(format!(
                "pre_workout_kcal must be within (0, {}), got {}",
                total_kcal, pre_workout_kcal
            )));
        }

        let goals = PlanGoals {
            total_kcal,
            protein_min_g_per_kg,
            carbs_max_pct,
            fat_max_pct,
            fiber_min_g,
            meal_count,
            pre_workout: g.pre_workout,
            pre_workout_kcal,
            special_dinner: g.special_dinner.clone().filter(|s| !s.trim().is_empty()),
        };

        Ok((profile, goals))
    }
}
